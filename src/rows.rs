use crate::error::Error;
use crate::{Result, Value};

pub enum ColumnIndex {
    Name(String),
    Position(usize),
}

impl From<usize> for ColumnIndex {
    fn from(i: usize) -> Self {
        Self::Position(i)
    }
}

impl From<&str> for ColumnIndex {
    fn from(s: &str) -> Self {
        Self::Name(s.to_string())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Row {
    /// Creates a new row.
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    /// Gets a column by index.
    ///
    /// If an index (string or numeric) is not present, an OutOfBoundsError
    /// error is raised.
    pub fn get<C: Into<ColumnIndex>>(&self, i: C) -> Result<&Value> {
        let i = match i.into() {
            ColumnIndex::Name(name) => self
                .columns
                .iter()
                .rposition(|column_name| column_name == &name)
                .ok_or_else(|| Error::out_of_bounds(&name)),
            ColumnIndex::Position(index) => Ok(index),
        }?;

        self.values.get(i).ok_or_else(|| Error::out_of_bounds(i))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ErrorKind;
    use crate::{Row, Value};
    use tokio_test::assert_err;

    #[test]
    fn test_row_can_be_queried() {
        let row = Row::new(
            vec!["col_1".to_string(), "col_test".to_string()],
            vec![Value::NULL, Value::String("test_value".to_string())],
        );
        assert_eq!(
            row.get("col_1").expect("Failed to retrieve 'col_1' column"),
            &Value::NULL
        );
        assert_eq!(
            row.get(0).expect("Failed to retrieve first column"),
            &Value::NULL
        );
        assert_eq!(
            row.get("col_test")
                .expect("Failed to retrieve 'col_test' column"),
            &Value::String("test_value".to_string())
        );
        assert_eq!(row.columns().len(), 2);
    }

    #[test]
    fn test_nonexistent_column_should_return_an_error() {
        let row = Row::new(vec!["col_1".to_string()], vec![Value::NULL]);

        let err = assert_err!(row.get("no_col"));
        assert_eq!(err.kind(), ErrorKind::OutOfBoundsError);
        let err = assert_err!(row.get(3));
        assert_eq!(err.kind(), ErrorKind::OutOfBoundsError);
    }
}
