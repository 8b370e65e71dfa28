use crate::util::ToSqlStatementList;
use crate::{Parameters, Result};
use std::fmt::{Display, Formatter};

/// A captured SQL statement with its bound parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    sql: String,
    parameters: Parameters,
}

impl Query {
    pub fn new<S: Into<String>>(sql: S, parameters: Parameters) -> Self {
        Self {
            sql: sql.into(),
            parameters,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn has_parameters(&self) -> bool {
        !self.parameters.is_empty()
    }
}

impl Display for Query {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.sql)
    }
}

/// Statements registered by a migration hook.
///
/// Adding SQL never touches the database: the executor drains the buffer
/// and decides whether to run or only record each statement.
#[derive(Debug, Default)]
pub struct SqlBuffer {
    queries: Vec<Query>,
}

impl SqlBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sql<S: Into<String>>(&mut self, sql: S) {
        self.queries.push(Query::new(sql, Parameters::new()));
    }

    pub fn add_sql_with_params<S: Into<String>>(&mut self, sql: S, parameters: Parameters) {
        self.queries.push(Query::new(sql, parameters));
    }

    /// Adds every statement of the list, in order.
    pub fn add_statements<T: ToSqlStatementList>(&mut self, statements: T) -> Result<()> {
        for sql in statements.to_statement_list()? {
            self.add_sql(sql);
        }

        Ok(())
    }

    pub fn queries(&self) -> &[Query] {
        &self.queries
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub(crate) fn take(&mut self) -> Vec<Query> {
        std::mem::take(&mut self.queries)
    }
}

#[cfg(test)]
mod tests {
    use super::SqlBuffer;
    use crate::params;

    #[test]
    fn statements_are_buffered_in_order() {
        let mut buffer = SqlBuffer::new();
        buffer.add_sql("CREATE TABLE test (id INTEGER)");
        buffer.add_sql_with_params("INSERT INTO test VALUES (?)", params![1]);
        buffer
            .add_statements(vec!["SELECT 1".to_string(), "SELECT 2".to_string()])
            .unwrap();

        assert_eq!(buffer.len(), 4);
        assert!(!buffer.queries()[0].has_parameters());
        assert!(buffer.queries()[1].has_parameters());

        let taken = buffer.take();
        assert_eq!(taken[3].sql(), "SELECT 2");
        assert!(buffer.is_empty());
    }
}
