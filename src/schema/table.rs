use crate::schema::Column;
use itertools::Itertools;

#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
    primary_key: Vec<String>,
}

impl Table {
    pub fn new<S: AsRef<str>>(name: S) -> Self {
        Self {
            name: name.as_ref().to_string(),
            columns: vec![],
            primary_key: vec![],
        }
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_columns(&self) -> &[Column] {
        &self.columns
    }

    /// Adds a column, replacing any column with the same name.
    pub fn add_column(&mut self, column: Column) -> &mut Self {
        self.columns.retain(|c| c.get_name() != column.get_name());
        self.columns.push(column);
        self
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.get_name() == name)
    }

    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.get_name() == name)
    }

    pub fn set_primary_key<S: AsRef<str>>(&mut self, columns: &[S]) -> &mut Self {
        self.primary_key = columns.iter().map(|c| c.as_ref().to_string()).collect();
        self
    }

    pub fn get_primary_key(&self) -> &[String] {
        &self.primary_key
    }

    pub fn get_create_sql(&self, if_not_exists: bool) -> String {
        let mut definitions = self
            .columns
            .iter()
            .map(|c| c.get_declaration_sql())
            .collect::<Vec<_>>();
        if !self.primary_key.is_empty() {
            definitions.push(format!("PRIMARY KEY ({})", self.primary_key.iter().join(", ")));
        }

        format!(
            "CREATE TABLE {}{} ({})",
            if if_not_exists { "IF NOT EXISTS " } else { "" },
            self.name,
            definitions.join(", ")
        )
    }

    pub fn get_drop_sql(&self) -> String {
        format!("DROP TABLE {}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use crate::schema::{Column, ColumnType, Table};

    #[test]
    fn create_sql_lists_columns_and_primary_key() {
        let mut table = Table::new("migration_versions");
        table
            .add_column(Column::builder("version", ColumnType::String).set_notnull(true))
            .add_column(Column::builder("executed_at", ColumnType::DateTime))
            .set_primary_key(&["version"]);

        assert_eq!(
            table.get_create_sql(true),
            "CREATE TABLE IF NOT EXISTS migration_versions (version VARCHAR(255) NOT NULL, executed_at DATETIME, PRIMARY KEY (version))"
        );
        assert_eq!(table.get_drop_sql(), "DROP TABLE migration_versions");
    }

    #[test]
    fn adding_a_column_twice_replaces_it() {
        let mut table = Table::new("foo");
        table.add_column(Column::new("id", ColumnType::Integer));
        table.add_column(Column::new("id", ColumnType::BigInt));

        assert_eq!(table.get_columns().len(), 1);
        assert_eq!(
            table.get_column("id").map(|c| c.get_type()),
            Some(ColumnType::BigInt)
        );
    }
}
