use crate::schema::Table;

/// Description of the database structure a migration works against.
///
/// Migrations receive the schema the run started from and may record
/// the changes they intend to apply on a mutable copy.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Schema {
    tables: Vec<Table>,
}

impl Schema {
    pub fn new(tables: Vec<Table>) -> Self {
        Self { tables }
    }

    pub fn get_tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.get_name() == name)
    }

    pub fn get_table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.iter_mut().find(|t| t.get_name() == name)
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.get_table(name).is_some()
    }

    /// Creates a table, or returns the existing one with the same name.
    pub fn create_table(&mut self, name: &str) -> &mut Table {
        let position = match self.tables.iter().position(|t| t.get_name() == name) {
            Some(position) => position,
            None => {
                self.tables.push(Table::new(name));
                self.tables.len() - 1
            }
        };

        &mut self.tables[position]
    }

    pub fn drop_table(&mut self, name: &str) -> Option<Table> {
        let position = self.tables.iter().position(|t| t.get_name() == name)?;
        Some(self.tables.remove(position))
    }
}
