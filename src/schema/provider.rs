use crate::schema::Schema;
use crate::{AsyncResult, Result};

/// Supplies the schemas handed to migration hooks and the SQL needed to go
/// from one to the other.
pub trait SchemaProvider: Send + Sync {
    /// Schema the run starts from.
    fn create_from_schema(&self) -> AsyncResult<'_, Schema>;

    /// Starting point of the schema the main hook mutates.
    fn create_to_schema(&self, from_schema: &Schema) -> Schema {
        from_schema.clone()
    }

    /// Statements turning `from_schema` into `to_schema`.
    fn get_sql_diff_to_migrate(&self, from_schema: &Schema, to_schema: &Schema) -> Result<Vec<String>>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct EmptySchemaProvider;

impl SchemaProvider for EmptySchemaProvider {
    fn create_from_schema(&self) -> AsyncResult<'_, Schema> {
        Box::pin(async { Ok(Schema::default()) })
    }

    fn get_sql_diff_to_migrate(&self, _: &Schema, _: &Schema) -> Result<Vec<String>> {
        Ok(vec![])
    }
}
