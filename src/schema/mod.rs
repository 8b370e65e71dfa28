mod column;
mod provider;
mod schema;
mod table;

pub use column::{Column, ColumnType};
pub use provider::{EmptySchemaProvider, SchemaProvider};
pub use schema::Schema;
pub use table::Table;
