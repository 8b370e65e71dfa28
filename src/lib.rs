extern crate self as creed_migrations;

pub mod configuration;
mod connection;
pub mod driver;
pub mod error;
pub mod migrate;
mod output_writer;
mod parameter;
mod parameter_formatter;
mod parameter_type;
mod result;
mod rows;
pub mod schema;
pub mod stopwatch;
pub mod sync;
pub mod util;
mod value;

#[cfg(test)]
mod tests;

pub use configuration::{Configuration, MigratorConfig};
pub use connection::Connection;
pub use creed_migrations_macros::migrations;
pub use error::Error;
pub use output_writer::OutputWriter;
pub use parameter::{IntoParameter, Parameter, ParameterIndex, Parameters};
pub use parameter_formatter::ParameterFormatter;
pub use parameter_type::ParameterType;
pub use result::{AsyncResult, Result};
pub use rows::{ColumnIndex, Row};
pub use stopwatch::Stopwatch;
pub use value::Value;
