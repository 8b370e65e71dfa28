mod driver;

pub use driver::{ConnectionOptions, SqliteConnection};
