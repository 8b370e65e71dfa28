use crate::{AsyncResult, Parameters, Row};

/// Database access needed to apply migrations and track versions.
///
/// Implementations own their transaction state: `begin_transaction`
/// opens a transaction that stays active until `commit` or `roll_back`.
pub trait Connection: Send + Sync {
    /// Executes a statement, returning the number of affected rows.
    fn execute_statement<'a>(&'a self, sql: &'a str, params: &'a Parameters) -> AsyncResult<'a, u64>;

    /// Executes a query, returning all the produced rows.
    fn fetch_all<'a>(&'a self, sql: &'a str, params: &'a Parameters) -> AsyncResult<'a, Vec<Row>>;

    /// Whether a table with the given name exists. Never modifies the database.
    fn table_exists<'a>(&'a self, table_name: &'a str) -> AsyncResult<'a, bool>;

    fn begin_transaction(&self) -> AsyncResult<'_, ()>;

    fn commit(&self) -> AsyncResult<'_, ()>;

    fn roll_back(&self) -> AsyncResult<'_, ()>;
}
