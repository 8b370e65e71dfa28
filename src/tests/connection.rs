use crate::{AsyncResult, Connection, Error, Parameters, Row};
use std::fmt::{Debug, Formatter};
use std::sync::Mutex;

#[derive(Clone, Debug, PartialEq)]
pub enum ConnectionEvent {
    Statement(String, Parameters),
    Query(String),
    Begin,
    Commit,
    RollBack,
}

/// Connection recording everything it is asked to do.
///
/// Statements containing the configured marker fail.
#[derive(Default)]
pub struct MockConnection {
    events: Mutex<Vec<ConnectionEvent>>,
    tables: Mutex<Vec<String>>,
    fail_on: Option<String>,
}

impl MockConnection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(marker: &str) -> Self {
        Self {
            fail_on: Some(marker.to_string()),
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<ConnectionEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn executed_sql(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ConnectionEvent::Statement(sql, _) => Some(sql),
                _ => None,
            })
            .collect()
    }

    /// Tables created through `CREATE TABLE` statements.
    pub fn tables(&self) -> Vec<String> {
        self.tables.lock().unwrap().clone()
    }

    fn record(&self, event: ConnectionEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl Debug for MockConnection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockConnection").finish()
    }
}

impl Connection for MockConnection {
    fn execute_statement<'a>(&'a self, sql: &'a str, params: &'a Parameters) -> AsyncResult<'a, u64> {
        Box::pin(async move {
            self.record(ConnectionEvent::Statement(sql.to_string(), params.clone()));
            match &self.fail_on {
                Some(marker) if sql.contains(marker.as_str()) => {
                    Err(Error::from(format!("no such table: {}", marker)))
                }
                _ => {
                    let created = sql
                        .strip_prefix("CREATE TABLE IF NOT EXISTS ")
                        .or_else(|| sql.strip_prefix("CREATE TABLE "))
                        .and_then(|rest| rest.split([' ', '(']).next());
                    if let Some(table) = created {
                        let mut tables = self.tables.lock().unwrap();
                        if !tables.iter().any(|t| t == table) {
                            tables.push(table.to_string());
                        }
                    }

                    Ok(1)
                }
            }
        })
    }

    fn fetch_all<'a>(&'a self, sql: &'a str, _: &'a Parameters) -> AsyncResult<'a, Vec<Row>> {
        Box::pin(async move {
            self.record(ConnectionEvent::Query(sql.to_string()));
            Ok(vec![])
        })
    }

    fn table_exists<'a>(&'a self, table_name: &'a str) -> AsyncResult<'a, bool> {
        Box::pin(async move {
            Ok(self.tables.lock().unwrap().iter().any(|t| t == table_name))
        })
    }

    fn begin_transaction(&self) -> AsyncResult<'_, ()> {
        Box::pin(async move {
            self.record(ConnectionEvent::Begin);
            Ok(())
        })
    }

    fn commit(&self) -> AsyncResult<'_, ()> {
        Box::pin(async move {
            self.record(ConnectionEvent::Commit);
            Ok(())
        })
    }

    fn roll_back(&self) -> AsyncResult<'_, ()> {
        Box::pin(async move {
            self.record(ConnectionEvent::RollBack);
            Ok(())
        })
    }
}
