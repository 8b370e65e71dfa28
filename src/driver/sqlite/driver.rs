use crate::error::Error;
use crate::sync::Mutex;
use crate::{AsyncResult, Connection, Parameter, ParameterIndex, Parameters, Result, Row, Value};
use log::debug;
use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::ToSql;
use url::Url;

#[derive(Clone, Debug, PartialEq)]
pub struct ConnectionOptions {
    path: Option<String>,
}

impl ConnectionOptions {
    /// Parses a sqlite dsn.
    ///
    /// Accepts `sqlite://:memory:`, `sqlite:///absolute/path` or a plain
    /// file path.
    pub fn new<T: Into<String>>(dsn: T) -> Result<Self> {
        let dsn = dsn.into();
        if !dsn.starts_with("sqlite:") {
            return Ok(Self::new_with_path(dsn));
        }

        if dsn.starts_with("sqlite://:memory:") {
            return Ok(Self::new_from_memory());
        }

        let url = Url::parse(dsn.as_str())?;
        let target = match url.domain() {
            Some(domain) if !domain.is_empty() => format!("{}{}", domain, url.path()),
            _ => url.path().to_string(),
        };

        Ok(Self::new_with_path(target))
    }

    pub fn new_with_path<T: Into<String>>(path: T) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn new_from_memory() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn is_memory(&self) -> bool {
        self.path.is_none()
    }
}

/// [`Connection`] backed by an embedded sqlite database.
pub struct SqliteConnection {
    connection: Mutex<rusqlite::Connection>,
}

impl SqliteConnection {
    pub fn open<T: Into<String>>(dsn: T) -> Result<Self> {
        Self::open_with_options(ConnectionOptions::new(dsn)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::open_with_options(ConnectionOptions::new_from_memory())
    }

    pub fn open_with_options(options: ConnectionOptions) -> Result<Self> {
        let connection = match options.path {
            None => rusqlite::Connection::open_in_memory(),
            Some(path) => rusqlite::Connection::open(path),
        }?;

        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn bind(statement: &mut rusqlite::Statement<'_>, params: &Parameters) -> Result<()> {
        for (index, parameter) in params {
            if parameter.value.is_array() {
                return Err(Error::unsupported_parameter_type(
                    "array parameters cannot be bound to a sqlite statement",
                ));
            }

            let position = match index {
                ParameterIndex::Positional(i) => i + 1,
                ParameterIndex::Named(name) => {
                    let name = if name.starts_with(':') {
                        name.clone()
                    } else {
                        format!(":{}", name)
                    };

                    statement
                        .parameter_index(&name)?
                        .ok_or_else(|| Error::out_of_bounds(&name))?
                }
            };

            statement.raw_bind_parameter(position, parameter)?;
        }

        Ok(())
    }
}

impl Connection for SqliteConnection {
    fn execute_statement<'a>(&'a self, sql: &'a str, params: &'a Parameters) -> AsyncResult<'a, u64> {
        Box::pin(async move {
            debug!(target: "creed::sqlite", "Executing statement: {}", sql);

            let connection = self.connection.lock().await;
            let mut statement = connection.prepare(sql)?;
            Self::bind(&mut statement, params)?;

            match statement.raw_execute() {
                Ok(affected) => Ok(affected as u64),
                Err(rusqlite::Error::ExecuteReturnedResults) => {
                    let mut rows = statement.raw_query();
                    while rows.next()?.is_some() {}
                    Ok(0)
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    fn fetch_all<'a>(&'a self, sql: &'a str, params: &'a Parameters) -> AsyncResult<'a, Vec<Row>> {
        Box::pin(async move {
            debug!(target: "creed::sqlite", "Executing query: {}", sql);

            let connection = self.connection.lock().await;
            let mut statement = connection.prepare(sql)?;
            Self::bind(&mut statement, params)?;

            let columns: Vec<String> = statement
                .column_names()
                .into_iter()
                .map(String::from)
                .collect();

            let mut rows = statement.raw_query();
            let mut result = Vec::new();
            while let Some(row) = rows.next()? {
                let mut values = Vec::with_capacity(columns.len());
                for i in 0..columns.len() {
                    values.push(match row.get_ref(i)? {
                        ValueRef::Null => Value::NULL,
                        ValueRef::Integer(v) => Value::Int(v),
                        ValueRef::Real(v) => Value::Float(v),
                        ValueRef::Text(v) => Value::String(String::from_utf8(v.to_vec())?),
                        ValueRef::Blob(v) => Value::Bytes(v.to_vec()),
                    });
                }

                result.push(Row::new(columns.clone(), values));
            }

            Ok(result)
        })
    }

    fn table_exists<'a>(&'a self, table_name: &'a str) -> AsyncResult<'a, bool> {
        Box::pin(async move {
            let connection = self.connection.lock().await;
            let mut statement =
                connection.prepare("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1")?;

            Ok(statement.exists([table_name])?)
        })
    }

    fn begin_transaction(&self) -> AsyncResult<'_, ()> {
        Box::pin(async move {
            self.connection.lock().await.execute_batch("BEGIN")?;
            Ok(())
        })
    }

    fn commit(&self) -> AsyncResult<'_, ()> {
        Box::pin(async move {
            self.connection.lock().await.execute_batch("COMMIT")?;
            Ok(())
        })
    }

    fn roll_back(&self) -> AsyncResult<'_, ()> {
        Box::pin(async move {
            self.connection.lock().await.execute_batch("ROLLBACK")?;
            Ok(())
        })
    }
}

impl ToSql for Parameter {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        self.value.to_sql()
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::NULL => ToSqlOutput::from(rusqlite::types::Null),
            Value::Int(value) => ToSqlOutput::from(*value),
            Value::UInt(value) => ToSqlOutput::from(i64::try_from(*value).map_err(|e| {
                rusqlite::Error::ToSqlConversionFailure(Box::new(e))
            })?),
            Value::String(value) => ToSqlOutput::from(value.as_str()),
            Value::Bytes(value) => ToSqlOutput::from(value.as_slice()),
            Value::Float(value) => ToSqlOutput::from(*value),
            Value::Boolean(value) => ToSqlOutput::from(*value),
            Value::DateTime(value) => ToSqlOutput::Owned(rusqlite::types::Value::Text(
                value.format("%Y-%m-%d %H:%M:%S").to_string(),
            )),
            Value::Json(value) => {
                ToSqlOutput::Owned(rusqlite::types::Value::Text(value.to_string()))
            }
            Value::Uuid(value) => {
                ToSqlOutput::Owned(rusqlite::types::Value::Text(value.to_string()))
            }
            Value::Array(_) => {
                return Err(rusqlite::Error::ToSqlConversionFailure(
                    "array values cannot be bound".into(),
                ))
            }
        })
    }
}
