mod executed_migration;

use crate::migrate::VersionId;
use crate::schema::{Column, ColumnType, Table};
use crate::sync::Mutex;
use crate::{params, AsyncResult, Connection, Result, Value};
use chrono::{DateTime, Utc};
pub use executed_migration::{ExecutedMigration, ExecutedMigrationList};
use log::debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Tracking store: which versions have been applied and when.
pub trait MetadataStorage: Send + Sync {
    fn get_executed_migrations(&self) -> AsyncResult<'_, ExecutedMigrationList>;
    fn insert_version(&self, migration: ExecutedMigration) -> AsyncResult<'_, ()>;
    fn delete_version<'a>(&'a self, version: &'a VersionId) -> AsyncResult<'a, ()>;
}

/// Names of the tracking table and its columns.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TableStorageConfiguration {
    table_name: String,
    version_column_name: String,
    version_column_length: usize,
    executed_at_column_name: String,
    execution_time_column_name: String,
}

impl Default for TableStorageConfiguration {
    fn default() -> Self {
        Self {
            table_name: "migration_versions".to_string(),
            version_column_name: "version".to_string(),
            version_column_length: 191,
            executed_at_column_name: "executed_at".to_string(),
            execution_time_column_name: "execution_time".to_string(),
        }
    }
}

impl TableStorageConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table_name(mut self, table_name: &str) -> Self {
        self.table_name = table_name.to_string();
        self
    }

    pub fn with_version_column_name(mut self, version_column_name: &str) -> Self {
        self.version_column_name = version_column_name.to_string();
        self
    }

    pub fn with_version_column_length(mut self, version_column_length: usize) -> Self {
        self.version_column_length = version_column_length;
        self
    }

    pub fn with_executed_at_column_name(mut self, executed_at_column_name: &str) -> Self {
        self.executed_at_column_name = executed_at_column_name.to_string();
        self
    }

    pub fn with_execution_time_column_name(mut self, execution_time_column_name: &str) -> Self {
        self.execution_time_column_name = execution_time_column_name.to_string();
        self
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn version_column_name(&self) -> &str {
        &self.version_column_name
    }

    pub fn version_column_length(&self) -> usize {
        self.version_column_length
    }

    pub fn executed_at_column_name(&self) -> &str {
        &self.executed_at_column_name
    }

    pub fn execution_time_column_name(&self) -> &str {
        &self.execution_time_column_name
    }
}

/// Tracking store persisted in a database table.
///
/// The table is created by the first write. Reads never create it: a
/// missing table is an empty history, so dry runs leave the database
/// untouched. Execution timestamps are stored as UTC text.
pub struct TableMetadataStorage {
    connection: Arc<dyn Connection>,
    configuration: TableStorageConfiguration,
    is_initialized: AtomicBool,
}

impl TableMetadataStorage {
    pub fn new(connection: Arc<dyn Connection>, configuration: TableStorageConfiguration) -> Self {
        Self {
            connection,
            configuration,
            is_initialized: AtomicBool::new(false),
        }
    }

    pub fn configuration(&self) -> &TableStorageConfiguration {
        &self.configuration
    }

    async fn ensure_initialized(&self) -> Result<()> {
        if self.is_initialized.load(Ordering::SeqCst) {
            return Ok(());
        }

        debug!(target: "creed::migrations", "Creating tracking table {}", self.configuration.table_name);
        let table = self.get_expected_table();
        self.connection
            .execute_statement(&table.get_create_sql(true), &params![])
            .await?;
        self.is_initialized.store(true, Ordering::SeqCst);

        Ok(())
    }

    fn get_expected_table(&self) -> Table {
        let configuration = &self.configuration;
        let mut table = Table::new(&configuration.table_name);
        table
            .add_column(
                Column::builder(&configuration.version_column_name, ColumnType::String)
                    .set_length(Some(configuration.version_column_length))
                    .set_notnull(true),
            )
            .add_column(
                Column::builder(&configuration.executed_at_column_name, ColumnType::DateTime)
                    .set_notnull(false),
            )
            .add_column(
                Column::builder(&configuration.execution_time_column_name, ColumnType::Integer)
                    .set_notnull(false),
            )
            .set_primary_key(&[&configuration.version_column_name]);

        table
    }
}

impl MetadataStorage for TableMetadataStorage {
    fn get_executed_migrations(&self) -> AsyncResult<'_, ExecutedMigrationList> {
        Box::pin(async move {
            let configuration = &self.configuration;
            if !self.is_initialized.load(Ordering::SeqCst) {
                if !self.connection.table_exists(&configuration.table_name).await? {
                    debug!(target: "creed::migrations", "Tracking table {} does not exist yet", configuration.table_name);
                    return Ok(ExecutedMigrationList::new(vec![]));
                }

                self.is_initialized.store(true, Ordering::SeqCst);
            }

            let sql = format!(
                "SELECT {}, {}, {} FROM {}",
                configuration.version_column_name,
                configuration.executed_at_column_name,
                configuration.execution_time_column_name,
                configuration.table_name
            );

            let rows = self.connection.fetch_all(&sql, &params![]).await?;
            let mut migrations = vec![];
            for row in rows {
                let version = match row.get(configuration.version_column_name.as_str())? {
                    Value::String(version) => VersionId::from(version),
                    value => VersionId::new(value.to_string()),
                };

                let executed_at = match row.get(configuration.executed_at_column_name.as_str())? {
                    Value::NULL => None,
                    value => Some(DateTime::<Utc>::try_from(value.clone())?),
                };

                let execution_time = match row.get(configuration.execution_time_column_name.as_str())? {
                    Value::Int(time) => Some(u64::try_from(*time)?),
                    Value::UInt(time) => Some(*time),
                    _ => None,
                };

                migrations.push(ExecutedMigration {
                    version,
                    executed_at,
                    execution_time,
                });
            }

            Ok(ExecutedMigrationList::new(migrations))
        })
    }

    fn insert_version(&self, migration: ExecutedMigration) -> AsyncResult<'_, ()> {
        Box::pin(async move {
            self.ensure_initialized().await?;

            let configuration = &self.configuration;
            let sql = format!(
                "INSERT INTO {} ({}, {}, {}) VALUES (?, ?, ?)",
                configuration.table_name,
                configuration.version_column_name,
                configuration.executed_at_column_name,
                configuration.execution_time_column_name
            );

            let executed_at = match migration.executed_at {
                Some(dt) => Value::String(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
                None => Value::NULL,
            };
            let execution_time = match migration.execution_time {
                Some(time) => Value::UInt(time),
                None => Value::NULL,
            };

            debug!(target: "creed::migrations", "Recording version {}", migration.version);
            self.connection
                .execute_statement(
                    &sql,
                    &params![migration.version.to_string(), executed_at, execution_time],
                )
                .await?;

            Ok(())
        })
    }

    fn delete_version<'a>(&'a self, version: &'a VersionId) -> AsyncResult<'a, ()> {
        Box::pin(async move {
            self.ensure_initialized().await?;

            let sql = format!(
                "DELETE FROM {} WHERE {} = ?",
                self.configuration.table_name, self.configuration.version_column_name
            );

            debug!(target: "creed::migrations", "Removing version {}", version);
            self.connection
                .execute_statement(&sql, &params![version.to_string()])
                .await?;

            Ok(())
        })
    }
}

/// Tracking store kept in memory.
#[derive(Default)]
pub struct InMemoryMetadataStorage {
    items: Mutex<Vec<ExecutedMigration>>,
}

impl InMemoryMetadataStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MetadataStorage for InMemoryMetadataStorage {
    fn get_executed_migrations(&self) -> AsyncResult<'_, ExecutedMigrationList> {
        Box::pin(async move {
            let items = self.items.lock().await;
            Ok(ExecutedMigrationList::new(items.clone()))
        })
    }

    fn insert_version(&self, migration: ExecutedMigration) -> AsyncResult<'_, ()> {
        Box::pin(async move {
            let mut items = self.items.lock().await;
            items.retain(|m| m.version != migration.version);
            items.push(migration);

            Ok(())
        })
    }

    fn delete_version<'a>(&'a self, version: &'a VersionId) -> AsyncResult<'a, ()> {
        Box::pin(async move {
            self.items.lock().await.retain(|m| &m.version != version);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ExecutedMigration, InMemoryMetadataStorage, MetadataStorage, TableMetadataStorage,
        TableStorageConfiguration,
    };
    use crate::migrate::VersionId;
    use crate::tests::{ConnectionEvent, MockConnection};
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    #[tokio::test]
    async fn in_memory_storage_records_versions() {
        let storage = InMemoryMetadataStorage::new();
        storage
            .insert_version(ExecutedMigration::new("2".into()))
            .await
            .unwrap();
        storage
            .insert_version(ExecutedMigration::new("10".into()))
            .await
            .unwrap();
        storage
            .insert_version(ExecutedMigration::new("2".into()))
            .await
            .unwrap();

        let executed = storage.get_executed_migrations().await.unwrap();
        assert_eq!(executed.versions(), vec!["2", "10"]);

        storage.delete_version(&VersionId::from("2")).await.unwrap();
        let executed = storage.get_executed_migrations().await.unwrap();
        assert!(!executed.has_migration(&"2".into()));
        assert_eq!(executed.len(), 1);
    }

    #[tokio::test]
    async fn table_storage_creates_its_table_once() {
        let connection = Arc::new(MockConnection::new());
        let storage = TableMetadataStorage::new(
            connection.clone(),
            TableStorageConfiguration::new().with_table_name("doctrine_versions"),
        );

        storage
            .insert_version(
                ExecutedMigration::new("003".into())
                    .with_executed_at(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap())
                    .with_execution_time(Some(12)),
            )
            .await
            .unwrap();
        storage.delete_version(&"003".into()).await.unwrap();

        let statements = connection.executed_sql();
        assert_eq!(statements.len(), 3);
        assert!(statements[0].starts_with("CREATE TABLE IF NOT EXISTS doctrine_versions"));
        assert_eq!(
            statements[1],
            "INSERT INTO doctrine_versions (version, executed_at, execution_time) VALUES (?, ?, ?)"
        );
        assert_eq!(statements[2], "DELETE FROM doctrine_versions WHERE version = ?");
    }

    #[tokio::test]
    async fn reading_a_missing_table_does_not_create_it() {
        let connection = Arc::new(MockConnection::new());
        let storage = TableMetadataStorage::new(connection.clone(), TableStorageConfiguration::new());

        let executed = storage.get_executed_migrations().await.unwrap();
        assert!(executed.is_empty());
        assert!(connection.executed_sql().is_empty());
        assert!(connection.tables().is_empty());

        storage
            .insert_version(ExecutedMigration::new("1".into()))
            .await
            .unwrap();
        assert_eq!(connection.tables(), vec!["migration_versions"]);

        storage.get_executed_migrations().await.unwrap();
        assert!(connection.events().contains(&ConnectionEvent::Query(
            "SELECT version, executed_at, execution_time FROM migration_versions".to_string()
        )));
    }
}
