use crate::configuration::{Configuration, MigratorConfig};
use crate::migrate::metadata::ExecutedMigration;
use crate::migrate::{Direction, ExecutionResult, Migration, State, VersionExecutor, VersionId};
use crate::{Error, Result};
use chrono::{DateTime, TimeZone, Utc};
use std::path::Path;
use std::sync::Arc;

/// A migration bound to its version identifier.
pub struct Version {
    configuration: Configuration,
    version: VersionId,
    migration: Arc<dyn Migration>,
    executor: Arc<VersionExecutor>,
    state: State,
    execution_result: Option<ExecutionResult>,
    executed_at: Option<DateTime<Utc>>,
}

impl Version {
    pub fn new(
        configuration: Configuration,
        version: VersionId,
        migration: Arc<dyn Migration>,
        executor: Arc<VersionExecutor>,
    ) -> Self {
        Self {
            configuration,
            version,
            migration,
            executor,
            state: State::None,
            execution_result: None,
            executed_at: None,
        }
    }

    pub fn version(&self) -> &VersionId {
        &self.version
    }

    pub fn migration(&self) -> &dyn Migration {
        self.migration.as_ref()
    }

    pub fn description(&self) -> &str {
        self.migration.description()
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Result of the last execution, successful or not.
    pub fn execution_result(&self) -> Option<&ExecutionResult> {
        self.execution_result.as_ref()
    }

    /// Runs the migration in the given direction.
    ///
    /// On success the tracking store is updated (a row is inserted going up,
    /// removed going down) unless running dry. Nothing is persisted on
    /// failure.
    pub async fn execute(&mut self, direction: Direction, config: Option<MigratorConfig>) -> Result<ExecutionResult> {
        let config = config.unwrap_or_default();
        let outcome = self
            .executor
            .execute(&self.version, self.migration.as_ref(), direction, config)
            .await;

        match outcome {
            Ok(result) => {
                self.state = result.state();
                if !config.is_dry_run() {
                    let execution_time = result
                        .time()
                        .and_then(|t| u64::try_from(t.as_millis()).ok());
                    self.persist(direction, execution_time).await?;
                }

                self.execution_result = Some(result.clone());
                Ok(result)
            }
            Err(e) => {
                if let Some(failure) = e.migration_failure() {
                    self.state = failure.state();
                    self.execution_result = Some(failure.result().clone());
                }

                Err(e)
            }
        }
    }

    /// Dumps the statements of the migration to a SQL file.
    ///
    /// The migration is run dry first. Statements with bound parameters
    /// cannot be written verbatim: in that case an error is returned and
    /// no file is written.
    pub async fn write_sql_file<P: AsRef<Path>>(&mut self, path: P, direction: Direction) -> Result<bool> {
        let result = self
            .execute(direction, Some(MigratorConfig::new().set_dry_run(true)))
            .await?;

        if result.has_params() {
            return Err(Error::prepared_statement_dump(&self.version));
        }

        self.configuration
            .output_writer()
            .write(format!("\n-- Version {}\n", self.version));

        let queries = vec![(
            self.version.clone(),
            result.sql().into_iter().map(String::from).collect(),
        )];

        self.configuration
            .query_writer()
            .write(path.as_ref(), direction, &queries)
            .await
    }

    /// Records the version as applied (up) or not applied (down) without
    /// running it.
    pub async fn mark_version(&mut self, direction: Direction) -> Result<()> {
        self.persist(direction, None).await
    }

    /// Human readable description of the current state.
    pub fn execution_state(&self) -> &'static str {
        self.state.description()
    }

    pub fn executed_at(&self) -> Option<DateTime<Utc>> {
        self.executed_at
    }

    pub fn executed_at_in<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        self.executed_at.map(|dt| dt.with_timezone(tz))
    }

    /// Whether the tracking store records this version as applied.
    pub async fn is_migrated(&self) -> Result<bool> {
        let executed = self
            .configuration
            .metadata_storage()
            .get_executed_migrations()
            .await?;

        Ok(executed.has_migration(&self.version))
    }

    async fn persist(&mut self, direction: Direction, execution_time: Option<u64>) -> Result<()> {
        let storage = self.configuration.metadata_storage();
        match direction {
            Direction::Up => {
                let executed_at = Utc::now();
                storage
                    .insert_version(
                        ExecutedMigration::new(self.version.clone())
                            .with_executed_at(executed_at)
                            .with_execution_time(execution_time),
                    )
                    .await?;
                self.executed_at = Some(executed_at);
            }
            Direction::Down => {
                storage.delete_version(&self.version).await?;
                self.executed_at = None;
            }
        }

        Ok(())
    }
}
