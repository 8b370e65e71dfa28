mod alias;
mod execution_result;
mod executor;
mod history;
pub mod metadata;
pub mod query_writer;
mod repository;
mod sql_buffer;
mod state;
mod version;
mod version_id;

pub use alias::VersionAliasResolver;
pub use execution_result::ExecutionResult;
pub use executor::VersionExecutor;
pub use history::VersionHistory;
pub use repository::MigrationRepository;
pub use sql_buffer::{Query, SqlBuffer};
pub use state::State;
pub use version::Version;
pub use version_id::VersionId;

use crate::configuration::{Configuration, MigratorConfig};
use crate::schema::Schema;
use crate::{Error, Result};
use log::info;
use std::fmt::{Display, Formatter};
use std::path::Path;

#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum Direction {
    Up,
    Down,
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Up => "up",
                Self::Down => "down",
            }
        )
    }
}

/// A reversible schema change.
///
/// Hooks register SQL on the given buffer; nothing reaches the database
/// until the executor drains it. Every hook but `up` has a default
/// implementation: `down` reports the migration as irreversible, the
/// others do nothing.
pub trait Migration: Send + Sync {
    fn description(&self) -> &str {
        ""
    }

    /// Whether the migration runs inside a transaction.
    fn is_transactional(&self) -> bool {
        true
    }

    fn pre_up(&self, _sql: &mut SqlBuffer, _schema: &Schema) -> Result<()> {
        Ok(())
    }

    fn up(&self, sql: &mut SqlBuffer, schema: &mut Schema) -> Result<()>;

    fn post_up(&self, _sql: &mut SqlBuffer, _schema: &Schema) -> Result<()> {
        Ok(())
    }

    fn pre_down(&self, _sql: &mut SqlBuffer, _schema: &Schema) -> Result<()> {
        Ok(())
    }

    fn down(&self, _sql: &mut SqlBuffer, _schema: &mut Schema) -> Result<()> {
        Err(Error::irreversible_migration())
    }

    fn post_down(&self, _sql: &mut SqlBuffer, _schema: &Schema) -> Result<()> {
        Ok(())
    }
}

impl<M: Migration + ?Sized> Migration for &M {
    fn description(&self) -> &str {
        (**self).description()
    }

    fn is_transactional(&self) -> bool {
        (**self).is_transactional()
    }

    fn pre_up(&self, sql: &mut SqlBuffer, schema: &Schema) -> Result<()> {
        (**self).pre_up(sql, schema)
    }

    fn up(&self, sql: &mut SqlBuffer, schema: &mut Schema) -> Result<()> {
        (**self).up(sql, schema)
    }

    fn post_up(&self, sql: &mut SqlBuffer, schema: &Schema) -> Result<()> {
        (**self).post_up(sql, schema)
    }

    fn pre_down(&self, sql: &mut SqlBuffer, schema: &Schema) -> Result<()> {
        (**self).pre_down(sql, schema)
    }

    fn down(&self, sql: &mut SqlBuffer, schema: &mut Schema) -> Result<()> {
        (**self).down(sql, schema)
    }

    fn post_down(&self, sql: &mut SqlBuffer, schema: &Schema) -> Result<()> {
        (**self).post_down(sql, schema)
    }
}

/// A migration compiled into the binary, as generated by `migrations!`.
#[derive(Clone, Copy)]
pub struct MigrationDefinition {
    pub version: &'static str,
    pub migration: &'static dyn Migration,
}

/// Runs batches of migrations.
pub struct Migrator {
    repository: MigrationRepository,
}

impl Migrator {
    pub fn new(configuration: Configuration, migrations: &[MigrationDefinition]) -> Result<Self> {
        let mut repository = MigrationRepository::new(configuration);
        repository.register_definitions(migrations)?;

        Ok(Self { repository })
    }

    pub fn from_repository(repository: MigrationRepository) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &MigrationRepository {
        &self.repository
    }

    pub fn repository_mut(&mut self) -> &mut MigrationRepository {
        &mut self.repository
    }

    /// Resolves a version alias against the current history.
    pub async fn resolve(&self, alias: &str) -> Result<VersionId> {
        let history = self.repository.history().await?;
        VersionAliasResolver::new(&history)
            .resolve(alias)
            .ok_or_else(|| Error::unknown_version(alias))
    }

    /// Migrates the database to the version the alias resolves to.
    ///
    /// Pending versions up to the target are applied in ascending order;
    /// when the target precedes the current version, applied versions
    /// above it are reverted in descending order. The batch stops at the
    /// first failure.
    pub async fn migrate(&self, target_alias: &str, config: MigratorConfig) -> Result<Vec<ExecutionResult>> {
        let history = self.repository.history().await?;
        let target = VersionAliasResolver::new(&history)
            .resolve(target_alias)
            .ok_or_else(|| Error::unknown_version(target_alias))?;

        let (plan, direction) = Self::plan(&history, &target);
        info!(target: "creed::migrations", "Migrating {} to {}", direction, target);

        if plan.is_empty() {
            info!(target: "creed::migrations", "No migration to execute.");
            return Ok(vec![]);
        }

        let global_start = chrono::Utc::now();
        let mut results = Vec::with_capacity(plan.len());
        for version in plan {
            let mut version = self.repository.version(&version)?;
            results.push(version.execute(direction, Some(config)).await?);
        }

        let total_time = chrono::Utc::now() - global_start;
        let sql_count: usize = results.iter().map(|r| r.queries().len()).sum();
        info!(
            target: "creed::migrations",
            "Migrated database in {}ms, {} migrations executed, {} sql queries",
            total_time.num_milliseconds(),
            results.len(),
            sql_count
        );

        Ok(results)
    }

    /// Runs a single version in the given direction.
    pub async fn execute(&self, alias: &str, direction: Direction, config: MigratorConfig) -> Result<ExecutionResult> {
        let version = self.resolve(alias).await?;
        self.repository.version(&version)?.execute(direction, Some(config)).await
    }

    /// Writes the statements migrating to the target version to a SQL file.
    ///
    /// Every planned version is run dry. Fails without writing anything when
    /// a statement has bound parameters.
    pub async fn write_sql_file<P: AsRef<Path>>(&self, target_alias: &str, path: P) -> Result<bool> {
        let history = self.repository.history().await?;
        let target = VersionAliasResolver::new(&history)
            .resolve(target_alias)
            .ok_or_else(|| Error::unknown_version(target_alias))?;

        let (plan, direction) = Self::plan(&history, &target);
        let config = MigratorConfig::new().set_dry_run(true);

        let mut queries_by_version = Vec::with_capacity(plan.len());
        for version in plan {
            let result = self
                .repository
                .version(&version)?
                .execute(direction, Some(config))
                .await?;

            if result.has_params() {
                return Err(Error::prepared_statement_dump(&version));
            }

            queries_by_version.push((
                version,
                result.sql().into_iter().map(String::from).collect::<Vec<_>>(),
            ));
        }

        self.repository
            .configuration()
            .query_writer()
            .write(path.as_ref(), direction, &queries_by_version)
            .await
    }

    fn plan(history: &VersionHistory, target: &VersionId) -> (Vec<VersionId>, Direction) {
        let direction = if *target >= history.current_version() {
            Direction::Up
        } else {
            Direction::Down
        };

        let registered = history.registered_versions().iter();
        let plan = match direction {
            Direction::Up => registered
                .filter(|v| *v <= target && !history.is_applied(v))
                .cloned()
                .collect(),
            Direction::Down => registered
                .rev()
                .filter(|v| *v > target && history.is_applied(v))
                .cloned()
                .collect(),
        };

        (plan, direction)
    }
}
