use crate::configuration::Configuration;
use crate::migrate::history::VersionHistory;
use crate::migrate::metadata::ExecutedMigrationList;
use crate::migrate::{Migration, MigrationDefinition, Version, VersionExecutor, VersionId};
use crate::{Error, Result};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Registered migrations, ordered by version.
pub struct MigrationRepository {
    configuration: Configuration,
    executor: Arc<VersionExecutor>,
    migrations: BTreeMap<VersionId, Arc<dyn Migration>>,
}

impl MigrationRepository {
    pub fn new(configuration: Configuration) -> Self {
        Self {
            executor: Arc::new(VersionExecutor::new(configuration.clone())),
            configuration,
            migrations: BTreeMap::new(),
        }
    }

    pub fn with_executor(mut self, executor: VersionExecutor) -> Self {
        self.executor = Arc::new(executor);
        self
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn register<V: Into<VersionId>>(&mut self, version: V, migration: Arc<dyn Migration>) -> Result<()> {
        let version = version.into();
        if version.is_first() || self.migrations.contains_key(&version) {
            return Err(Error::duplicate_version(version));
        }

        self.migrations.insert(version, migration);
        Ok(())
    }

    pub fn register_definitions(&mut self, definitions: &[MigrationDefinition]) -> Result<()> {
        for definition in definitions {
            self.register(definition.version, Arc::new(definition.migration))?;
        }

        Ok(())
    }

    pub fn has_version(&self, version: &VersionId) -> bool {
        self.migrations.contains_key(version)
    }

    /// Registered versions in ascending order.
    pub fn versions(&self) -> Vec<VersionId> {
        self.migrations.keys().cloned().collect()
    }

    pub fn version(&self, version: &VersionId) -> Result<Version> {
        let migration = self
            .migrations
            .get(version)
            .ok_or_else(|| Error::unknown_version(version))?;

        Ok(Version::new(
            self.configuration.clone(),
            version.clone(),
            migration.clone(),
            self.executor.clone(),
        ))
    }

    pub async fn executed_migrations(&self) -> Result<ExecutedMigrationList> {
        self.configuration
            .metadata_storage()
            .get_executed_migrations()
            .await
    }

    pub async fn history(&self) -> Result<VersionHistory> {
        let executed = self.executed_migrations().await?;
        Ok(VersionHistory::new(self.versions(), executed.versions()))
    }
}
