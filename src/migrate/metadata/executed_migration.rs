use crate::migrate::VersionId;
use chrono::{DateTime, TimeZone, Utc};

#[derive(Clone, Debug, PartialEq)]
pub struct ExecutedMigration {
    pub version: VersionId,
    pub executed_at: Option<DateTime<Utc>>,
    pub execution_time: Option<u64>,
}

impl ExecutedMigration {
    pub fn new(version: VersionId) -> Self {
        Self {
            version,
            executed_at: None,
            execution_time: None,
        }
    }

    pub fn with_executed_at(mut self, executed_at: DateTime<Utc>) -> Self {
        self.executed_at = Some(executed_at);
        self
    }

    /// Execution time in milliseconds.
    pub fn with_execution_time(mut self, execution_time: Option<u64>) -> Self {
        self.execution_time = execution_time;
        self
    }

    /// Execution timestamp converted to the given time zone.
    pub fn executed_at_in<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        self.executed_at.map(|dt| dt.with_timezone(tz))
    }
}

/// Migrations recorded in the tracking store, sorted by version.
#[derive(Clone, Debug, Default)]
pub struct ExecutedMigrationList {
    items: Vec<ExecutedMigration>,
}

impl ExecutedMigrationList {
    pub fn new(mut items: Vec<ExecutedMigration>) -> Self {
        items.sort_by(|a, b| a.version.cmp(&b.version));
        Self { items }
    }

    pub fn first(&self) -> Option<&ExecutedMigration> {
        self.items.first()
    }

    pub fn last(&self) -> Option<&ExecutedMigration> {
        self.items.last()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ExecutedMigration> {
        self.items.iter()
    }

    pub fn has_migration(&self, version: &VersionId) -> bool {
        self.items.iter().any(|v| &v.version == version)
    }

    pub fn get_migration(&self, version: &VersionId) -> Option<&ExecutedMigration> {
        self.items.iter().find(|v| &v.version == version)
    }

    pub fn versions(&self) -> Vec<VersionId> {
        self.items.iter().map(|m| m.version.clone()).collect()
    }
}

impl<'a> IntoIterator for &'a ExecutedMigrationList {
    type Item = &'a ExecutedMigration;
    type IntoIter = std::slice::Iter<'a, ExecutedMigration>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
