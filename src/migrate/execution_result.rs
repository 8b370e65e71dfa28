use crate::migrate::{Direction, Query, State, VersionId};
use crate::schema::Schema;
use crate::{ParameterType, Parameters};
use chrono::{DateTime, Utc};
use std::time::Duration;

/// What happened during one run of a migration version.
///
/// Statements are listed in emission order. On failure the list holds
/// everything captured before the failure point.
#[derive(Clone, Debug)]
pub struct ExecutionResult {
    version: VersionId,
    direction: Direction,
    queries: Vec<Query>,
    time: Option<Duration>,
    memory: Option<u64>,
    skipped: bool,
    error: Option<String>,
    state: State,
    executed_at: DateTime<Utc>,
    to_schema: Option<Schema>,
}

impl ExecutionResult {
    pub fn new(version: VersionId, direction: Direction) -> Self {
        Self {
            version,
            direction,
            queries: vec![],
            time: None,
            memory: None,
            skipped: false,
            error: None,
            state: State::None,
            executed_at: Utc::now(),
            to_schema: None,
        }
    }

    pub fn version(&self) -> &VersionId {
        &self.version
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn queries(&self) -> &[Query] {
        &self.queries
    }

    pub fn sql(&self) -> Vec<&str> {
        self.queries.iter().map(Query::sql).collect()
    }

    /// Parameter sets of the statements that bound any.
    pub fn params(&self) -> Vec<&Parameters> {
        self.queries
            .iter()
            .filter(|q| q.has_parameters())
            .map(Query::parameters)
            .collect()
    }

    /// Declared types, aligned with [`ExecutionResult::params`].
    pub fn types(&self) -> Vec<Vec<ParameterType>> {
        self.params().into_iter().map(Parameters::types).collect()
    }

    pub fn has_params(&self) -> bool {
        self.queries.iter().any(Query::has_parameters)
    }

    pub fn time(&self) -> Option<Duration> {
        self.time
    }

    /// Resident memory of the process when the run ended, in bytes.
    pub fn memory(&self) -> Option<u64> {
        self.memory
    }

    pub fn is_skipped(&self) -> bool {
        self.skipped
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Stage reached when the run ended; `None` after a successful run.
    pub fn state(&self) -> State {
        self.state
    }

    pub fn executed_at(&self) -> DateTime<Utc> {
        self.executed_at
    }

    pub fn to_schema(&self) -> Option<&Schema> {
        self.to_schema.as_ref()
    }

    pub(crate) fn add_queries(&mut self, queries: impl IntoIterator<Item = Query>) {
        self.queries.extend(queries);
    }

    pub(crate) fn set_time(&mut self, time: Duration) {
        self.time = Some(time);
    }

    pub(crate) fn set_memory(&mut self, memory: Option<u64>) {
        self.memory = memory;
    }

    pub(crate) fn set_skipped(&mut self, skipped: bool) {
        self.skipped = skipped;
    }

    pub(crate) fn set_error(&mut self, message: String) {
        self.error = Some(message);
    }

    pub(crate) fn set_state(&mut self, state: State) {
        self.state = state;
    }

    pub(crate) fn set_to_schema(&mut self, schema: Schema) {
        self.to_schema = Some(schema);
    }
}
