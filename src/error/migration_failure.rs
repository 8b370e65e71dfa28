use crate::error::StdError;
use crate::migrate::{Direction, ExecutionResult, State, VersionId};
use std::fmt::{Debug, Display, Formatter};

/// A migration run that failed.
///
/// Carries the stage reached when the failure happened and the
/// execution result with every statement captured up to that point.
pub struct MigrationFailure {
    version: VersionId,
    direction: Direction,
    state: State,
    result: ExecutionResult,
    source: StdError,
}

impl MigrationFailure {
    pub(crate) fn new(
        version: VersionId,
        direction: Direction,
        state: State,
        result: ExecutionResult,
        source: crate::Error,
    ) -> Self {
        Self {
            version,
            direction,
            state,
            result,
            source: source.into(),
        }
    }

    pub fn version(&self) -> &VersionId {
        &self.version
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The lifecycle stage the run was in when it failed.
    pub fn state(&self) -> State {
        self.state
    }

    pub fn result(&self) -> &ExecutionResult {
        &self.result
    }

    pub fn into_result(self) -> ExecutionResult {
        self.result
    }

    pub fn message(&self) -> String {
        self.source.to_string()
    }
}

impl Display for MigrationFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Migration {} failed during {} ({}): {}",
            self.version, self.state, self.direction, self.source
        )
    }
}

impl Debug for MigrationFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MigrationFailure")
            .field("version", &self.version)
            .field("direction", &self.direction)
            .field("state", &self.state)
            .field("source", &self.source)
            .finish()
    }
}

impl std::error::Error for MigrationFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}
