mod migration_failure;

pub use migration_failure::MigrationFailure;
use std::backtrace::Backtrace;
use std::fmt::{Debug, Display, Formatter};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    MigrationFailed = 1,
    SkipMigration = 2,
    UnknownVersion = 3,
    PreparedStatementDump = 4,
    DuplicateVersion = 5,
    IrreversibleMigration = 6,

    MixedParametersTypes = 10,
    UnsupportedParameterType = 11,
    OutOfBoundsError = 12,
    TypeMismatch = 13,

    UnknownError = -1,
}

pub struct Error {
    kind: ErrorKind,
    inner: Box<dyn std::error::Error + Send + Sync>,
    backtrace: Backtrace,
}

pub struct StdError(Error);

impl Display for StdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Debug for StdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for StdError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.0.inner.as_ref())
    }
}

impl From<Error> for StdError {
    fn from(e: Error) -> Self {
        StdError(e)
    }
}

impl Error {
    pub fn new<E>(kind: ErrorKind, error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error {
            kind,
            inner: error.into(),
            backtrace: Backtrace::capture(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }

    /// Returns the structured failure when this error was raised
    /// by a migration run.
    pub fn migration_failure(&self) -> Option<&MigrationFailure> {
        self.inner.downcast_ref::<MigrationFailure>()
    }

    /// Consumes the error returning the structured migration failure, if any.
    pub fn into_migration_failure(self) -> Option<MigrationFailure> {
        if self.kind != ErrorKind::MigrationFailed {
            return None;
        }

        self.inner.downcast::<MigrationFailure>().ok().map(|f| *f)
    }

    pub fn migration_failed(failure: MigrationFailure) -> Self {
        Self::new(ErrorKind::MigrationFailed, failure)
    }

    /// Builds the error a migration hook returns to skip the current version.
    pub fn skip_migration<T: ToString>(reason: T) -> Self {
        Self::new(ErrorKind::SkipMigration, reason.to_string())
    }

    pub fn unknown_version<T: Display>(alias: T) -> Self {
        Self::new(
            ErrorKind::UnknownVersion,
            format!("Could not find any migrations to execute for \"{}\"", alias),
        )
    }

    pub fn prepared_statement_dump<T: Display>(version: T) -> Self {
        Self::new(
            ErrorKind::PreparedStatementDump,
            format!(
                "Migration {} contains a prepared statement.\nPrepared statements cannot be dumped verbatim to a SQL file: their parameters are bound by the driver and have no portable literal form.",
                version
            ),
        )
    }

    pub fn duplicate_version<T: Display>(version: T) -> Self {
        Self::new(
            ErrorKind::DuplicateVersion,
            format!("Migration version {} is already registered", version),
        )
    }

    pub fn irreversible_migration() -> Self {
        Self::new(
            ErrorKind::IrreversibleMigration,
            "No down migration is implemented, this migration cannot be reverted",
        )
    }

    pub fn mixed_parameters_types() -> Self {
        Self::new(
            ErrorKind::MixedParametersTypes,
            "Cannot mix named and positional parameters",
        )
    }

    pub fn unsupported_parameter_type<T: Display>(description: T) -> Self {
        Self::new(
            ErrorKind::UnsupportedParameterType,
            format!("Unsupported parameter type: {}", description),
        )
    }

    pub fn out_of_bounds<T>(index: T) -> Self
    where
        T: ToString,
    {
        Self::new(
            ErrorKind::OutOfBoundsError,
            format!("Unable to read {} index", index.to_string()),
        )
    }

    pub fn type_mismatch() -> Self {
        Self::new(ErrorKind::TypeMismatch, "Type mismatch")
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\nBacktrace:\n{}", self.inner, self.backtrace)
    }
}

impl<T> From<T> for Error
where
    T: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    fn from(err: T) -> Self {
        Error::new(ErrorKind::UnknownError, err)
    }
}
