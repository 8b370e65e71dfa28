use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// Identifier of a migration version.
///
/// Identifiers made only of digits sort before any other identifier and
/// are ordered numerically among themselves (so `"9"` sorts before `"10"`).
/// Every other identifier is ordered as a plain string.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct VersionId(String);

impl VersionId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    /// The sentinel placed before every migration.
    pub fn first() -> Self {
        Self("0".to_string())
    }

    pub fn is_first(&self) -> bool {
        self.0 == "0"
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn numeric_part(&self) -> Option<&str> {
        if !self.0.is_empty() && self.0.bytes().all(|b| b.is_ascii_digit()) {
            Some(self.0.trim_start_matches('0'))
        } else {
            None
        }
    }
}

impl Ord for VersionId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric_part(), other.numeric_part()) {
            (Some(a), Some(b)) => a
                .len()
                .cmp(&b.len())
                .then_with(|| a.cmp(b))
                .then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for VersionId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for VersionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VersionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for VersionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&String> for VersionId {
    fn from(value: &String) -> Self {
        Self(value.clone())
    }
}

impl From<i64> for VersionId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl PartialEq<str> for VersionId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for VersionId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl AsRef<str> for VersionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
