use crate::migrate::VersionId;

/// Read-only snapshot of the registered versions and the applied ones.
///
/// Relative lookups walk the ordered list of every registered version,
/// preceded by the `"0"` sentinel, whether or not the versions were run.
#[derive(Clone, Debug, Default)]
pub struct VersionHistory {
    versions: Vec<VersionId>,
    applied: Vec<VersionId>,
}

impl VersionHistory {
    pub fn new(mut registered: Vec<VersionId>, mut applied: Vec<VersionId>) -> Self {
        registered.sort();
        registered.dedup();
        applied.sort();
        applied.dedup();

        let mut versions = Vec::with_capacity(registered.len() + 1);
        versions.push(VersionId::first());
        versions.extend(registered.into_iter().filter(|v| !v.is_first()));

        Self { versions, applied }
    }

    /// Whether the identifier is a registered version.
    pub fn has_version(&self, version: &str) -> bool {
        self.versions[1..].iter().any(|v| v == version)
    }

    pub fn is_applied(&self, version: &VersionId) -> bool {
        self.applied.contains(version)
    }

    /// Registered versions in ascending order.
    pub fn registered_versions(&self) -> &[VersionId] {
        &self.versions[1..]
    }

    pub fn applied_versions(&self) -> &[VersionId] {
        &self.applied
    }

    /// Greatest registered version recorded as applied, or `"0"`.
    pub fn current_version(&self) -> VersionId {
        self.versions[1..]
            .iter()
            .rev()
            .find(|v| self.applied.contains(v))
            .cloned()
            .unwrap_or_else(VersionId::first)
    }

    pub fn prev_version(&self) -> Option<VersionId> {
        self.relative_version(&self.current_version(), -1)
    }

    pub fn next_version(&self) -> Option<VersionId> {
        self.relative_version(&self.current_version(), 1)
    }

    /// Greatest registered version, or `"0"` when none is registered.
    pub fn latest_version(&self) -> VersionId {
        self.versions
            .last()
            .cloned()
            .unwrap_or_else(VersionId::first)
    }

    /// Version at the given offset from the current one.
    ///
    /// The offset is a signed integer, the `+` sign is optional.
    pub fn delta_version(&self, delta: &str) -> Option<VersionId> {
        let delta = delta.trim();
        let offset: i64 = delta.strip_prefix('+').unwrap_or(delta).parse().ok()?;

        self.relative_version(&self.current_version(), offset)
    }

    fn relative_version(&self, version: &VersionId, delta: i64) -> Option<VersionId> {
        let offset = self.versions.iter().position(|v| v == version)?;
        let target = i64::try_from(offset).ok()?.checked_add(delta)?;

        usize::try_from(target)
            .ok()
            .and_then(|i| self.versions.get(i))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::VersionHistory;
    use crate::migrate::VersionId;

    fn ids(ids: &[&str]) -> Vec<VersionId> {
        ids.iter().map(|id| VersionId::from(*id)).collect()
    }

    #[test]
    fn current_is_the_greatest_applied_registered_version() {
        let history = VersionHistory::new(ids(&["3", "1", "2"]), ids(&["1", "2", "99"]));
        assert_eq!(history.current_version(), "2");
        assert_eq!(history.latest_version(), "3");
        assert_eq!(history.registered_versions(), ids(&["1", "2", "3"]).as_slice());
    }

    #[test]
    fn nothing_applied_means_first() {
        let history = VersionHistory::new(ids(&["1", "2"]), vec![]);
        assert_eq!(history.current_version(), "0");
        assert_eq!(history.prev_version(), None);
        assert_eq!(history.next_version(), Some("1".into()));
    }

    #[test]
    fn deltas_walk_every_registered_version() {
        let history = VersionHistory::new(ids(&["1", "2", "3", "4"]), ids(&["1", "3"]));
        assert_eq!(history.current_version(), "3");
        assert_eq!(history.delta_version("-1"), Some("2".into()));
        assert_eq!(history.delta_version("+1"), Some("4".into()));
        assert_eq!(history.delta_version("1"), Some("4".into()));
        assert_eq!(history.delta_version("-3"), Some("0".into()));
        assert_eq!(history.delta_version("-4"), None);
        assert_eq!(history.delta_version("+2"), None);
        assert_eq!(history.delta_version("0"), Some("3".into()));
        assert_eq!(history.delta_version("abc"), None);
        assert_eq!(history.delta_version(""), None);
    }

    #[test]
    fn empty_history_has_only_the_sentinel() {
        let history = VersionHistory::new(vec![], vec![]);
        assert_eq!(history.current_version(), "0");
        assert_eq!(history.latest_version(), "0");
        assert!(!history.has_version("0"));
        assert_eq!(history.next_version(), None);
    }
}
