use crate::migrate::history::VersionHistory;
use crate::migrate::VersionId;

/// Maps symbolic version references to concrete identifiers.
///
/// Known aliases are `first`, `current`, `prev`, `next`, `latest` and
/// `current` followed by a signed offset (`current-2`, `current+1`).
/// A registered identifier, or the `"0"` sentinel placed before every
/// migration, always resolves to itself.
pub struct VersionAliasResolver<'a> {
    history: &'a VersionHistory,
}

impl<'a> VersionAliasResolver<'a> {
    pub fn new(history: &'a VersionHistory) -> Self {
        Self { history }
    }

    pub fn resolve(&self, alias: &str) -> Option<VersionId> {
        if self.history.has_version(alias) || alias == VersionId::first().as_str() {
            return Some(VersionId::from(alias));
        }

        match alias {
            "first" => Some(VersionId::first()),
            "current" => Some(self.history.current_version()),
            "prev" => self.history.prev_version(),
            "next" => self.history.next_version(),
            "latest" => Some(self.history.latest_version()),
            _ => alias
                .strip_prefix("current")
                .and_then(|delta| self.history.delta_version(delta)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::VersionAliasResolver;
    use crate::migrate::history::VersionHistory;
    use crate::migrate::VersionId;

    fn history(registered: &[&str], applied: &[&str]) -> VersionHistory {
        VersionHistory::new(
            registered.iter().map(|v| VersionId::from(*v)).collect(),
            applied.iter().map(|v| VersionId::from(*v)).collect(),
        )
    }

    #[test]
    fn symbolic_aliases_are_resolved() {
        let history = history(&["1", "2", "3", "4", "5"], &["1", "2", "3"]);
        let resolver = VersionAliasResolver::new(&history);

        assert_eq!(resolver.resolve("first"), Some("0".into()));
        assert_eq!(resolver.resolve("0"), resolver.resolve("first"));
        assert_eq!(resolver.resolve("current"), Some("3".into()));
        assert_eq!(resolver.resolve("prev"), Some("2".into()));
        assert_eq!(resolver.resolve("next"), Some("4".into()));
        assert_eq!(resolver.resolve("latest"), Some("5".into()));
        assert_eq!(resolver.resolve("current-2"), Some("1".into()));
        assert_eq!(resolver.resolve("current+1"), Some("4".into()));
        assert_eq!(resolver.resolve("current2"), Some("5".into()));
        assert_eq!(resolver.resolve("current+3"), None);
        assert_eq!(resolver.resolve("current-4"), None);
        assert_eq!(resolver.resolve("unknown"), None);
        assert_eq!(resolver.resolve("6"), None);
    }

    #[test]
    fn concrete_identifiers_pass_through() {
        let history = history(&["1", "2", "3"], &["1"]);
        let resolver = VersionAliasResolver::new(&history);

        for version in ["1", "2", "3"] {
            let resolved = resolver.resolve(version);
            assert_eq!(resolved, Some(version.into()));
            assert_eq!(resolver.resolve(resolved.unwrap().as_str()), Some(version.into()));
        }
    }

    #[test]
    fn identifiers_shadow_aliases() {
        let history = history(&["latest", "next"], &[]);
        let resolver = VersionAliasResolver::new(&history);

        assert_eq!(resolver.resolve("next"), Some("next".into()));
        assert_eq!(resolver.resolve("latest"), Some("latest".into()));
    }

    #[test]
    fn prev_and_next_surround_current() {
        let history = history(&["1", "2", "3"], &["1", "2"]);
        let resolver = VersionAliasResolver::new(&history);

        let current = resolver.resolve("current").unwrap();
        let prev = resolver.resolve("prev").unwrap();
        let next = resolver.resolve("next").unwrap();
        assert!(prev < current && current < next);

        let at_start = self::history(&["1", "2"], &[]);
        assert_eq!(VersionAliasResolver::new(&at_start).resolve("prev"), None);

        let at_end = self::history(&["1", "2"], &["1", "2"]);
        assert_eq!(VersionAliasResolver::new(&at_end).resolve("next"), None);
    }
}
