use crate::graph_resolution::domain::{PackageIdentity, Version};
use crate::shared::error::DepGraphError;
use crate::shared::Result;
use std::collections::{BTreeMap, HashMap};

/// Forced versions keyed by package name
///
/// An override replaces whatever version was declared or discovered for a
/// package of that name, in every ecosystem. Applied before any node is
/// created, so exactly one node per overridden name can exist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionOverrides {
    forced: HashMap<String, Version>,
}

impl VersionOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `name=version` directives; later directives for a name win
    pub fn parse_directives<I, S>(directives: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut overrides = Self::new();
        for directive in directives {
            let (name, version) = Self::parse_directive(directive.as_ref())?;
            overrides.insert(name, version)?;
        }
        Ok(overrides)
    }

    /// Splits one `name=version` directive
    pub fn parse_directive(directive: &str) -> Result<(String, String)> {
        let invalid = |reason: &str| -> anyhow::Error {
            DepGraphError::InvalidOverride {
                input: directive.to_string(),
                reason: reason.to_string(),
            }
            .into()
        };

        let (name, version) = directive
            .trim()
            .rsplit_once('=')
            .ok_or_else(|| invalid("Missing '=' between name and version"))?;
        let (name, version) = (name.trim(), version.trim());

        if name.is_empty() {
            return Err(invalid("Package name cannot be empty"));
        }
        if version.is_empty() {
            return Err(invalid("Forced version cannot be empty"));
        }

        Ok((name.to_string(), version.to_string()))
    }

    /// Builds overrides from a name -> version map (config file form)
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self> {
        let mut overrides = Self::new();
        for (name, version) in map {
            overrides.insert(name.clone(), version.clone())?;
        }
        Ok(overrides)
    }

    pub fn insert(&mut self, name: String, version: String) -> Result<()> {
        let parsed = Version::new(version.as_str()).map_err(|_| -> anyhow::Error {
            DepGraphError::InvalidOverride {
                input: format!("{}={}", name, version),
                reason: "Forced version is not a valid version string".to_string(),
            }
            .into()
        })?;
        self.forced.insert(name, parsed);
        Ok(())
    }

    /// Merges `other` into `self`; entries from `other` win
    pub fn merge(&mut self, other: VersionOverrides) {
        self.forced.extend(other.forced);
    }

    pub fn forced_version(&self, name: &str) -> Option<&str> {
        self.forced.get(name).map(Version::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.forced.is_empty()
    }

    pub fn len(&self) -> usize {
        self.forced.len()
    }

    /// Returns the identity to use for `identity` and whether its version was replaced
    pub fn apply(&self, identity: &PackageIdentity) -> Result<(PackageIdentity, bool)> {
        match self.forced_version(identity.name()) {
            Some(forced) if forced != identity.version() => {
                Ok((identity.with_version(forced)?, true))
            }
            _ => Ok((identity.clone(), false)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(coordinate: &str) -> PackageIdentity {
        coordinate.parse().unwrap()
    }

    #[test]
    fn test_parse_directive() {
        let (name, version) =
            VersionOverrides::parse_directive("com.google.guava:guava=32.1.3-jre").unwrap();
        assert_eq!(name, "com.google.guava:guava");
        assert_eq!(version, "32.1.3-jre");
    }

    #[test]
    fn test_parse_directive_errors() {
        for bad in ["foo", "=1.0", "foo=", "  "] {
            let err = VersionOverrides::parse_directive(bad).unwrap_err();
            assert!(
                matches!(
                    err.downcast_ref::<DepGraphError>(),
                    Some(DepGraphError::InvalidOverride { .. })
                ),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_apply_forces_version() {
        let overrides = VersionOverrides::parse_directives(["foo=2.0.0"]).unwrap();
        let (applied, forced) = overrides.apply(&id("npm:foo:1.5.0")).unwrap();
        assert_eq!(applied, id("npm:foo:2.0.0"));
        assert!(forced);
    }

    #[test]
    fn test_apply_same_version_is_not_counted() {
        let overrides = VersionOverrides::parse_directives(["foo=2.0.0"]).unwrap();
        let (applied, forced) = overrides.apply(&id("npm:foo:2.0.0")).unwrap();
        assert_eq!(applied, id("npm:foo:2.0.0"));
        assert!(!forced);
    }

    #[test]
    fn test_apply_untouched_names() {
        let overrides = VersionOverrides::parse_directives(["foo=2.0.0"]).unwrap();
        let (applied, forced) = overrides.apply(&id("npm:bar:1.0.0")).unwrap();
        assert_eq!(applied, id("npm:bar:1.0.0"));
        assert!(!forced);
    }

    #[test]
    fn test_later_directive_wins() {
        let overrides = VersionOverrides::parse_directives(["foo=1.0", "foo=2.0"]).unwrap();
        assert_eq!(overrides.forced_version("foo"), Some("2.0"));
        assert_eq!(overrides.len(), 1);
    }

    #[test]
    fn test_merge_prefers_other() {
        let mut base =
            VersionOverrides::from_map(&BTreeMap::from([("foo".to_string(), "1.0".to_string())]))
                .unwrap();
        let cli = VersionOverrides::parse_directives(["foo=2.0", "bar=3.0"]).unwrap();
        base.merge(cli);
        assert_eq!(base.forced_version("foo"), Some("2.0"));
        assert_eq!(base.forced_version("bar"), Some("3.0"));
    }
}
