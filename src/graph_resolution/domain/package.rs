use super::Ecosystem;
use crate::shared::error::DepGraphError;
use crate::shared::Result;
use std::fmt;
use std::str::FromStr;

/// Maximum length for package names (security limit)
const MAX_PACKAGE_NAME_LENGTH: usize = 255;

/// Maximum length for package versions (security limit)
const MAX_VERSION_LENGTH: usize = 128;

fn invalid(input: &str, reason: impl Into<String>) -> anyhow::Error {
    DepGraphError::InvalidIdentity {
        input: input.to_string(),
        reason: reason.into(),
    }
    .into()
}

/// Rejects whitespace and control characters.
///
/// Names travel into request paths; they are percent-encoded there, but a
/// name with embedded whitespace is never a real package.
fn has_forbidden_chars(value: &str) -> bool {
    value.chars().any(|c| c.is_whitespace() || c.is_control())
}

/// NewType wrapper for package name with validation
///
/// Names are ecosystem specific: Maven uses `group:artifact`, npm allows
/// `@scope/name`, Go uses module paths. Only the universal constraints are
/// checked here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageName(String);

impl PackageName {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();

        if name.is_empty() {
            return Err(invalid(&name, "Package name cannot be empty"));
        }

        if name.len() > MAX_PACKAGE_NAME_LENGTH {
            return Err(invalid(
                &name,
                format!(
                    "Package name is too long ({} bytes). Maximum allowed: {} bytes",
                    name.len(),
                    MAX_PACKAGE_NAME_LENGTH
                ),
            ));
        }

        if has_forbidden_chars(&name) {
            return Err(invalid(
                &name,
                "Package name must not contain whitespace or control characters",
            ));
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// NewType wrapper for a raw (report) version string with validation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version(String);

impl Version {
    pub fn new(version: impl Into<String>) -> Result<Self> {
        let version = version.into();

        if version.is_empty() {
            return Err(invalid(&version, "Package version cannot be empty"));
        }

        if version.len() > MAX_VERSION_LENGTH {
            return Err(invalid(
                &version,
                format!(
                    "Package version is too long ({} bytes). Maximum allowed: {} bytes",
                    version.len(),
                    MAX_VERSION_LENGTH
                ),
            ));
        }

        if has_forbidden_chars(&version) {
            return Err(invalid(
                &version,
                "Package version must not contain whitespace or control characters",
            ));
        }

        Ok(Self(version))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonical (ecosystem, name, report version) triple
///
/// This is the single source of truth for "is this the same dependency":
/// the graph registry is keyed by it. The version is the declared version
/// string exactly as found. For plain versions that is the report version;
/// for vendor-patched ones both the report and the query version are
/// derived from it with `VersionReconciler`, so a vendor build never
/// collapses into the upstream release it was patched from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageIdentity {
    ecosystem: Ecosystem,
    name: PackageName,
    version: Version,
}

impl PackageIdentity {
    pub fn new(
        ecosystem: Ecosystem,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            ecosystem,
            name: PackageName::new(name)?,
            version: Version::new(version)?,
        })
    }

    /// Builds an identity from an untyped ecosystem string
    pub fn from_parts(ecosystem: &str, name: &str, version: &str) -> Result<Self> {
        let ecosystem: Ecosystem = ecosystem.parse()?;
        Self::new(ecosystem, name, version)
    }

    /// Same package, different version (used when an override forces one)
    pub fn with_version(&self, version: impl Into<String>) -> Result<Self> {
        Ok(Self {
            ecosystem: self.ecosystem,
            name: self.name.clone(),
            version: Version::new(version)?,
        })
    }

    pub fn ecosystem(&self) -> Ecosystem {
        self.ecosystem
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn version(&self) -> &str {
        self.version.as_str()
    }
}

impl fmt::Display for PackageIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.ecosystem, self.name, self.version)
    }
}

/// Parses an `ecosystem:name:version` coordinate.
///
/// The ecosystem is everything before the first `:` and the version is
/// everything after the last one, so Maven names keep their inner colon:
/// `maven:com.google.guava:guava:31.1-jre`.
impl FromStr for PackageIdentity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let coordinate = s.trim();
        let (ecosystem, rest) = coordinate
            .split_once(':')
            .ok_or_else(|| invalid(coordinate, "Missing ecosystem prefix"))?;
        let (name, version) = rest
            .rsplit_once(':')
            .ok_or_else(|| invalid(coordinate, "Missing version suffix"))?;

        Self::from_parts(ecosystem, name, version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_name_new_valid() {
        let name = PackageName::new("com.google.guava:guava").unwrap();
        assert_eq!(name.as_str(), "com.google.guava:guava");
    }

    #[test]
    fn test_package_name_new_empty() {
        let err = PackageName::new("").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DepGraphError>(),
            Some(DepGraphError::InvalidIdentity { .. })
        ));
    }

    #[test]
    fn test_package_name_rejects_whitespace() {
        assert!(PackageName::new("left pad").is_err());
        assert!(PackageName::new("left\npad").is_err());
    }

    #[test]
    fn test_package_name_too_long() {
        let result = PackageName::new("a".repeat(MAX_PACKAGE_NAME_LENGTH + 1));
        assert!(result.unwrap_err().to_string().contains("too long"));
    }

    #[test]
    fn test_version_new_empty() {
        assert!(Version::new("").is_err());
    }

    #[test]
    fn test_identity_equality_ignores_ecosystem_case() {
        let a = PackageIdentity::from_parts("MAVEN", "g:a", "1.0").unwrap();
        let b = PackageIdentity::from_parts("maven", "g:a", "1.0").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_identity_differs_by_version() {
        let a = PackageIdentity::from_parts("npm", "react", "18.2.0").unwrap();
        let b = PackageIdentity::from_parts("npm", "react", "18.3.0").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_identity_unknown_ecosystem_rejected() {
        let err = PackageIdentity::from_parts("cpan", "Moose", "2.2206").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DepGraphError>(),
            Some(DepGraphError::UnknownEcosystem { .. })
        ));
    }

    #[test]
    fn test_parse_maven_coordinate_keeps_group() {
        let identity: PackageIdentity = "maven:com.google.guava:guava:31.1-jre".parse().unwrap();
        assert_eq!(identity.ecosystem(), Ecosystem::Maven);
        assert_eq!(identity.name(), "com.google.guava:guava");
        assert_eq!(identity.version(), "31.1-jre");
    }

    #[test]
    fn test_parse_scoped_npm_coordinate() {
        let identity: PackageIdentity = "npm:@babel/core:7.24.0".parse().unwrap();
        assert_eq!(identity.name(), "@babel/core");
        assert_eq!(identity.version(), "7.24.0");
    }

    #[test]
    fn test_parse_missing_version() {
        let err = "pypi:requests".parse::<PackageIdentity>().unwrap_err();
        assert!(err.to_string().contains("requests"));
    }

    #[test]
    fn test_parse_empty_name() {
        assert!("pypi::2.31.0".parse::<PackageIdentity>().is_err());
    }

    #[test]
    fn test_display_is_coordinate() {
        let identity = PackageIdentity::new(Ecosystem::PyPI, "requests", "2.31.0").unwrap();
        assert_eq!(identity.to_string(), "pypi:requests:2.31.0");
    }

    #[test]
    fn test_with_version() {
        let identity = PackageIdentity::new(Ecosystem::Npm, "foo", "1.5.0").unwrap();
        let forced = identity.with_version("2.0.0").unwrap();
        assert_eq!(forced.name(), "foo");
        assert_eq!(forced.version(), "2.0.0");
        assert_eq!(forced.ecosystem(), Ecosystem::Npm);
    }
}
