use crate::shared::error::DepGraphError;
use std::fmt;
use std::str::FromStr;

/// Package ecosystems understood by the metadata service
///
/// Parsing is case-insensitive, so `MAVEN`, `Maven` and `maven` are the
/// same ecosystem and compare equal inside a `PackageIdentity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Ecosystem {
    Maven,
    PyPI,
    Npm,
    Cargo,
    Go,
    NuGet,
}

impl Ecosystem {
    pub const ALL: [Ecosystem; 6] = [
        Ecosystem::Maven,
        Ecosystem::PyPI,
        Ecosystem::Npm,
        Ecosystem::Cargo,
        Ecosystem::Go,
        Ecosystem::NuGet,
    ];

    /// Lowercase name used in coordinates and request URLs
    pub fn as_str(&self) -> &'static str {
        match self {
            Ecosystem::Maven => "maven",
            Ecosystem::PyPI => "pypi",
            Ecosystem::Npm => "npm",
            Ecosystem::Cargo => "cargo",
            Ecosystem::Go => "go",
            Ecosystem::NuGet => "nuget",
        }
    }

    /// Package-URL type (https://github.com/package-url/purl-spec)
    pub fn purl_type(&self) -> &'static str {
        match self {
            Ecosystem::Go => "golang",
            other => other.as_str(),
        }
    }

    fn supported_list() -> String {
        Self::ALL
            .iter()
            .map(|e| e.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ecosystem {
    type Err = DepGraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "maven" => Ok(Ecosystem::Maven),
            "pypi" => Ok(Ecosystem::PyPI),
            "npm" => Ok(Ecosystem::Npm),
            "cargo" => Ok(Ecosystem::Cargo),
            "go" | "golang" => Ok(Ecosystem::Go),
            "nuget" => Ok(Ecosystem::NuGet),
            _ => Err(DepGraphError::UnknownEcosystem {
                ecosystem: s.to_string(),
                supported: Self::supported_list(),
            }),
        }
    }
}
