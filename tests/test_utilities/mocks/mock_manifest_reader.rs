use depgraph_sbom::prelude::*;
use std::path::Path;

/// Mock ManifestReader returning a fixed root list
pub struct MockManifestReader {
    pub roots: Vec<String>,
    pub should_fail: bool,
}

impl MockManifestReader {
    pub fn new(roots: &[&str]) -> Self {
        Self {
            roots: roots.iter().map(|r| r.to_string()).collect(),
            should_fail: false,
        }
    }

    pub fn empty() -> Self {
        Self::new(&[])
    }

    pub fn with_failure() -> Self {
        Self {
            roots: Vec::new(),
            should_fail: true,
        }
    }
}

impl ManifestReader for MockManifestReader {
    fn read_roots(&self, _path: &Path) -> Result<Vec<PackageIdentity>> {
        if self.should_fail {
            anyhow::bail!("Mock manifest read failure");
        }
        self.roots.iter().map(|r| r.parse()).collect()
    }
}
