use crate::graph_resolution::domain::PackageIdentity;
use crate::shared::Result;
use std::path::Path;

/// ManifestReader port for reading declared root packages
///
/// Roots come back in declaration order with duplicates collapsed.
pub trait ManifestReader {
    /// Reads the root packages declared in the manifest at `path`
    ///
    /// # Errors
    /// Returns an error if:
    /// - The manifest does not exist or is not a regular file
    /// - A line is not a valid `ecosystem:name:version` coordinate
    fn read_roots(&self, path: &Path) -> Result<Vec<PackageIdentity>>;
}
