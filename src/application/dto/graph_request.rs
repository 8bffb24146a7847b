use crate::graph_resolution::policies::VersionOverrides;
use crate::graph_resolution::services::GraphBuilderOptions;
use std::path::PathBuf;

/// GraphRequest - Internal request DTO for the resolve-graph use case
///
/// Roots come from the manifest (if any) followed by the explicit
/// coordinates, in that order.
#[derive(Debug, Clone, Default)]
pub struct GraphRequest {
    /// Manifest listing one root coordinate per line
    pub manifest_path: Option<PathBuf>,
    /// Root coordinates given directly (`ecosystem:name:version`)
    pub coordinates: Vec<String>,
    /// Patterns for excluding packages from traversal
    pub exclude_patterns: Vec<String>,
    /// Forced versions keyed by package name
    pub overrides: VersionOverrides,
    pub options: GraphBuilderOptions,
}

impl GraphRequest {
    pub fn new(manifest_path: Option<PathBuf>, coordinates: Vec<String>) -> Self {
        Self {
            manifest_path,
            coordinates,
            ..Self::default()
        }
    }

    pub fn with_exclusions(mut self, exclude_patterns: Vec<String>) -> Self {
        self.exclude_patterns = exclude_patterns;
        self
    }

    pub fn with_overrides(mut self, overrides: VersionOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn with_options(mut self, options: GraphBuilderOptions) -> Self {
        self.options = options;
        self
    }
}
