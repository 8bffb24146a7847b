use crate::graph_resolution::domain::DependencyGraph;
use crate::shared::Result;

/// GraphFormatter port for rendering a finished graph
///
/// Implementations cover the tree views, the flat list and CycloneDX JSON.
pub trait GraphFormatter {
    /// # Errors
    /// Returns an error if serialization fails
    fn format(&self, graph: &DependencyGraph) -> Result<String>;
}
