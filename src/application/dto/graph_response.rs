use crate::graph_resolution::domain::DependencyGraph;

/// GraphResponse - Internal response DTO from the resolve-graph use case
#[derive(Debug)]
pub struct GraphResponse {
    pub graph: DependencyGraph,
    /// Exclusion patterns that never matched a package
    pub unmatched_exclusions: Vec<String>,
}

impl GraphResponse {
    pub fn new(graph: DependencyGraph, unmatched_exclusions: Vec<String>) -> Self {
        Self {
            graph,
            unmatched_exclusions,
        }
    }

    /// True when some package could not be resolved or a root was excluded
    pub fn is_partial(&self) -> bool {
        self.graph.summary().is_partial()
    }
}
