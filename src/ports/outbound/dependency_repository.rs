use crate::graph_resolution::domain::PackageIdentity;
use crate::shared::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Relation marker the metadata service puts on the queried package's node
pub const SELF_RELATION: &str = "SELF";

/// Package coordinates as reported by the metadata service
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RawVersionKey {
    pub system: String,
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawNode {
    pub version_key: RawVersionKey,
    pub relation: String,
    pub bundled: bool,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawEdge {
    pub from_node: usize,
    pub to_node: usize,
    pub requirement: String,
}

/// Dependency graph for one package as returned by the metadata service
///
/// Nodes are addressed by index; edges refer to those indexes. The service
/// resolves the whole subgraph, but only the package's immediate children
/// are consumed, the builder discovers the rest itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RawGraphData {
    pub nodes: Vec<RawNode>,
    pub edges: Vec<RawEdge>,
    pub error: Option<String>,
}

impl RawGraphData {
    /// Index of the queried package: the `SELF` node, else the first node
    pub fn self_index(&self) -> Option<usize> {
        if self.nodes.is_empty() {
            return None;
        }
        Some(
            self.nodes
                .iter()
                .position(|n| n.relation == SELF_RELATION)
                .unwrap_or(0),
        )
    }

    /// Resolution errors the service reported for the queried package
    ///
    /// Collects the top-level `error` and the `errors` of the SELF node;
    /// blank entries are ignored.
    pub fn service_errors(&self) -> Vec<&str> {
        let self_errors = self
            .self_index()
            .and_then(|index| self.nodes.get(index))
            .map(|node| node.errors.as_slice())
            .unwrap_or_default();

        self.error
            .iter()
            .chain(self_errors)
            .map(|e| e.trim())
            .filter(|e| !e.is_empty())
            .collect()
    }

    /// Immediate children of the queried package, in edge order
    ///
    /// Edges whose endpoints fall outside the node list are skipped.
    pub fn direct_dependencies(&self) -> Vec<&RawVersionKey> {
        let Some(self_index) = self.self_index() else {
            return Vec::new();
        };

        self.edges
            .iter()
            .filter(|edge| edge.from_node == self_index)
            .filter_map(|edge| match self.nodes.get(edge.to_node) {
                Some(node) => Some(&node.version_key),
                None => {
                    tracing::warn!(
                        from = edge.from_node,
                        to = edge.to_node,
                        nodes = self.nodes.len(),
                        "skipping edge that points outside the node list"
                    );
                    None
                }
            })
            .collect()
    }
}

/// Result of a single dependency lookup that did not fail hard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The service answered with dependency data
    Resolved(RawGraphData),
    /// The service answered with a non-2xx status; the package is a leaf
    Unavailable { status: u16 },
}

/// DependencyDataRepository port for fetching immediate dependency data
///
/// # Async Support
/// Implementations must be `Send + Sync`: the graph builder issues several
/// fetches concurrently against the same repository.
#[async_trait]
pub trait DependencyDataRepository: Send + Sync {
    /// Fetches dependency data for one package
    ///
    /// # Errors
    /// Returns an error (hard failure) if:
    /// - The transport fails (connect, timeout, reset)
    /// - A 2xx response body cannot be parsed
    /// - The repository has been shut down
    async fn fetch_dependency_data(&self, identity: &PackageIdentity) -> Result<FetchOutcome>;

    /// Releases resources. Must be idempotent.
    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }
}
