use crate::graph_resolution::domain::DependencyGraph;
use crate::ports::outbound::GraphFormatter;
use crate::shared::Result;
use std::collections::BTreeSet;

/// ListFormatter adapter: every package once, sorted, `ecosystem:name:version`
pub struct ListFormatter;

impl ListFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ListFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphFormatter for ListFormatter {
    fn format(&self, graph: &DependencyGraph) -> Result<String> {
        let coordinates: BTreeSet<String> = graph
            .nodes()
            .map(|node| {
                let identity = node.identity();
                format!(
                    "{}:{}:{}",
                    identity.ecosystem(),
                    identity.name(),
                    node.version_info().report_version()
                )
            })
            .collect();

        Ok(coordinates.into_iter().collect::<Vec<_>>().join("\n"))
    }
}
