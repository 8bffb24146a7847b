use crate::graph_resolution::domain::DependencyGraph;
use crate::graph_resolution::services::{BranchStyle, TreeRenderer};
use crate::ports::outbound::GraphFormatter;
use crate::shared::Result;

/// TextFormatter adapter: `mvn dependency:tree` look-alike
///
/// ASCII connectors, `name:version` labels and a trailing summary block.
pub struct TextFormatter;

impl TextFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphFormatter for TextFormatter {
    fn format(&self, graph: &DependencyGraph) -> Result<String> {
        let renderer = TreeRenderer::for_graph(graph, BranchStyle::Ascii);
        let mut lines: Vec<String> = renderer
            .lines()
            .map(|line| {
                let identity = line.node.identity();
                let mut text = format!(
                    "{}{}:{}",
                    line.prefix,
                    identity.name(),
                    line.node.version_info().report_version()
                );
                if line.is_cycle {
                    text.push_str(" (cycle)");
                }
                if line.is_duplicate {
                    text.push_str(" (omitted for duplicate)");
                }
                text
            })
            .collect();

        let summary = graph.summary();
        lines.push(String::new());
        lines.push(format!(
            "{} packages, {} edges, {} resolved",
            graph.node_count(),
            graph.edge_count(),
            summary.resolved
        ));
        for identity in &summary.soft_failed {
            lines.push(format!("[WARNING] no dependency data for {}", identity));
        }
        for (identity, reason) in &summary.hard_failed {
            lines.push(format!("[ERROR] failed to resolve {}: {}", identity, reason));
        }
        for (identity, reason) in &summary.service_errors {
            lines.push(format!("[WARNING] {} resolved with errors: {}", identity, reason));
        }
        if summary.invalid_references > 0 {
            lines.push(format!(
                "[WARNING] {} invalid dependency reference(s) skipped",
                summary.invalid_references
            ));
        }
        for identity in &summary.excluded_roots {
            lines.push(format!("[WARNING] excluded root {}", identity));
        }

        Ok(lines.join("\n"))
    }
}
