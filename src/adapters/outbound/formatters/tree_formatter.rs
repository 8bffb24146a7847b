use crate::graph_resolution::domain::DependencyGraph;
use crate::graph_resolution::services::{BranchStyle, TreeLine, TreeRenderer};
use crate::ports::outbound::GraphFormatter;
use crate::shared::Result;
use owo_colors::OwoColorize;

/// TreeFormatter adapter: Unicode box-drawing tree
///
/// Roots are highlighted, cycle back-references and omitted duplicates
/// dimmed when color is on.
pub struct TreeFormatter {
    colored: bool,
}

impl TreeFormatter {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    fn paint(&self, line: &TreeLine) -> String {
        if !self.colored {
            return line.to_string();
        }
        let label = line.label();
        let label = if line.is_cycle || line.is_duplicate {
            label.dimmed().to_string()
        } else if line.node.is_root() {
            label.bold().green().to_string()
        } else if line.node.version_info().is_vendor_patched() {
            label.yellow().to_string()
        } else {
            label
        };
        format!("{}{}{}", line.prefix, label, line.markers())
    }
}

impl Default for TreeFormatter {
    fn default() -> Self {
        Self::new(false)
    }
}

impl GraphFormatter for TreeFormatter {
    fn format(&self, graph: &DependencyGraph) -> Result<String> {
        let renderer = TreeRenderer::for_graph(graph, BranchStyle::Unicode);
        let mut output: Vec<String> = renderer.lines().map(|line| self.paint(&line)).collect();

        let summary = graph.summary();
        if !summary.excluded_roots.is_empty() {
            output.push(String::new());
            for root in &summary.excluded_roots {
                output.push(format!("excluded root: {}", root));
            }
        }

        Ok(output.join("\n"))
    }
}
