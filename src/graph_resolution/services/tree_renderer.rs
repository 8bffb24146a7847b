use crate::graph_resolution::domain::{DependencyGraph, DependencyNode, PackageIdentity};
use std::collections::HashSet;
use std::fmt;

/// Connector set used to draw branches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchStyle {
    /// `├── `, `└── `, `│   `
    Unicode,
    /// Maven dependency:tree style: `+- `, `\- `, `|  `
    Ascii,
}

impl BranchStyle {
    fn branch(self, is_last: bool) -> &'static str {
        match (self, is_last) {
            (BranchStyle::Unicode, false) => "├── ",
            (BranchStyle::Unicode, true) => "└── ",
            (BranchStyle::Ascii, false) => "+- ",
            (BranchStyle::Ascii, true) => "\\- ",
        }
    }

    fn continuation(self, is_last: bool) -> &'static str {
        match (self, is_last) {
            (BranchStyle::Unicode, false) => "│   ",
            (BranchStyle::Unicode, true) => "    ",
            (BranchStyle::Ascii, false) => "|  ",
            (BranchStyle::Ascii, true) => "   ",
        }
    }
}

/// One rendered line
#[derive(Debug, Clone)]
pub struct TreeLine<'g> {
    /// Indentation and connector, empty for top-level lines
    pub prefix: String,
    pub node: &'g DependencyNode,
    pub depth: usize,
    pub is_last: bool,
    /// The node is already on the current path and was not expanded
    pub is_cycle: bool,
    /// The node's subtree was printed earlier in this render and is omitted
    pub is_duplicate: bool,
}

impl TreeLine<'_> {
    /// `ecosystem:name:report-version`
    pub fn label(&self) -> String {
        let identity = self.node.identity();
        format!(
            "{}:{}:{}",
            identity.ecosystem(),
            identity.name(),
            self.node.version_info().report_version()
        )
    }

    /// Trailing markers: root, vendor patch, cycle, omitted duplicate
    pub fn markers(&self) -> String {
        let mut markers = String::new();
        if self.node.is_root() {
            markers.push_str(" (root)");
        }
        if let Some(artifact) = self.node.version_info().artifact() {
            markers.push_str(&format!(
                " [{} patch of {}]",
                artifact,
                self.node.version_info().query_version()
            ));
        }
        if self.is_cycle {
            markers.push_str(" (cycle)");
        }
        if self.is_duplicate {
            markers.push_str(" (omitted for duplicate)");
        }
        markers
    }
}

impl fmt::Display for TreeLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.prefix, self.label(), self.markers())
    }
}

#[derive(Debug, Clone, Copy)]
enum Anchor<'g> {
    /// Synthetic parent of every root; traversed, never printed
    Umbrella,
    Node(&'g DependencyNode),
}

/// TreeRenderer service: depth-first text rendering of a graph
///
/// Rendering is lazy and restartable: every call to `lines` starts a new
/// traversal. Children are sorted by identity string. A shared node's
/// subtree is expanded at its first occurrence only; later occurrences of a
/// node with children are marked as omitted duplicates, so output stays
/// linear in the graph size. A node already on the current path is printed
/// once more with a cycle marker and not expanded.
#[derive(Debug, Clone, Copy)]
pub struct TreeRenderer<'g> {
    graph: &'g DependencyGraph,
    anchor: Anchor<'g>,
    style: BranchStyle,
}

impl<'g> TreeRenderer<'g> {
    /// Renders every root as a top-level line, in declaration order
    pub fn for_graph(graph: &'g DependencyGraph, style: BranchStyle) -> Self {
        Self {
            graph,
            anchor: Anchor::Umbrella,
            style,
        }
    }

    /// Renders the subtree below `identity`, which is printed at depth 0
    pub fn for_node(
        graph: &'g DependencyGraph,
        identity: &PackageIdentity,
        style: BranchStyle,
    ) -> Option<Self> {
        graph.node(identity).map(|node| Self {
            graph,
            anchor: Anchor::Node(node),
            style,
        })
    }

    pub fn lines(&self) -> TreeLines<'g> {
        let mut lines = TreeLines {
            graph: self.graph,
            style: self.style,
            stack: Vec::new(),
            pending_anchor: None,
            expanded: HashSet::new(),
        };

        match self.anchor {
            Anchor::Umbrella => lines.stack.push(Frame {
                children: self
                    .graph
                    .roots()
                    .iter()
                    .filter_map(|id| self.graph.node(id))
                    .collect(),
                next: 0,
                indent: String::new(),
                opener: None,
                top_level: true,
                depth: 0,
            }),
            Anchor::Node(node) => lines.pending_anchor = Some(node),
        }

        lines
    }

    /// Convenience: all lines joined with `\n`
    pub fn render(&self) -> String {
        self.lines()
            .map(|line| line.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

struct Frame<'g> {
    children: Vec<&'g DependencyNode>,
    next: usize,
    /// Indentation inherited by this frame's children
    indent: String,
    opener: Option<&'g PackageIdentity>,
    top_level: bool,
    depth: usize,
}

/// Iterator returned by `TreeRenderer::lines`
pub struct TreeLines<'g> {
    graph: &'g DependencyGraph,
    style: BranchStyle,
    stack: Vec<Frame<'g>>,
    pending_anchor: Option<&'g DependencyNode>,
    /// Nodes whose children have been emitted in this traversal
    expanded: HashSet<&'g PackageIdentity>,
}

impl<'g> TreeLines<'g> {
    fn sorted_children(&self, node: &DependencyNode) -> Vec<&'g DependencyNode> {
        let mut children: Vec<&'g DependencyNode> = self
            .graph
            .children_of(node.identity())
            .iter()
            .filter_map(|id| self.graph.node(id))
            .collect();
        children.sort_by_cached_key(|child| child.identity().to_string());
        children
    }

    fn on_path(&self, identity: &PackageIdentity) -> bool {
        self.stack.iter().any(|frame| frame.opener == Some(identity))
    }

    fn open(&mut self, node: &'g DependencyNode, indent: String, depth: usize) {
        self.expanded.insert(node.identity());
        let children = self.sorted_children(node);
        if !children.is_empty() {
            self.stack.push(Frame {
                children,
                next: 0,
                indent,
                opener: Some(node.identity()),
                top_level: false,
                depth,
            });
        }
    }
}

impl<'g> Iterator for TreeLines<'g> {
    type Item = TreeLine<'g>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(anchor) = self.pending_anchor.take() {
            self.open(anchor, String::new(), 1);
            return Some(TreeLine {
                prefix: String::new(),
                node: anchor,
                depth: 0,
                is_last: true,
                is_cycle: false,
                is_duplicate: false,
            });
        }

        loop {
            let frame = self.stack.last_mut()?;
            if frame.next >= frame.children.len() {
                self.stack.pop();
                continue;
            }

            let node = frame.children[frame.next];
            frame.next += 1;
            let is_last = frame.next == frame.children.len();
            let depth = frame.depth;

            let (prefix, child_indent) = if frame.top_level {
                (String::new(), String::new())
            } else {
                (
                    format!("{}{}", frame.indent, self.style.branch(is_last)),
                    format!("{}{}", frame.indent, self.style.continuation(is_last)),
                )
            };

            let is_cycle = self.on_path(node.identity());
            let is_duplicate = !is_cycle
                && !node.children().is_empty()
                && self.expanded.contains(node.identity());
            if !is_cycle && !is_duplicate {
                self.open(node, child_indent, depth + 1);
            }

            return Some(TreeLine {
                prefix,
                node,
                depth,
                is_last,
                is_cycle,
                is_duplicate,
            });
        }
    }
}
