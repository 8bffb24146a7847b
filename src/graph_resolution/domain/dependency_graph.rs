use super::{PackageIdentity, VersionInfo};
use std::collections::HashMap;

/// A package in the graph
///
/// Children are identities looked up in the owning `DependencyGraph`, never
/// owning pointers, so shared nodes and cycles need no special handling.
#[derive(Debug, Clone)]
pub struct DependencyNode {
    identity: PackageIdentity,
    version_info: VersionInfo,
    children: Vec<PackageIdentity>,
    is_root: bool,
    resolved: bool,
}

impl DependencyNode {
    pub fn new(identity: PackageIdentity, version_info: VersionInfo) -> Self {
        Self {
            identity,
            version_info,
            children: Vec::new(),
            is_root: false,
            resolved: false,
        }
    }

    pub fn identity(&self) -> &PackageIdentity {
        &self.identity
    }

    pub fn version_info(&self) -> &VersionInfo {
        &self.version_info
    }

    /// Children in the order the metadata service returned them
    pub fn children(&self) -> &[PackageIdentity] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.is_root
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Appends a child unless it is already present. Returns whether it was added.
    pub(crate) fn add_child(&mut self, child: PackageIdentity) -> bool {
        if self.children.contains(&child) {
            return false;
        }
        self.children.push(child);
        true
    }
}

/// Outcome counters collected while building a graph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSummary {
    /// Packages whose dependency data was fetched successfully
    pub resolved: usize,
    /// Packages the metadata service did not know (non-2xx); treated as leaves
    pub soft_failed: Vec<PackageIdentity>,
    /// Packages whose fetch failed hard while continuing on error
    pub hard_failed: Vec<(PackageIdentity, String)>,
    /// Packages answered with 2xx whose body reported a resolution error
    pub service_errors: Vec<(PackageIdentity, String)>,
    /// Child references dropped by an exclusion rule
    pub excluded: usize,
    /// Declared roots that matched an exclusion rule
    pub excluded_roots: Vec<PackageIdentity>,
    /// References whose version was replaced by an override
    pub overridden: usize,
    /// Child references the service returned that failed identity validation
    pub invalid_references: usize,
}

impl BuildSummary {
    /// A graph is partial when any branch was truncated or a root was dropped
    pub fn is_partial(&self) -> bool {
        !self.soft_failed.is_empty()
            || !self.hard_failed.is_empty()
            || !self.service_errors.is_empty()
            || !self.excluded_roots.is_empty()
            || self.invalid_references > 0
    }

    /// Packages or references whose dependencies are missing from the graph
    pub fn unresolved_count(&self) -> usize {
        self.soft_failed.len()
            + self.hard_failed.len()
            + self.service_errors.len()
            + self.invalid_references
    }
}

/// DependencyGraph aggregate: the node registry produced by one build
///
/// An arena keyed by `PackageIdentity`. Every identity maps to exactly one
/// node, which is what makes shared dependencies shared. Populated only by
/// the graph builder; read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: HashMap<PackageIdentity, DependencyNode>,
    insertion_order: Vec<PackageIdentity>,
    roots: Vec<PackageIdentity>,
    summary: BuildSummary,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the node for `identity`, creating it with `version_info` when absent
    pub(crate) fn get_or_insert_with(
        &mut self,
        identity: &PackageIdentity,
        version_info: impl FnOnce() -> VersionInfo,
    ) -> &mut DependencyNode {
        if !self.nodes.contains_key(identity) {
            self.insertion_order.push(identity.clone());
        }
        self.nodes
            .entry(identity.clone())
            .or_insert_with(|| DependencyNode::new(identity.clone(), version_info()))
    }

    /// Marks an existing node as root. Unknown identities are ignored.
    pub(crate) fn add_root(&mut self, identity: &PackageIdentity) {
        if let Some(node) = self.nodes.get_mut(identity) {
            node.is_root = true;
            if !self.roots.contains(identity) {
                self.roots.push(identity.clone());
            }
        }
    }

    /// Adds `parent -> child`. Self-edges and edges to unknown nodes are dropped.
    pub(crate) fn add_edge(&mut self, parent: &PackageIdentity, child: &PackageIdentity) -> bool {
        if parent == child || !self.nodes.contains_key(child) {
            return false;
        }
        match self.nodes.get_mut(parent) {
            Some(node) => node.add_child(child.clone()),
            None => false,
        }
    }

    pub(crate) fn mark_resolved(&mut self, identity: &PackageIdentity) {
        if let Some(node) = self.nodes.get_mut(identity) {
            node.resolved = true;
        }
    }

    pub(crate) fn summary_mut(&mut self) -> &mut BuildSummary {
        &mut self.summary
    }

    pub fn node(&self, identity: &PackageIdentity) -> Option<&DependencyNode> {
        self.nodes.get(identity)
    }

    pub fn contains(&self, identity: &PackageIdentity) -> bool {
        self.nodes.contains_key(identity)
    }

    pub fn is_resolved(&self, identity: &PackageIdentity) -> bool {
        self.nodes.get(identity).is_some_and(|n| n.resolved)
    }

    /// Declared roots, in declaration order
    pub fn roots(&self) -> &[PackageIdentity] {
        &self.roots
    }

    /// All nodes in discovery order
    pub fn nodes(&self) -> impl Iterator<Item = &DependencyNode> {
        self.insertion_order
            .iter()
            .filter_map(|identity| self.nodes.get(identity))
    }

    pub fn children_of(&self, identity: &PackageIdentity) -> &[PackageIdentity] {
        self.nodes
            .get(identity)
            .map(|n| n.children())
            .unwrap_or(&[])
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|n| n.children.len()).sum()
    }

    /// All `(parent, child)` pairs, parents in discovery order
    pub fn edges(&self) -> impl Iterator<Item = (&PackageIdentity, &PackageIdentity)> {
        self.nodes().flat_map(|node| {
            node.children
                .iter()
                .map(move |child| (&node.identity, child))
        })
    }

    pub fn summary(&self) -> &BuildSummary {
        &self.summary
    }

    /// Nodes whose package name equals `name`, in discovery order
    pub fn find_by_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a DependencyNode> {
        self.nodes().filter(move |n| n.identity.name() == name)
    }
}
