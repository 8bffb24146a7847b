use async_trait::async_trait;
use depgraph_sbom::ports::outbound::{FetchOutcome, RawEdge, RawGraphData, RawNode, RawVersionKey};
use depgraph_sbom::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock DependencyDataRepository serving canned graphs keyed by coordinate
///
/// Unknown coordinates answer `Unavailable { status: 404 }`. Clones share
/// the call log and shutdown counter.
#[derive(Default, Clone)]
pub struct MockDependencyRepository {
    graphs: HashMap<String, Vec<String>>,
    delays: HashMap<String, Duration>,
    failures: HashSet<String>,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub shutdowns: Arc<AtomicUsize>,
}

impl MockDependencyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `coordinate` with its direct children, in service order
    pub fn with_package(mut self, coordinate: &str, children: &[&str]) -> Self {
        self.graphs.insert(
            coordinate.to_string(),
            children.iter().map(|c| c.to_string()).collect(),
        );
        self
    }

    pub fn with_delay(mut self, coordinate: &str, millis: u64) -> Self {
        self.delays
            .insert(coordinate.to_string(), Duration::from_millis(millis));
        self
    }

    /// Makes fetches of `coordinate` fail hard
    pub fn with_failure(mut self, coordinate: &str) -> Self {
        self.failures.insert(coordinate.to_string());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_for(&self, coordinate: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.as_str() == coordinate)
            .count()
    }

    pub fn shutdown_count(&self) -> usize {
        self.shutdowns.load(Ordering::SeqCst)
    }

    fn raw_graph(identity: &PackageIdentity, children: &[String]) -> RawGraphData {
        let mut nodes = vec![RawNode {
            version_key: version_key(identity),
            relation: "SELF".to_string(),
            ..RawNode::default()
        }];
        let mut edges = Vec::new();
        for child in children {
            let child: PackageIdentity = child.parse().expect("valid child coordinate");
            nodes.push(RawNode {
                version_key: version_key(&child),
                relation: "DIRECT".to_string(),
                ..RawNode::default()
            });
            edges.push(RawEdge {
                from_node: 0,
                to_node: nodes.len() - 1,
                requirement: String::new(),
            });
        }
        RawGraphData {
            nodes,
            edges,
            error: None,
        }
    }
}

fn version_key(identity: &PackageIdentity) -> RawVersionKey {
    RawVersionKey {
        system: identity.ecosystem().as_str().to_uppercase(),
        name: identity.name().to_string(),
        version: identity.version().to_string(),
    }
}

#[async_trait]
impl DependencyDataRepository for MockDependencyRepository {
    async fn fetch_dependency_data(&self, identity: &PackageIdentity) -> Result<FetchOutcome> {
        let coordinate = identity.to_string();
        self.calls.lock().unwrap().push(coordinate.clone());

        if let Some(delay) = self.delays.get(&coordinate) {
            tokio::time::sleep(*delay).await;
        }
        if self.failures.contains(&coordinate) {
            anyhow::bail!("Mock transport failure for {}", coordinate);
        }

        match self.graphs.get(&coordinate) {
            Some(children) => Ok(FetchOutcome::Resolved(Self::raw_graph(identity, children))),
            None => Ok(FetchOutcome::Unavailable { status: 404 }),
        }
    }

    async fn shutdown(&self) -> Result<()> {
        self.shutdowns.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
