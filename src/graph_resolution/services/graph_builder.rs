use crate::graph_resolution::domain::{DependencyGraph, Ecosystem, PackageIdentity};
use crate::graph_resolution::policies::{ExclusionPolicy, VersionOverrides};
use crate::graph_resolution::services::VersionReconciler;
use crate::ports::outbound::{DependencyDataRepository, FetchOutcome, RawGraphData};
use crate::shared::Result;
use futures::stream::{self, StreamExt};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

/// Default number of fetches in flight per wave
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Upper bound accepted for the wave size
pub const MAX_CONCURRENCY: usize = 64;

/// Called after each package is integrated with `(resolved, discovered)`
pub type ProgressCallback = Arc<dyn Fn(usize, usize) + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphBuilderOptions {
    /// Maximum fetches issued concurrently per wave (clamped to 1..=MAX_CONCURRENCY)
    pub concurrency: usize,
    /// Record hard failures and treat the package as a leaf instead of aborting
    pub continue_on_error: bool,
}

impl Default for GraphBuilderOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            continue_on_error: false,
        }
    }
}

/// GraphBuilder service: turns declared roots into one deduplicated graph
///
/// Traversal is queue based. The frontier is drained in waves whose fetches
/// run concurrently, but results are integrated one by one in frontier
/// order, so the resulting graph does not depend on network timing. All
/// registry mutation happens on this single path.
pub struct GraphBuilder<'a, R: DependencyDataRepository + ?Sized> {
    repository: &'a R,
    options: GraphBuilderOptions,
    progress: Option<ProgressCallback>,
}

impl<'a, R: DependencyDataRepository + ?Sized> GraphBuilder<'a, R> {
    pub fn new(repository: &'a R, options: GraphBuilderOptions) -> Self {
        Self {
            repository,
            options,
            progress: None,
        }
    }

    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    fn concurrency(&self) -> usize {
        self.options.concurrency.clamp(1, MAX_CONCURRENCY)
    }

    /// Builds the graph reachable from `roots`
    ///
    /// # Errors
    /// - A root or override fails identity validation
    /// - A fetch fails hard and `continue_on_error` is off
    pub async fn build(
        &self,
        roots: &[PackageIdentity],
        exclusions: &ExclusionPolicy,
        overrides: &VersionOverrides,
    ) -> Result<DependencyGraph> {
        let mut traversal = Traversal::default();

        for root in roots {
            traversal.seed_root(root, exclusions, overrides)?;
        }

        tracing::info!(
            roots = traversal.graph.roots().len(),
            excluded_roots = traversal.graph.summary().excluded_roots.len(),
            concurrency = self.concurrency(),
            "starting dependency graph build"
        );

        while !traversal.queue.is_empty() {
            let wave = traversal.next_wave(self.concurrency());
            if wave.is_empty() {
                continue;
            }

            let results: Vec<Result<FetchOutcome>> = stream::iter(wave.iter())
                .map(|identity| self.repository.fetch_dependency_data(identity))
                .buffered(self.concurrency())
                .collect()
                .await;

            for (identity, result) in wave.into_iter().zip(results) {
                self.integrate(&mut traversal, &identity, result, exclusions, overrides)?;
                traversal.graph.mark_resolved(&identity);
                traversal.completed += 1;

                if let Some(progress) = &self.progress {
                    progress(traversal.completed, traversal.graph.node_count());
                }
            }
        }

        let graph = traversal.graph;
        let summary = graph.summary();
        tracing::info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            resolved = summary.resolved,
            soft_failed = summary.soft_failed.len(),
            hard_failed = summary.hard_failed.len(),
            service_errors = summary.service_errors.len(),
            invalid_references = summary.invalid_references,
            excluded = summary.excluded,
            overridden = summary.overridden,
            "dependency graph build finished"
        );

        Ok(graph)
    }

    fn integrate(
        &self,
        traversal: &mut Traversal,
        identity: &PackageIdentity,
        result: Result<FetchOutcome>,
        exclusions: &ExclusionPolicy,
        overrides: &VersionOverrides,
    ) -> Result<()> {
        match result {
            Ok(FetchOutcome::Resolved(data)) => {
                traversal.graph.summary_mut().resolved += 1;
                let errors = data.service_errors();
                if !errors.is_empty() {
                    let reason = errors.join("; ");
                    tracing::warn!(package = %identity, error = %reason, "metadata service reported a resolution error");
                    traversal
                        .graph
                        .summary_mut()
                        .service_errors
                        .push((identity.clone(), reason));
                }
                traversal.add_children(identity, &data, exclusions, overrides)
            }
            Ok(FetchOutcome::Unavailable { status }) => {
                tracing::warn!(package = %identity, status, "dependency data unavailable, treating as leaf");
                traversal
                    .graph
                    .summary_mut()
                    .soft_failed
                    .push(identity.clone());
                Ok(())
            }
            Err(e) if self.options.continue_on_error => {
                tracing::warn!(package = %identity, error = %e, "fetch failed, continuing");
                traversal
                    .graph
                    .summary_mut()
                    .hard_failed
                    .push((identity.clone(), format!("{:#}", e)));
                Ok(())
            }
            Err(e) => Err(e.context(format!("Failed to resolve dependencies of {}", identity))),
        }
    }
}

/// Mutable state of one build
#[derive(Default)]
struct Traversal {
    graph: DependencyGraph,
    queue: VecDeque<PackageIdentity>,
    queued: HashSet<PackageIdentity>,
    completed: usize,
}

impl Traversal {
    fn enqueue(&mut self, identity: &PackageIdentity) {
        if self.queued.insert(identity.clone()) {
            self.queue.push_back(identity.clone());
        }
    }

    fn seed_root(
        &mut self,
        root: &PackageIdentity,
        exclusions: &ExclusionPolicy,
        overrides: &VersionOverrides,
    ) -> Result<()> {
        let (identity, forced) = overrides.apply(root)?;
        if forced {
            self.graph.summary_mut().overridden += 1;
        }

        if exclusions.is_excluded(&identity) {
            tracing::warn!(package = %identity, "declared root matches an exclusion rule and is skipped");
            let excluded_roots = &mut self.graph.summary_mut().excluded_roots;
            if !excluded_roots.contains(&identity) {
                excluded_roots.push(identity);
            }
            return Ok(());
        }

        self.graph
            .get_or_insert_with(&identity, || VersionReconciler::parse(identity.version()));
        self.graph.add_root(&identity);
        self.enqueue(&identity);
        Ok(())
    }

    /// Pops up to `size` identities that still need fetching
    fn next_wave(&mut self, size: usize) -> Vec<PackageIdentity> {
        let mut wave = Vec::with_capacity(size);
        while wave.len() < size {
            match self.queue.pop_front() {
                Some(identity) if !self.graph.is_resolved(&identity) => wave.push(identity),
                Some(_) => continue,
                None => break,
            }
        }
        wave
    }

    fn add_children(
        &mut self,
        parent: &PackageIdentity,
        data: &RawGraphData,
        exclusions: &ExclusionPolicy,
        overrides: &VersionOverrides,
    ) -> Result<()> {
        for key in data.direct_dependencies() {
            let ecosystem = key
                .system
                .parse::<Ecosystem>()
                .unwrap_or(parent.ecosystem());

            let child = match PackageIdentity::new(ecosystem, key.name.as_str(), key.version.as_str()) {
                Ok(child) => child,
                Err(e) => {
                    tracing::warn!(parent = %parent, error = %e, "skipping invalid dependency reference");
                    self.graph.summary_mut().invalid_references += 1;
                    continue;
                }
            };

            let (child, forced) = overrides.apply(&child)?;
            if forced {
                self.graph.summary_mut().overridden += 1;
            }

            if exclusions.is_excluded(&child) {
                tracing::debug!(parent = %parent, package = %child, "excluded dependency dropped");
                self.graph.summary_mut().excluded += 1;
                continue;
            }

            self.graph
                .get_or_insert_with(&child, || VersionReconciler::parse(child.version()));
            self.graph.add_edge(parent, &child);
            self.enqueue(&child);
        }
        Ok(())
    }
}
