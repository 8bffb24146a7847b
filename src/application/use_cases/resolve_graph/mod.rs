use crate::application::dto::{GraphRequest, GraphResponse};
use crate::graph_resolution::domain::{BuildSummary, PackageIdentity};
use crate::graph_resolution::policies::ExclusionPolicy;
use crate::graph_resolution::services::{GraphBuilder, ProgressCallback};
use crate::ports::outbound::{DependencyDataRepository, ManifestReader, ProgressReporter};
use crate::shared::error::DepGraphError;
use crate::shared::Result;
use std::collections::HashSet;
use std::sync::Arc;

/// ResolveGraphUseCase - Core use case for dependency graph resolution
///
/// Orchestrates root collection, graph building and reporting using
/// generic dependency injection for all infrastructure dependencies.
///
/// # Type Parameters
/// * `MR` - ManifestReader implementation
/// * `REPO` - DependencyDataRepository implementation
/// * `PR` - ProgressReporter implementation
pub struct ResolveGraphUseCase<MR, REPO, PR> {
    manifest_reader: MR,
    repository: REPO,
    progress_reporter: Arc<PR>,
}

impl<MR, REPO, PR> ResolveGraphUseCase<MR, REPO, PR>
where
    MR: ManifestReader,
    REPO: DependencyDataRepository,
    PR: ProgressReporter + 'static,
{
    pub fn new(manifest_reader: MR, repository: REPO, progress_reporter: PR) -> Self {
        Self {
            manifest_reader,
            repository,
            progress_reporter: Arc::new(progress_reporter),
        }
    }

    /// Executes the resolve-graph use case
    ///
    /// The repository is shut down exactly once when resolution ends,
    /// whether it succeeded or not. A shutdown failure after a failed
    /// resolution is logged and the resolution error is returned.
    pub async fn execute(&self, request: GraphRequest) -> Result<GraphResponse> {
        let outcome = self.resolve(&request).await;
        let shutdown = self.repository.shutdown().await;

        match (outcome, shutdown) {
            (Ok(response), Ok(())) => Ok(response),
            (Ok(_), Err(e)) => Err(e.context("Failed to shut down the metadata client")),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(shutdown_error)) => {
                tracing::warn!(error = %format!("{:#}", shutdown_error), "client shutdown failed");
                Err(e)
            }
        }
    }

    async fn resolve(&self, request: &GraphRequest) -> Result<GraphResponse> {
        // Step 1: Collect roots from the manifest and the command line
        let roots = self.collect_roots(request)?;

        // Step 2: Validate exclusion patterns before any request is sent
        let exclusions = ExclusionPolicy::new(request.exclude_patterns.clone())?;

        // Step 3: Build the graph with progress reporting
        self.progress_reporter.report(&format!(
            "🔍 Resolving dependency graph for {} root package(s)...",
            roots.len()
        ));

        let reporter = Arc::clone(&self.progress_reporter);
        let progress: ProgressCallback = Arc::new(move |current, total| {
            reporter.report_progress(current, total, Some("Resolving dependencies..."));
        });

        let graph = GraphBuilder::new(&self.repository, request.options.clone())
            .with_progress(progress)
            .build(&roots, &exclusions, &request.overrides)
            .await?;

        // Step 4: Report what could not be resolved
        self.report_summary(graph.node_count(), graph.edge_count(), graph.summary());

        let unmatched_exclusions = exclusions.unmatched_patterns();
        for pattern in &unmatched_exclusions {
            self.progress_reporter.report_error(&format!(
                "⚠️  Warning: Exclude pattern '{}' did not match any package.",
                pattern
            ));
        }

        Ok(GraphResponse::new(graph, unmatched_exclusions))
    }

    /// Manifest roots first, then explicit coordinates; duplicates dropped
    fn collect_roots(&self, request: &GraphRequest) -> Result<Vec<PackageIdentity>> {
        let mut roots = Vec::new();

        if let Some(path) = &request.manifest_path {
            self.progress_reporter
                .report(&format!("📖 Loading manifest from: {}", path.display()));
            roots.extend(self.manifest_reader.read_roots(path)?);
        }

        for coordinate in &request.coordinates {
            roots.push(coordinate.parse::<PackageIdentity>()?);
        }

        let mut seen = HashSet::new();
        roots.retain(|root| seen.insert(root.clone()));

        if roots.is_empty() {
            return Err(DepGraphError::Validation {
                message: "No root packages given. Pass ecosystem:name:version coordinates or a manifest with --input".to_string(),
            }
            .into());
        }

        Ok(roots)
    }

    fn report_summary(&self, nodes: usize, edges: usize, summary: &BuildSummary) {
        self.progress_reporter.report_completion(&format!(
            "✅ Resolved {} of {} package(s) ({} edge(s))",
            summary.resolved, nodes, edges
        ));

        if summary.overridden > 0 {
            self.progress_reporter.report(&format!(
                "   - Version overrides applied: {}",
                summary.overridden
            ));
        }
        if summary.excluded > 0 {
            self.progress_reporter.report(&format!(
                "🚫 Excluded {} package reference(s) based on filters",
                summary.excluded
            ));
        }
        if summary.invalid_references > 0 {
            self.progress_reporter.report_error(&format!(
                "⚠️  Warning: Skipped {} invalid dependency reference(s)",
                summary.invalid_references
            ));
        }
        for identity in &summary.soft_failed {
            self.progress_reporter.report_error(&format!(
                "⚠️  Warning: No dependency data for {}",
                identity
            ));
        }
        for (identity, reason) in &summary.hard_failed {
            self.progress_reporter
                .report_error(&format!("❌ Failed to resolve {}: {}", identity, reason));
        }
        for (identity, reason) in &summary.service_errors {
            self.progress_reporter.report_error(&format!(
                "⚠️  Warning: Metadata service could not resolve {}: {}",
                identity, reason
            ));
        }
        for identity in &summary.excluded_roots {
            self.progress_reporter
                .report_error(&format!("⚠️  Warning: Root {} was excluded", identity));
        }
    }
}
