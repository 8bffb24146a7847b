//! depgraph-sbom - transitive dependency graph resolution
//!
//! Resolves the full dependency graph of one or more root packages from a
//! package-metadata service (deps.dev by default), deduplicating shared
//! dependencies into a single node, and renders it as a tree, a flat list or
//! a CycloneDX SBOM. Vendor-patched versions such as
//! `5.3.39-spring-framework-5.3.47` are queried by their upstream release
//! and reported by the patched one.
//!
//! # Architecture
//!
//! - **Domain Layer** (`graph_resolution`): identities, version reconciliation,
//!   the graph arena, the builder and tree rendering
//! - **Application Layer** (`application`): use cases, DTOs and factories
//! - **Ports** (`ports`): interface definitions for infrastructure
//! - **Adapters** (`adapters`): HTTP client, filesystem, formatters, console
//! - **Shared** (`shared`): error types and file-system safety checks
//!
//! # Example
//!
//! ```no_run
//! use depgraph_sbom::prelude::*;
//!
//! # async fn run() -> Result<()> {
//! let client = DepsDevClient::new(ClientConfig::default())?;
//! let use_case = ResolveGraphUseCase::new(
//!     FileSystemReader::new(),
//!     CachingDependencyRepository::new(client),
//!     StderrProgressReporter::new(),
//! );
//!
//! let request = GraphRequest::new(
//!     None,
//!     vec!["maven:com.google.guava:guava:31.1-jre".to_string()],
//! );
//! let response = use_case.execute(request).await?;
//!
//! let output = TreeFormatter::new(false).format(&response.graph)?;
//! println!("{}", output);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod config;
pub mod graph_resolution;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{
        FileSystemReader, FileSystemWriter, StdoutPresenter,
    };
    pub use crate::adapters::outbound::formatters::{
        CycloneDxFormatter, ListFormatter, TextFormatter, TreeFormatter,
    };
    pub use crate::adapters::outbound::network::{
        CachingDependencyRepository, ClientConfig, DepsDevClient,
    };
    pub use crate::application::dto::{GraphRequest, GraphResponse, OutputFormat};
    pub use crate::application::use_cases::ResolveGraphUseCase;
    pub use crate::graph_resolution::domain::{
        DependencyGraph, DependencyNode, Ecosystem, PackageIdentity, VersionInfo,
    };
    pub use crate::graph_resolution::policies::{ExclusionPolicy, VersionOverrides};
    pub use crate::graph_resolution::services::{
        BranchStyle, GraphBuilder, GraphBuilderOptions, TreeRenderer, VersionReconciler,
    };
    pub use crate::ports::outbound::{
        DependencyDataRepository, GraphFormatter, ManifestReader, OutputPresenter,
        ProgressReporter,
    };
    pub use crate::shared::Result;
}
