pub mod dependency_graph;
pub mod ecosystem;
pub mod package;
pub mod sbom_metadata;
pub mod version_info;

pub use dependency_graph::{BuildSummary, DependencyGraph, DependencyNode};
pub use ecosystem::Ecosystem;
pub use package::{PackageIdentity, PackageName, Version};
pub use sbom_metadata::SbomMetadata;
pub use version_info::{
    VersionInfo, VersionKind, ARTIFACT_KEY, PATCHED_VERSION_KEY, UPSTREAM_VERSION_KEY,
    VENDOR_PATCHED_KEY,
};
