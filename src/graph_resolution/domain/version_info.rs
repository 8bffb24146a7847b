use std::collections::BTreeMap;

/// Metadata key set on vendor-patched versions
pub const VENDOR_PATCHED_KEY: &str = "vendor_patched";
/// Metadata key holding the upstream (query) version
pub const UPSTREAM_VERSION_KEY: &str = "upstream_version";
/// Metadata key holding the vendor's patched (report) version
pub const PATCHED_VERSION_KEY: &str = "patched_version";
/// Metadata key holding the vendor artifact token
pub const ARTIFACT_KEY: &str = "artifact";

/// The shape a raw version string was recognised as
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionKind {
    /// Plain upstream version, reported and queried as-is
    Standard,
    /// `<original>-<artifact>-<patched>` as published by a maintenance vendor
    VendorPatched {
        original: String,
        artifact: String,
        patched: String,
    },
}

/// Structured view of a raw version string
///
/// Separates the version surfaced in output (report version) from the one
/// sent to the metadata service (query version). For `Standard` versions
/// both equal the original string. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    original_string: String,
    kind: VersionKind,
    metadata: BTreeMap<String, String>,
}

impl VersionInfo {
    pub fn standard(raw: impl Into<String>) -> Self {
        Self {
            original_string: raw.into(),
            kind: VersionKind::Standard,
            metadata: BTreeMap::new(),
        }
    }

    pub fn vendor_patched(
        raw: impl Into<String>,
        original: impl Into<String>,
        artifact: impl Into<String>,
        patched: impl Into<String>,
    ) -> Self {
        let original = original.into();
        let artifact = artifact.into();
        let patched = patched.into();

        let metadata = BTreeMap::from([
            (VENDOR_PATCHED_KEY.to_string(), "true".to_string()),
            (UPSTREAM_VERSION_KEY.to_string(), original.clone()),
            (PATCHED_VERSION_KEY.to_string(), patched.clone()),
            (ARTIFACT_KEY.to_string(), artifact.clone()),
        ]);

        Self {
            original_string: raw.into(),
            kind: VersionKind::VendorPatched {
                original,
                artifact,
                patched,
            },
            metadata,
        }
    }

    /// Version surfaced in output artifacts
    pub fn report_version(&self) -> &str {
        match &self.kind {
            VersionKind::Standard => &self.original_string,
            VersionKind::VendorPatched { patched, .. } => patched,
        }
    }

    /// Version used when asking the metadata service for dependency data
    pub fn query_version(&self) -> &str {
        match &self.kind {
            VersionKind::Standard => &self.original_string,
            VersionKind::VendorPatched { original, .. } => original,
        }
    }

    pub fn original_string(&self) -> &str {
        &self.original_string
    }

    pub fn is_vendor_patched(&self) -> bool {
        matches!(self.kind, VersionKind::VendorPatched { .. })
    }

    pub fn artifact(&self) -> Option<&str> {
        match &self.kind {
            VersionKind::Standard => None,
            VersionKind::VendorPatched { artifact, .. } => Some(artifact),
        }
    }

    pub fn kind(&self) -> &VersionKind {
        &self.kind
    }

    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }
}
