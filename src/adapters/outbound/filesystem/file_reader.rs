use crate::graph_resolution::domain::PackageIdentity;
use crate::ports::outbound::ManifestReader;
use crate::shared::error::DepGraphError;
use crate::shared::security::read_checked_file;
use crate::shared::Result;
use std::collections::HashSet;
use std::path::Path;

/// FileSystemReader adapter for flat-list manifests
///
/// One `ecosystem:name:version` coordinate per line. Blank lines and lines
/// starting with `#` are ignored, as is anything after ` #` on a line.
pub struct FileSystemReader;

impl FileSystemReader {
    pub fn new() -> Self {
        Self
    }

    /// Parses manifest content; `path` is only used in error messages
    pub fn parse_manifest(content: &str, path: &Path) -> Result<Vec<PackageIdentity>> {
        let mut seen = HashSet::new();
        let mut roots = Vec::new();

        for (index, raw_line) in content.lines().enumerate() {
            let line = strip_comment(raw_line).trim();
            if line.is_empty() {
                continue;
            }

            let identity: PackageIdentity =
                line.parse().map_err(|e: anyhow::Error| -> anyhow::Error {
                    DepGraphError::ManifestParseError {
                        path: path.to_path_buf(),
                        line: index + 1,
                        details: e.to_string(),
                    }
                    .into()
                })?;

            if seen.insert(identity.clone()) {
                roots.push(identity);
            } else {
                tracing::debug!(package = %identity, line = index + 1, "duplicate root ignored");
            }
        }

        Ok(roots)
    }
}

fn strip_comment(line: &str) -> &str {
    if line.trim_start().starts_with('#') {
        return "";
    }
    match line.find(" #") {
        Some(pos) => &line[..pos],
        None => line,
    }
}

impl Default for FileSystemReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestReader for FileSystemReader {
    fn read_roots(&self, path: &Path) -> Result<Vec<PackageIdentity>> {
        if !path.exists() {
            return Err(DepGraphError::ManifestNotFound {
                path: path.to_path_buf(),
                suggestion: "Create a file with one ecosystem:name:version coordinate per line, \
                             or pass coordinates as arguments"
                    .to_string(),
            }
            .into());
        }

        let content = read_checked_file(path, "manifest").map_err(|e| -> anyhow::Error {
            DepGraphError::FileReadError {
                path: path.to_path_buf(),
                details: e.to_string(),
            }
            .into()
        })?;

        Self::parse_manifest(&content, path)
    }
}
