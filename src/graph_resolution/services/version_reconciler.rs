use crate::graph_resolution::domain::VersionInfo;
use regex::Regex;
use std::sync::LazyLock;

/// Numeric-dotted version (at least two components) with an optional
/// alphanumeric suffix. The suffix may be introduced by `.`, `_` or `+`,
/// never by `-`, which is reserved as the vendor separator.
const VERSION_SEGMENT: &str = r"\d+(?:\.\d+)+(?:[._+]?[A-Za-z][A-Za-z0-9]*)?";

/// `<original>-<artifact>-<patched>`, anchored on both ends.
///
/// The artifact token must contain at least one lowercase letter so it can
/// never be read as a version. Ties between several plausible split points
/// are settled by leftmost-first, greedy matching and nothing else.
static VENDOR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^({v})-([a-z0-9_-]*[a-z][a-z0-9_-]*)-({v})$",
        v = VERSION_SEGMENT
    ))
    .expect("vendor version pattern must compile")
});

/// VersionReconciler service for vendor-patched version strings
///
/// Maintenance vendors republish upstream artifacts under versions such as
/// `5.3.39-spring-framework-5.3.47`. The metadata service only knows the
/// upstream `5.3.39`, while output must report `5.3.47`.
pub struct VersionReconciler;

impl VersionReconciler {
    /// Parses a raw version string. Never fails: anything that does not
    /// match the vendor pattern (including the empty string) maps to itself.
    pub fn parse(raw: &str) -> VersionInfo {
        match VENDOR_PATTERN.captures(raw) {
            Some(caps) => VersionInfo::vendor_patched(raw, &caps[1], &caps[2], &caps[3]),
            None => VersionInfo::standard(raw),
        }
    }

    /// Shorthand for the version to send to the metadata service
    pub fn query_version(raw: &str) -> String {
        Self::parse(raw).query_version().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph_resolution::domain::{VersionKind, ARTIFACT_KEY};

    #[test]
    fn test_spring_framework_vendor_version() {
        let info = VersionReconciler::parse("5.3.39-spring-framework-5.3.47");
        assert!(info.is_vendor_patched());
        assert_eq!(info.report_version(), "5.3.47");
        assert_eq!(info.query_version(), "5.3.39");
        assert_eq!(
            info.metadata().get(ARTIFACT_KEY).map(String::as_str),
            Some("spring-framework")
        );
    }

    #[test]
    fn test_plain_versions_pass_through() {
        for raw in ["31.1-jre", "1.2.3", "2.13.4.2", "1.0.0-beta-2", "3.0.0-rc1", "v1.2.3"] {
            let info = VersionReconciler::parse(raw);
            assert!(!info.is_vendor_patched(), "{} should not be vendor patched", raw);
            assert_eq!(info.report_version(), raw);
            assert_eq!(info.query_version(), raw);
            assert_eq!(info.original_string(), raw);
        }
    }

    #[test]
    fn test_empty_input_is_identity() {
        let info = VersionReconciler::parse("");
        assert!(!info.is_vendor_patched());
        assert_eq!(info.report_version(), "");
        assert_eq!(info.query_version(), "");
    }

    #[test]
    fn test_artifact_token_with_digits_and_underscores() {
        let info = VersionReconciler::parse("2.13.4-jackson_databind2-2.13.4.9");
        assert_eq!(info.query_version(), "2.13.4");
        assert_eq!(info.report_version(), "2.13.4.9");
        assert_eq!(info.artifact(), Some("jackson_databind2"));
    }

    #[test]
    fn test_version_segments_with_suffix() {
        let info = VersionReconciler::parse("2.7.18.RELEASE-spring-boot-2.7.22.RELEASE");
        assert_eq!(info.query_version(), "2.7.18.RELEASE");
        assert_eq!(info.report_version(), "2.7.22.RELEASE");
        assert_eq!(info.artifact(), Some("spring-boot"));
    }

    #[test]
    fn test_numeric_only_token_is_not_an_artifact() {
        let info = VersionReconciler::parse("1.2.3-45-1.2.4");
        assert!(!info.is_vendor_patched());
    }

    #[test]
    fn test_uppercase_token_is_not_an_artifact() {
        let info = VersionReconciler::parse("1.2.3-ACME-1.2.4");
        assert!(!info.is_vendor_patched());
    }

    #[test]
    fn test_multiple_split_points_resolve_leftmost_first() {
        // The token is greedy: everything between the first version and the
        // last version belongs to it.
        let info = VersionReconciler::parse("1.0.0-tools-v2-core-1.0.5");
        match info.kind() {
            VersionKind::VendorPatched {
                original,
                artifact,
                patched,
            } => {
                assert_eq!(original, "1.0.0");
                assert_eq!(artifact, "tools-v2-core");
                assert_eq!(patched, "1.0.5");
            }
            VersionKind::Standard => panic!("expected a vendor-patched version"),
        }
    }

    #[test]
    fn test_dotted_groups_inside_token_prevent_match() {
        // A dotted group in the middle cannot belong to the token, and the
        // single anchored rule does not look for another split.
        let info = VersionReconciler::parse("1.0-a-2.0-b-3.0");
        assert!(!info.is_vendor_patched());
    }

    #[test]
    fn test_query_version_shorthand() {
        assert_eq!(
            VersionReconciler::query_version("5.3.39-spring-framework-5.3.47"),
            "5.3.39"
        );
        assert_eq!(VersionReconciler::query_version("1.2.3"), "1.2.3");
    }
}
