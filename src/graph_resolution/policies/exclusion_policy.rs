use crate::graph_resolution::domain::{Ecosystem, PackageIdentity};
use crate::shared::error::DepGraphError;
use crate::shared::Result;
use std::sync::atomic::{AtomicBool, Ordering};

/// Maximum number of exclude patterns to prevent DoS attacks
const MAX_EXCLUDE_PATTERNS: usize = 64;

/// Maximum length of a single exclude pattern to prevent DoS attacks
const MAX_PATTERN_LENGTH: usize = 255;

fn validation(message: String) -> anyhow::Error {
    DepGraphError::Validation { message }.into()
}

/// ExclusionPolicy - decides which packages never enter the graph
///
/// Each rule is `ecosystem:pattern` or a bare `pattern` that applies to every
/// ecosystem. Patterns match the package name and support `*` for zero or more
/// characters. A Maven pattern such as `com.google.*:*` has no ecosystem
/// prefix because `com.google.*` is not an ecosystem name.
#[derive(Debug, Default)]
pub struct ExclusionPolicy {
    rules: Vec<ExclusionRule>,
}

impl ExclusionPolicy {
    /// Builds a policy from raw rule strings
    ///
    /// # Errors
    /// - Too many rules (> MAX_EXCLUDE_PATTERNS)
    /// - Invalid pattern (empty, too long, only wildcards, bad characters)
    pub fn new(rules: Vec<String>) -> Result<Self> {
        if rules.len() > MAX_EXCLUDE_PATTERNS {
            return Err(validation(format!(
                "Too many exclusion patterns: {} (maximum: {})",
                rules.len(),
                MAX_EXCLUDE_PATTERNS
            )));
        }

        let rules = rules
            .into_iter()
            .map(ExclusionRule::parse)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { rules })
    }

    /// Policy that excludes nothing
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Checks `identity` against every rule, recording which rules matched
    pub fn is_excluded(&self, identity: &PackageIdentity) -> bool {
        // No short-circuit: every matching rule gets its matched flag set.
        self.rules
            .iter()
            .fold(false, |excluded, rule| rule.matches(identity) || excluded)
    }

    /// Rules that have not matched any package checked so far
    pub fn unmatched_patterns(&self) -> Vec<String> {
        self.rules
            .iter()
            .filter(|r| !r.matched.load(Ordering::Relaxed))
            .map(|r| r.original.clone())
            .collect()
    }
}

/// A single `(ecosystem?, name pattern)` rule
#[derive(Debug)]
struct ExclusionRule {
    original: String,
    ecosystem: Option<Ecosystem>,
    matcher: PatternMatcher,
    matched: AtomicBool,
}

impl ExclusionRule {
    fn parse(raw: String) -> Result<Self> {
        let trimmed = raw.trim();
        let (ecosystem, pattern) = match trimmed.split_once(':') {
            Some((prefix, rest)) => match prefix.parse::<Ecosystem>() {
                Ok(ecosystem) => (Some(ecosystem), rest),
                Err(_) => (None, trimmed),
            },
            None => (None, trimmed),
        };

        validate_pattern(pattern)?;
        let matcher = compile_pattern(pattern);

        Ok(Self {
            original: trimmed.to_string(),
            ecosystem,
            matcher,
            matched: AtomicBool::new(false),
        })
    }

    fn matches(&self, identity: &PackageIdentity) -> bool {
        if self.ecosystem.is_some_and(|e| e != identity.ecosystem()) {
            return false;
        }
        let is_match = self.matcher.matches(identity.name());
        if is_match {
            self.matched.store(true, Ordering::Relaxed);
        }
        is_match
    }
}

/// Pattern matcher types for efficient matching
#[derive(Debug)]
enum PatternMatcher {
    /// Exact match: "package-name"
    Exact(String),
    /// Leading wildcard: "*-suffix"
    EndsWith(String),
    /// Trailing wildcard: "prefix-*"
    StartsWith(String),
    /// Both ends: "*middle*"
    Contains(String),
    /// General case; the flags record whether the pattern is anchored
    Multiple {
        parts: Vec<String>,
        anchored_start: bool,
        anchored_end: bool,
    },
}

impl PatternMatcher {
    fn matches(&self, name: &str) -> bool {
        match self {
            PatternMatcher::Exact(s) => name == s,
            PatternMatcher::EndsWith(suffix) => name.ends_with(suffix.as_str()),
            PatternMatcher::StartsWith(prefix) => name.starts_with(prefix.as_str()),
            PatternMatcher::Contains(middle) => name.contains(middle.as_str()),
            PatternMatcher::Multiple {
                parts,
                anchored_start,
                anchored_end,
            } => match_parts(name, parts, *anchored_start, *anchored_end),
        }
    }
}

fn match_parts(name: &str, parts: &[String], anchored_start: bool, anchored_end: bool) -> bool {
    let mut rest = name;
    let last = parts.len().saturating_sub(1);

    for (i, part) in parts.iter().enumerate() {
        if i == 0 && anchored_start {
            match rest.strip_prefix(part.as_str()) {
                Some(r) => rest = r,
                None => return false,
            }
            continue;
        }
        if i == last && anchored_end {
            return rest.len() >= part.len() && rest.ends_with(part.as_str());
        }
        match rest.find(part.as_str()) {
            Some(pos) => rest = &rest[pos + part.len()..],
            None => return false,
        }
    }

    !anchored_end || rest.is_empty()
}

fn validate_pattern(pattern: &str) -> Result<()> {
    if pattern.is_empty() {
        return Err(validation("Exclusion pattern cannot be empty".to_string()));
    }

    if pattern.len() > MAX_PATTERN_LENGTH {
        return Err(validation(format!(
            "Exclusion pattern is too long: '{}' ({} chars). Maximum: {} chars",
            pattern,
            pattern.len(),
            MAX_PATTERN_LENGTH
        )));
    }

    if let Some(ch) = pattern.chars().find(|c| !is_valid_pattern_char(*c)) {
        return Err(validation(format!(
            "Exclusion pattern contains invalid character '{}' in pattern '{}'. \
             Only alphanumerics and - _ . : @ / [ ] * are allowed.",
            ch, pattern
        )));
    }

    if pattern.chars().all(|c| c == '*') {
        return Err(validation(format!(
            "Exclusion pattern cannot contain only wildcards: '{}'",
            pattern
        )));
    }

    Ok(())
}

fn is_valid_pattern_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | ':' | '@' | '/' | '[' | ']' | '*')
}

fn compile_pattern(pattern: &str) -> PatternMatcher {
    let wildcard_count = pattern.matches('*').count();
    let starts = pattern.starts_with('*');
    let ends = pattern.ends_with('*');

    match (wildcard_count, starts, ends) {
        (0, _, _) => PatternMatcher::Exact(pattern.to_string()),
        (1, true, false) => PatternMatcher::EndsWith(pattern[1..].to_string()),
        (1, false, true) => PatternMatcher::StartsWith(pattern[..pattern.len() - 1].to_string()),
        (2, true, true) if !pattern[1..pattern.len() - 1].contains('*') => {
            PatternMatcher::Contains(pattern[1..pattern.len() - 1].to_string())
        }
        _ => PatternMatcher::Multiple {
            parts: pattern
                .split('*')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            anchored_start: !starts,
            anchored_end: !ends,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(coordinate: &str) -> PackageIdentity {
        coordinate.parse().unwrap()
    }

    fn policy(rules: &[&str]) -> ExclusionPolicy {
        ExclusionPolicy::new(rules.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    #[test]
    fn test_exact_match() {
        let policy = policy(&["requests"]);
        assert!(policy.is_excluded(&id("pypi:requests:2.31.0")));
        assert!(!policy.is_excluded(&id("pypi:requests-extra:1.0")));
    }

    #[test]
    fn test_leading_wildcard() {
        let policy = policy(&["*-dev"]);
        assert!(policy.is_excluded(&id("npm:pytest-dev:1.0.0")));
        assert!(!policy.is_excluded(&id("npm:dev-tools:1.0.0")));
    }

    #[test]
    fn test_trailing_wildcard_on_maven_group() {
        let policy = policy(&["com.google.*"]);
        assert!(policy.is_excluded(&id("maven:com.google.guava:guava:31.1-jre")));
        assert!(!policy.is_excluded(&id("maven:org.checkerframework:checker-qual:3.12.0")));
    }

    #[test]
    fn test_contains_wildcard() {
        let policy = policy(&["*test*"]);
        assert!(policy.is_excluded(&id("cargo:my-test-lib:0.1.0")));
        assert!(!policy.is_excluded(&id("cargo:serde:1.0.0")));
    }

    #[test]
    fn test_inner_wildcard_is_anchored() {
        let policy = policy(&["org.*:junit"]);
        assert!(policy.is_excluded(&id("maven:org.junit:junit:4.13")));
        assert!(!policy.is_excluded(&id("maven:org.junit:junit-bom:4.13")));
        assert!(!policy.is_excluded(&id("maven:xorg.a:junit:1.0")));
    }

    #[test]
    fn test_ecosystem_scoped_rule() {
        let policy = policy(&["npm:lodash"]);
        assert!(policy.is_excluded(&id("npm:lodash:4.17.21")));
        assert!(!policy.is_excluded(&id("pypi:lodash:1.0")));
    }

    #[test]
    fn test_unmatched_patterns() {
        let policy = policy(&["requests", "never-seen"]);
        policy.is_excluded(&id("pypi:requests:2.31.0"));
        assert_eq!(policy.unmatched_patterns(), vec!["never-seen".to_string()]);
    }

    #[test]
    fn test_all_matching_rules_are_recorded() {
        let policy = policy(&["req*", "*sts"]);
        policy.is_excluded(&id("pypi:requests:2.31.0"));
        assert!(policy.unmatched_patterns().is_empty());
    }

    #[test]
    fn test_rejects_invalid_patterns() {
        assert!(ExclusionPolicy::new(vec!["".to_string()]).is_err());
        assert!(ExclusionPolicy::new(vec!["**".to_string()]).is_err());
        assert!(ExclusionPolicy::new(vec!["bad name".to_string()]).is_err());
        assert!(ExclusionPolicy::new(vec!["a".repeat(MAX_PATTERN_LENGTH + 1)]).is_err());
    }

    #[test]
    fn test_rejects_too_many_patterns() {
        let rules = (0..=MAX_EXCLUDE_PATTERNS).map(|i| format!("pkg{}", i)).collect();
        let err = ExclusionPolicy::new(rules).unwrap_err();
        assert!(err.to_string().contains("Too many exclusion patterns"));
    }

    #[test]
    fn test_none_excludes_nothing() {
        let policy = ExclusionPolicy::none();
        assert!(policy.is_empty());
        assert!(!policy.is_excluded(&id("pypi:requests:2.31.0")));
    }
}
