//! Inclusion/exclusion filtering for discovered metadata objects.
//!
//! One rule shape serves every object category; only the candidate string
//! changes (a schema name, a qualified table name, a column's qualified
//! name, a routine parameter name). Filtering decisions are made while the
//! model is populated, not as a later subtractive pass.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};

/// An inclusion regex paired with an exclusion regex.
///
/// A candidate passes iff it is non-empty, fully matches the inclusion
/// pattern, and does not fully match the exclusion pattern; exclusion always
/// wins. The defaults include everything and exclude nothing, so an
/// unconfigured rule admits every non-empty candidate.
///
/// Patterns are anchored: `.*\.BOOKID` matches `PUBLIC.BOOKS.BOOKID` but not
/// `PUBLIC.BOOKS.BOOKID2`. Two rules are equal iff their pattern source
/// strings are equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "InclusionPatterns", into = "InclusionPatterns")]
pub struct InclusionRule {
    include_pattern: String,
    exclude_pattern: String,
    include: Regex,
    exclude: Regex,
}

/// Serialized form of an [`InclusionRule`]: the two pattern source strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct InclusionPatterns {
    include: String,
    exclude: String,
}

impl InclusionRule {
    /// Pattern that matches every candidate.
    pub const INCLUDE_ALL: &'static str = ".*";
    /// Pattern that matches no non-empty candidate.
    pub const EXCLUDE_NONE: &'static str = "";

    /// Builds a rule from an inclusion and an exclusion pattern.
    ///
    /// # Errors
    /// Fails fast with [`CatalogError::InvalidPattern`] if either pattern is
    /// not a valid regular expression; a malformed rule never silently
    /// degrades to match-all or match-none.
    pub fn new(include: &str, exclude: &str) -> Result<Self> {
        let compiled_include =
            compile_anchored(include).map_err(|e| CatalogError::invalid_pattern(include, e))?;
        let compiled_exclude =
            compile_anchored(exclude).map_err(|e| CatalogError::invalid_pattern(exclude, e))?;
        Ok(Self {
            include_pattern: include.to_string(),
            exclude_pattern: exclude.to_string(),
            include: compiled_include,
            exclude: compiled_exclude,
        })
    }

    /// A rule that includes a single pattern and excludes nothing.
    pub fn including(include: &str) -> Result<Self> {
        Self::new(include, Self::EXCLUDE_NONE)
    }

    /// A rule that includes everything except a single pattern.
    pub fn excluding(exclude: &str) -> Result<Self> {
        Self::new(Self::INCLUDE_ALL, exclude)
    }

    /// Returns true iff the candidate is non-empty, matches the inclusion
    /// pattern in full, and does not match the exclusion pattern.
    pub fn test(&self, candidate: &str) -> bool {
        !candidate.is_empty()
            && self.include.is_match(candidate)
            && !self.exclude.is_match(candidate)
    }

    /// The inclusion pattern source string.
    pub fn include_pattern(&self) -> &str {
        &self.include_pattern
    }

    /// The exclusion pattern source string.
    pub fn exclude_pattern(&self) -> &str {
        &self.exclude_pattern
    }
}

/// Compiles a pattern for whole-candidate matching.
fn compile_anchored(pattern: &str) -> std::result::Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{pattern})$"))
}

impl Default for InclusionRule {
    /// Includes every non-empty candidate.
    fn default() -> Self {
        Self::new(Self::INCLUDE_ALL, Self::EXCLUDE_NONE)
            .expect("default patterns are valid regular expressions")
    }
}

impl PartialEq for InclusionRule {
    fn eq(&self, other: &Self) -> bool {
        self.include_pattern == other.include_pattern
            && self.exclude_pattern == other.exclude_pattern
    }
}

impl Eq for InclusionRule {}

impl TryFrom<InclusionPatterns> for InclusionRule {
    type Error = CatalogError;

    fn try_from(patterns: InclusionPatterns) -> Result<Self> {
        Self::new(&patterns.include, &patterns.exclude)
    }
}

impl From<InclusionRule> for InclusionPatterns {
    fn from(rule: InclusionRule) -> Self {
        Self {
            include: rule.include_pattern,
            exclude: rule.exclude_pattern,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_rule_includes_every_non_empty_candidate() {
        let rule = InclusionRule::default();
        assert!(rule.test("PUBLIC.BOOKS"));
        assert!(rule.test("anything at all"));
        assert!(!rule.test(""));
    }

    #[test]
    fn exclusion_wins_over_inclusion() {
        let rule = InclusionRule::new(".*", "PUBLIC\\..*").unwrap();
        assert!(rule.test("SALES.ORDERS"));
        assert!(!rule.test("PUBLIC.BOOKS"));
    }

    #[test]
    fn matching_is_whole_candidate() {
        let rule = InclusionRule::including(".*\\.BOOKID").unwrap();
        assert!(rule.test("PUBLIC.BOOKS.BOOKID"));
        assert!(!rule.test("PUBLIC.BOOKS.BOOKID2"));
        assert!(!rule.test("BOOKID2"));
    }

    #[test]
    fn test_agrees_with_component_matches() {
        let rule = InclusionRule::new("PUBLIC\\..*", ".*\\.TEMP_.*").unwrap();
        let candidates = [
            "",
            "PUBLIC.BOOKS",
            "PUBLIC.TEMP_SCRATCH",
            "SALES.ORDERS",
            "PUBLIC.AUTHORS",
        ];
        for candidate in candidates {
            let expected = !candidate.is_empty()
                && regex::Regex::new("^(?:PUBLIC\\..*)$").unwrap().is_match(candidate)
                && !regex::Regex::new("^(?:.*\\.TEMP_.*)$").unwrap().is_match(candidate);
            assert_eq!(rule.test(candidate), expected, "{candidate:?}");
        }
    }

    #[test]
    fn malformed_pattern_fails_at_construction() {
        let error = InclusionRule::including("(unclosed").unwrap_err();
        assert!(matches!(error, CatalogError::InvalidPattern { .. }));

        let error = InclusionRule::excluding("[z-a]").unwrap_err();
        assert!(matches!(error, CatalogError::InvalidPattern { .. }));
    }

    #[test]
    fn equality_is_by_pattern_source() {
        let a = InclusionRule::new("A.*", "B.*").unwrap();
        let b = InclusionRule::new("A.*", "B.*").unwrap();
        let c = InclusionRule::new("A.*", "C.*").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(InclusionRule::default(), InclusionRule::default());
    }

    #[test]
    fn serde_round_trip_preserves_patterns() {
        let rule = InclusionRule::new("PUBLIC\\..*", ".*SECRET.*").unwrap();
        let json = serde_json::to_string(&rule).unwrap();
        let back: InclusionRule = serde_json::from_str(&json).unwrap();
        assert_eq!(rule, back);
        assert!(back.test("PUBLIC.BOOKS"));
        assert!(!back.test("PUBLIC.SECRETS"));
    }

    #[test]
    fn malformed_serialized_pattern_is_rejected() {
        let result: std::result::Result<InclusionRule, _> =
            serde_json::from_str(r#"{"include":"(unclosed","exclude":""}"#);
        assert!(result.is_err());
    }
}
