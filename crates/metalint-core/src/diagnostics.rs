//! Diagnostic types and error reporting

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

pub type LintResult<T> = Result<T, LintError>;

/// A single finding produced by a rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub rule: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Errors block an artifact; warnings are advisory only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    Error,
    Warning,
}

impl Diagnostic {
    pub fn error(rule: &str, message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Error,
            rule: rule.to_string(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn warning(rule: &str, message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Warning,
            rule: rule.to_string(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Errors and warnings collected for one artifact, in rule evaluation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Result holding a single error, used when a file cannot be checked at all
    pub fn single_error(rule: &str, message: impl Into<String>) -> Self {
        let mut result = Self::new();
        result.error(rule, message);
        result
    }

    pub fn error(&mut self, rule: &str, message: impl Into<String>) {
        self.errors.push(Diagnostic::error(rule, message));
    }

    pub fn warning(&mut self, rule: &str, message: impl Into<String>) {
        self.warnings.push(Diagnostic::warning(rule, message));
    }

    /// Route a prebuilt diagnostic to the list matching its level
    pub fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.level {
            DiagnosticLevel::Error => self.errors.push(diagnostic),
            DiagnosticLevel::Warning => self.warnings.push(diagnostic),
        }
    }

    /// Drop every diagnostic whose rule is rejected by `keep`
    pub fn retain_rules(&mut self, keep: impl Fn(&str) -> bool) {
        self.errors.retain(|d| keep(&d.rule));
        self.warnings.retain(|d| keep(&d.rule));
    }

    /// A file passes when it has no errors, regardless of warnings
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// Linter errors
///
/// The `Display` text of each variant is the message shown to the user.
#[derive(Error, Debug)]
pub enum LintError {
    #[error("Permission denied: {}", path.display())]
    PermissionDenied { path: PathBuf },

    #[error("Cannot read file: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot read file: {} is not a regular file", path.display())]
    FileNotRegular { path: PathBuf },

    #[error("Cannot read file: {} is {size} bytes (limit {limit})", path.display())]
    FileTooBig { path: PathBuf, size: u64, limit: u64 },

    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("Expected {expected}, got: {found}")]
    UnexpectedFile { expected: String, found: String },

    /// `hint` is appended verbatim after the directory
    #[error("No {what} found in: {}{hint}", dir.display())]
    NothingFound {
        what: String,
        dir: PathBuf,
        hint: String,
    },

    #[error("No {what} match pattern: {pattern}")]
    NoPatternMatches { what: String, pattern: String },

    /// Every resolved path was dropped by `exclude`
    #[error("No {what} found to validate")]
    NothingToValidate { what: String },

    #[error("Invalid glob pattern '{pattern}'")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_routes_by_level() {
        let mut result = ValidationResult::new();
        result.push(Diagnostic::error("FM-002", "Missing required field: 'name'"));
        result.push(Diagnostic::warning("FM-003", "Consider adding 'tools'"));

        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.warnings.len(), 1);
        assert!(!result.passed());
    }

    #[test]
    fn test_warnings_alone_still_pass() {
        let mut result = ValidationResult::new();
        result.warning("MD-003", "Missing '## Delegation' section");

        assert!(result.passed());
        assert!(!result.is_clean());
    }

    #[test]
    fn test_retain_rules_filters_both_levels() {
        let mut result = ValidationResult::new();
        result.error("SZ-001", "too long");
        result.warning("SZ-002", "long");
        result.warning("MD-003", "section");

        result.retain_rules(|rule| !rule.starts_with("SZ-"));

        assert!(result.errors.is_empty());
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].rule, "MD-003");
    }

    #[test]
    fn test_error_messages_are_user_facing() {
        let err = LintError::PathNotFound("missing/dir".to_string());
        assert_eq!(err.to_string(), "Path not found: missing/dir");

        let err = LintError::UnexpectedFile {
            expected: "SKILL.md file".to_string(),
            found: "README.md".to_string(),
        };
        assert_eq!(err.to_string(), "Expected SKILL.md file, got: README.md");

        let err = LintError::PermissionDenied {
            path: PathBuf::from("a/SKILL.md"),
        };
        assert_eq!(err.to_string(), "Permission denied: a/SKILL.md");
    }
}
