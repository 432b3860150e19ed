//! JSON output format support.
//!
//! A single document per run: one entry per artifact plus cross-file
//! conflict warnings and summary counts.

use metalint_core::diagnostics::{Diagnostic, DiagnosticLevel};
use metalint_core::{ArtifactKind, BatchReport, FileReport};
use serde::Serialize;
use std::path::Path;

/// Root structure for JSON output.
#[derive(Debug, Serialize)]
pub struct JsonOutput {
    /// Version of metalint that produced this output.
    pub version: String,
    /// Artifact kind validated by this run.
    pub kind: ArtifactKind,
    pub files: Vec<JsonFile>,
    /// Warnings spanning several files (skill description conflicts).
    pub conflicts: Vec<JsonDiagnostic>,
    pub summary: JsonSummary,
}

/// Result for one artifact.
#[derive(Debug, Serialize)]
pub struct JsonFile {
    /// Display name (skill directory, agent stem, ...).
    pub name: String,
    /// Path relative to the working directory, forward slashes.
    pub path: String,
    /// "passed", "warnings" or "failed".
    pub status: &'static str,
    pub errors: Vec<JsonDiagnostic>,
    pub warnings: Vec<JsonDiagnostic>,
}

#[derive(Debug, Serialize)]
pub struct JsonDiagnostic {
    /// Severity level: error or warning.
    pub level: &'static str,
    /// Rule identifier (e.g., SK-005).
    pub rule: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Summary counts.
#[derive(Debug, Serialize)]
pub struct JsonSummary {
    pub files: usize,
    pub failed: usize,
    pub errors: usize,
    /// Includes conflict warnings.
    pub warnings: usize,
    pub passed: bool,
}

fn level_to_string(level: DiagnosticLevel) -> &'static str {
    match level {
        DiagnosticLevel::Error => "error",
        DiagnosticLevel::Warning => "warning",
    }
}

fn path_to_string(path: &Path, base_path: &Path) -> String {
    path.strip_prefix(base_path)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

fn to_json_diagnostic(diag: &Diagnostic) -> JsonDiagnostic {
    JsonDiagnostic {
        level: level_to_string(diag.level),
        rule: diag.rule.clone(),
        message: diag.message.clone(),
        suggestion: diag.suggestion.clone(),
    }
}

fn file_status(file: &FileReport) -> &'static str {
    if !file.result.passed() {
        "failed"
    } else if file.result.warnings.is_empty() {
        "passed"
    } else {
        "warnings"
    }
}

/// Convert a batch report to JSON output format.
pub fn report_to_json(report: &BatchReport, base_path: &Path) -> JsonOutput {
    let files = report
        .files
        .iter()
        .map(|file| JsonFile {
            name: file.name.clone(),
            path: path_to_string(&file.path, base_path),
            status: file_status(file),
            errors: file.result.errors.iter().map(to_json_diagnostic).collect(),
            warnings: file.result.warnings.iter().map(to_json_diagnostic).collect(),
        })
        .collect();

    JsonOutput {
        version: env!("CARGO_PKG_VERSION").to_string(),
        kind: report.kind,
        files,
        conflicts: report.conflicts.iter().map(to_json_diagnostic).collect(),
        summary: JsonSummary {
            files: report.files.len(),
            failed: report.failed().count(),
            errors: report.error_count(),
            warnings: report.warning_count(),
            passed: report.passed(),
        },
    }
}
