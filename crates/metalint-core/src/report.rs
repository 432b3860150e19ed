//! Batch validation and aggregation

use crate::config::LintConfig;
use crate::diagnostics::{Diagnostic, ValidationResult};
use crate::rules::similarity::find_conflicts;
use crate::{check_artifact, ArtifactKind};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Outcome for one resolved artifact
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    /// Short name used in multi-file output
    pub name: String,
    pub result: ValidationResult,
    pub description: Option<String>,
}

impl FileReport {
    pub fn passed(&self) -> bool {
        self.result.passed()
    }
}

/// Outcome for every artifact resolved from one path argument
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub kind: ArtifactKind,
    pub files: Vec<FileReport>,
    /// Cross-file warnings (skill description conflicts)
    pub conflicts: Vec<Diagnostic>,
}

impl BatchReport {
    /// Files with at least one error, in path order
    pub fn failed(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| !f.passed())
    }

    /// The batch passes when no file has an error; warnings never fail it
    pub fn passed(&self) -> bool {
        self.files.iter().all(FileReport::passed)
    }

    pub fn error_count(&self) -> usize {
        self.files.iter().map(|f| f.result.errors.len()).sum()
    }

    /// Per-file warnings plus conflict warnings
    pub fn warning_count(&self) -> usize {
        self.files
            .iter()
            .map(|f| f.result.warnings.len())
            .sum::<usize>()
            + self.conflicts.len()
    }
}

/// Validate already-resolved `paths` of one kind.
///
/// Files are checked in parallel; reports keep the order of `paths`. For
/// skills, descriptions are then compared pairwise (SK-010).
pub fn validate_paths(kind: ArtifactKind, paths: &[PathBuf], config: &LintConfig) -> BatchReport {
    let files: Vec<FileReport> = paths
        .par_iter()
        .map(|path| validate_one(kind, path, config))
        .collect();

    let conflicts = if kind == ArtifactKind::Skill && config.is_rule_enabled("SK-010") {
        let descriptions: Vec<(String, String)> = files
            .iter()
            .filter_map(|f| f.description.clone().map(|d| (f.name.clone(), d)))
            .collect();
        find_conflicts(&descriptions, config.similarity_threshold)
    } else {
        Vec::new()
    };

    tracing::debug!(
        kind = kind.noun(),
        files = files.len(),
        conflicts = conflicts.len(),
        "batch complete"
    );
    BatchReport {
        kind,
        files,
        conflicts,
    }
}

fn validate_one(kind: ArtifactKind, path: &Path, config: &LintConfig) -> FileReport {
    let (result, description) = check_artifact(kind, path, config);
    FileReport {
        path: path.to_path_buf(),
        name: kind.display_name(path),
        result,
        description,
    }
}
