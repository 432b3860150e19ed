//! Linter configuration

use crate::file_utils::DEFAULT_MAX_FILE_SIZE;
use crate::fs::{FileSystem, RealFileSystem};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// File name looked up in the working directory when no config is given
pub const DEFAULT_CONFIG_FILE: &str = ".metalint.toml";

/// Jaccard index at or above which two skill descriptions are reported
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.5;

/// Configuration for the linter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LintConfig {
    /// Rule IDs whose diagnostics are dropped (e.g., ["SK-005", "MD-003"])
    #[serde(default)]
    pub disabled_rules: Vec<String>,

    /// Glob patterns for paths to skip after resolution
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// Threshold for the skill description-conflict pass
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,

    /// Files above this many bytes are reported instead of read
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    #[serde(skip, default = "default_fs")]
    pub(crate) fs: Arc<dyn FileSystem>,
}

fn default_exclude() -> Vec<String> {
    vec![
        "node_modules/**".to_string(),
        ".git/**".to_string(),
        "target/**".to_string(),
    ]
}

fn default_similarity_threshold() -> f64 {
    DEFAULT_SIMILARITY_THRESHOLD
}

fn default_max_file_size() -> u64 {
    DEFAULT_MAX_FILE_SIZE
}

fn default_fs() -> Arc<dyn FileSystem> {
    Arc::new(RealFileSystem)
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            disabled_rules: Vec::new(),
            exclude: default_exclude(),
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            fs: default_fs(),
        }
    }
}

impl LintConfig {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Load an explicit config, else `.metalint.toml` under `dir` if present,
    /// else defaults. Only an explicit path that fails to load is an error.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            tracing::debug!(config = %candidate.display(), "using discovered config");
            return Self::load(&candidate);
        }
        Ok(Self::default())
    }

    /// Replace the file system used by rules that inspect neighbouring files
    pub fn with_fs(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    pub fn fs(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }

    /// A rule is enabled unless it is listed in `disabled_rules`
    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        !self.disabled_rules.iter().any(|r| r == rule_id)
    }
}
