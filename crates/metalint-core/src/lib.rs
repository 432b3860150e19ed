//! # metalint-core
//!
//! Core validation engine for plugin-extension artifacts.
//!
//! Validates:
//! - Skills (SKILL.md)
//! - Agent definitions (.md files with frontmatter)
//! - Slash commands (.md files with frontmatter)
//! - Hook settings (settings*.json)
//! - Plugin directories (.claude-plugin/plugin.json and components)

pub mod config;
pub mod diagnostics;
pub mod file_utils;
pub mod fs;
pub mod parsers;
pub(crate) mod regex_util;
pub mod report;
pub mod resolve;
pub mod rules;

use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

pub use config::LintConfig;
pub use diagnostics::{Diagnostic, DiagnosticLevel, LintError, LintResult, ValidationResult};
pub use report::{validate_paths, BatchReport, FileReport};
pub use resolve::resolve_paths;

use parsers::frontmatter::extract_frontmatter;
use rules::agent::AGENT_VALIDATOR;
use rules::command::COMMAND_VALIDATOR;
use rules::hooks::HooksValidator;
use rules::plugin::{manifest_path, PluginValidator};
use rules::skill::SKILL_VALIDATOR;
use rules::Validator;

/// The artifact families the linter knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// `SKILL.md` inside a skill directory
    Skill,
    /// Agent definition markdown
    Agent,
    /// Slash-command markdown
    Command,
    /// `settings*.json` with a `hooks` object
    Hook,
    /// Directory holding `.claude-plugin/plugin.json`
    Plugin,
}

impl ArtifactKind {
    /// Capitalised name used in status lines
    pub fn label(self) -> &'static str {
        match self {
            ArtifactKind::Skill => "Skill",
            ArtifactKind::Agent => "Agent",
            ArtifactKind::Command => "Command",
            ArtifactKind::Hook => "Hook",
            ArtifactKind::Plugin => "Plugin",
        }
    }

    /// Singular noun used in counts ("3 skill(s) passed")
    pub fn noun(self) -> &'static str {
        match self {
            ArtifactKind::Skill => "skill",
            ArtifactKind::Agent => "agent",
            ArtifactKind::Command => "command",
            ArtifactKind::Hook => "settings file",
            ArtifactKind::Plugin => "plugin",
        }
    }

    /// Short name identifying `path` in multi-file output
    pub fn display_name(self, path: &Path) -> String {
        match self {
            ArtifactKind::Skill => path
                .parent()
                .and_then(|dir| dir.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            ArtifactKind::Agent => file_stem(path),
            ArtifactKind::Command => {
                command_name(path).unwrap_or_else(|| file_stem(path))
            }
            ArtifactKind::Hook | ArtifactKind::Plugin => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
        }
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// `.claude/commands/git/commit.md` is the `git/commit` command
fn command_name(path: &Path) -> Option<String> {
    let parts: Vec<String> = path
        .with_extension("")
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    let start = parts
        .windows(2)
        .rposition(|pair| pair[0] == ".claude" && pair[1] == "commands")?;
    let rest = &parts[start + 2..];
    if rest.is_empty() {
        return None;
    }
    Some(rest.join("/"))
}

fn validator_for(kind: ArtifactKind) -> &'static dyn Validator {
    match kind {
        ArtifactKind::Skill => &SKILL_VALIDATOR,
        ArtifactKind::Agent => &AGENT_VALIDATOR,
        ArtifactKind::Command => &COMMAND_VALIDATOR,
        ArtifactKind::Hook => &HooksValidator,
        ArtifactKind::Plugin => &PluginValidator,
    }
}

/// Validate one artifact of `kind`. For plugins `path` is the plugin
/// directory; for every other kind it is the file itself.
///
/// Read failures become a single `IO-001` error on the artifact. Diagnostics
/// for rules disabled in `config` are removed.
pub fn validate_artifact(kind: ArtifactKind, path: &Path, config: &LintConfig) -> ValidationResult {
    check_artifact(kind, path, config).0
}

/// Like [`validate_artifact`], also returning the skill description (when the
/// frontmatter parsed and has one) for the cross-file similarity pass.
pub(crate) fn check_artifact(
    kind: ArtifactKind,
    path: &Path,
    config: &LintConfig,
) -> (ValidationResult, Option<String>) {
    tracing::debug!(kind = kind.noun(), path = %path.display(), "validating");

    let source = match kind {
        ArtifactKind::Plugin => {
            let manifest = manifest_path(path);
            if !config.fs().exists(&manifest) {
                let result =
                    ValidationResult::single_error("PL-001", "Missing .claude-plugin/plugin.json");
                return (filter_disabled(result, config), None);
            }
            manifest
        }
        _ => path.to_path_buf(),
    };

    let content = match config.fs().read_to_string(&source, config.max_file_size) {
        Ok(content) => content,
        Err(e) => {
            tracing::debug!(path = %source.display(), error = %e, "read failed");
            let result = ValidationResult::single_error("IO-001", e.to_string());
            return (filter_disabled(result, config), None);
        }
    };

    let result = validator_for(kind).validate(path, &content, config);
    let description = match kind {
        ArtifactKind::Skill => extract_frontmatter(&content)
            .ok()
            .and_then(|fm| fm.get("description").map(str::to_string)),
        _ => None,
    };

    (filter_disabled(result, config), description)
}

fn filter_disabled(mut result: ValidationResult, config: &LintConfig) -> ValidationResult {
    result.retain_rules(|rule| config.is_rule_enabled(rule));
    result
}
