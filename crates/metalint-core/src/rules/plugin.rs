//! Plugin validation (PL-001 to PL-011)
//!
//! A plugin is a directory with a `.claude-plugin/plugin.json` manifest and
//! component directories (`commands/`, `agents/`, `skills/`, `hooks/`) at its
//! root. Optional `.mcp.json`, `.lsp.json` and `hooks/hooks.json` sub-configs
//! get targeted shape checks.

use super::scripts::check_scripts_executable;
use super::Validator;
use crate::config::LintConfig;
use crate::diagnostics::{Diagnostic, ValidationResult};
use crate::fs::FileSystem;
use crate::parsers::json::{parse_json_config, str_field};
use crate::regex_util::static_regex;
use regex::Regex;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

static_regex!(fn kebab_case_regex, r"^[a-z][a-z0-9]*(-[a-z0-9]+)*$");
static_regex!(fn semver_regex, r"^\d+\.\d+\.\d+(-[a-zA-Z0-9.]+)?$");

/// Reserved directory holding the manifest
pub const PLUGIN_DIR: &str = ".claude-plugin";
pub const MANIFEST_FILE: &str = "plugin.json";

/// Manifest fields that point at component locations
const COMPONENT_PATH_FIELDS: &[&str] = &[
    "commands",
    "agents",
    "skills",
    "hooks",
    "mcpServers",
    "lspServers",
    "outputStyles",
];

/// Directories discovered by convention at the plugin root
pub const COMPONENT_DIRS: &[&str] = &["commands", "agents", "skills", "hooks"];

const PLUGIN_ROOT_VAR: &str = "${CLAUDE_PLUGIN_ROOT}";

/// Characters of a hook command quoted in PL-011 messages
const COMMAND_PREVIEW_CHARS: usize = 50;

/// Location of the manifest for a plugin directory
pub fn manifest_path(plugin_dir: &Path) -> PathBuf {
    plugin_dir.join(PLUGIN_DIR).join(MANIFEST_FILE)
}

/// Validates a plugin directory. `path` is the plugin root and `content` the
/// manifest text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PluginValidator;

impl Validator for PluginValidator {
    fn validate(&self, path: &Path, content: &str, config: &LintConfig) -> ValidationResult {
        let manifest: Value = match parse_json_config(content) {
            Ok(value) => value,
            Err(e) => {
                return ValidationResult::single_error(
                    "PL-001",
                    format!("Invalid JSON in plugin.json: {}", e),
                )
            }
        };
        let Some(manifest) = manifest.as_object() else {
            return ValidationResult::single_error("PL-001", "plugin.json must contain a JSON object");
        };

        let fs = config.fs();
        let mut result = ValidationResult::new();

        check_identity(manifest, &mut result);
        check_component_paths(manifest, &mut result);
        let found_components = check_component_dirs(fs, path, &mut result);
        check_misplaced_dirs(fs, path, &mut result);
        check_mcp_config(fs, path, config.max_file_size, &mut result);
        check_lsp_config(fs, path, config.max_file_size, &mut result);
        check_hooks_config(fs, path, config.max_file_size, &mut result);
        check_scripts_executable(fs, path, &["sh", "py", "js"], &mut result);

        if !found_components && !manifest.contains_key("commands") && !manifest.contains_key("agents")
        {
            result.warning(
                "PL-007",
                "No component directories found (commands/, agents/, skills/, hooks/)",
            );
        }

        result
    }
}

/// PL-002 to PL-005
fn check_identity(manifest: &Map<String, Value>, result: &mut ValidationResult) {
    match manifest.get("name") {
        None => result.error("PL-002", "Missing required field: 'name'"),
        Some(name) => {
            if !name.as_str().is_some_and(|n| kebab_case_regex().is_match(n)) {
                result.warning(
                    "PL-003",
                    format!(
                        "Name '{}' should be kebab-case (lowercase, hyphens)",
                        display_value(name)
                    ),
                );
            }
        }
    }

    match manifest.get("version") {
        None => result.warning("PL-004", "Consider adding 'version' field (semver)"),
        Some(version) => {
            if !version.as_str().is_some_and(|v| semver_regex().is_match(v)) {
                result.warning(
                    "PL-004",
                    format!(
                        "Version '{}' should follow semver (MAJOR.MINOR.PATCH)",
                        display_value(version)
                    ),
                );
            }
        }
    }

    if !manifest.contains_key("description") {
        result.warning("PL-005", "Consider adding 'description' field");
    }
}

/// PL-006: component locations must be `./`-relative
fn check_component_paths(manifest: &Map<String, Value>, result: &mut ValidationResult) {
    for field in COMPONENT_PATH_FIELDS {
        match manifest.get(*field) {
            Some(Value::String(location)) if !location.starts_with("./") => {
                result.error(
                    "PL-006",
                    format!("Path '{}' must be relative, starting with './'", field),
                );
            }
            Some(Value::Array(locations)) => {
                for location in locations.iter().filter_map(Value::as_str) {
                    if !location.starts_with("./") {
                        result.error(
                            "PL-006",
                            format!("Path in '{}' must be relative: {}", field, location),
                        );
                    }
                }
            }
            _ => {}
        }
    }
}

/// PL-007: returns whether any conventional component directory exists
fn check_component_dirs(fs: &dyn FileSystem, root: &Path, result: &mut ValidationResult) -> bool {
    let mut found = false;
    for dir_name in COMPONENT_DIRS {
        let dir = root.join(dir_name);
        if !fs.is_dir(&dir) {
            continue;
        }
        found = true;
        let has_visible_entry = fs
            .read_dir(&dir)
            .map(|entries| entries.iter().any(|e| !e.file_name().starts_with('.')))
            .unwrap_or(false);
        if !has_visible_entry {
            result.warning(
                "PL-007",
                format!("Directory '{}/' exists but is empty", dir_name),
            );
        }
    }
    found
}

/// PL-008
fn check_misplaced_dirs(fs: &dyn FileSystem, root: &Path, result: &mut ValidationResult) {
    let reserved = root.join(PLUGIN_DIR);
    for dir_name in COMPONENT_DIRS {
        if fs.exists(&reserved.join(dir_name)) {
            result.push(
                Diagnostic::error(
                    "PL-008",
                    format!(
                        "'{}/' found inside .claude-plugin/ - move to plugin root",
                        dir_name
                    ),
                )
                .with_suggestion(format!(
                    "Only plugin.json belongs in .claude-plugin/; move '{}/' next to it",
                    dir_name
                )),
            );
        }
    }
}

/// Read and parse an optional JSON sub-config. `None` when the file is
/// absent; a read or parse failure is reported under `rule`.
fn load_sub_config(
    fs: &dyn FileSystem,
    path: &Path,
    display: &str,
    max_size: u64,
    rule: &str,
    result: &mut ValidationResult,
) -> Option<Value> {
    if !fs.exists(path) {
        return None;
    }
    let text = match fs.read_to_string(path, max_size) {
        Ok(text) => text,
        Err(e) => {
            result.error(rule, e.to_string());
            return None;
        }
    };
    match parse_json_config(&text) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "invalid plugin sub-config");
            result.error(rule, format!("Invalid JSON in {}", display));
            None
        }
    }
}

/// PL-009
fn check_mcp_config(fs: &dyn FileSystem, root: &Path, max_size: u64, result: &mut ValidationResult) {
    let Some(config) = load_sub_config(
        fs,
        &root.join(".mcp.json"),
        ".mcp.json",
        max_size,
        "PL-009",
        result,
    ) else {
        return;
    };
    let Some(servers) = config.get("mcpServers").and_then(Value::as_object) else {
        return;
    };

    for (server, settings) in servers {
        let Some(command) = settings.as_object().and_then(|s| str_field(s, "command")) else {
            continue;
        };
        if command.contains('/') && !command.contains(PLUGIN_ROOT_VAR) && !command.starts_with("npx")
        {
            result.warning(
                "PL-009",
                format!(
                    "MCP server '{}': use ${{CLAUDE_PLUGIN_ROOT}} for plugin paths",
                    server
                ),
            );
        }
    }
}

/// PL-010
fn check_lsp_config(fs: &dyn FileSystem, root: &Path, max_size: u64, result: &mut ValidationResult) {
    let Some(config) = load_sub_config(
        fs,
        &root.join(".lsp.json"),
        ".lsp.json",
        max_size,
        "PL-010",
        result,
    ) else {
        return;
    };
    let Some(servers) = config.as_object() else {
        return;
    };

    for (language, settings) in servers {
        for field in ["command", "extensionToLanguage"] {
            let present = settings.as_object().is_some_and(|s| s.contains_key(field));
            if !present {
                result.error(
                    "PL-010",
                    format!("LSP '{}': missing required '{}' field", language, field),
                );
            }
        }
    }
}

/// PL-011
fn check_hooks_config(
    fs: &dyn FileSystem,
    root: &Path,
    max_size: u64,
    result: &mut ValidationResult,
) {
    let Some(config) = load_sub_config(
        fs,
        &root.join("hooks").join("hooks.json"),
        "hooks/hooks.json",
        max_size,
        "PL-011",
        result,
    ) else {
        return;
    };
    let Some(events) = config.get("hooks").and_then(Value::as_object) else {
        return;
    };

    let commands = events
        .values()
        .filter_map(Value::as_array)
        .flatten()
        .filter_map(|matcher| matcher.get("hooks").and_then(Value::as_array))
        .flatten()
        .filter_map(Value::as_object)
        .filter(|hook| str_field(hook, "type") == Some("command"))
        .filter_map(|hook| str_field(hook, "command"));

    for command in commands {
        if command.contains('/') && !command.contains(PLUGIN_ROOT_VAR) {
            let preview: String = command.chars().take(COMMAND_PREVIEW_CHARS).collect();
            result.warning(
                "PL-011",
                format!(
                    "Hook command should use ${{CLAUDE_PLUGIN_ROOT}}: {}...",
                    preview
                ),
            );
        }
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
