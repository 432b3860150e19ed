//! Hook settings validation (HK-001 to HK-011)
//!
//! Input is a settings JSON document whose `hooks` object maps lifecycle
//! event names to matcher lists:
//!
//! ```json
//! {"hooks": {"PreToolUse": [{"matcher": "Bash", "hooks": [{"type": "command", "command": "lint.sh"}]}]}}
//! ```

use super::Validator;
use crate::config::LintConfig;
use crate::diagnostics::ValidationResult;
use crate::parsers::json::{is_blank, parse_json_config};
use serde_json::{Map, Value};
use std::path::Path;

/// Lifecycle events a hook may attach to
pub const VALID_EVENTS: &[&str] = &[
    "PreToolUse",
    "PostToolUse",
    "PermissionRequest",
    "UserPromptSubmit",
    "Notification",
    "Stop",
    "SubagentStop",
    "SessionStart",
    "SessionEnd",
    "PreCompact",
];

/// Events whose matcher entries should name what they match
pub const EVENTS_WITH_MATCHER: &[&str] = &[
    "PreToolUse",
    "PostToolUse",
    "PermissionRequest",
    "Notification",
    "PreCompact",
    "SessionStart",
];

/// Events where prompt hooks behave well
const PROMPT_EVENTS: &[&str] = &[
    "Stop",
    "SubagentStop",
    "UserPromptSubmit",
    "PreToolUse",
    "PermissionRequest",
];

const VALID_HOOK_TYPES: &[&str] = &["command", "prompt"];

/// Timeouts above this many seconds earn a warning
const MAX_REASONABLE_TIMEOUT: f64 = 300.0;

const PROJECT_DIR_VAR: &str = "$CLAUDE_PROJECT_DIR";
const QUOTED_PROJECT_DIR_VAR: &str = "\"$CLAUDE_PROJECT_DIR\"";

#[derive(Debug, Clone, Copy, Default)]
pub struct HooksValidator;

impl Validator for HooksValidator {
    fn validate(&self, _path: &Path, content: &str, _config: &LintConfig) -> ValidationResult {
        let settings: Value = match parse_json_config(content) {
            Ok(value) => value,
            Err(e) => return ValidationResult::single_error("HK-001", format!("Invalid JSON: {}", e)),
        };

        let Some(hooks) = settings.get("hooks") else {
            return ValidationResult::single_error("HK-001", "No 'hooks' key found in settings");
        };
        let Some(hooks) = hooks.as_object() else {
            return ValidationResult::single_error("HK-001", "'hooks' must be an object");
        };

        let mut result = ValidationResult::new();
        for (event, matchers) in hooks {
            check_event(event, matchers, &mut result);
        }
        result
    }
}

fn check_event(event: &str, matchers: &Value, result: &mut ValidationResult) {
    // HK-002
    if !VALID_EVENTS.contains(&event) {
        result.error(
            "HK-002",
            format!(
                "Invalid event type: '{}'. Valid: {}",
                event,
                sorted_valid_events().join(", ")
            ),
        );
        return;
    }

    let Some(matchers) = matchers.as_array() else {
        result.error(
            "HK-003",
            format!("Event '{}' must have an array of matchers", event),
        );
        return;
    };

    for (i, matcher) in matchers.iter().enumerate() {
        let at = format!("Event '{}' matcher {}", event, i);
        let Some(matcher) = matcher.as_object() else {
            result.error("HK-003", format!("{}: must be an object", at));
            continue;
        };

        // HK-004
        if EVENTS_WITH_MATCHER.contains(&event) && !matcher.contains_key("matcher") {
            result.warning("HK-004", format!("{}: consider adding 'matcher' field", at));
        }

        let Some(hook_list) = matcher.get("hooks") else {
            result.error("HK-003", format!("{}: missing 'hooks' array", at));
            continue;
        };
        let Some(hook_list) = hook_list.as_array() else {
            result.error("HK-003", format!("{}: 'hooks' must be an array", at));
            continue;
        };

        for (j, hook) in hook_list.iter().enumerate() {
            let at = format!("{} hook {}", at, j);
            match hook.as_object() {
                Some(hook) => check_hook(event, &at, hook, result),
                None => result.error("HK-003", format!("{}: must be an object", at)),
            }
        }
    }
}

fn check_hook(event: &str, at: &str, hook: &Map<String, Value>, result: &mut ValidationResult) {
    // HK-005
    let hook_type = hook.get("type");
    if is_blank(hook_type) {
        result.error("HK-005", format!("{}: missing 'type'", at));
    } else if let Some(invalid) = hook_type.filter(|t| !is_valid_hook_type(t)) {
        result.error(
            "HK-005",
            format!(
                "{}: invalid type '{}'. Valid: {}",
                at,
                display_value(invalid),
                VALID_HOOK_TYPES.join(", ")
            ),
        );
    }

    match hook_type.and_then(Value::as_str) {
        Some("command") => check_command_hook(at, hook, result),
        Some("prompt") => {
            // HK-008
            if !hook.contains_key("prompt") {
                result.error("HK-008", format!("{}: missing 'prompt'", at));
            }
            // HK-009
            if !PROMPT_EVENTS.contains(&event) {
                result.warning(
                    "HK-009",
                    format!("{}: prompt hooks work best with Stop/SubagentStop", at),
                );
            }
        }
        _ => {}
    }

    if let Some(timeout) = hook.get("timeout") {
        check_timeout(at, timeout, result);
    }
}

fn check_command_hook(at: &str, hook: &Map<String, Value>, result: &mut ValidationResult) {
    // HK-006
    let Some(command) = hook.get("command") else {
        result.error("HK-006", format!("{}: missing 'command'", at));
        return;
    };
    let Some(command) = command.as_str() else {
        result.error("HK-006", format!("{}: 'command' must be a string", at));
        return;
    };

    // HK-007: unquoted, a project path with spaces splits into several words
    if command.contains(PROJECT_DIR_VAR) && !command.contains(QUOTED_PROJECT_DIR_VAR) {
        result.warning(
            "HK-007",
            format!("{}: $CLAUDE_PROJECT_DIR should be quoted", at),
        );
    }
}

/// HK-010 / HK-011
fn check_timeout(at: &str, timeout: &Value, result: &mut ValidationResult) {
    let Some(seconds) = timeout.as_f64() else {
        result.error("HK-010", format!("{}: timeout must be a number", at));
        return;
    };
    if seconds <= 0.0 {
        result.error("HK-010", format!("{}: timeout must be positive", at));
    } else if seconds > MAX_REASONABLE_TIMEOUT {
        result.warning(
            "HK-011",
            format!("{}: timeout {}s is very long", at, display_value(timeout)),
        );
    }
}

fn is_valid_hook_type(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|t| VALID_HOOK_TYPES.contains(&t))
}

fn sorted_valid_events() -> Vec<&'static str> {
    let mut events = VALID_EVENTS.to_vec();
    events.sort_unstable();
    events
}

/// Strings unquoted, everything else as compact JSON
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
