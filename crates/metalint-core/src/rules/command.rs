//! Slash command validation (`commands/**/*.md`)

use super::checks::{SectionRequirement, SizeLimits};
use super::markdown::{MarkdownValidator, RuleContext, RuleSet};
use crate::diagnostics::ValidationResult;
use crate::parsers::frontmatter::Frontmatter;

/// Fields commands don't support; the name comes from the file name
pub const IGNORED_FIELDS: &[&str] = &["name", "category", "tags"];

fn hard_size_message(lines: usize) -> String {
    format!("Command file is {} lines (max 500)", lines)
}

fn soft_size_message(lines: usize) -> String {
    format!(
        "Command file is {} lines (consider splitting into smaller commands)",
        lines
    )
}

pub static COMMAND_RULES: RuleSet = RuleSet {
    required: &["description"],
    recommended: &[],
    enumerated: &[],
    trigger: None,
    size: SizeLimits {
        hard: 500,
        soft: 200,
        hard_message: hard_size_message,
        soft_message: soft_size_message,
    },
    sections: &[SectionRequirement {
        any_of: &[
            "## steps",
            "## instructions",
            "**steps**",
            "**instructions**",
        ],
        message: "Consider adding '## Steps' or '## Instructions' section",
    }],
    report_unclosed_fence: false,
    frontmatter_extras: check_command_frontmatter,
    content_extras: check_command_arguments,
};

pub static COMMAND_VALIDATOR: MarkdownValidator = MarkdownValidator::new(&COMMAND_RULES);

fn check_command_frontmatter(
    ctx: &RuleContext<'_>,
    fm: &Frontmatter,
    result: &mut ValidationResult,
) {
    // CM-001
    for field in IGNORED_FIELDS {
        if fm.contains_key(field) {
            result.warning(
                "CM-001",
                format!(
                    "Invalid field '{}' - will be ignored (name is inferred from filename)",
                    field
                ),
            );
        }
    }

    // CM-002: !`cmd` runs a shell command and needs Bash permission
    if ctx.content.contains('!') && ctx.content.contains('`') && !fm.contains_key("allowed-tools") {
        result.warning(
            "CM-002",
            "Using !`command` syntax but missing 'allowed-tools' with Bash permission",
        );
    }
}

/// CM-003: runs on the raw text, so a broken frontmatter block counts as
/// having no `argument-hint`
fn check_command_arguments(
    ctx: &RuleContext<'_>,
    fm: Option<&Frontmatter>,
    result: &mut ValidationResult,
) {
    let takes_arguments = ctx.content.contains("$ARGUMENTS") || ctx.content.contains("$1");
    let has_hint = fm.is_some_and(|fm| fm.contains_key("argument-hint"));
    if takes_arguments && !has_hint {
        result.warning(
            "CM-003",
            "Using $ARGUMENTS but missing 'argument-hint' in frontmatter",
        );
    }
}
