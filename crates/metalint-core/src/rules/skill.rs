//! Skill validation (`SKILL.md`)

use super::checks::{SectionRequirement, SizeLimits};
use super::markdown::{MarkdownValidator, RuleContext, RuleSet, TriggerPhrases};
use super::scripts::check_scripts_executable;
use super::similarity::trigger_words;
use crate::diagnostics::ValidationResult;
use crate::parsers::frontmatter::Frontmatter;
use crate::regex_util::static_regex;
use regex::Regex;

static_regex!(fn name_charset_regex, r"^[a-z0-9:-]+$");
static_regex!(fn md_link_regex, r"\]\([^)]+\.md\)");
static_regex!(fn helps_with_regex, r"\bhelps?\s+with\b");
static_regex!(fn works_with_regex, r"\bworks?\s+with\b");
static_regex!(fn assists_with_regex, r"\bassists?\s+with\b");
static_regex!(fn for_working_with_regex, r"\bfor\s+working\s+with\b");
static_regex!(fn handles_regex, r"\bhandles?\b");
static_regex!(fn manages_regex, r"\bmanages?\b");

pub const MAX_NAME_CHARS: usize = 64;
pub const MAX_DESCRIPTION_CHARS: usize = 1024;

/// Fewer trigger words than this after "use for" is reported
const MIN_TRIGGER_WORDS: usize = 5;

/// Skills longer than this should link out to supporting files
const LINK_EXPECTED_AFTER_LINES: usize = 200;

const REFERENCE_FILE: &str = "reference.md";
const EXAMPLES_FILE: &str = "examples.md";
const MAX_REFERENCE_LINES: usize = 500;

/// Weak phrasing in descriptions, checked in order; only the first hit counts
fn vague_terms() -> [(&'static Regex, &'static str); 6] {
    [
        (helps_with_regex(), "helps with"),
        (works_with_regex(), "works with"),
        (assists_with_regex(), "assists with"),
        (for_working_with_regex(), "for working with"),
        (handles_regex(), "handles"),
        (manages_regex(), "manages"),
    ]
}

fn hard_size_message(lines: usize) -> String {
    format!("SKILL.md is {} lines (max 500). Split to reference.md", lines)
}

fn soft_size_message(lines: usize) -> String {
    format!(
        "SKILL.md is {} lines. Consider splitting to reference.md (~400 recommended)",
        lines
    )
}

pub static SKILL_RULES: RuleSet = RuleSet {
    required: &["name", "description"],
    recommended: &[],
    enumerated: &[],
    trigger: Some(TriggerPhrases {
        field: "description",
        any_of: &["use when", "use for"],
        message: "Description should include trigger phrases like 'Use when...' or 'Use for...'",
    }),
    size: SizeLimits {
        hard: 500,
        soft: 400,
        hard_message: hard_size_message,
        soft_message: soft_size_message,
    },
    sections: &[
        SectionRequirement {
            any_of: &["## common mistakes"],
            message: "Missing '## Common Mistakes' section",
        },
        SectionRequirement {
            any_of: &["## delegation"],
            message: "Missing '## Delegation' section",
        },
    ],
    report_unclosed_fence: true,
    frontmatter_extras: check_skill_frontmatter,
    content_extras: check_skill_layout,
};

pub static SKILL_VALIDATOR: MarkdownValidator = MarkdownValidator::new(&SKILL_RULES);

fn check_skill_frontmatter(ctx: &RuleContext<'_>, fm: &Frontmatter, result: &mut ValidationResult) {
    if let Some(name) = fm.get("name") {
        check_name(ctx, name, result);
    }
    if let Some(description) = fm.get("description") {
        check_description(description, result);
    }
}

fn check_name(ctx: &RuleContext<'_>, name: &str, result: &mut ValidationResult) {
    let char_count = name.chars().count();
    if char_count > MAX_NAME_CHARS {
        result.error(
            "SK-001",
            format!(
                "Field 'name' exceeds {} characters ({} chars)",
                MAX_NAME_CHARS, char_count
            ),
        );
    } else if !name_charset_regex().is_match(name) {
        result.warning(
            "SK-002",
            "Field 'name' should use lowercase letters, numbers, hyphens, and colons only",
        );
    }

    // `meta:skill-creator` may live in `meta-skill-creator/`
    let dir_name = ctx
        .dir()
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if name != dir_name && name.replace(':', "-") != dir_name {
        result.warning(
            "SK-003",
            format!(
                "Field 'name' ({}) should match directory name ({})",
                name, dir_name
            ),
        );
    }
}

fn check_description(description: &str, result: &mut ValidationResult) {
    let char_count = description.chars().count();
    if char_count > MAX_DESCRIPTION_CHARS {
        result.error(
            "SK-004",
            format!(
                "Field 'description' exceeds {} characters ({} chars)",
                MAX_DESCRIPTION_CHARS, char_count
            ),
        );
    }

    let lower = description.to_lowercase();

    if let Some((_, term)) = vague_terms()
        .into_iter()
        .find(|(regex, _)| regex.is_match(&lower))
    {
        result.warning(
            "SK-005",
            format!(
                "Vague term '{}' in description - use specific triggers instead",
                term
            ),
        );
    }

    if let Some((_, after)) = lower.split_once("use for") {
        let count = trigger_words(after).len();
        if count < MIN_TRIGGER_WORDS {
            result.warning(
                "SK-006",
                format!(
                    "Low trigger density: only {} keywords after 'Use for' (recommend 8+)",
                    count
                ),
            );
        }
    }
}

fn check_skill_layout(
    ctx: &RuleContext<'_>,
    _: Option<&Frontmatter>,
    result: &mut ValidationResult,
) {
    if ctx.lines.len() > LINK_EXPECTED_AFTER_LINES && !md_link_regex().is_match(ctx.content) {
        result.warning("SK-009", "Long skill without links to supporting .md files");
    }

    let fs = ctx.config.fs();
    let dir = ctx.dir();

    let reference = dir.join(REFERENCE_FILE);
    if fs.exists(&reference) {
        if !ctx.content.contains("[reference.md]") {
            result.warning("SK-007", "reference.md exists but is not linked in SKILL.md");
        }
        match fs.read_to_string(&reference, ctx.config.max_file_size) {
            Ok(text) => {
                let lines = text.split('\n').count();
                if lines > MAX_REFERENCE_LINES {
                    result.error(
                        "SK-008",
                        format!(
                            "reference.md is {} lines (max 500). Split into topic files (e.g., middleware.md, patterns.md)",
                            lines
                        ),
                    );
                }
            }
            Err(e) => {
                tracing::debug!(path = %reference.display(), error = %e, "skipping reference.md size check");
            }
        }
    }

    if fs.exists(&dir.join(EXAMPLES_FILE)) && !ctx.content.contains("[examples.md]") {
        result.warning("SK-007", "examples.md exists but is not linked in SKILL.md");
    }

    check_scripts_executable(fs, dir, &["py", "sh"], result);
}
