//! Agent validation (`agents/*.md`)

use super::checks::{SectionRequirement, SizeLimits};
use super::markdown::{
    no_content_extras, no_frontmatter_extras, EnumeratedField, MarkdownValidator, Recommendation,
    RuleSet, TriggerPhrases,
};

/// Model tiers an agent may pin
pub const VALID_MODELS: &[&str] = &["haiku", "sonnet", "opus", "inherit"];

fn hard_size_message(lines: usize) -> String {
    format!("Agent file is {} lines (max 500)", lines)
}

fn soft_size_message(lines: usize) -> String {
    format!("Agent file is {} lines (consider splitting)", lines)
}

pub static AGENT_RULES: RuleSet = RuleSet {
    required: &["name", "description"],
    recommended: &[Recommendation {
        field: "tools",
        message: "Consider adding 'tools' to restrict agent capabilities (omit to inherit all)",
    }],
    enumerated: &[EnumeratedField {
        field: "model",
        label: "Model",
        allowed: VALID_MODELS,
    }],
    trigger: Some(TriggerPhrases {
        field: "description",
        any_of: &["proactively", "use when"],
        message: "Description should include trigger phrases ('Use proactively' or 'Use when')",
    }),
    size: SizeLimits {
        hard: 500,
        soft: 300,
        hard_message: hard_size_message,
        soft_message: soft_size_message,
    },
    sections: &[SectionRequirement {
        any_of: &["## output"],
        message: "Consider adding '## Output Format' section",
    }],
    report_unclosed_fence: false,
    frontmatter_extras: no_frontmatter_extras,
    content_extras: no_content_extras,
};

pub static AGENT_VALIDATOR: MarkdownValidator = MarkdownValidator::new(&AGENT_RULES);
