//! Generic validator for frontmatter-based markdown artifacts
//!
//! Skills, agents and commands differ only in the data of their [`RuleSet`]
//! plus a pair of hooks for checks that don't fit a table. Evaluation order
//! (which is also display order):
//!
//! 1. frontmatter structure, then required, recommended, enumerated and
//!    trigger-phrase fields, then the kind's frontmatter extras
//! 2. size, code fences and sections on the raw text
//! 3. the kind's content extras
//!
//! A malformed frontmatter block yields one FM-001 error and skips step 1's
//! field checks; steps 2 and 3 always run. Content extras receive `None` for
//! the frontmatter in that case.

use super::checks::{self, SectionRequirement, SizeLimits};
use super::Validator;
use crate::config::LintConfig;
use crate::diagnostics::ValidationResult;
use crate::parsers::frontmatter::{extract_frontmatter, Frontmatter};
use std::path::Path;

/// Optional field whose absence earns a warning
#[derive(Debug, Clone, Copy)]
pub struct Recommendation {
    pub field: &'static str,
    pub message: &'static str,
}

/// Field restricted to a closed set of values
#[derive(Debug, Clone, Copy)]
pub struct EnumeratedField {
    pub field: &'static str,
    /// Name used in the FM-004 message
    pub label: &'static str,
    pub allowed: &'static [&'static str],
}

/// Lowercase phrases, one of which a free-text field should contain
#[derive(Debug, Clone, Copy)]
pub struct TriggerPhrases {
    pub field: &'static str,
    pub any_of: &'static [&'static str],
    pub message: &'static str,
}

/// Everything a rule sees about one artifact
#[derive(Debug)]
pub struct RuleContext<'a> {
    pub path: &'a Path,
    pub content: &'a str,
    pub lines: Vec<&'a str>,
    pub content_lower: String,
    pub config: &'a LintConfig,
}

impl<'a> RuleContext<'a> {
    pub fn new(path: &'a Path, content: &'a str, config: &'a LintConfig) -> Self {
        Self {
            path,
            content,
            lines: checks::split_lines(content),
            content_lower: content.to_lowercase(),
            config,
        }
    }

    /// Directory holding the artifact (empty for a bare file name)
    pub fn dir(&self) -> &'a Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}

/// Table describing one markdown artifact kind
pub struct RuleSet {
    pub required: &'static [&'static str],
    pub recommended: &'static [Recommendation],
    pub enumerated: &'static [EnumeratedField],
    pub trigger: Option<TriggerPhrases>,
    pub size: SizeLimits,
    pub sections: &'static [SectionRequirement],
    /// Also report a code block left open at end of file
    pub report_unclosed_fence: bool,
    pub frontmatter_extras: fn(&RuleContext<'_>, &Frontmatter, &mut ValidationResult),
    pub content_extras: fn(&RuleContext<'_>, Option<&Frontmatter>, &mut ValidationResult),
}

/// Placeholder for kinds without extra checks
pub fn no_frontmatter_extras(_: &RuleContext<'_>, _: &Frontmatter, _: &mut ValidationResult) {}

/// Placeholder for kinds without extra checks
pub fn no_content_extras(
    _: &RuleContext<'_>,
    _: Option<&Frontmatter>,
    _: &mut ValidationResult,
) {
}

/// Run a rule set against one artifact
pub fn validate_markdown(
    rules: &RuleSet,
    path: &Path,
    content: &str,
    config: &LintConfig,
) -> ValidationResult {
    let ctx = RuleContext::new(path, content, config);
    let mut result = ValidationResult::new();

    let parsed = match extract_frontmatter(content) {
        Ok(frontmatter) => {
            check_fields(rules, &ctx, &frontmatter, &mut result);
            Some(frontmatter)
        }
        Err(e) => {
            tracing::trace!(path = %path.display(), error = %e, "frontmatter rejected");
            result.error("FM-001", e.to_string());
            None
        }
    };

    checks::check_size(ctx.lines.len(), &rules.size, &mut result);
    checks::check_code_fences(&ctx.lines, rules.report_unclosed_fence, &mut result);
    checks::check_sections(&ctx.content_lower, rules.sections, &mut result);
    (rules.content_extras)(&ctx, parsed.as_ref(), &mut result);

    result
}

fn check_fields(
    rules: &RuleSet,
    ctx: &RuleContext<'_>,
    frontmatter: &Frontmatter,
    result: &mut ValidationResult,
) {
    // FM-002
    for field in rules.required {
        if !frontmatter.contains_key(field) {
            result.error("FM-002", format!("Missing required field: '{}'", field));
        }
    }

    // FM-003
    for recommendation in rules.recommended {
        if !frontmatter.contains_key(recommendation.field) {
            result.warning("FM-003", recommendation.message);
        }
    }

    // FM-004
    for enumerated in rules.enumerated {
        if let Some(value) = frontmatter.get(enumerated.field) {
            if !enumerated.allowed.contains(&value) {
                result.warning(
                    "FM-004",
                    format!(
                        "{} '{}' - expected: {}",
                        enumerated.label,
                        value,
                        enumerated.allowed.join(", ")
                    ),
                );
            }
        }
    }

    // FM-005
    if let Some(trigger) = &rules.trigger {
        if let Some(value) = frontmatter.get(trigger.field) {
            if !checks::contains_any(&value.to_lowercase(), trigger.any_of) {
                result.warning("FM-005", trigger.message);
            }
        }
    }

    (rules.frontmatter_extras)(ctx, frontmatter, result);
}

/// [`Validator`] over a static rule table
#[derive(Clone, Copy)]
pub struct MarkdownValidator {
    rules: &'static RuleSet,
}

impl MarkdownValidator {
    pub const fn new(rules: &'static RuleSet) -> Self {
        Self { rules }
    }
}

impl Validator for MarkdownValidator {
    fn validate(&self, path: &Path, content: &str, config: &LintConfig) -> ValidationResult {
        validate_markdown(self.rules, path, content, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flag_frontmatter(_: &RuleContext<'_>, fm: &Frontmatter, result: &mut ValidationResult) {
        if fm.contains_key("flag") {
            result.warning("TEST-FM", "flag present");
        }
    }

    fn flag_content(
        ctx: &RuleContext<'_>,
        fm: Option<&Frontmatter>,
        result: &mut ValidationResult,
    ) {
        if ctx.content_lower.contains("todo") {
            result.warning("TEST-CT", "todo present");
        }
        if fm.is_some_and(|fm| fm.contains_key("flag")) {
            result.warning("TEST-CT-FM", "flag seen by content extras");
        }
    }

    static TEST_RULES: RuleSet = RuleSet {
        required: &["name", "description"],
        recommended: &[Recommendation {
            field: "tools",
            message: "Consider adding 'tools'",
        }],
        enumerated: &[
            EnumeratedField {
                field: "model",
                label: "Model",
                allowed: &["haiku", "sonnet"],
            },
            EnumeratedField {
                field: "permission-mode",
                label: "Permission mode",
                allowed: &["default", "plan"],
            },
        ],
        trigger: Some(TriggerPhrases {
            field: "description",
            any_of: &["use when"],
            message: "Description should say when to use it",
        }),
        size: SizeLimits {
            hard: 12,
            soft: 8,
            hard_message: |n| format!("{} lines (max 12)", n),
            soft_message: |n| format!("{} lines", n),
        },
        sections: &[SectionRequirement {
            any_of: &["## output"],
            message: "Consider adding '## Output'",
        }],
        report_unclosed_fence: false,
        frontmatter_extras: flag_frontmatter,
        content_extras: flag_content,
    };

    fn run(content: &str) -> ValidationResult {
        validate_markdown(
            &TEST_RULES,
            Path::new("agents/test.md"),
            content,
            &LintConfig::default(),
        )
    }

    fn rules_of(diagnostics: &[crate::diagnostics::Diagnostic]) -> Vec<&str> {
        diagnostics.iter().map(|d| d.rule.as_str()).collect()
    }

    #[test]
    fn test_clean_artifact() {
        let result = run("---\nname: x\ndescription: Use when testing\ntools: Read\n---\n## Output\n");
        assert!(result.is_clean(), "{:?}", result);
    }

    #[test]
    fn test_missing_frontmatter_skips_field_rules_only() {
        let result = run("no frontmatter\n```\ncode\n```\ntodo");

        assert_eq!(rules_of(&result.errors), vec!["FM-001", "MD-001"]);
        assert_eq!(
            result.errors[0].message,
            "YAML frontmatter must start with --- on line 1"
        );
        // Sections and content extras still run, frontmatter extras do not
        assert_eq!(rules_of(&result.warnings), vec!["MD-003", "TEST-CT"]);
    }

    #[test]
    fn test_required_recommended_enumerated_trigger() {
        let result = run("---\nmodel: gpt\ndescription: does things\nflag: 1\n---\n## Output\n");

        assert_eq!(rules_of(&result.errors), vec!["FM-002"]);
        assert_eq!(result.errors[0].message, "Missing required field: 'name'");
        assert_eq!(
            rules_of(&result.warnings),
            vec!["FM-003", "FM-004", "FM-005", "TEST-FM", "TEST-CT-FM"]
        );
        assert_eq!(
            result.warnings[1].message,
            "Model 'gpt' - expected: haiku, sonnet"
        );
    }

    #[test]
    fn test_enumerated_message_uses_label() {
        let result = run("---\nname: x\ndescription: Use when x\ntools: a\npermission-mode: yolo\n---\n## Output\n");
        assert_eq!(rules_of(&result.warnings), vec!["FM-004"]);
        assert_eq!(
            result.warnings[0].message,
            "Permission mode 'yolo' - expected: default, plan"
        );
    }

    #[test]
    fn test_trigger_is_case_insensitive() {
        let result = run("---\nname: x\ndescription: USE WHEN shouting\ntools: Read\n---\n## output\n");
        assert!(result.is_clean());
    }

    #[test]
    fn test_empty_block_still_checks_required() {
        let result = run("---\n---\n## Output\n");
        assert_eq!(result.errors.len(), 2);
        assert!(result.errors.iter().all(|d| d.rule == "FM-002"));
    }

    #[test]
    fn test_adding_required_field_never_adds_errors() {
        let without = run("---\ndescription: Use when x\n---\n## Output\n");
        let with = run("---\nname: x\ndescription: Use when x\n---\n## Output\n");
        assert!(with.errors.len() < without.errors.len());
    }

    #[test]
    fn test_size_rules_run_on_broken_frontmatter() {
        let content = format!("---\nname: x\n{}", "line\n".repeat(12));
        assert_eq!(checks::split_lines(&content).len(), 15);
        let result = run(&content);

        assert_eq!(rules_of(&result.errors), vec!["FM-001", "SZ-001"]);
        assert_eq!(
            result.errors[0].message,
            "Invalid YAML frontmatter: missing closing ---"
        );
    }

    #[test]
    fn test_validator_trait_delegates() {
        let validator = MarkdownValidator::new(&TEST_RULES);
        let result = validator.validate(
            Path::new("x.md"),
            "---\nname: x\ndescription: Use when\ntools: a\n---\n## Output",
            &LintConfig::default(),
        );
        assert!(result.is_clean());
    }
}
