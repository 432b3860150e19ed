//! Checks shared by the markdown artifact kinds
//!
//! All of these run on raw text and never need parsed frontmatter, so they
//! still run when the frontmatter block is malformed.

use crate::diagnostics::ValidationResult;

/// Opening and closing marker of a fenced code block
const FENCE: &str = "```";

/// Split text into lines the way every line-based rule sees it.
///
/// Only `\n` separates lines, so a trailing newline yields a final empty
/// line and the count is one more than the number of newlines.
pub fn split_lines(content: &str) -> Vec<&str> {
    content.split('\n').collect()
}

/// Line-count thresholds for one artifact kind
#[derive(Debug, Clone, Copy)]
pub struct SizeLimits {
    /// More lines than this is an error
    pub hard: usize,
    /// More lines than this (but within `hard`) is a warning
    pub soft: usize,
    pub hard_message: fn(usize) -> String,
    pub soft_message: fn(usize) -> String,
}

/// SZ-001 / SZ-002
pub fn check_size(line_count: usize, limits: &SizeLimits, result: &mut ValidationResult) {
    if line_count > limits.hard {
        result.error("SZ-001", (limits.hard_message)(line_count));
    } else if line_count > limits.soft {
        result.warning("SZ-002", (limits.soft_message)(line_count));
    }
}

/// MD-001 / MD-002
///
/// Any line whose trimmed text starts with a fence toggles the in-block
/// state. An opening fence with nothing after the backticks is reported with
/// its 1-based line number. With `report_unclosed`, a block still open at
/// end of text is reported at its opening line.
pub fn check_code_fences(lines: &[&str], report_unclosed: bool, result: &mut ValidationResult) {
    let mut in_block = false;
    let mut opened_at = 0;

    for (index, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if !trimmed.starts_with(FENCE) {
            continue;
        }
        if !in_block {
            opened_at = index + 1;
            if trimmed == FENCE {
                result.error(
                    "MD-001",
                    format!(
                        "Line {}: Code block missing language specifier (MD040)",
                        opened_at
                    ),
                );
            }
        }
        in_block = !in_block;
    }

    if in_block && report_unclosed {
        result.error(
            "MD-002",
            format!("Unclosed code block starting at line {}", opened_at),
        );
    }
}

/// A heading that should appear somewhere in the artifact
#[derive(Debug, Clone, Copy)]
pub struct SectionRequirement {
    /// Lowercase markers, any one of which satisfies the requirement
    pub any_of: &'static [&'static str],
    pub message: &'static str,
}

/// MD-003
pub fn check_sections(
    content_lower: &str,
    sections: &[SectionRequirement],
    result: &mut ValidationResult,
) {
    for section in sections {
        if !contains_any(content_lower, section.any_of) {
            result.warning("MD-003", section.message);
        }
    }
}

/// Case-sensitive substring test against a list of needles
pub fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}
