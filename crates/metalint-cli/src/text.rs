//! Human-readable output.
//!
//! One artifact gets a detailed report; several get one line each, with
//! details only for failures, followed by a summary.

use colored::*;
use metalint_core::{BatchReport, Diagnostic, FileReport};
use std::fmt;

/// Display adapter rendering a [`BatchReport`] as console text
pub struct TextReport<'a> {
    report: &'a BatchReport,
    verbose: bool,
}

impl<'a> TextReport<'a> {
    pub fn new(report: &'a BatchReport, verbose: bool) -> Self {
        Self { report, verbose }
    }

    fn write_single(&self, f: &mut fmt::Formatter<'_>, file: &FileReport) -> fmt::Result {
        let label = self.report.kind.label();
        let result = &file.result;

        if !result.errors.is_empty() {
            writeln!(f, "❌ {} validation {}\n", label, "FAILED".red().bold())?;
            writeln!(f, "Errors:")?;
            for error in &result.errors {
                self.write_item(f, "  ", "✗".red(), error)?;
            }
            writeln!(f)?;
        }

        if !result.warnings.is_empty() {
            writeln!(f, "Warnings:")?;
            for warning in &result.warnings {
                self.write_item(f, "  ", "⚠".yellow(), warning)?;
            }
            writeln!(f)?;
        }

        if result.is_clean() {
            writeln!(f, "{} {} validation passed", "✓".green().bold(), label)?;
        } else if result.passed() {
            writeln!(f, "{} {} valid (with warnings)", "✓".green().bold(), label)?;
        }
        Ok(())
    }

    fn write_batch(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;
        let noun = report.kind.noun();
        writeln!(f, "Validating {} {}(s)...\n", report.files.len(), noun)?;

        for file in &report.files {
            self.write_file_line(f, file)?;
        }

        writeln!(f)?;
        let failed: Vec<&str> = report.failed().map(|file| file.name.as_str()).collect();
        if failed.is_empty() {
            writeln!(
                f,
                "{} All {} {}(s) passed",
                "✓".green().bold(),
                report.files.len(),
                noun
            )?;
        } else {
            writeln!(
                f,
                "❌ {} {}(s) failed: {}",
                failed.len(),
                noun,
                failed.join(", ")
            )?;
        }

        if !report.conflicts.is_empty() {
            writeln!(f, "\n{} Description conflicts detected:", "⚠".yellow())?;
            for conflict in &report.conflicts {
                writeln!(f, "   {}", conflict.message)?;
            }
        }

        let warnings = report.warning_count();
        if warnings > 0 {
            writeln!(f, "\n   {} total warning(s)", warnings)?;
        }
        Ok(())
    }

    fn write_file_line(&self, f: &mut fmt::Formatter<'_>, file: &FileReport) -> fmt::Result {
        let result = &file.result;
        if !result.errors.is_empty() {
            writeln!(f, "❌ {}: {}", file.name, "FAILED".red().bold())?;
            for error in &result.errors {
                self.write_item(f, "   ", "✗".red(), error)?;
            }
            if self.verbose {
                for warning in &result.warnings {
                    self.write_item(f, "   ", "⚠".yellow(), warning)?;
                }
            }
        } else if !result.warnings.is_empty() {
            writeln!(
                f,
                "{} {}: valid (with {} warning(s))",
                "✓".green().bold(),
                file.name,
                result.warnings.len()
            )?;
            if self.verbose {
                for warning in &result.warnings {
                    self.write_item(f, "   ", "⚠".yellow(), warning)?;
                }
            }
        } else {
            writeln!(f, "{} {}: passed", "✓".green().bold(), file.name)?;
        }
        Ok(())
    }

    fn write_item(
        &self,
        f: &mut fmt::Formatter<'_>,
        indent: &str,
        glyph: ColoredString,
        diagnostic: &Diagnostic,
    ) -> fmt::Result {
        if self.verbose {
            writeln!(
                f,
                "{}{} {} {}",
                indent,
                glyph,
                format!("[{}]", diagnostic.rule).dimmed(),
                diagnostic.message
            )?;
            if let Some(suggestion) = &diagnostic.suggestion {
                writeln!(f, "{}  {} {}", indent, "help:".cyan(), suggestion)?;
            }
            Ok(())
        } else {
            writeln!(f, "{}{} {}", indent, glyph, diagnostic.message)
        }
    }
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.report.files.as_slice() {
            [single] => self.write_single(f, single),
            _ => self.write_batch(f),
        }
    }
}
