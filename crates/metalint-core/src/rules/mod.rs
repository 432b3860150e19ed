//! Validation rules
//!
//! Every finding carries a stable rule ID so it can be disabled from
//! configuration:
//!
//! | Prefix | Scope |
//! |--------|-------|
//! | `FM-`  | frontmatter structure and field checks |
//! | `SZ-`  | file length |
//! | `MD-`  | markdown structure (code fences, sections) |
//! | `SK-`  | skill-only checks |
//! | `CM-`  | command-only checks |
//! | `HK-`  | hook settings |
//! | `PL-`  | plugin layout and manifests |
//! | `SC-`  | bundled scripts |
//! | `IO-`  | files that could not be read |

pub mod agent;
pub mod checks;
pub mod command;
pub mod hooks;
pub mod markdown;
pub mod plugin;
pub mod scripts;
pub mod similarity;
pub mod skill;

use crate::{config::LintConfig, diagnostics::ValidationResult};
use std::path::Path;

/// Trait for artifact validators
///
/// `content` is the already-read artifact text. Validators that look at
/// neighbouring files do so through `config.fs()`.
pub trait Validator {
    fn validate(&self, path: &Path, content: &str, config: &LintConfig) -> ValidationResult;
}
