//! Bundled script permissions (SC-001)

use crate::diagnostics::ValidationResult;
use crate::fs::FileSystem;
use std::path::Path;

/// Conventional directory for helper scripts, relative to the artifact root
pub const SCRIPTS_DIR: &str = "scripts";

/// Warn for every file directly under `<root>/scripts` with one of
/// `extensions` that has no execute bit. A missing directory is fine.
pub fn check_scripts_executable(
    fs: &dyn FileSystem,
    root: &Path,
    extensions: &[&str],
    result: &mut ValidationResult,
) {
    let scripts_dir = root.join(SCRIPTS_DIR);
    if !fs.is_dir(&scripts_dir) {
        return;
    }
    let entries = match fs.read_dir(&scripts_dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(dir = %scripts_dir.display(), error = %e, "cannot list scripts");
            return;
        }
    };

    for entry in entries {
        if !entry.metadata.is_file {
            continue;
        }
        let has_extension = entry
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.contains(&ext));
        if has_extension && !entry.metadata.executable {
            result.warning(
                "SC-001",
                format!("Script not executable: {} (run chmod +x)", entry.file_name()),
            );
        }
    }
}
