//! Bounded file reading
//!
//! Artifacts are read whole into memory, so reads are limited in size and
//! restricted to regular files (a FIFO or device would otherwise hang the
//! linter). Symlinks are followed: skill and agent directories are commonly
//! symlinked into `.claude/`.

use crate::diagnostics::{LintError, LintResult};
use std::fs;
use std::io;
use std::path::Path;

/// Default maximum file size (1 MiB = 1,048,576 bytes = 2^20 bytes)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1_048_576;

/// Read a file, rejecting non-regular files and files larger than `max_size`.
///
/// Files at exactly `max_size` bytes are accepted.
///
/// # Errors
///
/// Returns `LintError::PermissionDenied` when the OS refuses access,
/// `LintError::FileNotRegular` for directories and special files,
/// `LintError::FileTooBig` above the limit and `LintError::FileRead` for any
/// other I/O failure (including invalid UTF-8).
pub fn safe_read_file_with_limit(path: &Path, max_size: u64) -> LintResult<String> {
    let metadata = fs::metadata(path).map_err(|e| map_io_error(path, e))?;

    if !metadata.is_file() {
        return Err(LintError::FileNotRegular {
            path: path.to_path_buf(),
        });
    }

    let size = metadata.len();
    if size > max_size {
        return Err(LintError::FileTooBig {
            path: path.to_path_buf(),
            size,
            limit: max_size,
        });
    }

    fs::read_to_string(path).map_err(|e| map_io_error(path, e))
}

/// Convert an I/O error into the lint error shown for that file
pub(crate) fn map_io_error(path: &Path, error: io::Error) -> LintError {
    if error.kind() == io::ErrorKind::PermissionDenied {
        LintError::PermissionDenied {
            path: path.to_path_buf(),
        }
    } else {
        LintError::FileRead {
            path: path.to_path_buf(),
            source: error,
        }
    }
}
