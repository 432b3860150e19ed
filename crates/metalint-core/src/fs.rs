//! FileSystem abstraction for testability
//!
//! Path resolution and rules that look beyond the artifact itself (sibling
//! `reference.md`, `scripts/` permissions, plugin sub-configs) go through the
//! [`FileSystem`] trait held by [`LintConfig`](crate::LintConfig), so they can
//! be unit tested with [`MockFileSystem`] instead of real temp directories.
//!
//! ## Example
//!
//! ```rust,ignore
//! use metalint_core::fs::{FileSystem, MockFileSystem};
//! use std::path::Path;
//!
//! let mock_fs = MockFileSystem::new();
//! mock_fs.add_file("/skill/SKILL.md", "---\nname: skill\n---\n");
//! mock_fs.add_executable("/skill/scripts/run.sh", "#!/bin/sh\n");
//! assert!(mock_fs.is_dir(Path::new("/skill/scripts")));
//! ```

use crate::diagnostics::{LintError, LintResult};
use ignore::WalkBuilder;
use std::collections::HashMap;
use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Subset of `std::fs::Metadata` that can be mocked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    pub is_file: bool,
    pub is_dir: bool,
    /// File size in bytes
    pub len: u64,
    /// Any of the user/group/other execute bits is set
    pub executable: bool,
}

impl FileMetadata {
    pub fn file(len: u64, executable: bool) -> Self {
        Self {
            is_file: true,
            is_dir: false,
            len,
            executable,
        }
    }

    pub fn directory() -> Self {
        Self {
            is_file: false,
            is_dir: true,
            len: 0,
            executable: false,
        }
    }
}

impl From<&Metadata> for FileMetadata {
    fn from(meta: &Metadata) -> Self {
        Self {
            is_file: meta.is_file(),
            is_dir: meta.is_dir(),
            len: meta.len(),
            executable: has_execute_bit(meta),
        }
    }
}

#[cfg(unix)]
fn has_execute_bit(meta: &Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o111 != 0
}

// No execute bit outside unix; every script counts as runnable.
#[cfg(not(unix))]
fn has_execute_bit(_meta: &Metadata) -> bool {
    true
}

/// Directory entry returned by `read_dir`.
#[derive(Debug, Clone)]
pub struct DirEntry {
    pub path: PathBuf,
    pub metadata: FileMetadata,
}

impl DirEntry {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Trait for abstracting file system operations.
///
/// Must be `Send + Sync` to support rayon parallel validation, and `Debug`
/// for use in config structs that derive Debug.
pub trait FileSystem: Send + Sync + std::fmt::Debug {
    fn exists(&self, path: &Path) -> bool;

    fn is_file(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    /// Read a file as UTF-8, refusing anything larger than `max_size` bytes
    fn read_to_string(&self, path: &Path, max_size: u64) -> LintResult<String>;

    /// Direct children of a directory, sorted by path
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>>;

    /// Every file below `root`, hidden directories included, sorted by path
    fn walk_files(&self, root: &Path) -> Vec<PathBuf>;
}

/// Real file system implementation that delegates to `std::fs` and `file_utils`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_to_string(&self, path: &Path, max_size: u64) -> LintResult<String> {
        crate::file_utils::safe_read_file_with_limit(path, max_size)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let mut entries: Vec<DirEntry> = std::fs::read_dir(path)?
            .filter_map(|entry_res| {
                // Entries that vanish or deny stat are skipped
                let entry = entry_res.ok()?;
                let path = entry.path();
                let metadata = std::fs::metadata(&path).ok()?;
                Some(DirEntry {
                    path,
                    metadata: FileMetadata::from(&metadata),
                })
            })
            .collect();
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }

    fn walk_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkBuilder::new(root)
            .standard_filters(false)
            .follow_links(true)
            .build()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
            .map(|entry| entry.into_path())
            .collect();
        files.sort();
        files
    }
}

#[derive(Debug, Clone)]
enum MockEntry {
    File { content: String, executable: bool },
    Directory,
}

impl MockEntry {
    fn metadata(&self) -> FileMetadata {
        match self {
            MockEntry::File {
                content,
                executable,
            } => FileMetadata::file(content.len() as u64, *executable),
            MockEntry::Directory => FileMetadata::directory(),
        }
    }
}

/// In-memory file system for tests.
///
/// Adding a file also registers every ancestor directory, so `read_dir` and
/// `is_dir` behave as they would on disk.
#[derive(Debug, Default)]
pub struct MockFileSystem {
    entries: RwLock<HashMap<PathBuf, MockEntry>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Add a non-executable file with the given content
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<String>) {
        self.insert_file(path.as_ref(), content.into(), false);
    }

    /// Add a file with an execute bit set
    pub fn add_executable(&self, path: impl AsRef<Path>, content: impl Into<String>) {
        self.insert_file(path.as_ref(), content.into(), true);
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = normalize_mock_path(path.as_ref());
        let mut entries = self.entries.write().expect("MockFileSystem lock poisoned");
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            entries
                .entry(ancestor.to_path_buf())
                .or_insert(MockEntry::Directory);
        }
    }

    fn insert_file(&self, path: &Path, content: String, executable: bool) {
        let path = normalize_mock_path(path);
        if let Some(parent) = path.parent() {
            self.add_dir(parent);
        }
        let mut entries = self.entries.write().expect("MockFileSystem lock poisoned");
        entries.insert(
            path,
            MockEntry::File {
                content,
                executable,
            },
        );
    }

    fn get_entry(&self, path: &Path) -> Option<MockEntry> {
        let path = normalize_mock_path(path);
        let entries = self.entries.read().expect("MockFileSystem lock poisoned");
        entries.get(&path).cloned()
    }
}

/// Converts backslashes to forward slashes for cross-platform consistency.
fn normalize_mock_path(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    PathBuf::from(path_str.replace('\\', "/"))
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.get_entry(path).is_some()
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(self.get_entry(path), Some(MockEntry::File { .. }))
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.get_entry(path), Some(MockEntry::Directory))
    }

    fn read_to_string(&self, path: &Path, max_size: u64) -> LintResult<String> {
        match self.get_entry(path) {
            Some(MockEntry::File { content, .. }) => {
                let size = content.len() as u64;
                if size > max_size {
                    return Err(LintError::FileTooBig {
                        path: path.to_path_buf(),
                        size,
                        limit: max_size,
                    });
                }
                Ok(content)
            }
            Some(MockEntry::Directory) => Err(LintError::FileNotRegular {
                path: path.to_path_buf(),
            }),
            None => Err(LintError::FileRead {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::NotFound, "file not found"),
            }),
        }
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let path_normalized = normalize_mock_path(path);

        match self.get_entry(&path_normalized) {
            Some(MockEntry::Directory) => {}
            Some(_) => {
                return Err(io::Error::new(
                    io::ErrorKind::NotADirectory,
                    "not a directory",
                ));
            }
            None => {
                return Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    "directory not found",
                ));
            }
        }

        let entries = self.entries.read().expect("MockFileSystem lock poisoned");
        let mut result: Vec<DirEntry> = entries
            .iter()
            .filter(|(entry_path, _)| entry_path.parent() == Some(path_normalized.as_path()))
            .map(|(entry_path, entry)| DirEntry {
                path: entry_path.clone(),
                metadata: entry.metadata(),
            })
            .collect();
        result.sort_by(|a, b| a.path.cmp(&b.path));

        Ok(result)
    }

    fn walk_files(&self, root: &Path) -> Vec<PathBuf> {
        let root = normalize_mock_path(root);
        let entries = self.entries.read().expect("MockFileSystem lock poisoned");
        let mut files: Vec<PathBuf> = entries
            .iter()
            .filter(|(path, entry)| {
                matches!(entry, MockEntry::File { .. }) && path.starts_with(&root)
            })
            .map(|(path, _)| path.clone())
            .collect();
        files.sort();
        files
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_real_fs_read_dir_sorted() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("b.md"), "b").unwrap();
        std::fs::write(temp.path().join("a.md"), "a").unwrap();
        std::fs::create_dir(temp.path().join("c")).unwrap();

        let entries = RealFileSystem.read_dir(temp.path()).unwrap();
        let names: Vec<String> = entries.iter().map(|e| e.file_name()).collect();

        assert_eq!(names, vec!["a.md", "b.md", "c"]);
        assert!(entries[2].metadata.is_dir);
    }

    #[cfg(unix)]
    #[test]
    fn test_real_fs_execute_bit() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let script = temp.path().join("run.sh");
        std::fs::write(&script, "#!/bin/sh\n").unwrap();

        let executable = || RealFileSystem.read_dir(temp.path()).unwrap()[0].metadata.executable;

        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o644)).unwrap();
        assert!(!executable());

        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o744)).unwrap();
        assert!(executable());
    }

    #[test]
    fn test_mock_fs_registers_ancestors() {
        let fs = MockFileSystem::new();
        fs.add_file("/plugin/scripts/run.sh", "echo");

        assert!(fs.is_dir(Path::new("/plugin")));
        assert!(fs.is_dir(Path::new("/plugin/scripts")));
        assert!(fs.is_file(Path::new("/plugin/scripts/run.sh")));
        assert!(!fs.exists(Path::new("/plugin/hooks")));
    }

    #[test]
    fn test_mock_fs_read_dir_direct_children_only() {
        let fs = MockFileSystem::new();
        fs.add_file("/p/commands/a.md", "a");
        fs.add_file("/p/commands/nested/b.md", "b");
        fs.add_executable("/p/commands/c.sh", "c");

        let entries = fs.read_dir(Path::new("/p/commands")).unwrap();
        let names: Vec<String> = entries.iter().map(|e| e.file_name()).collect();

        assert_eq!(names, vec!["a.md", "c.sh", "nested"]);
        assert!(entries[1].metadata.executable);
        assert!(!entries[0].metadata.executable);
    }

    #[test]
    fn test_mock_fs_read_to_string() {
        let fs = MockFileSystem::new();
        fs.add_file("/s/reference.md", "# Reference");

        assert_eq!(
            fs.read_to_string(Path::new("/s/reference.md"), 1024).unwrap(),
            "# Reference"
        );
        assert!(matches!(
            fs.read_to_string(Path::new("/s/reference.md"), 3),
            Err(LintError::FileTooBig { .. })
        ));
        assert!(matches!(
            fs.read_to_string(Path::new("/s"), 1024),
            Err(LintError::FileNotRegular { .. })
        ));
        assert!(fs.read_to_string(Path::new("/s/missing.md"), 1024).is_err());
    }

    #[test]
    fn test_mock_fs_read_dir_on_file_fails() {
        let fs = MockFileSystem::new();
        fs.add_file("/x/file.md", "x");

        assert!(fs.read_dir(Path::new("/x/file.md")).is_err());
        assert!(fs.read_dir(Path::new("/nope")).is_err());
    }

    #[test]
    fn test_walk_files_includes_hidden_directories() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join(".claude/commands/git")).unwrap();
        std::fs::write(temp.path().join(".claude/commands/git/commit.md"), "c").unwrap();
        std::fs::write(temp.path().join("top.md"), "t").unwrap();

        let real: Vec<PathBuf> = RealFileSystem
            .walk_files(temp.path())
            .into_iter()
            .map(|p| p.strip_prefix(temp.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            real,
            vec![
                PathBuf::from(".claude/commands/git/commit.md"),
                PathBuf::from("top.md")
            ]
        );

        let mock = MockFileSystem::new();
        mock.add_file("/p/.claude/commands/git/commit.md", "c");
        mock.add_file("/p/top.md", "t");
        mock.add_file("/other/x.md", "x");
        assert_eq!(
            mock.walk_files(Path::new("/p")),
            vec![
                PathBuf::from("/p/.claude/commands/git/commit.md"),
                PathBuf::from("/p/top.md")
            ]
        );
    }
}
