//! Path argument resolution
//!
//! A path argument is tried, in order, as an existing file, an existing
//! directory and a glob pattern. What each of those expands to depends on the
//! artifact kind:
//!
//! | Kind    | File              | Directory                                           |
//! |---------|-------------------|-----------------------------------------------------|
//! | skill   | must be SKILL.md  | `SKILL.md`, else `*/SKILL.md`, else `**/SKILL.md`   |
//! | agent   | must be `.md`     | `*.md` except README.md                             |
//! | command | must be `.md`     | `**/*.md` except README.md                          |
//! | hook    | must be `.json`   | `settings*.json`                                    |
//! | plugin  | rejected          | itself if it has `.claude-plugin/`, else children that do |
//!
//! Results are sorted, deduplicated and then filtered by the configured
//! `exclude` patterns. Patterns are matched below the directory argument (or
//! the fixed prefix of a glob), never against the folders above it, and a
//! file named explicitly is never excluded.
//!
//! Lookups go through [`LintConfig::fs`]; glob expansion itself always reads
//! the real file system.

use crate::config::LintConfig;
use crate::diagnostics::{LintError, LintResult};
use crate::fs::FileSystem;
use crate::rules::plugin::PLUGIN_DIR;
use crate::ArtifactKind;
use std::path::{Component, Path, PathBuf};

const SKILL_FILE: &str = "SKILL.md";
const README_FILE: &str = "README.md";

/// Paths found for one argument, plus the folder exclude patterns are
/// anchored at (`None` for an explicit file)
struct Selection {
    paths: Vec<PathBuf>,
    base: Option<PathBuf>,
}

/// Resolve `arg` to the sorted list of artifacts of `kind` it names
pub fn resolve_paths(
    kind: ArtifactKind,
    arg: &str,
    config: &LintConfig,
) -> LintResult<Vec<PathBuf>> {
    let excludes = compile_excludes(&config.exclude)?;
    let Selection { mut paths, base } = select(kind, arg, config.fs())?;
    paths.sort();
    paths.dedup();

    let found = paths.len();
    if let Some(base) = &base {
        paths.retain(|path| !is_excluded(path, base, &excludes));
    }
    tracing::debug!(
        kind = kind.noun(),
        arg,
        found,
        kept = paths.len(),
        "resolved path argument"
    );

    if paths.is_empty() {
        return Err(LintError::NothingToValidate {
            what: format!("{}s", kind.noun()),
        });
    }
    Ok(paths)
}

fn select(kind: ArtifactKind, arg: &str, fs: &dyn FileSystem) -> LintResult<Selection> {
    let path = Path::new(arg);
    if fs.is_file(path) {
        return Ok(Selection {
            paths: vec![resolve_file(kind, path)?],
            base: None,
        });
    }
    if fs.is_dir(path) {
        return Ok(Selection {
            paths: resolve_dir(kind, path, fs)?,
            base: Some(path.to_path_buf()),
        });
    }
    if is_glob(arg) {
        return Ok(Selection {
            paths: resolve_glob(kind, arg, fs)?,
            base: Some(glob_base(arg)),
        });
    }
    Err(LintError::PathNotFound(arg.to_string()))
}

fn is_glob(arg: &str) -> bool {
    arg.contains('*') || arg.contains('?')
}

/// Leading components of `pattern` without wildcards
fn glob_base(pattern: &str) -> PathBuf {
    Path::new(pattern)
        .components()
        .take_while(|c| {
            !c.as_os_str()
                .to_string_lossy()
                .contains(['*', '?', '['])
        })
        .collect()
}

fn resolve_file(kind: ArtifactKind, path: &Path) -> LintResult<PathBuf> {
    let accepted = match kind {
        ArtifactKind::Skill => file_name(path) == SKILL_FILE,
        ArtifactKind::Agent | ArtifactKind::Command => has_extension(path, "md"),
        ArtifactKind::Hook => has_extension(path, "json"),
        ArtifactKind::Plugin => false,
    };
    if accepted {
        Ok(path.to_path_buf())
    } else {
        Err(LintError::UnexpectedFile {
            expected: expected_file(kind).to_string(),
            found: file_name(path),
        })
    }
}

fn resolve_dir(kind: ArtifactKind, dir: &Path, fs: &dyn FileSystem) -> LintResult<Vec<PathBuf>> {
    let paths = match kind {
        ArtifactKind::Skill => skills_in(dir, fs),
        ArtifactKind::Agent => list_files(dir, fs)
            .into_iter()
            .filter(|p| is_markdown_artifact(p))
            .collect(),
        ArtifactKind::Command => fs
            .walk_files(dir)
            .into_iter()
            .filter(|p| is_markdown_artifact(p))
            .collect(),
        ArtifactKind::Hook => list_files(dir, fs)
            .into_iter()
            .filter(|p| {
                let name = file_name(p);
                name.starts_with("settings") && name.ends_with(".json")
            })
            .collect(),
        ArtifactKind::Plugin => {
            if is_plugin_dir(dir, fs) {
                vec![dir.to_path_buf()]
            } else {
                list_dirs(dir, fs)
                    .into_iter()
                    .filter(|d| is_plugin_dir(d, fs))
                    .collect()
            }
        }
    };

    if paths.is_empty() {
        let hint = match kind {
            ArtifactKind::Plugin => " (plugins must have .claude-plugin/ directory)",
            _ => "",
        };
        return Err(LintError::NothingFound {
            what: dir_search_noun(kind).to_string(),
            dir: dir.to_path_buf(),
            hint: hint.to_string(),
        });
    }
    Ok(paths)
}

/// `<dir>/SKILL.md`, else one level down, else anywhere below
fn skills_in(dir: &Path, fs: &dyn FileSystem) -> Vec<PathBuf> {
    let direct = dir.join(SKILL_FILE);
    if fs.is_file(&direct) {
        return vec![direct];
    }

    let children: Vec<PathBuf> = list_dirs(dir, fs)
        .into_iter()
        .map(|child| child.join(SKILL_FILE))
        .filter(|candidate| fs.is_file(candidate))
        .collect();
    if !children.is_empty() {
        return children;
    }

    fs.walk_files(dir)
        .into_iter()
        .filter(|p| file_name(p) == SKILL_FILE)
        .collect()
}

fn resolve_glob(kind: ArtifactKind, pattern: &str, fs: &dyn FileSystem) -> LintResult<Vec<PathBuf>> {
    let entries = glob::glob(pattern).map_err(|source| LintError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let paths: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .filter(|path| match kind {
            ArtifactKind::Skill => fs.is_file(path) && file_name(path) == SKILL_FILE,
            ArtifactKind::Agent | ArtifactKind::Command => {
                fs.is_file(path) && is_markdown_artifact(path)
            }
            ArtifactKind::Hook => fs.is_file(path) && has_extension(path, "json"),
            ArtifactKind::Plugin => is_plugin_dir(path, fs),
        })
        .collect();

    if paths.is_empty() {
        return Err(LintError::NoPatternMatches {
            what: pattern_noun(kind).to_string(),
            pattern: pattern.to_string(),
        });
    }
    Ok(paths)
}

fn expected_file(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::Skill => "SKILL.md file",
        ArtifactKind::Agent | ArtifactKind::Command => ".md file",
        ArtifactKind::Hook => ".json file",
        ArtifactKind::Plugin => "plugin directory",
    }
}

fn dir_search_noun(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::Skill => "SKILL.md files",
        ArtifactKind::Agent => "agent .md files",
        ArtifactKind::Command => "command .md files",
        ArtifactKind::Hook => "settings*.json files",
        ArtifactKind::Plugin => "plugins",
    }
}

fn pattern_noun(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::Skill => "SKILL.md files",
        ArtifactKind::Agent => "agent files",
        ArtifactKind::Command => "command files",
        ArtifactKind::Hook => "settings files",
        ArtifactKind::Plugin => "plugins",
    }
}

fn is_plugin_dir(path: &Path, fs: &dyn FileSystem) -> bool {
    fs.is_dir(path) && fs.exists(&path.join(PLUGIN_DIR))
}

fn is_markdown_artifact(path: &Path) -> bool {
    has_extension(path, "md") && file_name(path) != README_FILE
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().is_some_and(|e| e == ext)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn list_files(dir: &Path, fs: &dyn FileSystem) -> Vec<PathBuf> {
    list_children(dir, fs, |entry| entry.metadata.is_file)
}

fn list_dirs(dir: &Path, fs: &dyn FileSystem) -> Vec<PathBuf> {
    list_children(dir, fs, |entry| entry.metadata.is_dir)
}

/// Direct children of `dir` matching `keep`, sorted
fn list_children(
    dir: &Path,
    fs: &dyn FileSystem,
    keep: fn(&crate::fs::DirEntry) -> bool,
) -> Vec<PathBuf> {
    match fs.read_dir(dir) {
        Ok(entries) => entries
            .into_iter()
            .filter(|entry| keep(entry))
            .map(|entry| entry.path)
            .collect(),
        Err(e) => {
            tracing::debug!(dir = %dir.display(), error = %e, "cannot list directory");
            Vec::new()
        }
    }
}

fn compile_excludes(patterns: &[String]) -> LintResult<Vec<glob::Pattern>> {
    patterns
        .iter()
        .map(|p| {
            glob::Pattern::new(p).map_err(|source| LintError::InvalidPattern {
                pattern: p.clone(),
                source,
            })
        })
        .collect()
}

/// A path is excluded when a pattern matches its part below `base`, or any
/// trailing run of that part's components, so `node_modules/**` also skips
/// `a/node_modules/b/SKILL.md`.
fn is_excluded(path: &Path, base: &Path, patterns: &[glob::Pattern]) -> bool {
    if patterns.is_empty() {
        return false;
    }
    let relative = path.strip_prefix(base).unwrap_or(path);
    let components: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    (0..components.len()).any(|start| {
        let suffix = components[start..].join("/");
        patterns.iter().any(|p| p.matches(&suffix))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn mock_config(files: &[&str]) -> LintConfig {
        let fs = MockFileSystem::new();
        for file in files {
            fs.add_file(file, "x");
        }
        LintConfig::default().with_fs(Arc::new(fs))
    }

    fn resolve(kind: ArtifactKind, arg: &str, config: &LintConfig) -> LintResult<Vec<PathBuf>> {
        resolve_paths(kind, arg, config)
    }

    fn strings(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .collect()
    }

    fn touch(root: &Path, relative: &str) -> PathBuf {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, "x").unwrap();
        path
    }

    fn names_under(root: &Path, paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| {
                p.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn test_skill_file_must_be_named_skill_md() {
        let config = mock_config(&["/s/README.md"]);

        let err = resolve(ArtifactKind::Skill, "/s/README.md", &config).unwrap_err();
        assert_eq!(err.to_string(), "Expected SKILL.md file, got: README.md");
    }

    #[test]
    fn test_skill_directory_levels() {
        let config = mock_config(&[
            "/r/direct/SKILL.md",
            "/r/parent/b/SKILL.md",
            "/r/parent/a/SKILL.md",
            "/r/deep/x/y/SKILL.md",
        ]);

        let direct = resolve(ArtifactKind::Skill, "/r/direct", &config).unwrap();
        assert_eq!(strings(&direct), vec!["/r/direct/SKILL.md"]);

        let parent = resolve(ArtifactKind::Skill, "/r/parent", &config).unwrap();
        assert_eq!(
            strings(&parent),
            vec!["/r/parent/a/SKILL.md", "/r/parent/b/SKILL.md"]
        );

        let deep = resolve(ArtifactKind::Skill, "/r/deep", &config).unwrap();
        assert_eq!(strings(&deep), vec!["/r/deep/x/y/SKILL.md"]);
    }

    #[test]
    fn test_empty_skill_directory() {
        let config = mock_config(&["/r/notes.txt"]);
        let err = resolve(ArtifactKind::Skill, "/r", &config).unwrap_err();
        assert_eq!(err.to_string(), "No SKILL.md files found in: /r");
    }

    #[test]
    fn test_agents_are_not_recursive_commands_are() {
        let config = mock_config(&[
            "/dir/a.md",
            "/dir/README.md",
            "/dir/notes.txt",
            "/dir/nested/b.md",
        ]);

        let agents = resolve(ArtifactKind::Agent, "/dir", &config).unwrap();
        assert_eq!(strings(&agents), vec!["/dir/a.md"]);

        let commands = resolve(ArtifactKind::Command, "/dir", &config).unwrap();
        assert_eq!(strings(&commands), vec!["/dir/a.md", "/dir/nested/b.md"]);
    }

    #[test]
    fn test_hook_directory_finds_settings_files() {
        let config = mock_config(&[
            "/p/.claude/settings.json",
            "/p/.claude/settings.local.json",
            "/p/.claude/other.json",
            "/p/x.md",
        ]);

        let hooks = resolve(ArtifactKind::Hook, "/p/.claude", &config).unwrap();
        assert_eq!(
            strings(&hooks),
            vec!["/p/.claude/settings.json", "/p/.claude/settings.local.json"]
        );

        let explicit = resolve(ArtifactKind::Hook, "/p/.claude/other.json", &config).unwrap();
        assert_eq!(strings(&explicit), vec!["/p/.claude/other.json"]);

        let err = resolve(ArtifactKind::Hook, "/p/x.md", &config).unwrap_err();
        assert_eq!(err.to_string(), "Expected .json file, got: x.md");
    }

    #[test]
    fn test_plugin_directories() {
        let config = mock_config(&[
            "/plugins/one/.claude-plugin/plugin.json",
            "/plugins/two/.claude-plugin/plugin.json",
            "/plugins/not-a-plugin/README.md",
        ]);

        let single = resolve(ArtifactKind::Plugin, "/plugins/one", &config).unwrap();
        assert_eq!(strings(&single), vec!["/plugins/one"]);

        let parent = resolve(ArtifactKind::Plugin, "/plugins", &config).unwrap();
        assert_eq!(strings(&parent), vec!["/plugins/one", "/plugins/two"]);

        let err = resolve(ArtifactKind::Plugin, "/plugins/not-a-plugin", &config).unwrap_err();
        assert!(err
            .to_string()
            .ends_with("(plugins must have .claude-plugin/ directory)"));

        let err = resolve(ArtifactKind::Plugin, "/plugins/not-a-plugin/README.md", &config)
            .unwrap_err();
        assert_eq!(err.to_string(), "Expected plugin directory, got: README.md");
    }

    #[test]
    fn test_missing_path() {
        let config = mock_config(&[]);
        let err = resolve(ArtifactKind::Agent, "no/such/agent.md", &config).unwrap_err();
        assert_eq!(err.to_string(), "Path not found: no/such/agent.md");
    }

    #[test]
    fn test_exclude_patterns_below_directory_argument() {
        let config = LintConfig {
            exclude: vec!["node_modules/**".to_string(), "drafts/**".to_string()],
            ..mock_config(&[
                "/cmds/deploy.md",
                "/cmds/node_modules/pkg/readme-ish.md",
                "/cmds/drafts/wip.md",
            ])
        };

        let commands = resolve(ArtifactKind::Command, "/cmds", &config).unwrap();
        assert_eq!(strings(&commands), vec!["/cmds/deploy.md"]);
    }

    #[test]
    fn test_excluded_folder_above_argument_is_ignored() {
        let config = mock_config(&[
            "/work/target/proj/.claude/agents/reviewer.md",
            "/work/target/proj/.claude/commands/ship.md",
        ]);

        let agent = "/work/target/proj/.claude/agents/reviewer.md";
        let agents = resolve(ArtifactKind::Agent, agent, &config).unwrap();
        assert_eq!(strings(&agents), vec![agent]);

        let commands = resolve(ArtifactKind::Command, "/work/target/proj/.claude/commands", &config)
            .unwrap();
        assert_eq!(
            strings(&commands),
            vec!["/work/target/proj/.claude/commands/ship.md"]
        );
    }

    #[test]
    fn test_explicit_file_is_never_excluded() {
        let config = LintConfig {
            exclude: vec!["*.md".to_string()],
            ..mock_config(&["/agents/a.md"])
        };

        let agents = resolve(ArtifactKind::Agent, "/agents/a.md", &config).unwrap();
        assert_eq!(strings(&agents), vec!["/agents/a.md"]);
    }

    #[test]
    fn test_everything_excluded() {
        let config = LintConfig {
            exclude: vec!["*.md".to_string()],
            ..mock_config(&["/agents/a.md"])
        };

        let err = resolve(ArtifactKind::Agent, "/agents", &config).unwrap_err();
        assert_eq!(err.to_string(), "No agents found to validate");
    }

    #[test]
    fn test_invalid_exclude_pattern() {
        let config = LintConfig {
            exclude: vec!["[".to_string()],
            ..mock_config(&["/a.md"])
        };

        let err = resolve(ArtifactKind::Agent, "/a.md", &config).unwrap_err();
        assert!(matches!(err, LintError::InvalidPattern { .. }));
    }

    #[test]
    fn test_glob_base() {
        assert_eq!(glob_base("skills/*/SKILL.md"), PathBuf::from("skills"));
        assert_eq!(glob_base("/a/b/**/*.md"), PathBuf::from("/a/b"));
        assert_eq!(glob_base("*.md"), PathBuf::new());
    }

    #[test]
    fn test_glob_patterns() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(root, "skills/b/SKILL.md");
        touch(root, "skills/a/SKILL.md");
        touch(root, "skills/a/reference.md");

        let pattern = format!("{}/skills/*/*.md", root.display());
        let skills = resolve_paths(ArtifactKind::Skill, &pattern, &LintConfig::default()).unwrap();
        assert_eq!(
            names_under(root, &skills),
            vec!["skills/a/SKILL.md", "skills/b/SKILL.md"]
        );

        let pattern = format!("{}/skills/*/*.json", root.display());
        let err = resolve_paths(ArtifactKind::Hook, &pattern, &LintConfig::default()).unwrap_err();
        assert!(err.to_string().starts_with("No settings files match pattern: "));
    }

    #[test]
    fn test_default_excludes_skip_target_parent_on_disk() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let agent = touch(root, "target/proj/.claude/agents/reviewer.md");
        let config = LintConfig::default();

        let explicit = resolve_paths(ArtifactKind::Agent, &agent.to_string_lossy(), &config).unwrap();
        assert_eq!(explicit, vec![agent.clone()]);

        let dir = root.join("target/proj/.claude/agents");
        let listed = resolve_paths(ArtifactKind::Agent, &dir.to_string_lossy(), &config).unwrap();
        assert_eq!(listed, vec![agent.clone()]);

        let pattern = format!("{}/target/proj/.claude/agents/*.md", root.display());
        let globbed = resolve_paths(ArtifactKind::Agent, &pattern, &config).unwrap();
        assert_eq!(globbed, vec![agent]);
    }

    #[test]
    fn test_glob_excludes_apply_below_fixed_prefix() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(root, "cmds/deploy.md");
        touch(root, "cmds/node_modules/pkg/dep.md");

        let pattern = format!("{}/cmds/**/*.md", root.display());
        let commands =
            resolve_paths(ArtifactKind::Command, &pattern, &LintConfig::default()).unwrap();
        assert_eq!(names_under(root, &commands), vec!["cmds/deploy.md"]);
    }
}
