//! Frontmatter extraction
//!
//! This is deliberately not a YAML parser. The block between the leading
//! `---` delimiters is read one line at a time as flat `key: value` pairs:
//!
//! - blank lines and lines starting with `#` are skipped
//! - a line is split on its *first* colon; key and value are trimmed
//! - one layer of matching `"` or `'` quotes around the value is removed
//! - lines without a colon are ignored
//! - a repeated key overwrites the earlier value (last write wins)
//!
//! Nested mappings, lists and multi-line scalars are not understood. A list
//! item such as `- Bash` has no colon and is dropped; a nested `key: value`
//! is flattened. No diagnostic is produced for either. This permissive
//! behaviour is part of the contract: artifacts that pass today keep passing.

use thiserror::Error;

/// Delimiter line that opens and closes the block
pub const DELIMITER: &str = "---";

/// Structural failure of the frontmatter block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FrontmatterError {
    #[error("YAML frontmatter must start with --- on line 1")]
    MissingDelimiter,
    #[error("Invalid YAML frontmatter: missing closing ---")]
    UnterminatedBlock,
}

/// Ordered, string-keyed metadata parsed from the block.
///
/// Keys keep the position of their first occurrence; values are replaced on
/// repetition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    entries: Vec<(String, String)>,
}

impl Frontmatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    BeforeBlock,
    InBlock,
    Done,
}

/// Parse the leading frontmatter block of `content`.
pub fn extract_frontmatter(content: &str) -> Result<Frontmatter, FrontmatterError> {
    let mut state = ScanState::BeforeBlock;
    let mut frontmatter = Frontmatter::new();

    for line in content.split('\n') {
        match state {
            ScanState::BeforeBlock => {
                if line.trim_end() != DELIMITER {
                    return Err(FrontmatterError::MissingDelimiter);
                }
                state = ScanState::InBlock;
            }
            ScanState::InBlock => {
                if line.trim() == DELIMITER {
                    state = ScanState::Done;
                    break;
                }
                if let Some((key, value)) = parse_entry(line) {
                    frontmatter.insert(key, value);
                }
            }
            ScanState::Done => break,
        }
    }

    match state {
        ScanState::Done => Ok(frontmatter),
        ScanState::InBlock => Err(FrontmatterError::UnterminatedBlock),
        // split() always yields at least one segment
        ScanState::BeforeBlock => Err(FrontmatterError::MissingDelimiter),
    }
}

/// Split one block line into a key/value pair, if it carries one
fn parse_entry(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let (key, value) = line.split_once(':')?;
    Some((key.trim(), strip_quotes(value.trim())))
}

/// Remove one layer of matching single or double quotes
fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_extract_simple_block() {
        let content = "---\nname: test-skill\ndescription: A test skill\n---\nBody content here";

        let fm = extract_frontmatter(content).unwrap();
        assert_eq!(fm.get("name"), Some("test-skill"));
        assert_eq!(fm.get("description"), Some("A test skill"));
        assert_eq!(fm.len(), 2);
    }

    #[test]
    fn test_missing_opening_delimiter() {
        assert_eq!(
            extract_frontmatter("Just body content"),
            Err(FrontmatterError::MissingDelimiter)
        );
        assert_eq!(
            extract_frontmatter("\n---\nname: x\n---\n"),
            Err(FrontmatterError::MissingDelimiter)
        );
        assert_eq!(extract_frontmatter(""), Err(FrontmatterError::MissingDelimiter));
    }

    #[test]
    fn test_opening_delimiter_must_be_exact() {
        assert_eq!(
            extract_frontmatter("----\nname: x\n---\n"),
            Err(FrontmatterError::MissingDelimiter)
        );
        assert_eq!(
            extract_frontmatter("--- yaml\nname: x\n---\n"),
            Err(FrontmatterError::MissingDelimiter)
        );
    }

    #[test]
    fn test_crlf_line_endings() {
        let fm = extract_frontmatter("---\r\nname: x\r\n---\r\nBody").unwrap();
        assert_eq!(fm.get("name"), Some("x"));
    }

    #[test]
    fn test_unterminated_block() {
        assert_eq!(
            extract_frontmatter("---\nname: x\ndescription: y\n"),
            Err(FrontmatterError::UnterminatedBlock)
        );
        assert_eq!(
            extract_frontmatter("---"),
            Err(FrontmatterError::UnterminatedBlock)
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            FrontmatterError::MissingDelimiter.to_string(),
            "YAML frontmatter must start with --- on line 1"
        );
        assert_eq!(
            FrontmatterError::UnterminatedBlock.to_string(),
            "Invalid YAML frontmatter: missing closing ---"
        );
    }

    #[test]
    fn test_split_on_first_colon() {
        let fm = extract_frontmatter("---\ndescription: Use when: things happen\n---\n").unwrap();
        assert_eq!(fm.get("description"), Some("Use when: things happen"));
    }

    #[test]
    fn test_skips_blank_comment_and_colonless_lines() {
        let content = "---\n\n# a comment: with colon\nname: x\n  - Bash\nplain words\n---\n";
        let fm = extract_frontmatter(content).unwrap();

        assert_eq!(fm.len(), 1);
        assert_eq!(fm.get("name"), Some("x"));
        assert!(!fm.contains_key("# a comment"));
    }

    #[test]
    fn test_strips_one_layer_of_matching_quotes() {
        let content = "---\na: \"double\"\nb: 'single'\nc: \"'nested'\"\nd: \"unbalanced'\ne: \"\n---\n";
        let fm = extract_frontmatter(content).unwrap();

        assert_eq!(fm.get("a"), Some("double"));
        assert_eq!(fm.get("b"), Some("single"));
        assert_eq!(fm.get("c"), Some("'nested'"));
        assert_eq!(fm.get("d"), Some("\"unbalanced'"));
        assert_eq!(fm.get("e"), Some("\""));
    }

    #[test]
    fn test_last_write_wins_keeps_first_position() {
        let fm = extract_frontmatter("---\nname: first\nmodel: opus\nname: second\n---\n").unwrap();

        assert_eq!(fm.get("name"), Some("second"));
        let keys: Vec<&str> = fm.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["name", "model"]);
    }

    #[test]
    fn test_empty_block_is_valid() {
        let fm = extract_frontmatter("---\n---\nBody").unwrap();
        assert!(fm.is_empty());
    }

    #[test]
    fn test_closing_delimiter_may_be_indented() {
        let fm = extract_frontmatter("---\nname: x\n  ---  \nBody").unwrap();
        assert_eq!(fm.get("name"), Some("x"));
    }

    #[test]
    fn test_nested_yaml_is_flattened_silently() {
        let content = "---\nname: x\nmetadata:\n  author: someone\ntools:\n  - Read\n---\n";
        let fm = extract_frontmatter(content).unwrap();

        assert_eq!(fm.get("metadata"), Some(""));
        assert_eq!(fm.get("author"), Some("someone"));
        assert_eq!(fm.get("tools"), Some(""));
    }

    fn render(entries: &[(String, String)]) -> String {
        let mut out = String::from("---\n");
        for (k, v) in entries {
            out.push_str(&format!("{}: {}\n", k, v));
        }
        out.push_str("---\nbody\n");
        out
    }

    proptest! {
        #[test]
        fn prop_extraction_is_idempotent(
            entries in prop::collection::vec(("[a-z][a-z-]{0,10}", "[A-Za-z0-9 .,'\"]{0,30}"), 0..8)
        ) {
            let text = render(&entries);
            let first = extract_frontmatter(&text).unwrap();
            let second = extract_frontmatter(&text).unwrap();
            prop_assert_eq!(&first, &second);

            let rerendered: Vec<(String, String)> = first
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            let reparsed = extract_frontmatter(&render(&rerendered)).unwrap();
            prop_assert_eq!(first.len(), reparsed.len());
            for (key, _) in first.iter() {
                prop_assert!(reparsed.contains_key(key));
            }
        }

        #[test]
        fn prop_every_written_key_is_present(
            keys in prop::collection::vec("[a-z][a-z0-9-]{0,10}", 1..6)
        ) {
            let entries: Vec<(String, String)> =
                keys.iter().map(|k| (k.clone(), "value".to_string())).collect();
            let fm = extract_frontmatter(&render(&entries)).unwrap();
            for key in &keys {
                prop_assert_eq!(fm.get(key), Some("value"));
            }
        }
    }
}
