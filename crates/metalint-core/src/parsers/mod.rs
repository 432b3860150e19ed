//! Parsers for the two artifact encodings: frontmatter markdown and JSON

pub mod frontmatter;
pub mod json;
