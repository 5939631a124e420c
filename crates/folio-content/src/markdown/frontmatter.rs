//! Frontmatter extraction from markdown documents.
//!
//! Frontmatter is metadata at the start of a document, delimited by `---`
//! lines and written as line-oriented `key: value` pairs. Bracketed,
//! comma-separated values become lists:
//!
//! ```markdown
//! ---
//! title: Shipping the content engine
//! publishedAt: 2024-05-01
//! categories: [Rust, Web]
//! ---
//!
//! # Shipping the content engine
//! ```
//!
//! The block is located with a small line scanner rather than a regular
//! expression so that the delimiter rules are easy to audit: the first line
//! must be exactly `---` and the block ends at the next line that is exactly
//! `---`.
//!
//! # Usage
//!
//! ```rust
//! use folio_content::markdown::parse_document;
//!
//! let doc = parse_document("---\ntitle: Hello\ncategories: [A, B]\n---\nBody").unwrap();
//! assert_eq!(doc.metadata.get_str("title"), Some("Hello"));
//! assert_eq!(doc.metadata.get_list("categories"), vec!["A", "B"]);
//! assert_eq!(doc.body, "Body");
//! ```

use folio_core::{Error, Result};
use serde::Serialize;

use crate::metadata::{MetaValue, Metadata};

/// Delimiter line opening and closing a frontmatter block.
pub const DELIMITER: &str = "---";

/// Separator between a key and its value. Only the first occurrence on a
/// line is significant.
const KEY_SEPARATOR: &str = ": ";

/// A parsed document: metadata plus trimmed body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedDocument {
    /// Every frontmatter field found.
    pub metadata: Metadata,
    /// Body text after the frontmatter block, trimmed.
    pub body: String,
}

/// Parse a raw document into metadata and body.
///
/// # Errors
///
/// Returns [`Error::FrontmatterMissing`] when the document does not begin
/// with a `---` line or the block is never closed. The whole document is
/// never silently treated as body.
///
/// # Example
///
/// ```rust
/// use folio_content::markdown::parse_document;
///
/// let err = parse_document("# No frontmatter").unwrap_err();
/// assert!(err.is_frontmatter_missing());
/// ```
pub fn parse_document(raw: &str) -> Result<ParsedDocument> {
    let (block, rest) = split_frontmatter(raw).ok_or_else(|| {
        Error::frontmatter_missing("document must start with a '---' delimited block")
    })?;

    Ok(ParsedDocument {
        metadata: parse_metadata_block(block),
        body: rest.trim().to_string(),
    })
}

/// Strip frontmatter from content, returning only the body.
///
/// Content without a frontmatter block is returned unchanged. The body is
/// not trimmed.
///
/// # Example
///
/// ```rust
/// use folio_content::markdown::strip_frontmatter;
///
/// assert_eq!(strip_frontmatter("---\ntitle: T\n---\n# Heading").trim(), "# Heading");
/// assert_eq!(strip_frontmatter("# Just content"), "# Just content");
/// ```
pub fn strip_frontmatter(raw: &str) -> &str {
    split_frontmatter(raw).map(|(_, rest)| rest).unwrap_or(raw)
}

/// Render metadata as a frontmatter block (including both delimiters and a
/// trailing newline).
///
/// Lists are written as `[a, b]`. For values without `": "`, brackets,
/// commas inside list items, or wrapping quotes, [`parse_document`] reads
/// back exactly what was written.
pub fn serialize_frontmatter(metadata: &Metadata) -> String {
    let mut out = String::from(DELIMITER);
    out.push('\n');
    for (key, value) in metadata.iter() {
        match value {
            MetaValue::Scalar(s) => {
                out.push_str(key);
                out.push(':');
                if !s.is_empty() {
                    out.push(' ');
                    out.push_str(s);
                }
            }
            MetaValue::List(items) => {
                out.push_str(key);
                out.push_str(": [");
                out.push_str(&items.join(", "));
                out.push(']');
            }
        }
        out.push('\n');
    }
    out.push_str(DELIMITER);
    out.push('\n');
    out
}

/// Render a complete document: frontmatter block, blank line, body.
pub fn serialize_document(doc: &ParsedDocument) -> String {
    format!("{}\n{}\n", serialize_frontmatter(&doc.metadata), doc.body)
}

/// Locate the frontmatter block. Returns `(interior, rest_after_block)`.
fn split_frontmatter(raw: &str) -> Option<(&str, &str)> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let mut lines = raw.split_inclusive('\n');

    let first = lines.next()?;
    if !is_delimiter(first) {
        return None;
    }

    let start = first.len();
    let mut offset = start;
    for line in lines {
        if is_delimiter(line) {
            return Some((&raw[start..offset], &raw[offset + line.len()..]));
        }
        offset += line.len();
    }

    log::debug!("Frontmatter opening delimiter found but no closing delimiter");
    None
}

/// A line of exactly `---`, ignoring its line ending (`\n` or `\r\n`).
fn is_delimiter(line: &str) -> bool {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line) == DELIMITER
}

fn parse_metadata_block(block: &str) -> Metadata {
    let mut metadata = Metadata::new();

    for line in block.lines().map(str::trim) {
        if line.is_empty() {
            continue;
        }

        let (key, raw_value) = match line.split_once(KEY_SEPARATOR) {
            Some((key, value)) => (key.trim(), value.trim()),
            None => match line.strip_suffix(':') {
                Some(key) => (key.trim(), ""),
                None => {
                    log::debug!("Skipping frontmatter line without separator: {line}");
                    continue;
                }
            },
        };

        if key.is_empty() {
            continue;
        }

        metadata.insert(key, parse_value(raw_value));
    }

    metadata
}

fn parse_value(raw: &str) -> MetaValue {
    let value = strip_quotes(raw);

    match value
        .strip_prefix('[')
        .and_then(|inner| inner.strip_suffix(']'))
    {
        Some(inner) => MetaValue::List(
            inner
                .split(',')
                .map(|item| strip_quotes(item.trim()).trim())
                .filter(|item| !item.is_empty())
                .map(String::from)
                .collect(),
        ),
        None => MetaValue::Scalar(value.to_string()),
    }
}

/// Strip one layer of matching `'...'` or `"..."` quotes.
fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

// ============================================================================
// Tests
// ============================================================================
