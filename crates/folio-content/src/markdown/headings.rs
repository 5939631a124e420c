//! ATX heading extraction.
//!
//! Scans a document body line by line for `#`-style headings and produces a
//! flat, source-ordered list of [`HeadingNode`]s with generated anchor ids.
//! Lines inside fenced code blocks are never treated as headings.
//!
//! ```rust
//! use folio_content::markdown::extract_headings;
//!
//! let body = "# Intro\n\n```sh\n# not a heading\n```\n\n## Getting Started";
//! let headings = extract_headings(body, 6);
//!
//! assert_eq!(headings.len(), 2);
//! assert_eq!(headings[1].id, "getting-started");
//! assert_eq!(headings[1].level, 2);
//! ```

use std::collections::HashSet;

use folio_core::util::ids::{generate_id, sanitize};
use serde::{Deserialize, Serialize};

/// Deepest heading level markdown supports.
pub const MAX_HEADING_LEVEL: u8 = 6;

/// Default depth limit for extraction (keep every level).
pub const DEFAULT_MAX_DEPTH: u8 = MAX_HEADING_LEVEL;

/// A heading found in a document body.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HeadingNode {
    /// Anchor id, unique within the document.
    pub id: String,
    /// Heading text with inline markup removed.
    pub text: String,
    /// Heading level, 1..=6.
    pub level: u8,
}

/// Extract headings from a markdown body.
///
/// A heading is a line beginning with 1–6 `#` characters followed by at
/// least one space or tab. Headings deeper than `max_depth` are dropped
/// entirely. When two headings produce the same id, later ones get `-2`,
/// `-3`, ... appended so anchors stay unique.
pub fn extract_headings(body: &str, max_depth: u8) -> Vec<HeadingNode> {
    let mut headings = Vec::new();
    let mut used_ids = HashSet::new();
    let mut fence: Option<Fence> = None;

    for line in body.lines() {
        if let Some(marker) = Fence::parse(line) {
            match &fence {
                None => fence = Some(marker),
                Some(open) if marker.closes(open) => fence = None,
                Some(_) => {}
            }
            continue;
        }
        if fence.is_some() {
            continue;
        }

        let Some((level, raw)) = parse_atx_heading(line) else {
            continue;
        };
        if level > max_depth {
            continue;
        }

        headings.push(HeadingNode {
            id: unique_id(generate_id(raw), &mut used_ids),
            text: sanitize(raw).trim().to_string(),
            level,
        });
    }

    headings
}

/// Parse a single line as an ATX heading, returning `(level, raw_text)`.
///
/// An optional closing `#` sequence (preceded by whitespace) is removed.
pub fn parse_atx_heading(line: &str) -> Option<(u8, &str)> {
    let hashes = line.bytes().take_while(|&b| b == b'#').count();
    if hashes == 0 || hashes > usize::from(MAX_HEADING_LEVEL) {
        return None;
    }

    let rest = &line[hashes..];
    if !rest.starts_with([' ', '\t']) {
        return None;
    }

    let text = strip_closing_sequence(rest.trim());
    if text.is_empty() {
        return None;
    }

    let level = u8::try_from(hashes).ok()?;
    Some((level, text))
}

fn strip_closing_sequence(text: &str) -> &str {
    let without = text.trim_end_matches('#');
    if without.len() == text.len() {
        text
    } else if without.is_empty() {
        ""
    } else if without.ends_with([' ', '\t']) {
        without.trim_end()
    } else {
        text
    }
}

fn unique_id(base: String, used: &mut HashSet<String>) -> String {
    let mut id = base.clone();
    let mut n = 2usize;
    while used.contains(&id) {
        id = if base.is_empty() {
            format!("heading-{n}")
        } else {
            format!("{base}-{n}")
        };
        n += 1;
    }
    used.insert(id.clone());
    id
}

/// An opening or closing code fence (```` ``` ```` or `~~~`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fence {
    marker: char,
    len: usize,
}

impl Fence {
    fn parse(line: &str) -> Option<Self> {
        let trimmed = line.trim_start();
        if line.len() - trimmed.len() > 3 {
            return None;
        }
        let marker = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')?;
        let len = trimmed.chars().take_while(|c| *c == marker).count();
        (len >= 3).then_some(Self { marker, len })
    }

    fn closes(&self, open: &Fence) -> bool {
        self.marker == open.marker && self.len >= open.len
    }
}
