//! Markdown structure parsing utilities.
//!
//! Event-driven helpers built on `pulldown-cmark`:
//!
//! - Extract first heading (any level)
//! - Extract first paragraph (summary fallback)
//! - Strip formatting to get plain text
//! - Word count and read-time estimation
//!
//! # Example
//!
//! ```rust
//! use folio_content::markdown::parser::{extract_first_heading, extract_first_paragraph};
//! use pulldown_cmark::HeadingLevel;
//!
//! let content = "# My Title\n\nThis is the first paragraph.\n\n## Section";
//!
//! let (level, title) = extract_first_heading(content).unwrap();
//! assert_eq!(level, HeadingLevel::H1);
//! assert_eq!(title, "My Title");
//!
//! let paragraph = extract_first_paragraph(content, 100).unwrap();
//! assert_eq!(paragraph, "This is the first paragraph.");
//! ```

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};

/// Reading speed used when none is configured.
pub const DEFAULT_WORDS_PER_MINUTE: u32 = 200;

/// Extract the first heading from markdown content.
///
/// Returns the heading level and text content. Inline formatting (bold, italic,
/// links) is stripped from the heading text.
///
/// # Example
///
/// ```rust
/// use folio_content::markdown::parser::extract_first_heading;
/// use pulldown_cmark::HeadingLevel;
///
/// let content = "Some text\n\n## Introduction\n\nMore text";
/// let (level, text) = extract_first_heading(content).unwrap();
/// assert_eq!(level, HeadingLevel::H2);
/// assert_eq!(text, "Introduction");
/// ```
pub fn extract_first_heading(content: &str) -> Option<(HeadingLevel, String)> {
    let mut in_heading = false;
    let mut heading_level = HeadingLevel::H1;
    let mut heading_text = String::new();

    for event in Parser::new(content) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                in_heading = true;
                heading_level = level;
                heading_text.clear();
            }
            Event::End(TagEnd::Heading(_)) => {
                if in_heading && !heading_text.trim().is_empty() {
                    return Some((heading_level, heading_text.trim().to_string()));
                }
                in_heading = false;
            }
            Event::Text(text) | Event::Code(text) if in_heading => {
                heading_text.push_str(&text);
            }
            Event::SoftBreak | Event::HardBreak if in_heading => {
                heading_text.push(' ');
            }
            _ => {}
        }
    }

    None
}

/// Extract the first paragraph from markdown content.
///
/// Skips headings and extracts the first actual paragraph content.
/// Inline formatting is stripped. Content longer than `max_chars` characters
/// is cut at a word boundary and suffixed with `...`.
///
/// # Example
///
/// ```rust
/// use folio_content::markdown::parser::extract_first_paragraph;
///
/// let content = "# Title\n\nThis is a **bold** introduction.\n\nMore content.";
/// let paragraph = extract_first_paragraph(content, 50).unwrap();
/// assert_eq!(paragraph, "This is a bold introduction.");
/// ```
pub fn extract_first_paragraph(content: &str, max_chars: usize) -> Option<String> {
    let mut in_paragraph = false;
    let mut in_heading = false;
    let mut paragraph_text = String::new();

    for event in Parser::new(content) {
        match event {
            Event::Start(Tag::Heading { .. }) => in_heading = true,
            Event::End(TagEnd::Heading(_)) => in_heading = false,

            Event::Start(Tag::Paragraph) if !in_heading => {
                in_paragraph = true;
                paragraph_text.clear();
            }
            Event::End(TagEnd::Paragraph) if in_paragraph => {
                let trimmed = paragraph_text.trim();
                if !trimmed.is_empty() {
                    return Some(truncate_text(trimmed, max_chars));
                }
                in_paragraph = false;
            }

            Event::Text(text) | Event::Code(text) if in_paragraph => {
                paragraph_text.push_str(&text);
            }
            Event::SoftBreak | Event::HardBreak if in_paragraph => {
                paragraph_text.push(' ');
            }

            _ => {}
        }
    }

    None
}

/// Extract plain text content from markdown, stripping all formatting.
///
/// Fenced and indented code blocks are dropped; inline code is kept.
/// Whitespace in the result is collapsed to single spaces.
///
/// # Example
///
/// ```rust
/// use folio_content::markdown::parser::extract_text_content;
///
/// let content = "# Title\n\nSome **bold** and *italic* text.\n\n```rust\ncode\n```";
/// let text = extract_text_content(content);
/// assert_eq!(text, "Title Some bold and italic text.");
/// ```
pub fn extract_text_content(content: &str) -> String {
    let mut text_content = String::new();
    let mut in_code_block = false;

    for event in Parser::new(content) {
        match event {
            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(TagEnd::CodeBlock) => in_code_block = false,
            Event::Text(text) | Event::Code(text) if !in_code_block => {
                push_separated(&mut text_content, &text);
            }
            Event::SoftBreak
            | Event::HardBreak
            | Event::End(TagEnd::Paragraph)
            | Event::End(TagEnd::Heading(_)) => {
                text_content.push(' ');
            }
            _ => {}
        }
    }

    normalize_whitespace(&text_content)
}

/// Count the words of prose in a markdown body (code blocks excluded).
pub fn word_count(content: &str) -> usize {
    extract_text_content(content).split_whitespace().count()
}

/// Estimate the minutes needed to read a markdown body.
///
/// Rounds up, never returns less than one minute. A `words_per_minute` of
/// zero falls back to [`DEFAULT_WORDS_PER_MINUTE`].
///
/// # Example
///
/// ```rust
/// use folio_content::markdown::parser::estimate_read_time;
///
/// assert_eq!(estimate_read_time("", 200), 1);
/// assert_eq!(estimate_read_time(&"word ".repeat(401), 200), 3);
/// ```
pub fn estimate_read_time(content: &str, words_per_minute: u32) -> u32 {
    let wpm = if words_per_minute == 0 {
        DEFAULT_WORDS_PER_MINUTE
    } else {
        words_per_minute
    };
    let words = u32::try_from(word_count(content)).unwrap_or(u32::MAX);
    words.div_ceil(wpm).max(1)
}

/// Render minutes the way post cards show them (`"5 min read"`).
pub fn format_read_time(minutes: u32) -> String {
    format!("{minutes} min read")
}

fn push_separated(out: &mut String, text: &str) {
    if !out.is_empty() && !out.ends_with(' ') {
        out.push(' ');
    }
    out.push_str(text);
}

/// Truncate text to at most `max_chars` characters, adding "..." if cut.
fn truncate_text(text: &str, max_chars: usize) -> String {
    let Some((cut, _)) = text.char_indices().nth(max_chars) else {
        return text.to_string();
    };

    let head = &text[..cut];
    let truncate_at = head.rfind(char::is_whitespace).unwrap_or(cut);
    format!("{}...", head[..truncate_at].trim_end())
}

/// Normalize whitespace: collapse runs, trim ends.
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ============================================================================
// Tests
// ============================================================================
