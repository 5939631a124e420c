//! Markdown parsing, heading extraction, and table-of-contents building.
//!
//! - [`frontmatter`]: `---`-delimited metadata block and body split
//! - [`headings`]: ATX heading scanner with stable anchor ids
//! - [`toc`]: nesting headings into a navigable tree
//! - [`parser`]: pulldown-cmark helpers (first paragraph, plain text, read time)
//!
//! # Example
//!
//! ```rust
//! use folio_content::markdown::{parse_document, parse_document_toc};
//!
//! let raw = "---\ntitle: Guide\n---\n\n# Introduction\n\n## Getting Started\n\n## Prerequisites";
//! let doc = parse_document(raw).unwrap();
//! let toc = parse_document_toc(&doc.body, 6);
//!
//! assert_eq!(toc[0].id, "introduction");
//! assert_eq!(toc[0].children.len(), 2);
//! ```

pub mod frontmatter;
pub mod headings;
pub mod parser;
pub mod toc;

// Re-export key types and functions
pub use frontmatter::{
    ParsedDocument, parse_document, serialize_document, serialize_frontmatter, strip_frontmatter,
};
pub use headings::{DEFAULT_MAX_DEPTH, HeadingNode, extract_headings};
pub use parser::{
    estimate_read_time, extract_first_heading, extract_first_paragraph, extract_text_content,
    format_read_time, word_count,
};
pub use toc::{TocNode, build_tree, flatten, parse_document_toc};
