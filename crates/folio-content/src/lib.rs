//! Markdown content processing for the Folio content engine.
//!
//! Turns raw documents into structured data: frontmatter metadata, a body,
//! a flat heading list, and a nested table of contents. The [`corpus`]
//! module applies the same pipeline to every document under a directory.
//!
//! # Modules
//!
//! - [`markdown`]: Frontmatter, headings, TOC, and pulldown-cmark helpers
//! - [`metadata`]: Generic metadata map and the typed [`PostMeta`] view
//! - [`corpus`]: Async discovery and batch parsing of content files
//!
//! # Example
//!
//! ```rust
//! use folio_content::{parse_document, parse_document_toc};
//!
//! let doc = parse_document("---\ntitle: Hello\ntags: [a, b]\n---\n\n# Hello\n\n## World").unwrap();
//! let meta = doc.metadata.post_meta();
//! assert_eq!(meta.title.as_deref(), Some("Hello"));
//! assert_eq!(meta.tags, vec!["a", "b"]);
//!
//! let toc = parse_document_toc(&doc.body, 6);
//! assert_eq!(toc[0].children[0].id, "world");
//! ```

pub mod corpus;
pub mod markdown;
pub mod metadata;

// Re-export commonly used types
pub use corpus::{Corpus, CorpusEntry, ScanOptions, parse_entry};
pub use markdown::{
    DEFAULT_MAX_DEPTH, HeadingNode, ParsedDocument, TocNode, build_tree, estimate_read_time,
    extract_headings, flatten, parse_document, parse_document_toc, serialize_frontmatter,
    strip_frontmatter,
};
pub use metadata::{MetaValue, Metadata, PostMeta};
