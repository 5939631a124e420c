//! # folio-store
//!
//! The editor's structured document model and its page store.
//!
//! - [`model`]: Page → Block → Segment types and constructors
//! - [`store`]: [`PageStore`], the explicit owner of all pages with
//!   per-page single-writer locking and a unique slug index
//! - [`backend`]: the [`PageBackend`] persistence boundary with memory and
//!   JSON-file implementations
//! - [`convert`]: markdown document ↔ page conversion
//!
//! Errors are [`folio_core::Error`]; missing pages, blocks, and segments
//! surface as `NotFound`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod backend;
pub mod convert;
pub mod ids;
pub mod model;
pub mod store;

pub use backend::{JsonFileBackend, MemoryBackend, PageBackend};
pub use convert::{page_from_markdown, page_to_markdown};
pub use ids::{BlockId, PageId, SegmentId};
pub use model::{
    Block, BlockType, Page, PageContent, ProjectCard, Revision, Segment, SegmentData, SegmentType,
    create_block, create_page, create_segment,
};
pub use store::{PagePatch, PageStore};
