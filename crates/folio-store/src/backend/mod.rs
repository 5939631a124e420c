//! Persistence boundary for pages.
//!
//! The store hands whole pages (or just a page's block list) to a
//! [`PageBackend`]; the backend owns durability and any transactional
//! guarantees. Two implementations ship with the crate:
//!
//! - [`MemoryBackend`]: keeps pages in a map, for tests and ephemeral sessions
//! - [`JsonFileBackend`]: one pretty-printed JSON file per page under a directory

use async_trait::async_trait;
use folio_core::Result;

use crate::ids::PageId;
use crate::model::{Page, PageContent, Revision};

mod json_file;
mod memory;

pub use json_file::JsonFileBackend;
pub use memory::MemoryBackend;

/// Storage collaborator of a [`PageStore`](crate::PageStore).
#[async_trait]
pub trait PageBackend: Send + Sync + std::fmt::Debug {
    /// Get the backend name (for logging).
    fn name(&self) -> &str;

    /// Prepare the backend for use (create directories, ...).
    async fn init(&self) -> Result<()>;

    /// Read every stored page.
    async fn load_pages(&self) -> Result<Vec<Page>>;

    /// Write a page, including its blocks.
    async fn save_page(&self, page: &Page) -> Result<()>;

    /// Replace the blocks of a stored page and record its new revision.
    ///
    /// Fails with `NotFound` when the page has never been saved.
    async fn save_page_content(
        &self,
        id: PageId,
        content: &PageContent,
        revision: Revision,
    ) -> Result<()>;

    /// Remove a page. Removing a page that is not stored is not an error.
    async fn delete_page(&self, id: PageId) -> Result<()>;
}
