//! In-memory page backend.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use folio_core::{Error, Result};
use tokio::sync::RwLock;

use super::PageBackend;
use crate::ids::PageId;
use crate::model::{Page, PageContent, Revision};

/// Keeps pages in a map. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    pages: RwLock<HashMap<PageId, Page>>,
    fail_writes: AtomicBool,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend pre-populated with pages.
    pub fn with_pages(pages: impl IntoIterator<Item = Page>) -> Self {
        Self {
            pages: RwLock::new(pages.into_iter().map(|p| (p.id, p)).collect()),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Make every subsequent write fail, to exercise error paths.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// A copy of a stored page.
    pub async fn stored(&self, id: PageId) -> Option<Page> {
        self.pages.read().await.get(&id).cloned()
    }

    /// Number of stored pages.
    pub async fn len(&self) -> usize {
        self.pages.read().await.len()
    }

    /// Whether no page is stored.
    pub async fn is_empty(&self) -> bool {
        self.pages.read().await.is_empty()
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::io(std::io::Error::other("memory backend rejected write")));
        }
        Ok(())
    }
}

#[async_trait]
impl PageBackend for MemoryBackend {
    fn name(&self) -> &str {
        "memory"
    }

    async fn init(&self) -> Result<()> {
        Ok(())
    }

    async fn load_pages(&self) -> Result<Vec<Page>> {
        Ok(self.pages.read().await.values().cloned().collect())
    }

    async fn save_page(&self, page: &Page) -> Result<()> {
        self.check_writable()?;
        self.pages.write().await.insert(page.id, page.clone());
        Ok(())
    }

    async fn save_page_content(
        &self,
        id: PageId,
        content: &PageContent,
        revision: Revision,
    ) -> Result<()> {
        self.check_writable()?;
        let mut pages = self.pages.write().await;
        let page = pages
            .get_mut(&id)
            .ok_or_else(|| Error::not_found(format!("Page {id} is not stored")))?;
        page.blocks = content.blocks.clone();
        page.apply_revision(revision);
        Ok(())
    }

    async fn delete_page(&self, id: PageId) -> Result<()> {
        self.check_writable()?;
        self.pages.write().await.remove(&id);
        Ok(())
    }
}
