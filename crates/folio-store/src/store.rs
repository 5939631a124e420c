//! The page store: an explicit, injectable owner of every editor page.
//!
//! # Concurrency
//!
//! Each page sits behind its own `tokio::sync::Mutex`, so mutations of one
//! page are serialized while different pages proceed independently. The
//! id → page map is an `RwLock` held only long enough to clone a page
//! handle. The slug index has its own mutex which is only ever acquired
//! while already holding a page mutex (or holding nothing), never the other
//! way round.
//!
//! Every mutation works on a copy of the page. The copy replaces the stored
//! page only after the backend accepted the write, so a failed write leaves
//! the in-memory state untouched.
//!
//! # Example
//!
//! ```rust
//! # tokio_test::block_on(async {
//! use folio_store::{BlockType, PagePatch, PageStore};
//!
//! let store = PageStore::in_memory();
//! let page = store.create_page_titled("Hello World").await.unwrap();
//! assert_eq!(page.slug, "hello-world");
//!
//! store.add_block(page.id, BlockType::Paragraph, None).await.unwrap();
//! let page = store
//!     .update_page(page.id, PagePatch::new().published(true))
//!     .await
//!     .unwrap();
//! assert!(page.is_published);
//! assert_eq!(page.blocks.len(), 2);
//! # });
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use folio_core::util::ids::EMPTY_SLUG;
use folio_core::{Error, Result, slugify, unique_slug};
use tokio::sync::{Mutex, RwLock};

use crate::backend::{MemoryBackend, PageBackend};
use crate::ids::{BlockId, PageId, SegmentId};
use crate::model::{Block, BlockType, Page, PageContent, Segment, SegmentData, SegmentType};

/// A page guarded for single-writer access. `None` once deleted, so tasks
/// that were queued on the mutex observe the deletion.
type PageSlot = Arc<Mutex<Option<Page>>>;

/// Changes applied by [`PageStore::update_page`]. Unset fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagePatch {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// Explicit slug; slugified and made unique.
    pub slug: Option<String>,
    /// New visibility.
    pub is_published: Option<bool>,
    /// Reject the patch unless the page is at this version.
    pub expected_version: Option<u64>,
}

impl PagePatch {
    /// Empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set an explicit slug.
    pub fn slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// Set visibility.
    pub fn published(mut self, is_published: bool) -> Self {
        self.is_published = Some(is_published);
        self
    }

    /// Require the page to be at `version`.
    pub fn expect_version(mut self, version: u64) -> Self {
        self.expected_version = Some(version);
        self
    }
}

/// How a mutated page is handed to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteMode {
    Page,
    Content,
}

/// Owner of all pages of an editor session.
#[derive(Debug)]
pub struct PageStore {
    backend: Arc<dyn PageBackend>,
    pages: RwLock<HashMap<PageId, PageSlot>>,
    slugs: Mutex<HashMap<String, PageId>>,
}

impl PageStore {
    /// Create a store over a backend. Call [`init`](Self::init) and
    /// [`load`](Self::load) before use when the backend holds data.
    pub fn new(backend: impl PageBackend + 'static) -> Self {
        Self::with_backend(Arc::new(backend))
    }

    /// Create a store over a shared backend.
    pub fn with_backend(backend: Arc<dyn PageBackend>) -> Self {
        Self {
            backend,
            pages: RwLock::new(HashMap::new()),
            slugs: Mutex::new(HashMap::new()),
        }
    }

    /// A store backed by a fresh [`MemoryBackend`].
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// The backend.
    pub fn backend(&self) -> &Arc<dyn PageBackend> {
        &self.backend
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Prepare the backend.
    pub async fn init(&self) -> Result<()> {
        self.backend.init().await?;
        log::debug!("Initialized {} page backend", self.backend.name());
        Ok(())
    }

    /// Replace the in-memory pages with the backend's and rebuild the slug
    /// index. Returns the number of pages loaded.
    ///
    /// Stored pages whose slugs collide are given fresh unique slugs; the
    /// earliest created page keeps the original.
    pub async fn load(&self) -> Result<usize> {
        let mut loaded = self.backend.load_pages().await?;
        loaded.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.slug.cmp(&b.slug))
        });

        let mut slugs: HashMap<String, PageId> = HashMap::new();
        let mut pages = HashMap::new();
        for mut page in loaded {
            page.sort_blocks();
            if slugs.contains_key(&page.slug) {
                let fresh = unique_slug(&page.slug, |s| slugs.contains_key(s));
                log::warn!("Page {} reuses slug {}; renamed to {fresh}", page.id, page.slug);
                page.slug = fresh;
            }
            slugs.insert(page.slug.clone(), page.id);
            pages.insert(page.id, Arc::new(Mutex::new(Some(page))));
        }

        let count = pages.len();
        *self.pages.write().await = pages;
        *self.slugs.lock().await = slugs;
        log::info!("Loaded {count} pages from {} backend", self.backend.name());
        Ok(count)
    }

    /// Write every page to the backend. Returns the number written.
    pub async fn persist(&self) -> Result<usize> {
        let mut written = 0;
        for slot in self.slots().await {
            let guard = slot.lock().await;
            if let Some(page) = guard.as_ref() {
                self.backend.save_page(page).await?;
                written += 1;
            }
        }
        log::debug!("Persisted {written} pages");
        Ok(written)
    }

    // ------------------------------------------------------------------------
    // Pages
    // ------------------------------------------------------------------------

    /// Create an untitled page with one heading block.
    pub async fn create_page(&self) -> Result<Page> {
        self.insert_page(Page::new()).await
    }

    /// Create a page whose slug and heading derive from `title`.
    pub async fn create_page_titled(&self, title: impl Into<String>) -> Result<Page> {
        self.insert_page(Page::titled(title)).await
    }

    /// Add an externally built page (e.g. converted from markdown). Its
    /// slug is made unique and its content validated.
    pub async fn insert_page(&self, mut page: Page) -> Result<Page> {
        page.validate()?;
        page.sort_blocks();

        {
            let mut slugs = self.slugs.lock().await;
            page.slug = unique_slug(&page.slug, |s| slugs.contains_key(s));
            self.backend.save_page(&page).await?;
            slugs.insert(page.slug.clone(), page.id);
        }

        self.pages
            .write()
            .await
            .insert(page.id, Arc::new(Mutex::new(Some(page.clone()))));
        log::debug!("Created page {} ({})", page.slug, page.id);
        Ok(page)
    }

    /// A copy of a page.
    pub async fn get_page(&self, id: PageId) -> Result<Page> {
        let slot = self.slot(id).await?;
        let guard = slot.lock().await;
        guard.clone().ok_or_else(|| page_not_found(id))
    }

    /// A copy of the page with the given slug.
    pub async fn get_page_by_slug(&self, slug: &str) -> Result<Page> {
        let id = self
            .slugs
            .lock()
            .await
            .get(slug)
            .copied()
            .ok_or_else(|| Error::not_found(format!("No page with slug '{slug}'")))?;
        self.get_page(id).await
    }

    /// Copies of all pages, oldest first (ties by slug).
    pub async fn list_pages(&self) -> Vec<Page> {
        let mut pages = Vec::new();
        for slot in self.slots().await {
            if let Some(page) = slot.lock().await.clone() {
                pages.push(page);
            }
        }
        pages.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.slug.cmp(&b.slug))
        });
        pages
    }

    /// Number of pages.
    pub async fn len(&self) -> usize {
        self.pages.read().await.len()
    }

    /// Whether the store holds no pages.
    pub async fn is_empty(&self) -> bool {
        self.pages.read().await.is_empty()
    }

    /// Merge a patch into a page.
    ///
    /// A title change without an explicit slug re-derives the slug from the
    /// new title. Slugs stay unique across the store.
    ///
    /// # Errors
    ///
    /// `NotFound` if no page has that id; `Conflict` if
    /// [`PagePatch::expected_version`] does not match.
    pub async fn update_page(&self, id: PageId, patch: PagePatch) -> Result<Page> {
        let slot = self.slot(id).await?;
        let mut guard = slot.lock().await;
        let current = guard.as_ref().ok_or_else(|| page_not_found(id))?;

        if let Some(expected) = patch.expected_version
            && expected != current.version
        {
            return Err(Error::conflict(format!(
                "Page {id} is at version {}, expected {expected}",
                current.version
            )));
        }

        let mut page = current.clone();
        if let Some(title) = patch.title {
            page.title = title;
        }
        if let Some(description) = patch.description {
            page.description = description;
        }
        if let Some(is_published) = patch.is_published {
            page.is_published = is_published;
        }

        let desired = match (&patch.slug, page.title != current.title) {
            (Some(explicit), _) => Some(slugify(explicit)),
            (None, true) => Some(slugify(&page.title)),
            (None, false) => None,
        };

        page.touch();

        let Some(desired) = desired else {
            self.backend.save_page(&page).await?;
            *guard = Some(page.clone());
            return Ok(page);
        };

        let mut slugs = self.slugs.lock().await;
        let base = if desired.is_empty() { EMPTY_SLUG } else { desired.as_str() };
        page.slug = unique_slug(base, |s| slugs.get(s).is_some_and(|owner| *owner != id));
        self.backend.save_page(&page).await?;

        if page.slug != current.slug {
            slugs.remove(&current.slug);
            slugs.insert(page.slug.clone(), id);
            log::debug!("Page {id} slug {} -> {}", current.slug, page.slug);
        }
        drop(slugs);

        *guard = Some(page.clone());
        Ok(page)
    }

    /// Remove a page and everything it owns.
    ///
    /// # Errors
    ///
    /// `NotFound` if no page has that id.
    pub async fn delete_page(&self, id: PageId) -> Result<()> {
        let slot = self.slot(id).await?;
        let mut guard = slot.lock().await;
        let page = guard.as_ref().ok_or_else(|| page_not_found(id))?;

        self.backend.delete_page(id).await?;
        self.slugs.lock().await.remove(&page.slug);
        log::debug!("Deleted page {} ({id})", page.slug);
        *guard = None;
        drop(guard);

        self.pages.write().await.remove(&id);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Blocks
    // ------------------------------------------------------------------------

    /// Add a block seeded with a placeholder segment. Without an explicit
    /// order it goes after every existing block.
    pub async fn add_block(&self, page_id: PageId, kind: BlockType, order: Option<i64>) -> Result<Block> {
        self.mutate(page_id, WriteMode::Page, |page| {
            let order = match order {
                Some(order) => order,
                None => page.next_order()?,
            };
            let block = Block::new(kind, order);
            page.blocks.push(block.clone());
            page.sort_blocks();
            Ok(block)
        })
        .await
    }

    /// Replace a block's segments.
    pub async fn update_block_content(
        &self,
        page_id: PageId,
        block_id: BlockId,
        segments: Vec<Segment>,
    ) -> Result<Block> {
        segments.iter().try_for_each(Segment::validate)?;
        self.mutate(page_id, WriteMode::Page, |page| {
            let block = page.require_block_mut(block_id)?;
            block.content = segments;
            Ok(block.clone())
        })
        .await
    }

    /// Remove a block and its segments.
    pub async fn remove_block(&self, page_id: PageId, block_id: BlockId) -> Result<()> {
        self.mutate(page_id, WriteMode::Page, |page| {
            let before = page.blocks.len();
            page.blocks.retain(|b| b.id != block_id);
            if page.blocks.len() == before {
                return Err(block_not_found(page_id, block_id));
            }
            Ok(())
        })
        .await
    }

    /// Give a block a new order value and re-sort.
    pub async fn move_block(&self, page_id: PageId, block_id: BlockId, new_order: i64) -> Result<()> {
        self.mutate(page_id, WriteMode::Page, |page| {
            page.require_block_mut(block_id)?.order = new_order;
            page.sort_blocks();
            Ok(())
        })
        .await
    }

    /// Put blocks in the given order and renumber them `0..n`.
    ///
    /// `ids` must name every block of the page exactly once.
    pub async fn reorder_blocks(&self, page_id: PageId, ids: &[BlockId]) -> Result<()> {
        self.mutate(page_id, WriteMode::Page, |page| {
            let mut remaining: HashMap<BlockId, Block> =
                page.blocks.drain(..).map(|b| (b.id, b)).collect();

            let mut reordered = Vec::with_capacity(ids.len());
            for (position, id) in ids.iter().enumerate() {
                let mut block = remaining.remove(id).ok_or_else(|| {
                    Error::invalid_data(format!("Block {id} is unknown or listed twice"))
                })?;
                block.order = i64::try_from(position)
                    .map_err(|_| Error::invalid_data("Too many blocks to reorder"))?;
                reordered.push(block);
            }
            if !remaining.is_empty() {
                return Err(Error::invalid_data(format!(
                    "Reorder omits {} block(s) of page {page_id}",
                    remaining.len()
                )));
            }

            page.blocks = reordered;
            Ok(())
        })
        .await
    }

    // ------------------------------------------------------------------------
    // Segments
    // ------------------------------------------------------------------------

    /// Append a placeholder segment of the given type to a block.
    pub async fn add_segment(&self, page_id: PageId, block_id: BlockId, kind: SegmentType) -> Result<Segment> {
        self.mutate(page_id, WriteMode::Page, |page| {
            let segment = Segment::new(kind);
            page.require_block_mut(block_id)?.content.push(segment.clone());
            Ok(segment)
        })
        .await
    }

    /// Replace a segment's text and payload.
    pub async fn update_segment(
        &self,
        page_id: PageId,
        block_id: BlockId,
        segment_id: SegmentId,
        content: impl Into<String>,
        data: Option<SegmentData>,
    ) -> Result<Segment> {
        let content = content.into();
        self.mutate(page_id, WriteMode::Page, |page| {
            let segment = page
                .require_block_mut(block_id)?
                .segment_mut(segment_id)
                .ok_or_else(|| segment_not_found(block_id, segment_id))?;
            let mut updated = segment.clone();
            updated.content = content;
            updated.data = data;
            updated.validate()?;
            *segment = updated.clone();
            Ok(updated)
        })
        .await
    }

    /// Remove a segment from a block.
    pub async fn remove_segment(&self, page_id: PageId, block_id: BlockId, segment_id: SegmentId) -> Result<()> {
        self.mutate(page_id, WriteMode::Page, |page| {
            let block = page.require_block_mut(block_id)?;
            let before = block.content.len();
            block.content.retain(|s| s.id != segment_id);
            if block.content.len() == before {
                return Err(segment_not_found(block_id, segment_id));
            }
            Ok(())
        })
        .await
    }

    /// Replace all blocks of a page, as the editor does on save.
    ///
    /// Blocks are validated and sorted by order, then handed to the
    /// backend's content write.
    pub async fn save_page_content(&self, page_id: PageId, content: PageContent) -> Result<Page> {
        let content = content.normalized()?;
        self.mutate(page_id, WriteMode::Content, |page| {
            page.blocks = content.blocks;
            Ok(())
        })
        .await?;
        self.get_page(page_id).await
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    async fn slot(&self, id: PageId) -> Result<PageSlot> {
        self.pages
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| page_not_found(id))
    }

    async fn slots(&self) -> Vec<PageSlot> {
        self.pages.read().await.values().cloned().collect()
    }

    /// Apply `f` to a copy of the page under its lock, write the copy, and
    /// commit it once the backend accepted it.
    async fn mutate<T>(
        &self,
        id: PageId,
        write: WriteMode,
        f: impl FnOnce(&mut Page) -> Result<T>,
    ) -> Result<T> {
        let slot = self.slot(id).await?;
        let mut guard = slot.lock().await;
        let mut page = guard.clone().ok_or_else(|| page_not_found(id))?;

        let out = f(&mut page)?;
        page.touch();

        match write {
            WriteMode::Page => self.backend.save_page(&page).await?,
            WriteMode::Content => {
                self.backend
                    .save_page_content(
                        id,
                        &PageContent::new(page.blocks.clone()),
                        page.revision(),
                    )
                    .await?
            }
        }

        *guard = Some(page);
        Ok(out)
    }
}

fn page_not_found(id: PageId) -> Error {
    Error::not_found(format!("Page {id} not found"))
}

fn block_not_found(page: PageId, block: BlockId) -> Error {
    Error::not_found(format!("Block {block} not found in page {page}"))
}

fn segment_not_found(block: BlockId, segment: SegmentId) -> Error {
    Error::not_found(format!("Segment {segment} not found in block {block}"))
}

// ============================================================================
// Tests
// ============================================================================
