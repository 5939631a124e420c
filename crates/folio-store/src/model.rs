//! The editor's document model: page → block → segment.
//!
//! Pages own their blocks and blocks own their segments by value, so
//! removing a page or a block can never leave orphaned children behind.
//! Blocks render in ascending `order`; order values only need to be
//! comparable, not contiguous.
//!
//! All types serialize with camelCase field names and kebab-case type tags
//! (`"project-card"`), the shape the editor front end exchanges.

use chrono::{DateTime, Utc};
use folio_core::util::ids::EMPTY_SLUG;
use folio_core::{Error, Result, slugify};
use serde::{Deserialize, Serialize};

use crate::ids::{BlockId, PageId, SegmentId};

/// Title given to pages created without one.
pub const DEFAULT_PAGE_TITLE: &str = "Untitled";

/// Heading level of blocks added without one.
pub const DEFAULT_HEADING_LEVEL: u8 = 2;

/// Color token of new highlighted segments.
pub const DEFAULT_HIGHLIGHT_COLOR: &str = "yellow";

// ============================================================================
// Segment
// ============================================================================

/// Kind of inline content a segment holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SegmentType {
    /// Plain text.
    Text,
    /// Text with a highlight color.
    Highlighted,
    /// Text linking to a URL.
    Link,
    /// An embedded project card.
    ProjectCard,
}

impl SegmentType {
    /// Copy shown in a freshly created segment.
    pub fn placeholder(self) -> &'static str {
        match self {
            Self::Text => "Start typing...",
            Self::Highlighted => "Highlighted text",
            Self::Link => "Link text",
            Self::ProjectCard => "Project",
        }
    }
}

/// A project shown in a card segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCard {
    /// Project name.
    pub title: String,
    /// One-line description.
    #[serde(default)]
    pub description: String,
    /// Project URL.
    #[serde(default)]
    pub url: String,
    /// Free-form stats (stars, downloads, ...).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stats: Vec<String>,
}

/// Type-specific payload of a segment.
///
/// Serialized without a tag; the variant is implied by the owning
/// segment's `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SegmentData {
    /// Payload of a `highlighted` segment.
    Highlighted {
        /// Color token.
        color: String,
    },
    /// Payload of a `link` segment.
    Link {
        /// Target URL.
        url: String,
    },
    /// Payload of a `project-card` segment.
    ProjectCard {
        /// The project shown.
        project: ProjectCard,
    },
}

impl SegmentData {
    /// The segment type this payload belongs to.
    pub fn segment_type(&self) -> SegmentType {
        match self {
            Self::Highlighted { .. } => SegmentType::Highlighted,
            Self::Link { .. } => SegmentType::Link,
            Self::ProjectCard { .. } => SegmentType::ProjectCard,
        }
    }
}

/// The smallest addressable unit of rich content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    /// Segment id.
    pub id: SegmentId,
    /// Content kind.
    #[serde(rename = "type")]
    pub kind: SegmentType,
    /// Visible text.
    pub content: String,
    /// Type-specific payload; never present on `text` segments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<SegmentData>,
}

impl Segment {
    /// Create a segment with placeholder copy and default data.
    ///
    /// Highlighted segments get the default color; every other type
    /// starts without data.
    pub fn new(kind: SegmentType) -> Self {
        let data = match kind {
            SegmentType::Highlighted => Some(SegmentData::Highlighted {
                color: DEFAULT_HIGHLIGHT_COLOR.to_string(),
            }),
            _ => None,
        };
        Self {
            id: SegmentId::new(),
            kind,
            content: kind.placeholder().to_string(),
            data,
        }
    }

    /// Plain text segment.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            id: SegmentId::new(),
            kind: SegmentType::Text,
            content: content.into(),
            data: None,
        }
    }

    /// Highlighted segment.
    pub fn highlighted(content: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: SegmentId::new(),
            kind: SegmentType::Highlighted,
            content: content.into(),
            data: Some(SegmentData::Highlighted { color: color.into() }),
        }
    }

    /// Link segment.
    pub fn link(content: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: SegmentId::new(),
            kind: SegmentType::Link,
            content: content.into(),
            data: Some(SegmentData::Link { url: url.into() }),
        }
    }

    /// Project card segment; its content is the project title.
    pub fn project_card(project: ProjectCard) -> Self {
        Self {
            id: SegmentId::new(),
            kind: SegmentType::ProjectCard,
            content: project.title.clone(),
            data: Some(SegmentData::ProjectCard { project }),
        }
    }

    /// Check that the payload matches the segment type.
    pub fn validate(&self) -> Result<()> {
        match (&self.kind, &self.data) {
            (SegmentType::Text, Some(_)) => Err(Error::invalid_data(format!(
                "Text segment {} must not carry data",
                self.id
            ))),
            (kind, Some(data)) if data.segment_type() != *kind => {
                Err(Error::invalid_data(format!(
                    "Segment {} is {kind:?} but carries {:?} data",
                    self.id,
                    data.segment_type()
                )))
            }
            _ => Ok(()),
        }
    }
}

// ============================================================================
// Block
// ============================================================================

/// Kind of rendered unit a block represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockType {
    /// Section heading.
    Heading,
    /// Body paragraph.
    Paragraph,
    /// Block quote.
    Quote,
    /// Code listing.
    Code,
}

impl BlockType {
    /// Copy of the text segment seeded into a new block.
    pub fn placeholder(self) -> &'static str {
        match self {
            Self::Heading => "Heading",
            Self::Paragraph => "Start writing...",
            Self::Quote => "Quote",
            Self::Code => "// code",
        }
    }
}

/// One rendered unit of a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Block id.
    pub id: BlockId,
    /// Block kind.
    #[serde(rename = "type")]
    pub kind: BlockType,
    /// Heading level, 1..=6; only headings carry one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    /// Position among the page's blocks.
    pub order: i64,
    /// Segments in display order.
    #[serde(default, alias = "segments")]
    pub content: Vec<Segment>,
}

impl Block {
    /// Create a block seeded with one placeholder text segment.
    pub fn new(kind: BlockType, order: i64) -> Self {
        Self::with_segments(kind, order, vec![Segment::text(kind.placeholder())])
    }

    /// Create a heading block of the given level.
    pub fn heading(level: u8, order: i64, text: impl Into<String>) -> Self {
        Self {
            level: Some(level),
            ..Self::with_segments(BlockType::Heading, order, vec![Segment::text(text)])
        }
    }

    /// Create a block with explicit segments.
    pub fn with_segments(kind: BlockType, order: i64, content: Vec<Segment>) -> Self {
        Self {
            id: BlockId::new(),
            kind,
            level: (kind == BlockType::Heading).then_some(DEFAULT_HEADING_LEVEL),
            order,
            content,
        }
    }

    /// Look up a segment.
    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.content.iter().find(|s| s.id == id)
    }

    /// Look up a segment for modification.
    pub fn segment_mut(&mut self, id: SegmentId) -> Option<&mut Segment> {
        self.content.iter_mut().find(|s| s.id == id)
    }

    /// Concatenated segment text.
    pub fn plain_text(&self) -> String {
        self.content.iter().map(|s| s.content.as_str()).collect()
    }

    /// Check the level rules and every segment.
    pub fn validate(&self) -> Result<()> {
        match (self.kind, self.level) {
            (BlockType::Heading, Some(level)) if !(1..=6).contains(&level) => {
                return Err(Error::invalid_data(format!(
                    "Heading block {} has level {level}, expected 1..=6",
                    self.id
                )));
            }
            (BlockType::Heading, _) => {}
            (kind, Some(_)) => {
                return Err(Error::invalid_data(format!(
                    "{kind:?} block {} must not have a level",
                    self.id
                )));
            }
            (_, None) => {}
        }
        self.content.iter().try_for_each(Segment::validate)
    }
}

// ============================================================================
// Page
// ============================================================================

/// An editor page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Page id.
    pub id: PageId,
    /// URL-safe identifier, unique within a store.
    pub slug: String,
    /// Display title.
    pub title: String,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// Whether the page is publicly visible.
    #[serde(default)]
    pub is_published: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Incremented on every mutation; used for optimistic concurrency.
    #[serde(default)]
    pub version: u64,
    /// Blocks sorted by `order`.
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl Page {
    /// Create an untitled, unpublished page holding one heading block.
    pub fn new() -> Self {
        Self::titled(DEFAULT_PAGE_TITLE)
    }

    /// Create a page whose heading block and slug derive from `title`.
    pub fn titled(title: impl Into<String>) -> Self {
        let title = title.into();
        let slug = match slugify(&title) {
            s if s.is_empty() => EMPTY_SLUG.to_string(),
            s => s,
        };
        let now = Utc::now();
        Self {
            id: PageId::new(),
            blocks: vec![Block::heading(1, 0, title.clone())],
            slug,
            title,
            description: String::new(),
            is_published: false,
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    /// Look up a block.
    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    /// Look up a block for modification.
    pub fn block_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|b| b.id == id)
    }

    /// Look up a block, failing with `NotFound`.
    pub fn require_block_mut(&mut self, id: BlockId) -> Result<&mut Block> {
        let page = self.id;
        self.block_mut(id)
            .ok_or_else(|| Error::not_found(format!("Block {id} not found in page {page}")))
    }

    /// Order value that places a block after every existing one.
    ///
    /// # Errors
    ///
    /// `InvalidData` when the last block already sits at `i64::MAX`.
    pub fn next_order(&self) -> Result<i64> {
        match self.blocks.iter().map(|b| b.order).max() {
            None => Ok(0),
            Some(last) => last.checked_add(1).ok_or_else(|| {
                Error::invalid_data(format!(
                    "Page {} has a block at the maximum order; reorder its blocks first",
                    self.id
                ))
            }),
        }
    }

    /// Sort blocks by order, keeping insertion order among equal values.
    pub fn sort_blocks(&mut self) {
        self.blocks.sort_by_key(|b| b.order);
    }

    /// Record a modification.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
        self.version += 1;
    }

    /// The page's current version stamp.
    pub fn revision(&self) -> Revision {
        Revision {
            version: self.version,
            updated_at: self.updated_at,
        }
    }

    /// Adopt a version stamp written by a content-only save.
    pub fn apply_revision(&mut self, revision: Revision) {
        self.version = revision.version;
        self.updated_at = revision.updated_at;
    }

    /// Validate every block.
    pub fn validate(&self) -> Result<()> {
        self.blocks.iter().try_for_each(Block::validate)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

/// Version and modification time of a page, stored together with a
/// content-only write so a reload sees the same version the store handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Revision {
    /// Page version after the write.
    pub version: u64,
    /// Modification time of the write.
    pub updated_at: DateTime<Utc>,
}

/// The block list handed to a persistence backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContent {
    /// Blocks with their segments.
    pub blocks: Vec<Block>,
}

impl PageContent {
    /// Wrap a block list.
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Validate and sort the blocks by order.
    pub fn normalized(mut self) -> Result<Self> {
        self.blocks.iter().try_for_each(Block::validate)?;
        self.blocks.sort_by_key(|b| b.order);
        Ok(self)
    }
}

/// Convenience constructor for a fresh page.
pub fn create_page() -> Page {
    Page::new()
}

/// Convenience constructor for a fresh block.
pub fn create_block(kind: BlockType, order: i64) -> Block {
    Block::new(kind, order)
}

/// Convenience constructor for a fresh segment.
pub fn create_segment(kind: SegmentType) -> Segment {
    Segment::new(kind)
}
