//! Conversion between markdown documents and editor pages.
//!
//! Importing walks the body with `pulldown-cmark` and keeps what the block
//! model can represent: headings (with level), paragraphs, block quotes,
//! code blocks, links, and `==highlighted==` spans. Emphasis and other
//! inline formatting collapse to plain text.
//!
//! Exporting writes frontmatter (title, summary, status, slug) followed by
//! one markdown paragraph per block.

use folio_content::markdown::{ParsedDocument, extract_first_heading, serialize_document};
use folio_content::{Metadata, PostMeta};
use folio_core::Result;
use folio_core::util::ids::EMPTY_SLUG;
use pulldown_cmark::{Event, Parser, Tag, TagEnd};

use crate::model::{
    Block, BlockType, DEFAULT_HIGHLIGHT_COLOR, DEFAULT_PAGE_TITLE, Page, Segment, SegmentData,
    SegmentType,
};

/// Marker around highlighted text.
const HIGHLIGHT_MARKER: &str = "==";

/// Build a page from a parsed document.
///
/// The title comes from `title`, else the first non-empty heading; the slug from a
/// `slug` field, else the title. `summary`/`excerpt` becomes the
/// description. Drafts import unpublished.
pub fn page_from_markdown(doc: &ParsedDocument) -> Result<Page> {
    let meta = doc.metadata.post_meta();
    let blocks = blocks_from_markdown(&doc.body);

    let title = meta
        .title
        .clone()
        .or_else(|| extract_first_heading(&doc.body).map(|(_, text)| text))
        .unwrap_or_else(|| DEFAULT_PAGE_TITLE.to_string());

    let mut page = Page::titled(&title);
    if let Some(slug) = meta.extra.get_str("slug").map(folio_core::slugify) {
        page.slug = if slug.is_empty() { EMPTY_SLUG.to_string() } else { slug };
    }
    page.description = meta.summary.clone().unwrap_or_default();
    page.is_published = is_published(&meta);
    if !blocks.is_empty() {
        page.blocks = blocks;
    }

    page.validate()?;
    Ok(page)
}

/// Render a page as a markdown document with frontmatter.
pub fn page_to_markdown(page: &Page) -> String {
    let mut metadata = Metadata::new()
        .with("title", page.title.as_str())
        .with("slug", page.slug.as_str())
        .with("status", if page.is_published { "published" } else { "draft" });
    if !page.description.is_empty() {
        metadata.insert("summary", page.description.as_str());
    }

    let mut blocks: Vec<&Block> = page.blocks.iter().collect();
    blocks.sort_by_key(|b| b.order);
    let body = blocks
        .into_iter()
        .map(block_to_markdown)
        .collect::<Vec<_>>()
        .join("\n\n");

    serialize_document(&ParsedDocument { metadata, body })
}

fn is_published(meta: &PostMeta) -> bool {
    match meta.status.as_deref() {
        Some(status) => status.eq_ignore_ascii_case("published"),
        None => meta.published_at.is_some(),
    }
}

/// Split a markdown body into blocks, numbered `0..n` in source order.
pub fn blocks_from_markdown(body: &str) -> Vec<Block> {
    let mut builder = BlockBuilder::default();

    for event in Parser::new(body) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                builder.open(BlockType::Heading, Some(level as u8));
            }
            Event::Start(Tag::BlockQuote(_)) => {
                builder.quote_depth += 1;
                builder.open(BlockType::Quote, None);
            }
            Event::End(TagEnd::BlockQuote(_)) => {
                builder.quote_depth = builder.quote_depth.saturating_sub(1);
                if builder.quote_depth == 0 {
                    builder.close_if(BlockType::Quote);
                }
            }
            Event::Start(Tag::Paragraph | Tag::Item) if builder.quote_depth == 0 => {
                builder.open(BlockType::Paragraph, None);
            }
            Event::Start(Tag::Paragraph) if builder.has_text() => builder.text.push(' '),
            Event::Start(Tag::CodeBlock(_)) => builder.open(BlockType::Code, None),

            Event::End(TagEnd::Heading(_)) => builder.close_if(BlockType::Heading),
            Event::End(TagEnd::CodeBlock) => builder.close_if(BlockType::Code),
            Event::End(TagEnd::Paragraph | TagEnd::Item) if builder.quote_depth == 0 => {
                builder.close_if(BlockType::Paragraph);
            }

            Event::Start(Tag::Link { dest_url, .. }) => builder.open_link(dest_url.to_string()),
            Event::End(TagEnd::Link) => builder.close_link(),

            Event::Text(text) | Event::Code(text) if builder.current.is_some() => {
                builder.text.push_str(&text);
            }
            Event::SoftBreak | Event::HardBreak if builder.current.is_some() => {
                builder.text.push(' ');
            }
            _ => {}
        }
    }

    builder.close();
    builder.blocks
}

#[derive(Debug, Default)]
struct BlockBuilder {
    blocks: Vec<Block>,
    current: Option<(BlockType, Option<u8>)>,
    segments: Vec<Segment>,
    text: String,
    link: Option<String>,
    quote_depth: usize,
}

impl BlockBuilder {
    fn open(&mut self, kind: BlockType, level: Option<u8>) {
        if self.current.is_some() {
            return;
        }
        self.current = Some((kind, level));
    }

    fn has_text(&self) -> bool {
        !self.text.trim().is_empty() || !self.segments.is_empty()
    }

    fn open_link(&mut self, url: String) {
        self.flush_text();
        self.link = Some(url);
    }

    fn close_link(&mut self) {
        if let Some(url) = self.link.take() {
            let content = std::mem::take(&mut self.text);
            self.segments.push(Segment::link(content, url));
        }
    }

    fn flush_text(&mut self) {
        if self.text.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.text);
        if matches!(self.current, Some((BlockType::Code, _))) {
            self.segments.push(Segment::text(text));
        } else {
            self.segments.extend(split_highlights(&text));
        }
    }

    fn close_if(&mut self, kind: BlockType) {
        if matches!(self.current, Some((open, _)) if open == kind) {
            self.close();
        }
    }

    fn close(&mut self) {
        let Some((kind, level)) = self.current.take() else {
            return;
        };
        self.close_link();
        self.flush_text();

        let mut segments = std::mem::take(&mut self.segments);
        if kind == BlockType::Code {
            if let Some(last) = segments.last_mut() {
                let trimmed = last.content.trim_end_matches('\n').len();
                last.content.truncate(trimmed);
            }
        } else {
            trim_segments(&mut segments);
        }
        if segments.is_empty() {
            return;
        }

        let order = i64::try_from(self.blocks.len()).unwrap_or(i64::MAX);
        let mut block = Block::with_segments(kind, order, segments);
        if kind == BlockType::Heading {
            block.level = level;
        }
        self.blocks.push(block);
    }
}

/// Trim outer whitespace of the first and last text segments and drop
/// segments left empty.
fn trim_segments(segments: &mut Vec<Segment>) {
    if let Some(first) = segments.first_mut() {
        first.content = first.content.trim_start().to_string();
    }
    if let Some(last) = segments.last_mut() {
        last.content = last.content.trim_end().to_string();
    }
    segments.retain(|s| !s.content.is_empty() || s.kind != SegmentType::Text);
}

/// Split text on `==` pairs into text and highlighted segments. An
/// unpaired marker stays literal.
pub fn split_highlights(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find(HIGHLIGHT_MARKER) {
        let after = &rest[start + HIGHLIGHT_MARKER.len()..];
        let Some(end) = after.find(HIGHLIGHT_MARKER) else {
            break;
        };
        if end == 0 {
            break;
        }
        if start > 0 {
            segments.push(Segment::text(&rest[..start]));
        }
        segments.push(Segment::highlighted(&after[..end], DEFAULT_HIGHLIGHT_COLOR));
        rest = &after[end + HIGHLIGHT_MARKER.len()..];
    }

    if !rest.is_empty() {
        segments.push(Segment::text(rest));
    }
    segments
}

fn block_to_markdown(block: &Block) -> String {
    match block.kind {
        BlockType::Heading => {
            let level = usize::from(block.level.unwrap_or(1).clamp(1, 6));
            format!("{} {}", "#".repeat(level), inline_markdown(block))
        }
        BlockType::Paragraph => inline_markdown(block),
        BlockType::Quote => format!("> {}", inline_markdown(block)),
        BlockType::Code => format!("```\n{}\n```", block.plain_text()),
    }
}

fn inline_markdown(block: &Block) -> String {
    block
        .content
        .iter()
        .map(|segment| match &segment.data {
            Some(SegmentData::Highlighted { .. }) => {
                format!("{HIGHLIGHT_MARKER}{}{HIGHLIGHT_MARKER}", segment.content)
            }
            Some(SegmentData::Link { url }) => format!("[{}]({url})", segment.content),
            Some(SegmentData::ProjectCard { project }) if !project.url.is_empty() => {
                format!("[{}]({})", segment.content, project.url)
            }
            _ => segment.content.clone(),
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use folio_content::parse_document;
    use proptest::prelude::*;

    fn kinds(page: &Page) -> Vec<(BlockType, Option<u8>)> {
        page.blocks.iter().map(|b| (b.kind, b.level)).collect()
    }

    // ------------------------------------------------------------------------
    // Import tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_import_blocks() {
        let doc = parse_document(
            "---\ntitle: Notes\n---\n# Notes\n\nFirst *para*.\n\n## Details\n\n> quoted\n> text\n\n```rust\nfn main() {}\n```",
        )
        .unwrap();
        let page = page_from_markdown(&doc).unwrap();

        assert_eq!(
            kinds(&page),
            vec![
                (BlockType::Heading, Some(1)),
                (BlockType::Paragraph, None),
                (BlockType::Heading, Some(2)),
                (BlockType::Quote, None),
                (BlockType::Code, None),
            ]
        );
        assert_eq!(page.blocks[1].plain_text(), "First para.");
        assert_eq!(page.blocks[3].plain_text(), "quoted text");
        assert_eq!(page.blocks[4].plain_text(), "fn main() {}");
        let orders: Vec<_> = page.blocks.iter().map(|b| b.order).collect();
        assert_eq!(orders, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_import_links_and_highlights() {
        let blocks = blocks_from_markdown("Read ==this== and [the docs](https://example.com) now.");
        let segments = &blocks[0].content;

        let shape: Vec<_> = segments.iter().map(|s| (s.kind, s.content.as_str())).collect();
        assert_eq!(
            shape,
            vec![
                (SegmentType::Text, "Read "),
                (SegmentType::Highlighted, "this"),
                (SegmentType::Text, " and "),
                (SegmentType::Link, "the docs"),
                (SegmentType::Text, " now."),
            ]
        );
        assert_eq!(
            segments[3].data,
            Some(SegmentData::Link {
                url: "https://example.com".into()
            })
        );
    }

    #[test]
    fn test_import_metadata() {
        let doc = parse_document(
            "---\ntitle: Hello, World!\nexcerpt: A greeting\nstatus: draft\n---\nBody",
        )
        .unwrap();
        let page = page_from_markdown(&doc).unwrap();

        assert_eq!(page.title, "Hello, World!");
        assert_eq!(page.slug, "hello-world");
        assert_eq!(page.description, "A greeting");
        assert!(!page.is_published);
    }

    #[test]
    fn test_import_title_from_first_heading_and_explicit_slug() {
        let doc = parse_document("---\nslug: Custom Path\npublishedAt: 2024-01-01\n---\n## Found It\n\nText").unwrap();
        let page = page_from_markdown(&doc).unwrap();

        assert_eq!(page.title, "Found It");
        assert_eq!(page.slug, "custom-path");
        assert!(page.is_published);
    }

    #[test]
    fn test_import_title_skips_empty_heading() {
        let doc = parse_document("---\nstatus: draft\n---\n#\n\n### Using `Result`\n\nText").unwrap();
        let page = page_from_markdown(&doc).unwrap();
        assert_eq!(page.title, "Using Result");
        assert_eq!(page.slug, "using-result");
    }

    #[test]
    fn test_import_empty_body_keeps_default_heading() {
        let doc = parse_document("---\ntitle: Empty\n---\n").unwrap();
        let page = page_from_markdown(&doc).unwrap();
        assert_eq!(page.blocks.len(), 1);
        assert_eq!(page.blocks[0].plain_text(), "Empty");
    }

    #[test]
    fn test_split_highlights_unpaired_marker() {
        let segments = split_highlights("a == b");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].content, "a == b");
    }

    // ------------------------------------------------------------------------
    // Export tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_export_then_import_keeps_structure() {
        let mut page = Page::titled("Round Trip");
        page.description = "Both ways".into();
        page.is_published = true;
        page.blocks.push(Block::with_segments(
            BlockType::Paragraph,
            1,
            vec![
                Segment::text("Plain "),
                Segment::highlighted("marked", "yellow"),
                Segment::text(" and "),
                Segment::link("linked", "/x"),
            ],
        ));
        page.blocks.push(Block::with_segments(BlockType::Quote, 2, vec![Segment::text("Said")]));
        page.blocks.push(Block::with_segments(BlockType::Code, 3, vec![Segment::text("let x = 1;")]));

        let markdown = page_to_markdown(&page);
        let back = page_from_markdown(&parse_document(&markdown).unwrap()).unwrap();

        assert_eq!(back.title, page.title);
        assert_eq!(back.slug, page.slug);
        assert_eq!(back.description, page.description);
        assert!(back.is_published);
        assert_eq!(kinds(&back), kinds(&page));
        for (a, b) in back.blocks.iter().zip(&page.blocks) {
            let left: Vec<_> = a.content.iter().map(|s| (s.kind, &s.content, &s.data)).collect();
            let right: Vec<_> = b.content.iter().map(|s| (s.kind, &s.content, &s.data)).collect();
            assert_eq!(left, right);
        }
    }

    #[test]
    fn test_export_frontmatter() {
        let page = Page::titled("Draft Page");
        let markdown = page_to_markdown(&page);
        let doc = parse_document(&markdown).unwrap();

        assert_eq!(doc.metadata.get_str("status"), Some("draft"));
        assert_eq!(doc.metadata.get_str("slug"), Some("draft-page"));
        assert_eq!(doc.body, "# Draft Page");
    }

    // ------------------------------------------------------------------------
    // Property tests
    // ------------------------------------------------------------------------

    proptest! {
        #[test]
        fn prop_split_highlights_is_lossless(text in "[a-z ]{0,8}(==[a-z]{1,5}==[a-z ]{0,8}){0,3}") {
            let rebuilt: String = split_highlights(&text)
                .iter()
                .map(|s| match s.kind {
                    SegmentType::Highlighted => format!("=={}==", s.content),
                    _ => s.content.clone(),
                })
                .collect();
            prop_assert_eq!(rebuilt, text);
        }
    }
}
