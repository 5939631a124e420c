//! Integration tests for importing markdown documents into the store.

use folio_content::parse_document;
use folio_store::{BlockType, PageStore, SegmentType, page_from_markdown, page_to_markdown};

const POST: &str = "---
title: Shipping Folio
summary: How the content engine came together
publishedAt: 2024-05-01
---

# Shipping Folio

The editor keeps ==every block== ordered. See [the repo](https://example.com/folio).

## Next steps

> Ship small.
";

#[tokio::test]
async fn test_import_into_store_and_export_again() {
    let store = PageStore::in_memory();
    let page = page_from_markdown(&parse_document(POST).unwrap()).unwrap();
    let page = store.insert_page(page).await.unwrap();

    assert_eq!(page.slug, "shipping-folio");
    assert!(page.is_published);
    let kinds: Vec<_> = page.blocks.iter().map(|b| b.kind).collect();
    assert_eq!(
        kinds,
        vec![
            BlockType::Heading,
            BlockType::Paragraph,
            BlockType::Heading,
            BlockType::Quote
        ]
    );
    let segment_kinds: Vec<_> = page.blocks[1].content.iter().map(|s| s.kind).collect();
    assert_eq!(
        segment_kinds,
        vec![
            SegmentType::Text,
            SegmentType::Highlighted,
            SegmentType::Text,
            SegmentType::Link,
            SegmentType::Text
        ]
    );

    let exported = page_to_markdown(&store.get_page(page.id).await.unwrap());
    let reparsed = parse_document(&exported).unwrap();
    assert_eq!(reparsed.metadata.get_str("title"), Some("Shipping Folio"));
    assert!(reparsed.body.contains("==every block=="));
    assert!(reparsed.body.contains("[the repo](https://example.com/folio)"));
    assert!(reparsed.body.contains("> Ship small."));
}

#[tokio::test]
async fn test_import_twice_gets_unique_slugs() {
    let store = PageStore::in_memory();
    let doc = parse_document(POST).unwrap();

    let first = store.insert_page(page_from_markdown(&doc).unwrap()).await.unwrap();
    let second = store.insert_page(page_from_markdown(&doc).unwrap()).await.unwrap();

    assert_eq!(first.slug, "shipping-folio");
    assert_eq!(second.slug, "shipping-folio-2");
}
