//! Integration tests for parse → headings → TOC on real documents.

use folio_content::markdown::{extract_headings, flatten, parse_document, parse_document_toc};

use crate::common::ContentFixture;

#[test]
fn test_toc_from_fixture_document() {
    let fixture = ContentFixture::blog();
    let raw = std::fs::read_to_string(fixture.root().join("getting-started.mdx")).unwrap();
    let doc = parse_document(&raw).unwrap();

    let toc = parse_document_toc(&doc.body, 6);
    assert_eq!(toc.len(), 1);
    assert_eq!(toc[0].id, "introduction");

    let children: Vec<_> = toc[0].children.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(children, vec!["getting-started", "prerequisites"]);
}

#[test]
fn test_toc_skipped_level_and_depth_limit() {
    let fixture = ContentFixture::blog();
    let raw = std::fs::read_to_string(fixture.root().join("posts/async-rust.md")).unwrap();
    let doc = parse_document(&raw).unwrap();

    let toc = parse_document_toc(&doc.body, 6);
    assert_eq!(toc[0].children[0].id, "pinning");
    assert_eq!(toc[0].children[0].level, 3);
    assert_eq!(toc[0].children[1].id, "executors");

    let shallow = parse_document_toc(&doc.body, 2);
    let ids: Vec<_> = flatten(&shallow).into_iter().map(|n| n.id).collect();
    assert_eq!(ids, vec!["futures", "executors"]);
}

#[test]
fn test_flatten_matches_extraction() {
    let body = "# A\n### B\n## C\n# D\n## A";
    let flat: Vec<_> = flatten(&parse_document_toc(body, 6))
        .into_iter()
        .map(|n| (n.id, n.level))
        .collect();
    let extracted: Vec<_> = extract_headings(body, 6)
        .into_iter()
        .map(|h| (h.id, h.level))
        .collect();

    assert_eq!(flat, extracted);
    assert_eq!(flat.last().map(|(id, _)| id.as_str()), Some("a-2"));
}
