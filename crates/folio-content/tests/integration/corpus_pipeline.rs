//! Integration tests for scanning a content tree.

use folio_content::{Corpus, ScanOptions};
use folio_core::CancelSignal;
use folio_core::util::files::FindOptions;

use crate::common::ContentFixture;

#[tokio::test]
async fn test_scan_discovers_documents_and_skips_hidden() {
    let fixture = ContentFixture::blog();

    let corpus = Corpus::scan(fixture.root(), &ScanOptions::default(), &CancelSignal::never())
        .await
        .expect("scan should succeed");

    let slugs: Vec<_> = corpus.entries().iter().map(|e| e.slug.as_str()).collect();
    assert_eq!(
        slugs,
        vec!["getting-started", "posts/async-rust", "posts/broken", "posts/wip"]
    );
}

#[tokio::test]
async fn test_scan_placeholder_for_missing_frontmatter() {
    let fixture = ContentFixture::blog();
    let corpus = Corpus::scan(fixture.root(), &ScanOptions::default(), &CancelSignal::never())
        .await
        .unwrap();

    let broken = corpus.get("posts/broken").unwrap();
    assert!(broken.is_error());
    assert_eq!(broken.title(), "Error");
    assert_eq!(corpus.error_count(), 1);
}

#[tokio::test]
async fn test_scan_metadata_values() {
    let fixture = ContentFixture::blog();
    let corpus = Corpus::scan(fixture.root(), &ScanOptions::default(), &CancelSignal::never())
        .await
        .unwrap();

    let guide = corpus.get("getting-started").unwrap().post_meta();
    assert_eq!(guide.tags, vec!["setup", "first steps"]);

    let tour = corpus.get("posts/async-rust").unwrap();
    assert_eq!(tour.title(), "Async Rust: a tour");
    assert_eq!(
        tour.summary(160).as_deref(),
        Some("Futures, executors, and you.")
    );
}

#[tokio::test]
async fn test_listing_and_categories() {
    let fixture = ContentFixture::blog();
    let corpus = Corpus::scan(fixture.root(), &ScanOptions::default(), &CancelSignal::never())
        .await
        .unwrap();

    let listed: Vec<_> = corpus.listing().iter().map(|e| e.slug.as_str()).collect();
    assert_eq!(listed, vec!["posts/async-rust", "getting-started", "posts/broken"]);

    let categories = corpus.categories();
    assert_eq!(
        categories.get("Guides").unwrap(),
        &vec!["getting-started".to_string(), "posts/async-rust".to_string()]
    );
    assert_eq!(categories.get("Rust").unwrap(), &vec!["posts/async-rust".to_string()]);
}

#[tokio::test]
async fn test_scan_restricted_extensions() {
    let fixture = ContentFixture::blog();
    let options = ScanOptions {
        find: FindOptions::with_extensions(["md"]),
        ..ScanOptions::default()
    };

    let corpus = Corpus::scan(fixture.root(), &options, &CancelSignal::never())
        .await
        .unwrap();

    assert_eq!(corpus.len(), 1);
    assert!(corpus.get("posts/async-rust").is_some());
}
