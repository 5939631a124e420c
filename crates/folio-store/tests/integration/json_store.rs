//! Integration tests for `PageStore` over `JsonFileBackend`.

use folio_store::{BlockType, JsonFileBackend, PageContent, PagePatch, PageStore, SegmentType};
use tempfile::TempDir;

async fn open_store(dir: &TempDir) -> PageStore {
    let store = PageStore::new(JsonFileBackend::new(dir.path().join("pages")));
    store.init().await.expect("init should create the directory");
    store.load().await.expect("load should succeed");
    store
}

#[tokio::test]
async fn test_pages_survive_reload() {
    let dir = TempDir::new().unwrap();

    let (id, block_id) = {
        let store = open_store(&dir).await;
        let page = store.create_page_titled("Persistent").await.unwrap();
        let block = store
            .add_block(page.id, BlockType::Paragraph, None)
            .await
            .unwrap();
        store
            .add_segment(page.id, block.id, SegmentType::Highlighted)
            .await
            .unwrap();
        store
            .update_page(page.id, PagePatch::new().published(true))
            .await
            .unwrap();
        (page.id, block.id)
    };

    let store = open_store(&dir).await;
    let page = store.get_page(id).await.unwrap();

    assert_eq!(page.slug, "persistent");
    assert!(page.is_published);
    assert_eq!(page.blocks.len(), 2);
    assert_eq!(page.blocks[1].id, block_id);
    assert_eq!(page.blocks[1].content.len(), 2);
    assert_eq!(store.get_page_by_slug("persistent").await.unwrap().id, id);
}

#[tokio::test]
async fn test_deleted_page_stays_deleted() {
    let dir = TempDir::new().unwrap();

    let id = {
        let store = open_store(&dir).await;
        let keep = store.create_page_titled("Keep").await.unwrap();
        let drop = store.create_page_titled("Drop").await.unwrap();
        store.delete_page(drop.id).await.unwrap();
        keep.id
    };

    let store = open_store(&dir).await;
    let pages = store.list_pages().await;
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].id, id);
    assert!(store.get_page_by_slug("drop").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_save_page_content_reaches_disk() {
    let dir = TempDir::new().unwrap();

    let id = {
        let store = open_store(&dir).await;
        let page = store.create_page().await.unwrap();
        let mut blocks = page.blocks.clone();
        blocks.push(folio_store::Block::new(BlockType::Code, 7));
        store
            .save_page_content(page.id, PageContent::new(blocks))
            .await
            .unwrap();
        page.id
    };

    let store = open_store(&dir).await;
    let page = store.get_page(id).await.unwrap();
    assert_eq!(page.blocks.len(), 2);
    assert_eq!(page.blocks[1].kind, BlockType::Code);
    assert_eq!(page.blocks[1].order, 7);
}

#[tokio::test]
async fn test_content_save_version_survives_reload() {
    let dir = TempDir::new().unwrap();

    let (id, saved) = {
        let store = open_store(&dir).await;
        let page = store.create_page().await.unwrap();
        let saved = store
            .save_page_content(page.id, PageContent::new(page.blocks.clone()))
            .await
            .unwrap();
        assert_eq!(saved.version, page.version + 1);
        (page.id, saved)
    };

    let store = open_store(&dir).await;
    let page = store.get_page(id).await.unwrap();
    assert_eq!(page.version, saved.version);
    assert_eq!(page.updated_at, saved.updated_at);

    let err = store
        .update_page(id, PagePatch::new().title("Stale").expect_version(saved.version - 1))
        .await
        .unwrap_err();
    assert!(err.is_conflict());
}

#[tokio::test]
async fn test_persist_rewrites_all_pages() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    store.create_page().await.unwrap();
    store.create_page().await.unwrap();
    std::fs::remove_dir_all(dir.path().join("pages")).unwrap();

    store.init().await.unwrap();
    assert_eq!(store.persist().await.unwrap(), 2);

    let reopened = open_store(&dir).await;
    assert_eq!(reopened.len().await, 2);
}
