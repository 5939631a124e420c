//! Handler functions for `page` CLI commands.
//!
//! Every command opens the JSON page store under the configured directory,
//! loads it, and addresses pages by slug.

use std::fmt::Write as _;
use std::path::Path;

use folio_content::parse_document;
use folio_core::util::files::read_file;
use folio_core::util::paths::expand_tilde;
use folio_core::{Error, Result};
use folio_store::{JsonFileBackend, Page, PagePatch, PageStore, page_from_markdown, page_to_markdown};

use crate::cli::PageAction;
use crate::config::FolioConfig;

// ============================================================================
// Command dispatch
// ============================================================================

/// Handle a page subcommand.
pub async fn handle_page_command(config: &FolioConfig, action: PageAction) -> Result<()> {
    let store = open_store(&config.store_dir()?).await?;

    match action {
        PageAction::New { title } => {
            let page = store.create_page_titled(title).await?;
            println!("Created page {} ({})", page.slug, page.id);
        }
        PageAction::List => {
            let pages = store.list_pages().await;
            if pages.is_empty() {
                println!("No pages.");
            } else {
                print!("{}", render_page_list(&pages));
            }
        }
        PageAction::Show { slug, markdown } => {
            let page = store.get_page_by_slug(&slug).await?;
            if markdown {
                println!("{}", page_to_markdown(&page));
            } else {
                let json = serde_json::to_string_pretty(&page)
                    .map_err(|e| Error::serialization(e.to_string()))?;
                println!("{json}");
            }
        }
        PageAction::Rename { slug, title, new_slug } => {
            let page = rename_page(&store, &slug, title, new_slug).await?;
            println!("Renamed {slug} -> {} ({})", page.slug, page.title);
        }
        PageAction::Publish { slug, undo } => {
            let page = set_published(&store, &slug, !undo).await?;
            let state = if page.is_published { "published" } else { "unpublished" };
            println!("{} is now {state}", page.slug);
        }
        PageAction::Delete { slug } => {
            let page = store.get_page_by_slug(&slug).await?;
            store.delete_page(page.id).await?;
            println!("Deleted {slug}");
        }
        PageAction::Import { file } => {
            let page = import_markdown(&store, &expand_tilde(&file)).await?;
            println!(
                "Imported {} as {} ({} blocks)",
                file,
                page.slug,
                page.blocks.len()
            );
        }
    }
    Ok(())
}

// ============================================================================
// Operations
// ============================================================================

/// Open and load the JSON page store rooted at `dir`, creating it if needed.
pub async fn open_store(dir: &Path) -> Result<PageStore> {
    let store = PageStore::new(JsonFileBackend::new(dir));
    store.init().await?;
    let count = store.load().await?;
    tracing::debug!(pages = count, "Opened page store at {}", dir.display());
    Ok(store)
}

/// Retitle the page at `slug`. The slug follows the title unless
/// `new_slug` is given.
pub async fn rename_page(
    store: &PageStore,
    slug: &str,
    title: String,
    new_slug: Option<String>,
) -> Result<Page> {
    let page = store.get_page_by_slug(slug).await?;
    let mut patch = PagePatch::new().title(title).expect_version(page.version);
    if let Some(new_slug) = new_slug {
        patch = patch.slug(new_slug);
    }
    store.update_page(page.id, patch).await
}

/// Set the published flag of the page at `slug`.
pub async fn set_published(store: &PageStore, slug: &str, published: bool) -> Result<Page> {
    let page = store.get_page_by_slug(slug).await?;
    store
        .update_page(
            page.id,
            PagePatch::new().published(published).expect_version(page.version),
        )
        .await
}

/// Convert a markdown document into a new page.
pub async fn import_markdown(store: &PageStore, path: &Path) -> Result<Page> {
    let raw = read_file(path).await?;
    let doc = parse_document(&raw)?;
    let page = page_from_markdown(&doc)?;
    store.insert_page(page).await
}

/// One line per page: slug, state, version, title.
pub fn render_page_list(pages: &[Page]) -> String {
    let mut out = String::new();
    for page in pages {
        let state = if page.is_published { "published" } else { "draft" };
        let _ = writeln!(
            out,
            "{:<32} {:<9} v{:<4} {}",
            page.slug, state, page.version, page.title
        );
    }
    out
}

// ============================================================================
// Tests
// ============================================================================
