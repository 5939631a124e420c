//! Directory of JSON page files.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use folio_core::{Error, Result};
use tokio::fs;

use super::PageBackend;
use crate::ids::PageId;
use crate::model::{Page, PageContent, Revision};

const PAGE_EXTENSION: &str = "json";

/// Stores each page as `<dir>/<page-id>.json`.
///
/// Writes go to a temporary sibling file which is then renamed over the
/// target, so a crash never leaves a half-written page behind.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    dir: PathBuf,
}

impl JsonFileBackend {
    /// Create a backend rooted at `dir`. Nothing is touched until
    /// [`init`](PageBackend::init).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The storage directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn page_path(&self, id: PageId) -> PathBuf {
        self.dir.join(format!("{id}.{PAGE_EXTENSION}"))
    }

    async fn read_page(&self, path: &Path) -> Result<Page> {
        let raw = fs::read_to_string(path)
            .await
            .map_err(|e| Error::io_with_path(e, path))?;
        serde_json::from_str(&raw).map_err(|e| {
            Error::invalid_data(format!("Malformed page file {}: {e}", path.display()))
        })
    }

    async fn write_page(&self, page: &Page) -> Result<()> {
        let path = self.page_path(page.id);
        let tmp = path.with_extension(format!("{PAGE_EXTENSION}.tmp"));
        let json = serde_json::to_string_pretty(page)
            .map_err(|e| Error::serialization(format!("Failed to encode page {}: {e}", page.id)))?;

        fs::write(&tmp, json)
            .await
            .map_err(|e| Error::io_with_path(e, &tmp))?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|e| Error::io_with_path(e, &path))?;
        log::debug!("Wrote page {} to {}", page.slug, path.display());
        Ok(())
    }
}

#[async_trait]
impl PageBackend for JsonFileBackend {
    fn name(&self) -> &str {
        "json-file"
    }

    async fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| Error::io_with_path(e, &self.dir))
    }

    async fn load_pages(&self) -> Result<Vec<Page>> {
        let mut entries = fs::read_dir(&self.dir)
            .await
            .map_err(|e| Error::io_with_path(e, &self.dir))?;

        let mut pages = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| Error::io_with_path(e, &self.dir))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(PAGE_EXTENSION) {
                continue;
            }
            pages.push(self.read_page(&path).await?);
        }

        log::debug!("Loaded {} pages from {}", pages.len(), self.dir.display());
        Ok(pages)
    }

    async fn save_page(&self, page: &Page) -> Result<()> {
        self.write_page(page).await
    }

    async fn save_page_content(
        &self,
        id: PageId,
        content: &PageContent,
        revision: Revision,
    ) -> Result<()> {
        let path = self.page_path(id);
        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(Error::not_found(format!("Page {id} is not stored")));
        }
        let mut page = self.read_page(&path).await?;
        page.blocks = content.blocks.clone();
        page.apply_revision(revision);
        self.write_page(&page).await
    }

    async fn delete_page(&self, id: PageId) -> Result<()> {
        let path = self.page_path(id);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::io_with_path(e, &path)),
        }
    }
}
