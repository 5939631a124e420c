//! Async file utilities for the Folio content engine.
//!
//! Provides file discovery and reading used by the corpus scanner. The walk
//! runs on tokio's async filesystem layer, so scanning a large content tree
//! never blocks a request-serving thread.

use async_walkdir::{Filtering, WalkDir};
use futures::StreamExt;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::cancel::CancelSignal;
use crate::util::ids::slug_from_path;
use crate::{Error, Result};

/// Default extensions treated as content documents.
pub const CONTENT_EXTENSIONS: &[&str] = &["mdx", "md"];

/// Options for discovering files.
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    /// File extensions to match (without dot). Empty matches every file.
    pub extensions: Vec<String>,
    /// Maximum directory depth to search (None = unlimited).
    pub max_depth: Option<usize>,
    /// Skip files and directories whose name starts with `.`.
    pub skip_hidden: bool,
}

impl FindOptions {
    /// Create options for finding content documents (`.mdx` and `.md`).
    pub fn content() -> Self {
        Self::with_extensions(CONTENT_EXTENSIONS.iter().copied())
    }

    /// Create options matching the given extensions.
    pub fn with_extensions<'a>(extensions: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.trim_start_matches('.').to_string())
                .collect(),
            max_depth: None,
            skip_hidden: true,
        }
    }

    /// Set maximum search depth.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    fn matches_extension(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => self.extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)),
            None => false,
        }
    }

    /// Position of the path's extension in `extensions`; unlisted ones sort last.
    fn extension_rank(&self, path: &Path) -> usize {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(|ext| self.extensions.iter().position(|want| want.eq_ignore_ascii_case(ext)))
            .unwrap_or(self.extensions.len())
    }
}

/// Information about a discovered file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// Full path to the file.
    pub path: PathBuf,
    /// Path relative to the search base.
    pub relative_path: PathBuf,
    /// Slug derived from the relative path (`/`-separated, no extension).
    pub slug: String,
}

/// Find all files matching criteria under a directory.
///
/// Results are sorted by slug so listings are stable across runs. Files
/// sharing a slug (`a.md` and `a.mdx`) follow the order of
/// `options.extensions`. The
/// `cancel` signal is checked between entries; a cancelled walk returns
/// [`Error::Cancelled`].
///
/// # Example
///
/// ```no_run
/// # use folio_core::util::files::{find_all_files, FindOptions};
/// # use folio_core::CancelSignal;
/// # use std::path::Path;
/// # async fn example() -> folio_core::Result<()> {
/// let files = find_all_files(
///     Path::new("content"),
///     &FindOptions::content(),
///     &CancelSignal::never(),
/// ).await?;
/// # Ok(())
/// # }
/// ```
pub async fn find_all_files(
    base_path: &Path,
    options: &FindOptions,
    cancel: &CancelSignal,
) -> Result<Vec<FileInfo>> {
    if !exists(base_path).await {
        return Err(Error::not_found(format!(
            "Content root does not exist: {}",
            base_path.display()
        )));
    }

    let skip_hidden = options.skip_hidden;
    let mut files = Vec::new();
    let mut walker = WalkDir::new(base_path).filter(move |entry| async move {
        if skip_hidden && is_hidden_name(&entry.file_name()) {
            return Filtering::IgnoreDir;
        }
        Filtering::Continue
    });

    while let Some(entry_result) = walker.next().await {
        if cancel.is_cancelled() {
            log::info!("File discovery under {} cancelled", base_path.display());
            return Err(Error::cancelled(format!(
                "scan of {} aborted",
                base_path.display()
            )));
        }

        let entry =
            entry_result.map_err(|e| Error::io(std::io::Error::other(e.to_string())))?;
        let file_type = entry
            .file_type()
            .await
            .map_err(|e| Error::io_with_path(e, entry.path()))?;
        if file_type.is_dir() {
            continue;
        }

        let path = entry.path();
        let Ok(relative_path) = path.strip_prefix(base_path) else {
            continue;
        };

        if let Some(max_depth) = options.max_depth
            && relative_path.components().count() > max_depth
        {
            continue;
        }

        if !options.matches_extension(&path) {
            continue;
        }

        let Some(slug) = slug_from_path(base_path, &path) else {
            log::debug!("Skipping non UTF-8 path {}", path.display());
            continue;
        };

        files.push(FileInfo {
            relative_path: relative_path.to_path_buf(),
            path,
            slug,
        });
    }

    files.sort_by_cached_key(|f| (f.slug.clone(), options.extension_rank(&f.path)));
    log::debug!(
        "Discovered {} files under {}",
        files.len(),
        base_path.display()
    );
    Ok(files)
}

/// Read a file's contents as a string.
pub async fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .await
        .map_err(|e| Error::io_with_path(e, path))
}

/// Check if a path exists.
pub async fn exists(path: &Path) -> bool {
    fs::try_exists(path).await.unwrap_or(false)
}

fn is_hidden_name(name: &OsStr) -> bool {
    name.to_str().is_some_and(|s| s.starts_with('.'))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.unwrap();
        }
        fs::write(path, content).await.unwrap();
    }

    #[tokio::test]
    async fn test_find_all_files_content_extensions() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "one.md", "# One").await;
        write(temp.path(), "two.mdx", "# Two").await;
        write(temp.path(), "skip.txt", "skip").await;

        let files = find_all_files(temp.path(), &FindOptions::content(), &CancelSignal::never())
            .await
            .unwrap();

        let slugs: Vec<_> = files.iter().map(|f| f.slug.as_str()).collect();
        assert_eq!(slugs, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_find_all_files_nested_slugs() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "blog/2024/hello.mdx", "x").await;
        write(temp.path(), "about.md", "x").await;

        let files = find_all_files(temp.path(), &FindOptions::content(), &CancelSignal::never())
            .await
            .unwrap();

        let slugs: Vec<_> = files.iter().map(|f| f.slug.as_str()).collect();
        assert_eq!(slugs, vec!["about", "blog/2024/hello"]);
        assert_eq!(
            files[1].relative_path,
            PathBuf::from("blog").join("2024").join("hello.mdx")
        );
    }

    #[tokio::test]
    async fn test_find_all_files_skips_hidden() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), ".drafts/secret.md", "x").await;
        write(temp.path(), "public.md", "x").await;

        let files = find_all_files(temp.path(), &FindOptions::content(), &CancelSignal::never())
            .await
            .unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].slug, "public");
    }

    #[tokio::test]
    async fn test_find_all_files_hidden_dirs_pruned_under_hidden_root() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join(".site");
        write(&root, "posts/.cache/stale.md", "x").await;
        write(&root, "posts/.notes.md", "x").await;
        write(&root, "posts/hello.md", "x").await;

        let files = find_all_files(&root, &FindOptions::content(), &CancelSignal::never())
            .await
            .unwrap();
        let slugs: Vec<_> = files.iter().map(|f| f.slug.as_str()).collect();
        assert_eq!(slugs, vec!["posts/hello"]);

        let mut options = FindOptions::content();
        options.skip_hidden = false;
        let files = find_all_files(&root, &options, &CancelSignal::never()).await.unwrap();
        assert_eq!(files.len(), 3);
    }

    #[tokio::test]
    async fn test_find_all_files_shared_slug_follows_extension_order() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "a.md", "x").await;
        write(temp.path(), "a.mdx", "x").await;

        let files = find_all_files(temp.path(), &FindOptions::content(), &CancelSignal::never())
            .await
            .unwrap();
        let names: Vec<_> = files.iter().map(|f| f.relative_path.clone()).collect();
        assert_eq!(names, vec![PathBuf::from("a.mdx"), PathBuf::from("a.md")]);

        let options = FindOptions::with_extensions(["md", "mdx"]);
        let files = find_all_files(temp.path(), &options, &CancelSignal::never()).await.unwrap();
        assert_eq!(files[0].relative_path, PathBuf::from("a.md"));
    }

    #[tokio::test]
    async fn test_find_all_files_max_depth() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "top.md", "x").await;
        write(temp.path(), "a/b/deep.md", "x").await;

        let options = FindOptions::content().with_max_depth(1);
        let files = find_all_files(temp.path(), &options, &CancelSignal::never())
            .await
            .unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].slug, "top");
    }

    #[tokio::test]
    async fn test_find_all_files_missing_root() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");

        let err = find_all_files(&missing, &FindOptions::content(), &CancelSignal::never())
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_find_all_files_cancelled() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "one.md", "x").await;

        let (handle, signal) = CancelSignal::pair();
        handle.cancel();

        let err = find_all_files(temp.path(), &FindOptions::content(), &signal)
            .await
            .unwrap_err();

        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn test_read_file() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("test.md");
        fs::write(&file_path, "# Test Content").await.unwrap();

        assert_eq!(read_file(&file_path).await.unwrap(), "# Test Content");
    }

    #[tokio::test]
    async fn test_read_file_missing_reports_path() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("missing.md");

        let err = read_file(&file_path).await.unwrap_err();
        assert!(err.to_string().contains("missing.md"));
    }

    #[tokio::test]
    async fn test_exists() {
        let temp = TempDir::new().unwrap();
        assert!(exists(temp.path()).await);
        assert!(!exists(&temp.path().join("nope")).await);
    }

    #[test]
    fn test_matches_extension_case_insensitive() {
        let options = FindOptions::content();
        assert!(options.matches_extension(Path::new("a/B.MDX")));
        assert!(!options.matches_extension(Path::new("a/b.txt")));
        assert!(!options.matches_extension(Path::new("a/noext")));
    }
}
