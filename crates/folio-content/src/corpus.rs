//! Corpus scanning: discover content files under a root and batch-parse them.
//!
//! A file without a frontmatter block does not abort the scan. It is logged
//! and replaced by a placeholder entry (title `"Error"`, status `"error"`) so
//! listings can still render and surface the problem. Read failures and
//! cancellation do abort the scan and propagate to the caller.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use folio_core::util::files::{FileInfo, FindOptions, find_all_files, read_file};
use folio_core::{CancelSignal, Error, Result};
use serde::Serialize;

use crate::markdown::frontmatter::parse_document;
use crate::markdown::parser::{
    DEFAULT_WORDS_PER_MINUTE, estimate_read_time, extract_first_paragraph, format_read_time,
};
use crate::markdown::toc::{TocNode, parse_document_toc};
use crate::metadata::{Metadata, PostMeta};

/// Title given to placeholder entries.
pub const ERROR_TITLE: &str = "Error";

/// Status given to placeholder entries.
pub const ERROR_STATUS: &str = "error";

/// Default length of derived summaries, in characters.
pub const DEFAULT_SUMMARY_CHARS: usize = 160;

/// Minimum Jaro-Winkler similarity for a slug suggestion.
const SUGGEST_THRESHOLD: f64 = 0.7;

/// Options controlling a corpus scan.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Which files count as documents.
    pub find: FindOptions,
    /// Reading speed for read-time estimates.
    pub words_per_minute: u32,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            find: FindOptions::content(),
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
        }
    }
}

/// One parsed document of the corpus.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusEntry {
    /// Relative path without extension, `/`-separated.
    pub slug: String,
    /// Absolute path of the source file.
    pub path: PathBuf,
    /// Frontmatter fields.
    pub metadata: Metadata,
    /// Body text after the frontmatter.
    pub body: String,
    /// Estimated minutes to read the body.
    pub read_time_minutes: u32,
    /// Why the document could not be parsed, for placeholder entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CorpusEntry {
    /// Build the placeholder that stands in for an unparseable document.
    pub fn placeholder(slug: impl Into<String>, path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            path: path.into(),
            metadata: Metadata::new()
                .with("title", ERROR_TITLE)
                .with("status", ERROR_STATUS),
            body: String::new(),
            read_time_minutes: 0,
            error: Some(reason.into()),
        }
    }

    /// Whether this is a placeholder for a document that failed to parse.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Typed view over the entry's metadata.
    pub fn post_meta(&self) -> PostMeta {
        self.metadata.post_meta()
    }

    /// The `title` field, or the slug when there is none.
    pub fn title(&self) -> &str {
        self.metadata.get_str("title").unwrap_or(&self.slug)
    }

    /// The `publishedAt` field, verbatim.
    pub fn published_at(&self) -> Option<&str> {
        self.metadata.get_str("publishedAt")
    }

    /// Whether the entry is marked as a draft.
    pub fn is_draft(&self) -> bool {
        self.post_meta().is_draft()
    }

    /// The `summary`/`excerpt` field, else the body's first paragraph.
    pub fn summary(&self, max_chars: usize) -> Option<String> {
        self.post_meta()
            .summary
            .or_else(|| extract_first_paragraph(&self.body, max_chars))
    }

    /// The author-supplied `readTime`, else the estimate.
    pub fn read_time_label(&self) -> String {
        self.metadata
            .get_str("readTime")
            .map(String::from)
            .unwrap_or_else(|| format_read_time(self.read_time_minutes))
    }

    /// Table of contents of the body.
    pub fn toc(&self, max_depth: u8) -> Vec<TocNode> {
        parse_document_toc(&self.body, max_depth)
    }
}

/// Parse one discovered file's contents into an entry.
///
/// A missing frontmatter block yields a placeholder; every other error is
/// returned.
pub fn parse_entry(file: &FileInfo, raw: &str, words_per_minute: u32) -> Result<CorpusEntry> {
    match parse_document(raw) {
        Ok(doc) => Ok(CorpusEntry {
            slug: file.slug.clone(),
            path: file.path.clone(),
            read_time_minutes: estimate_read_time(&doc.body, words_per_minute),
            metadata: doc.metadata,
            body: doc.body,
            error: None,
        }),
        Err(e) if e.is_frontmatter_missing() => {
            log::warn!("Skipping {}: {e}", file.path.display());
            Ok(CorpusEntry::placeholder(&file.slug, &file.path, e.to_string()))
        }
        Err(e) => Err(e),
    }
}

/// Every document found under a content root.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    root: PathBuf,
    entries: Vec<CorpusEntry>,
}

impl Corpus {
    /// Discover and parse every document under `root`.
    ///
    /// Entries are ordered by slug. The cancel signal is checked between
    /// files; a cancelled scan returns [`Error::Cancelled`].
    pub async fn scan(root: &Path, options: &ScanOptions, cancel: &CancelSignal) -> Result<Self> {
        let files = find_all_files(root, &options.find, cancel).await?;
        log::debug!("Found {} content files under {}", files.len(), root.display());

        let mut entries = Vec::with_capacity(files.len());
        for file in &files {
            if cancel.is_cancelled() {
                return Err(Error::cancelled(format!(
                    "Scan of {} cancelled after {} files",
                    root.display(),
                    entries.len()
                )));
            }
            let raw = read_file(&file.path).await?;
            entries.push(parse_entry(file, &raw, options.words_per_minute)?);
        }

        let corpus = Self::from_entries(root, entries);
        if corpus.error_count() > 0 {
            log::warn!(
                "{} of {} documents under {} have no frontmatter",
                corpus.error_count(),
                corpus.len(),
                root.display()
            );
        }
        Ok(corpus)
    }

    /// Build a corpus from already-parsed entries.
    ///
    /// When several entries share a slug the first one given wins and the
    /// rest are dropped with a warning.
    pub fn from_entries(root: impl Into<PathBuf>, mut entries: Vec<CorpusEntry>) -> Self {
        entries.sort_by(|a, b| a.slug.cmp(&b.slug));
        entries.dedup_by(|later, kept| {
            let shared = later.slug == kept.slug;
            if shared {
                log::warn!(
                    "Ignoring {}: slug '{}' already belongs to {}",
                    later.path.display(),
                    later.slug,
                    kept.path.display()
                );
            }
            shared
        });
        Self {
            root: root.into(),
            entries,
        }
    }

    /// The scanned root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All entries, ordered by slug.
    pub fn entries(&self) -> &[CorpusEntry] {
        &self.entries
    }

    /// Number of entries, placeholders included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the corpus is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by slug.
    pub fn get(&self, slug: &str) -> Option<&CorpusEntry> {
        self.entries
            .binary_search_by(|e| e.slug.as_str().cmp(slug))
            .ok()
            .and_then(|i| self.entries.get(i))
    }

    /// Number of placeholder entries.
    pub fn error_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_error()).count()
    }

    /// Entries for an index page.
    ///
    /// Drafts are excluded. Dated entries come first, newest `publishedAt`
    /// first (dates compare as ISO-8601 strings), then undated entries, then
    /// placeholders. Ties fall back to slug order.
    pub fn listing(&self) -> Vec<&CorpusEntry> {
        let mut listed: Vec<&CorpusEntry> = self.entries.iter().filter(|e| !e.is_draft()).collect();
        listed.sort_by(|a, b| {
            a.is_error()
                .cmp(&b.is_error())
                .then_with(|| match (a.published_at(), b.published_at()) {
                    (Some(x), Some(y)) => y.cmp(x),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                })
                .then_with(|| a.slug.cmp(&b.slug))
        });
        listed
    }

    /// Category name → slugs of the non-draft entries filed under it.
    pub fn categories(&self) -> BTreeMap<String, Vec<String>> {
        let mut out: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for entry in self.entries.iter().filter(|e| !e.is_error() && !e.is_draft()) {
            for category in entry.post_meta().all_categories() {
                out.entry(category).or_default().push(entry.slug.clone());
            }
        }
        out
    }

    /// The existing slug closest to `slug`, for "did you mean" hints.
    pub fn suggest(&self, slug: &str) -> Option<&str> {
        self.entries
            .iter()
            .map(|e| (strsim::jaro_winkler(slug, &e.slug), e.slug.as_str()))
            .filter(|(score, _)| *score >= SUGGEST_THRESHOLD)
            .max_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, s)| s)
    }
}
