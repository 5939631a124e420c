//! Handler functions for content CLI commands.
//!
//! These implement `parse`, `toc`, `scan`, `show`, and `categories`. Each handler
//! prints to stdout; the `render_*` helpers build the text so it can be
//! checked without capturing output.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use folio_content::corpus::DEFAULT_SUMMARY_CHARS;
use folio_content::markdown::parser::{estimate_read_time, extract_first_paragraph, format_read_time};
use folio_content::{Corpus, CorpusEntry, MetaValue, ParsedDocument, ScanOptions, TocNode};
use folio_content::{parse_document, parse_document_toc};
use folio_core::util::files::read_file;
use folio_core::util::paths::expand_tilde;
use folio_core::{CancelSignal, Error, Result};
use serde::Serialize;

use crate::config::FolioConfig;

// ============================================================================
// Report types
// ============================================================================

/// What `parse --json` prints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentReport<'a> {
    /// Source file.
    pub path: &'a Path,
    /// The parsed metadata and body.
    #[serde(flatten)]
    pub document: &'a ParsedDocument,
    /// `summary`/`excerpt`, else the first paragraph.
    pub summary: Option<String>,
    /// Estimated minutes to read the body.
    pub read_time_minutes: u32,
    /// Table of contents of the body.
    pub toc: Vec<TocNode>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Parse one document and print its metadata, summary, and read time.
pub async fn handle_parse(config: &FolioConfig, file: &str, json: bool) -> Result<()> {
    let path = expand_tilde(file);
    let doc = load_document(&path).await?;

    let report = DocumentReport {
        path: &path,
        document: &doc,
        summary: doc
            .metadata
            .post_meta()
            .summary
            .or_else(|| extract_first_paragraph(&doc.body, DEFAULT_SUMMARY_CHARS)),
        read_time_minutes: estimate_read_time(&doc.body, config.content.words_per_minute),
        toc: parse_document_toc(&doc.body, config.toc.max_depth),
    };

    if json {
        println!("{}", to_json(&report)?);
    } else {
        print!("{}", render_document(&report));
    }
    Ok(())
}

/// Print the table of contents of one document.
pub async fn handle_toc(config: &FolioConfig, file: &str, max_depth: Option<u8>, json: bool) -> Result<()> {
    let path = expand_tilde(file);
    let doc = load_document(&path).await?;
    let toc = parse_document_toc(&doc.body, max_depth.unwrap_or(config.toc.max_depth));

    if json {
        println!("{}", to_json(&toc)?);
    } else if toc.is_empty() {
        println!("No headings in {}", path.display());
    } else {
        print!("{}", render_toc(&toc));
    }
    Ok(())
}

/// Scan the content root and print one line per document.
pub async fn handle_scan(config: &FolioConfig, root: Option<&str>, all: bool) -> Result<()> {
    let corpus = scan_corpus(config, root).await?;
    tracing::info!(
        documents = corpus.len(),
        errors = corpus.error_count(),
        "Scanned {}",
        corpus.root().display()
    );

    let entries: Vec<&CorpusEntry> = if all {
        corpus.entries().iter().collect()
    } else {
        corpus.listing()
    };
    print!("{}", render_listing(&entries));
    println!("\n{} document(s), {} without frontmatter", entries.len(), corpus.error_count());
    Ok(())
}

/// Print one scanned document, looked up by slug.
pub async fn handle_show(config: &FolioConfig, slug: &str, root: Option<&str>, json: bool) -> Result<()> {
    let corpus = scan_corpus(config, root).await?;
    let entry = find_entry(&corpus, slug)?;

    if json {
        println!("{}", to_json(entry)?);
    } else {
        print!("{}", render_entry(entry, config.toc.max_depth));
    }
    Ok(())
}

/// Print every category with the documents filed under it.
pub async fn handle_categories(config: &FolioConfig, root: Option<&str>) -> Result<()> {
    let corpus = scan_corpus(config, root).await?;
    let categories = corpus.categories();
    if categories.is_empty() {
        println!("No categories under {}", corpus.root().display());
    } else {
        print!("{}", render_categories(&categories));
    }
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

async fn load_document(path: &Path) -> Result<ParsedDocument> {
    let raw = read_file(path).await?;
    parse_document(&raw).map_err(|e| {
        if e.is_frontmatter_missing() {
            Error::frontmatter_missing(format!("{}: {e}", path.display()))
        } else {
            e
        }
    })
}

/// The entry at `slug`, or a `NotFound` error naming the closest slug.
pub fn find_entry<'a>(corpus: &'a Corpus, slug: &str) -> Result<&'a CorpusEntry> {
    corpus.get(slug).ok_or_else(|| {
        let hint = corpus
            .suggest(slug)
            .map(|s| format!("; did you mean '{s}'?"))
            .unwrap_or_default();
        Error::not_found(format!(
            "No document '{slug}' under {}{hint}",
            corpus.root().display()
        ))
    })
}

/// Scan `root`, or the configured content root.
pub async fn scan_corpus(config: &FolioConfig, root: Option<&str>) -> Result<Corpus> {
    let root: PathBuf = root.map(expand_tilde).unwrap_or_else(|| config.content_root());
    let options = ScanOptions {
        find: config.find_options(),
        words_per_minute: config.content.words_per_minute,
    };
    Corpus::scan(&root, &options, &CancelSignal::never()).await
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| Error::serialization(e.to_string()))
}

fn format_meta_value(value: &MetaValue) -> String {
    match value {
        MetaValue::Scalar(s) => s.clone(),
        MetaValue::List(items) => format!("[{}]", items.join(", ")),
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Text form of a parsed document.
pub fn render_document(report: &DocumentReport<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "File: {}", report.path.display());
    if !report.document.metadata.is_empty() {
        let _ = writeln!(out, "Metadata:");
        for (key, value) in report.document.metadata.iter() {
            let _ = writeln!(out, "  {key}: {}", format_meta_value(value));
        }
    }
    if let Some(summary) = &report.summary {
        let _ = writeln!(out, "Summary: {summary}");
    }
    let _ = writeln!(out, "Read time: {}", format_read_time(report.read_time_minutes));
    let _ = writeln!(out, "Headings: {}", report.toc.iter().map(TocNode::len).sum::<usize>());
    out
}

/// Indented outline of a TOC, two spaces per nesting level.
pub fn render_toc(nodes: &[TocNode]) -> String {
    fn walk(nodes: &[TocNode], depth: usize, out: &mut String) {
        for node in nodes {
            let _ = writeln!(out, "{}- {} (#{})", "  ".repeat(depth), node.text, node.id);
            walk(&node.children, depth + 1, out);
        }
    }
    let mut out = String::new();
    walk(nodes, 0, &mut out);
    out
}

/// One line per entry: slug, date, title, and read time or error.
pub fn render_listing(entries: &[&CorpusEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        let date = entry.published_at().unwrap_or("-");
        if let Some(err) = &entry.error {
            let _ = writeln!(out, "{:<32} {:<10} ERROR {err}", entry.slug, date);
        } else {
            let draft = if entry.is_draft() { " [draft]" } else { "" };
            let _ = writeln!(
                out,
                "{:<32} {:<10} {}{draft} ({})",
                entry.slug,
                date,
                entry.title(),
                entry.read_time_label()
            );
        }
    }
    out
}

/// Text form of one corpus entry.
pub fn render_entry(entry: &CorpusEntry, max_depth: u8) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "File: {}", entry.path.display());
    let _ = writeln!(out, "Slug: {}", entry.slug);
    if let Some(err) = &entry.error {
        let _ = writeln!(out, "Error: {err}");
        return out;
    }
    let _ = writeln!(out, "Title: {}", entry.title());
    if let Some(date) = entry.published_at() {
        let _ = writeln!(out, "Published: {date}");
    }
    if let Some(summary) = entry.summary(DEFAULT_SUMMARY_CHARS) {
        let _ = writeln!(out, "Summary: {summary}");
    }
    let _ = writeln!(out, "Read time: {}", entry.read_time_label());
    let toc = entry.toc(max_depth);
    if !toc.is_empty() {
        let _ = writeln!(out, "Contents:");
        for line in render_toc(&toc).lines() {
            let _ = writeln!(out, "  {line}");
        }
    }
    out
}

/// Category headers followed by indented slugs.
pub fn render_categories(categories: &BTreeMap<String, Vec<String>>) -> String {
    let mut out = String::new();
    for (category, slugs) in categories {
        let _ = writeln!(out, "{category} ({})", slugs.len());
        for slug in slugs {
            let _ = writeln!(out, "  {slug}");
        }
    }
    out
}

// ============================================================================
// Tests
// ============================================================================
