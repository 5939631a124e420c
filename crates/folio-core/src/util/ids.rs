//! Identifier and slug utilities.
//!
//! Headings, pages, and corpus documents all need stable, URL-safe
//! identifiers derived from human-written text. The rules here are shared
//! by the TOC builder (DOM anchors), the page store (slugs), and the corpus
//! scanner (path-derived slugs).

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

/// Characters deleted (not replaced) when generating an identifier.
///
/// The hyphen is intentionally absent: existing hyphens survive.
pub const ID_PUNCTUATION: &[char] = &[
    '.', ',', '/', '#', '!', '$', '%', '^', '&', '*', ';', ':', '{', '}', '=', '_', '`', '~', '(',
    ')', '?', '\'', '"', '<', '>', '+',
];

/// Fallback slug for titles that sanitize to nothing.
pub const EMPTY_SLUG: &str = "untitled";

#[allow(clippy::expect_used)]
static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^<>]*>").expect("Invalid HTML tag regex"));

/// Remove inline markup from heading text.
///
/// Emphasis and code delimiters (`*`, `` ` ``) are dropped while their inner
/// text is kept, and HTML-tag-like substrings (`<...>`) are removed while the
/// text between tags is kept.
///
/// # Examples
///
/// ```
/// use folio_core::util::ids::sanitize;
///
/// assert_eq!(sanitize("Using `Result` **well**"), "Using Result well");
/// assert_eq!(sanitize("<code>main</code> entry"), "main entry");
/// ```
pub fn sanitize(text: &str) -> String {
    let without_tags = HTML_TAG.replace_all(text, "");
    without_tags
        .chars()
        .filter(|c| !matches!(c, '*' | '`'))
        .collect()
}

/// Generate a deterministic anchor identifier from heading text.
///
/// 1. Sanitize inline markup
/// 2. Lower-case
/// 3. Delete every character in [`ID_PUNCTUATION`]
/// 4. Collapse whitespace runs into a single `-`
/// 5. Collapse repeated `-` and trim them from both ends
///
/// # Examples
///
/// ```
/// use folio_core::util::ids::generate_id;
///
/// assert_eq!(generate_id("Getting Started"), "getting-started");
/// assert_eq!(generate_id("API Reference & Examples"), "api-reference-examples");
/// assert_eq!(generate_id("Acme.io & Widgets"), "acmeio-widgets");
/// ```
pub fn generate_id(text: &str) -> String {
    let lowered = sanitize(text).to_lowercase();

    let mut out = String::with_capacity(lowered.len());
    let mut pending_dash = false;
    for c in lowered.chars() {
        if ID_PUNCTUATION.contains(&c) {
            continue;
        }
        if c.is_whitespace() || c == '-' {
            pending_dash = true;
            continue;
        }
        if pending_dash && !out.is_empty() {
            out.push('-');
        }
        pending_dash = false;
        out.push(c);
    }

    out
}

/// Derive a URL-safe slug from a title.
///
/// Uses the same rules as [`generate_id`].
pub fn slugify(title: &str) -> String {
    generate_id(title)
}

/// Find a slug that is not yet taken.
///
/// Returns `base` when it is free; otherwise appends `-2`, `-3`, ... until
/// `is_taken` reports a free candidate. An empty base becomes
/// [`EMPTY_SLUG`].
///
/// # Examples
///
/// ```
/// use folio_core::util::ids::unique_slug;
///
/// let taken = ["hello", "hello-2"];
/// assert_eq!(unique_slug("hello", |s| taken.contains(&s)), "hello-3");
/// assert_eq!(unique_slug("fresh", |s| taken.contains(&s)), "fresh");
/// ```
pub fn unique_slug(base: &str, is_taken: impl Fn(&str) -> bool) -> String {
    let base = if base.is_empty() { EMPTY_SLUG } else { base };
    if !is_taken(base) {
        return base.to_string();
    }

    let mut n = 2usize;
    loop {
        let candidate = format!("{base}-{n}");
        if !is_taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Compute a corpus slug from a file path relative to the content root.
///
/// The extension is removed and path components are joined with `/`,
/// regardless of the platform separator. Returns `None` if `path` is not
/// under `root` or has no file stem.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use folio_core::util::ids::slug_from_path;
///
/// let root = Path::new("/site/content");
/// assert_eq!(
///     slug_from_path(root, Path::new("/site/content/blog/hello-world.mdx")),
///     Some("blog/hello-world".to_string())
/// );
/// assert_eq!(slug_from_path(root, Path::new("/elsewhere/post.md")), None);
/// ```
pub fn slug_from_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let stem = relative.file_stem()?.to_str()?;

    let mut parts: Vec<&str> = match relative.parent() {
        Some(parent) => parent
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect::<Option<Vec<_>>>()?,
        None => Vec::new(),
    };
    parts.push(stem);

    Some(parts.join("/"))
}
