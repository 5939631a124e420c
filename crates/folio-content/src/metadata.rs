//! Generic frontmatter metadata and its typed view.
//!
//! The parser never whitelists keys: every `key: value` pair it finds lands
//! in [`Metadata`]. Call sites that want strongly-typed fields derive a
//! [`PostMeta`] view (or deserialize their own struct with
//! [`Metadata::deserialize`]); anything the view does not know about stays
//! reachable through [`PostMeta::extra`].

use std::collections::BTreeMap;

use folio_core::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A single frontmatter value: a string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    /// `key: value`
    Scalar(String),
    /// `key: [a, b, c]`
    List(Vec<String>),
}

impl MetaValue {
    /// The scalar string, if this is a scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            Self::List(_) => None,
        }
    }

    /// The list items, if this is a list.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::Scalar(_) => None,
            Self::List(items) => Some(items),
        }
    }

    /// View the value as a list. A scalar becomes a one-item list; an empty
    /// scalar becomes an empty list.
    pub fn to_list(&self) -> Vec<String> {
        match self {
            Self::Scalar(s) if s.is_empty() => Vec::new(),
            Self::Scalar(s) => vec![s.clone()],
            Self::List(items) => items.clone(),
        }
    }
}

impl From<&str> for MetaValue {
    fn from(s: &str) -> Self {
        Self::Scalar(s.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(s: String) -> Self {
        Self::Scalar(s)
    }
}

impl From<Vec<String>> for MetaValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl From<Vec<&str>> for MetaValue {
    fn from(items: Vec<&str>) -> Self {
        Self::List(items.into_iter().map(String::from).collect())
    }
}

/// Field name → value mapping parsed from a frontmatter block.
///
/// Keys are kept in sorted order so serialization is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata {
    fields: BTreeMap<String, MetaValue>,
}

impl Metadata {
    /// Create an empty metadata record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a field. Returns the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Option<MetaValue> {
        self.fields.insert(key.into(), value.into())
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Get a field.
    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.fields.get(key)
    }

    /// Get a scalar field.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key)?.as_str()
    }

    /// Get a list field. A scalar is returned as a one-item list; a missing
    /// field is an empty list.
    pub fn get_list(&self, key: &str) -> Vec<String> {
        self.fields
            .get(key)
            .map(MetaValue::to_list)
            .unwrap_or_default()
    }

    /// Check whether a field exists.
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Remove a field.
    pub fn remove(&mut self, key: &str) -> Option<MetaValue> {
        self.fields.remove(key)
    }

    /// Iterate over fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether there are no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Deserialize the metadata into a caller-defined type.
    ///
    /// # Example
    ///
    /// ```rust
    /// use folio_content::Metadata;
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize)]
    /// struct Card {
    ///     title: String,
    ///     #[serde(default)]
    ///     tags: Vec<String>,
    /// }
    ///
    /// let meta = Metadata::new()
    ///     .with("title", "Hello")
    ///     .with("tags", vec!["a", "b"]);
    /// let card: Card = meta.deserialize().unwrap();
    /// assert_eq!(card.title, "Hello");
    /// assert_eq!(card.tags, vec!["a", "b"]);
    /// ```
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        let value = serde_json::to_value(self)
            .map_err(|e| Error::serialization(format!("Failed to encode metadata: {e}")))?;
        serde_json::from_value(value)
            .map_err(|e| Error::invalid_data(format!("Failed to deserialize metadata: {e}")))
    }

    /// Derive the typed view over the well-known fields.
    pub fn post_meta(&self) -> PostMeta {
        PostMeta::from_metadata(self)
    }
}

impl<K: Into<String>, V: Into<MetaValue>> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Scalar keys understood by [`PostMeta`].
const SCALAR_KEYS: &[&str] = &[
    "title",
    "publishedAt",
    "summary",
    "excerpt",
    "image",
    "readTime",
    "author",
    "category",
    "status",
    "canonicalUrl",
    "updatedAt",
];

/// List keys understood by [`PostMeta`].
const LIST_KEYS: &[&str] = &["categories", "tags", "topics", "keywords"];

/// Strongly-typed view over the well-known blog post fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMeta {
    /// Post title.
    pub title: Option<String>,
    /// Publication date string (kept verbatim).
    pub published_at: Option<String>,
    /// Summary, from `summary` or else `excerpt`.
    pub summary: Option<String>,
    /// Cover image URL.
    pub image: Option<String>,
    /// Author-supplied read time, verbatim.
    pub read_time: Option<String>,
    /// Author name.
    pub author: Option<String>,
    /// Single category.
    pub category: Option<String>,
    /// Publication status (`draft`, `published`, ...).
    pub status: Option<String>,
    /// Canonical URL.
    pub canonical_url: Option<String>,
    /// Last update date string.
    pub updated_at: Option<String>,
    /// Category list.
    pub categories: Vec<String>,
    /// Tag list.
    pub tags: Vec<String>,
    /// Topic list.
    pub topics: Vec<String>,
    /// Keyword list.
    pub keywords: Vec<String>,
    /// Every field the view has no slot for.
    pub extra: Metadata,
}

impl PostMeta {
    /// Build the view from a generic metadata record.
    pub fn from_metadata(meta: &Metadata) -> Self {
        let scalar = |key: &str| meta.get_str(key).map(String::from);

        let extra = meta
            .iter()
            .filter(|(k, _)| !SCALAR_KEYS.contains(k) && !LIST_KEYS.contains(k))
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();

        Self {
            title: scalar("title"),
            published_at: scalar("publishedAt"),
            summary: scalar("summary").or_else(|| scalar("excerpt")),
            image: scalar("image"),
            read_time: scalar("readTime"),
            author: scalar("author"),
            category: scalar("category"),
            status: scalar("status"),
            canonical_url: scalar("canonicalUrl"),
            updated_at: scalar("updatedAt"),
            categories: meta.get_list("categories"),
            tags: meta.get_list("tags"),
            topics: meta.get_list("topics"),
            keywords: meta.get_list("keywords"),
            extra,
        }
    }

    /// Whether the post is marked as a draft.
    pub fn is_draft(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("draft"))
    }

    /// All categories: the scalar `category` followed by `categories`,
    /// without duplicates.
    pub fn all_categories(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for c in self.category.iter().chain(self.categories.iter()) {
            if !c.is_empty() && !out.contains(c) {
                out.push(c.clone());
            }
        }
        out
    }
}
