//! Configuration for the `folio` binary.
//!
//! [`FolioConfig`] is loaded from TOML files, environment variables, and
//! defaults using the `confyg` crate.
//!
//! # Loading Priority
//!
//! 1. Explicit `--config <path>` flag
//! 2. `FOLIO_CONFIG` environment variable
//! 3. Platform default: `~/.config/folio/config.toml`
//! 4. Built-in defaults
//!
//! `FOLIO_<SECTION>_<KEY>` variables override file values. confyg hands
//! environment values over as strings, so only string fields can be
//! overridden this way.

use std::path::PathBuf;

use confyg::{Confygery, env};
use folio_content::DEFAULT_MAX_DEPTH;
use folio_content::markdown::parser::DEFAULT_WORDS_PER_MINUTE;
use folio_core::traits::ConfigManager;
use folio_core::util::files::{CONTENT_EXTENSIONS, FindOptions};
use folio_core::util::paths::expand_tilde;
use folio_core::{Error, Result};
use serde::{Deserialize, Serialize};

const PROJECT_NAME: &str = "folio";
const ENV_PREFIX: &str = "FOLIO";
const CONFIG_ENV_VAR: &str = "FOLIO_CONFIG";

// ============================================================================
// Configuration structs
// ============================================================================

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    /// Content corpus settings.
    pub content: ContentConfig,

    /// Table-of-contents settings.
    pub toc: TocConfig,

    /// Page store settings.
    pub store: StoreConfig,
}

/// Where content lives and how it is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Content root directory.
    pub root: String,

    /// File extensions treated as documents, without the dot.
    pub extensions: Vec<String>,

    /// Reading speed used for read-time estimates.
    pub words_per_minute: u32,
}

/// Table-of-contents settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TocConfig {
    /// Deepest heading level included.
    pub max_depth: u8,
}

/// Page store settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory of page JSON files. Defaults to the platform data dir.
    pub path: Option<String>,
}

// ============================================================================
// Default implementations
// ============================================================================

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root: "content".to_string(),
            extensions: CONTENT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
        }
    }
}

impl Default for TocConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

// ============================================================================
// Derived settings
// ============================================================================

impl FolioConfig {
    /// The content root with `~` expanded.
    pub fn content_root(&self) -> PathBuf {
        expand_tilde(&self.content.root)
    }

    /// File discovery options for the configured extensions.
    pub fn find_options(&self) -> FindOptions {
        FindOptions::with_extensions(self.content.extensions.iter().map(String::as_str))
    }

    /// Directory holding the page store.
    pub fn store_dir(&self) -> Result<PathBuf> {
        match &self.store.path {
            Some(p) => Ok(expand_tilde(p)),
            None => dirs::data_dir()
                .map(|d| d.join(PROJECT_NAME).join("pages"))
                .ok_or_else(|| Error::config("Could not determine data directory; set store.path")),
        }
    }
}

// ============================================================================
// ConfigManager implementation
// ============================================================================

impl ConfigManager for FolioConfig {
    fn project_name() -> &'static str {
        PROJECT_NAME
    }

    fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder =
            Confygery::new().map_err(|e| Error::config(format!("config init: {e}")))?;

        if let Some(path) = Self::resolve_config_path(config_path)
            && path.exists()
        {
            builder
                .add_file(&path.to_string_lossy())
                .map_err(|e| Error::config(format!("config file: {e}")))?;
        }

        let mut env_opts = env::Options::with_top_level(ENV_PREFIX);
        env_opts.add_section("content");
        env_opts.add_section("toc");
        env_opts.add_section("store");
        builder
            .add_env(env_opts)
            .map_err(|e| Error::config(format!("config env: {e}")))?;

        builder
            .build()
            .map_err(|e| Error::config(format!("config build: {e}")))
    }

    fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Some(PathBuf::from(path));
        }
        Self::default_config_path()
    }

    fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(PROJECT_NAME).join("config.toml"))
    }

    fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    fn to_env_vars(&self) -> Result<Vec<(String, String)>> {
        let value = toml::Value::try_from(self).map_err(|e| Error::config(e.to_string()))?;
        let mut vars = Vec::new();
        flatten_toml_value(&value, ENV_PREFIX, &mut vars);
        Ok(vars)
    }
}

// ============================================================================
// Helper: flatten TOML to env vars
// ============================================================================

/// Recursively flatten a TOML value into `KEY=value` pairs.
fn flatten_toml_value(value: &toml::Value, prefix: &str, out: &mut Vec<(String, String)>) {
    match value {
        toml::Value::Table(table) => {
            for (key, val) in table {
                let env_key = format!("{}_{}", prefix, key.to_uppercase());
                flatten_toml_value(val, &env_key, out);
            }
        }
        toml::Value::Array(arr) => {
            if let Ok(json) = serde_json::to_string(arr) {
                out.push((prefix.to_string(), json));
            }
        }
        toml::Value::String(s) => out.push((prefix.to_string(), s.clone())),
        toml::Value::Integer(i) => out.push((prefix.to_string(), i.to_string())),
        toml::Value::Float(f) => out.push((prefix.to_string(), f.to_string())),
        toml::Value::Boolean(b) => out.push((prefix.to_string(), b.to_string())),
        toml::Value::Datetime(dt) => out.push((prefix.to_string(), dt.to_string())),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    // ------------------------------------------------------------------------
    // Default tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_folio_config_default() {
        let config = FolioConfig::default();
        assert_eq!(config.content.root, "content");
        assert_eq!(config.content.extensions, vec!["mdx", "md"]);
        assert_eq!(config.content.words_per_minute, 200);
        assert_eq!(config.toc.max_depth, 6);
        assert!(config.store.path.is_none());
    }

    // ------------------------------------------------------------------------
    // Serialization tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_folio_config_from_toml() {
        let toml_str = r#"
            [content]
            root = "/srv/site/content"
            extensions = ["md"]
            words_per_minute = 250

            [toc]
            max_depth = 3

            [store]
            path = "/srv/site/pages"
        "#;

        let config: FolioConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.content.root, "/srv/site/content");
        assert_eq!(config.content.extensions, vec!["md"]);
        assert_eq!(config.content.words_per_minute, 250);
        assert_eq!(config.toc.max_depth, 3);
        assert_eq!(config.store.path.as_deref(), Some("/srv/site/pages"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: FolioConfig = toml::from_str("[toc]\nmax_depth = 2").unwrap();
        assert_eq!(config.toc.max_depth, 2);
        assert_eq!(config.content, ContentConfig::default());
    }

    #[test]
    fn test_folio_config_to_toml() {
        let config = FolioConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        assert!(toml_str.contains("[content]"));
        assert!(toml_str.contains("max_depth = 6"));

        let parsed: FolioConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    // ------------------------------------------------------------------------
    // Loading tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_folio_config_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
                [content]
                root = "posts"
                [toc]
                max_depth = 4
            "#,
        )
        .unwrap();

        let config = FolioConfig::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.content.root, "posts");
        assert_eq!(config.toc.max_depth, 4);
    }

    #[test]
    fn test_folio_config_load_defaults() {
        let config = FolioConfig::load(Some("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.toc.max_depth, 6);
    }

    // ------------------------------------------------------------------------
    // Path tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_resolve_config_path_explicit() {
        let path = FolioConfig::resolve_config_path(Some("/explicit/config.toml"));
        assert_eq!(path, Some(PathBuf::from("/explicit/config.toml")));
    }

    #[test]
    fn test_default_config_path_names_project() {
        if let Some(p) = FolioConfig::default_config_path() {
            let s = p.to_string_lossy();
            assert!(s.contains("folio"));
            assert!(s.ends_with("config.toml"));
        }
    }

    #[test]
    fn test_store_dir_explicit() {
        let config = FolioConfig {
            store: StoreConfig {
                path: Some("/data/pages".into()),
            },
            ..Default::default()
        };
        assert_eq!(config.store_dir().unwrap(), PathBuf::from("/data/pages"));
    }

    #[test]
    fn test_find_options_follow_extensions() {
        let config = FolioConfig {
            content: ContentConfig {
                extensions: vec!["markdown".into()],
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(config.find_options().extensions, vec!["markdown"]);
    }

    // ------------------------------------------------------------------------
    // to_env_vars tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_folio_config_to_env_vars() {
        let vars = FolioConfig::default().to_env_vars().unwrap();
        let map: HashMap<_, _> = vars.into_iter().collect();
        assert_eq!(map.get("FOLIO_CONTENT_ROOT").unwrap(), "content");
        assert_eq!(map.get("FOLIO_TOC_MAX_DEPTH").unwrap(), "6");
        assert_eq!(map.get("FOLIO_CONTENT_EXTENSIONS").unwrap(), r#"["mdx","md"]"#);
        assert!(!map.contains_key("FOLIO_STORE_PATH"));
    }

    #[test]
    fn test_folio_config_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FolioConfig>();
    }
}
