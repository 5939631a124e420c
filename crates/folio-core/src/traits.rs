//! Core traits shared by Folio front ends.
//!
//! [`ConfigManager`] abstracts a loadable, serializable configuration so
//! that generic `config` subcommands (`path`, `get`, `set`, `init`,
//! `export`) can be written once and reused by any binary.

use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::Result;

/// A configuration type that knows where it lives and how to load itself.
///
/// # Example
///
/// ```
/// use std::path::PathBuf;
/// use folio_core::traits::ConfigManager;
/// use folio_core::Result;
///
/// #[derive(Default, serde::Serialize, serde::Deserialize)]
/// struct SiteConfig {
///     root: Option<String>,
/// }
///
/// impl ConfigManager for SiteConfig {
///     fn project_name() -> &'static str { "site" }
///     fn load(_path: Option<&str>) -> Result<Self> { Ok(Self::default()) }
///     fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
///         explicit.map(PathBuf::from)
///     }
///     fn default_config_path() -> Option<PathBuf> { None }
///     fn to_toml_string(&self) -> Result<String> { Ok(String::new()) }
///     fn to_env_vars(&self) -> Result<Vec<(String, String)>> { Ok(vec![]) }
/// }
///
/// assert_eq!(SiteConfig::project_name(), "site");
/// ```
pub trait ConfigManager: Default + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Project name, used for env var prefixes and default paths.
    fn project_name() -> &'static str;

    /// Load configuration from file, environment, and defaults.
    fn load(config_path: Option<&str>) -> Result<Self>;

    /// Resolve the config file path from an explicit flag, env var, or
    /// platform default.
    fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf>;

    /// Platform default config path (e.g. `~/.config/<project>/config.toml`).
    fn default_config_path() -> Option<PathBuf>;

    /// Serialize to a pretty-printed TOML document.
    fn to_toml_string(&self) -> Result<String>;

    /// Flatten into `PREFIX_SECTION_KEY=value` pairs.
    fn to_env_vars(&self) -> Result<Vec<(String, String)>>;
}
