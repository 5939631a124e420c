//! Handler functions for `config` CLI commands.
//!
//! `get` and `set` address [`FolioConfig`] fields by dotted key. Only the
//! keys in [`KEYS`] exist; values are checked against the field's range
//! before anything is written.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use folio_core::traits::ConfigManager;
use folio_core::{Error, Result};

use crate::cli::ConfigAction;
use crate::config::FolioConfig;

/// Every key `config get` and `config set` accept.
pub const KEYS: &[&str] = &[
    "content.root",
    "content.extensions",
    "content.words_per_minute",
    "toc.max_depth",
    "store.path",
];

// ============================================================================
// Command dispatch
// ============================================================================

/// Handle a config subcommand.
pub fn handle_config_command(config_path: Option<&str>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Path => {
            let path = config_file(config_path)?;
            println!("{}", path.display());
            if !path.exists() {
                eprintln!("(not created yet; run `folio config init`)");
            }
        }
        ConfigAction::Get { key } => {
            let config = FolioConfig::load(config_path)?;
            println!("{}", read_key(&config, &key)?);
        }
        ConfigAction::Set { key, value } => {
            let path = config_file(config_path)?;
            set_in_file(&path, &key, &value)?;
            println!("Set {key} = {value} in {}", path.display());
        }
        ConfigAction::Init { file, force } => {
            let path = match file {
                Some(p) => PathBuf::from(p),
                None => config_file(None)?,
            };
            init_file(&path, force)?;
            println!("Config file created at {}", path.display());
        }
        ConfigAction::Export { docker_env } => {
            let config = FolioConfig::load(config_path)?;
            print!("{}", render_env(&config, docker_env)?);
        }
    }
    Ok(())
}

// ============================================================================
// Keys
// ============================================================================

/// The value at `key`, formatted for stdout. An unset `store.path` shows the
/// directory actually used.
pub fn read_key(config: &FolioConfig, key: &str) -> Result<String> {
    Ok(match key {
        "content.root" => config.content.root.clone(),
        "content.extensions" => config.content.extensions.join(", "),
        "content.words_per_minute" => config.content.words_per_minute.to_string(),
        "toc.max_depth" => config.toc.max_depth.to_string(),
        "store.path" => config.store_dir()?.display().to_string(),
        _ => return Err(unknown_key(key)),
    })
}

/// Parse `value` for `key` and store it in `config`.
///
/// `content.extensions` takes a comma-separated list, with or without
/// brackets. An empty `store.path` clears it.
pub fn write_key(config: &mut FolioConfig, key: &str, value: &str) -> Result<()> {
    let value = value.trim();
    match key {
        "content.root" => {
            if value.is_empty() {
                return Err(Error::config("content.root must not be empty"));
            }
            config.content.root = value.to_string();
        }
        "content.extensions" => {
            let inner = value
                .strip_prefix('[')
                .and_then(|v| v.strip_suffix(']'))
                .unwrap_or(value);
            let extensions: Vec<String> = inner
                .split(',')
                .map(|e| e.trim().trim_matches('"').trim_start_matches('.'))
                .filter(|e| !e.is_empty())
                .map(String::from)
                .collect();
            if extensions.is_empty() {
                return Err(Error::config("content.extensions needs at least one extension"));
            }
            config.content.extensions = extensions;
        }
        "content.words_per_minute" => {
            config.content.words_per_minute = match value.parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(Error::config(format!(
                        "content.words_per_minute must be a positive integer, got '{value}'"
                    )));
                }
            };
        }
        "toc.max_depth" => {
            config.toc.max_depth = match value.parse::<u8>() {
                Ok(n) if (1..=6).contains(&n) => n,
                _ => {
                    return Err(Error::config(format!(
                        "toc.max_depth must be between 1 and 6, got '{value}'"
                    )));
                }
            };
        }
        "store.path" => {
            config.store.path = (!value.is_empty()).then(|| value.to_string());
        }
        _ => return Err(unknown_key(key)),
    }
    Ok(())
}

fn unknown_key(key: &str) -> Error {
    Error::config(format!("Unknown key '{key}'; expected one of: {}", KEYS.join(", ")))
}

// ============================================================================
// Files
// ============================================================================

fn config_file(explicit: Option<&str>) -> Result<PathBuf> {
    FolioConfig::resolve_config_path(explicit)
        .ok_or_else(|| Error::config("Could not determine the config directory; pass --config"))
}

/// Change one key in the config file at `path`. The file is left untouched
/// when the value is rejected.
pub fn set_in_file(path: &Path, key: &str, value: &str) -> Result<()> {
    if !path.exists() {
        return Err(Error::config(format!(
            "No config file at {}; run `folio config init` first",
            path.display()
        )));
    }
    let raw = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
    let mut config: FolioConfig = toml::from_str(&raw)
        .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))?;

    write_key(&mut config, key, value)?;
    std::fs::write(path, config.to_toml_string()?).map_err(|e| Error::io_with_path(e, path))
}

/// Write the default configuration to `path`, creating parent directories.
pub fn init_file(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(Error::config(format!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        )));
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::io_with_path(e, parent))?;
    }
    let toml_str = FolioConfig::default().to_toml_string()?;
    std::fs::write(path, toml_str).map_err(|e| Error::io_with_path(e, path))
}

/// `FOLIO_*` variables, one per line, optionally as Docker `--env` flags.
pub fn render_env(config: &FolioConfig, docker_env: bool) -> Result<String> {
    let mut out = String::new();
    for (key, value) in config.to_env_vars()? {
        let flag = if docker_env { "--env " } else { "" };
        let _ = writeln!(out, "{flag}{key}={value}");
    }
    Ok(out)
}

// ============================================================================
// Tests
// ============================================================================
