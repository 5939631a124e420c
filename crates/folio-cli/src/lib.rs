//! Command-line front end for Folio.
//!
//! - [`cli`]: clap argument and subcommand types
//! - [`config`]: [`FolioConfig`](config::FolioConfig) loaded via confyg
//! - [`app`]: logging setup and dispatch
//! - `*_handlers`: the work behind each command

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod app;
pub mod cli;
pub mod config;
pub mod config_handlers;
pub mod content_handlers;
pub mod page_handlers;

pub use app::FolioCli;
pub use cli::CliArgs;
pub use config::FolioConfig;
