//! The `folio` application: logging setup and command dispatch.

use std::sync::Arc;

use folio_core::Result;
use folio_core::traits::ConfigManager;
use tracing_subscriber::EnvFilter;

use crate::cli::{CliArgs, Command};
use crate::config::FolioConfig;
use crate::{config_handlers, content_handlers, page_handlers};

// ============================================================================
// FolioCli
// ============================================================================

/// The CLI application bound to a loaded configuration.
pub struct FolioCli {
    name: String,
    config: Arc<FolioConfig>,
    version: String,
}

impl FolioCli {
    /// Create from CLI args, loading config from file/env.
    pub fn from_args(name: impl Into<String>, args: &CliArgs) -> Result<Self> {
        let config = FolioConfig::load(args.config.as_deref())?;
        Ok(Self::new(name, config))
    }

    /// Create a new CLI application.
    pub fn new(name: impl Into<String>, config: FolioConfig) -> Self {
        Self {
            name: name.into(),
            config: Arc::new(config),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Override the version string.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// The loaded configuration.
    pub fn config(&self) -> &FolioConfig {
        &self.config
    }

    /// Initialise tracing-based logging.
    ///
    /// Uses `RUST_LOG` if set, otherwise defaults based on verbosity flags.
    /// Records from the `log` facade used by the library crates are
    /// forwarded to the same subscriber.
    pub fn init_logging(verbose: bool, quiet: bool) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if quiet {
            EnvFilter::new("warn")
        } else if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        };

        // A subscriber may already be set (e.g. in tests).
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }

    /// Run one command.
    pub async fn run(&self, args: CliArgs) -> Result<()> {
        let config = &*self.config;
        match args.command {
            Some(Command::Parse { file, json }) => {
                content_handlers::handle_parse(config, &file, json).await
            }
            Some(Command::Toc { file, max_depth, json }) => {
                content_handlers::handle_toc(config, &file, max_depth, json).await
            }
            Some(Command::Scan { root, all }) => {
                content_handlers::handle_scan(config, root.as_deref(), all).await
            }
            Some(Command::Show { slug, root, json }) => {
                content_handlers::handle_show(config, &slug, root.as_deref(), json).await
            }
            Some(Command::Categories { root }) => {
                content_handlers::handle_categories(config, root.as_deref()).await
            }
            Some(Command::Page(page_cmd)) => {
                page_handlers::handle_page_command(config, page_cmd.command).await
            }
            Some(Command::Config(config_cmd)) => {
                config_handlers::handle_config_command(args.config.as_deref(), config_cmd.command)
            }
            Some(Command::Version) => {
                println!("{} {}", self.name, self.version);
                Ok(())
            }
            None => {
                println!("{} {}: use --help for usage", self.name, self.version);
                Ok(())
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
