//! CLI argument parsing and command definitions.

use clap::{Parser, Subcommand};

// ============================================================================
// CLI argument types
// ============================================================================

/// Top-level arguments for the `folio` binary.
#[derive(Parser, Debug)]
#[command(name = "folio", author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to configuration file.
    #[arg(short, long, env = "FOLIO_CONFIG", global = true)]
    pub config: Option<String>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse one document and print its metadata and summary.
    Parse {
        /// Markdown file to parse.
        file: String,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Print the table of contents of one document.
    Toc {
        /// Markdown file to read.
        file: String,

        /// Deepest heading level to include (defaults to `toc.max_depth`).
        #[arg(short, long)]
        max_depth: Option<u8>,

        /// Print JSON instead of an indented outline.
        #[arg(long)]
        json: bool,
    },

    /// Scan the content root and list documents.
    Scan {
        /// Content root (defaults to `content.root`).
        #[arg(short, long)]
        root: Option<String>,

        /// Include drafts and list in slug order.
        #[arg(long)]
        all: bool,
    },

    /// Show one scanned document by slug.
    Show {
        /// Document slug: relative path without extension.
        slug: String,

        /// Content root (defaults to `content.root`).
        #[arg(short, long)]
        root: Option<String>,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// List categories and the documents filed under them.
    Categories {
        /// Content root (defaults to `content.root`).
        #[arg(short, long)]
        root: Option<String>,
    },

    /// Page store operations.
    Page(PageCommand),

    /// Configuration operations.
    Config(ConfigCommand),

    /// Print version information.
    Version,
}

/// Page-specific subcommands.
#[derive(Parser, Debug)]
pub struct PageCommand {
    /// Page subcommand to execute.
    #[command(subcommand)]
    pub command: PageAction,
}

/// Available page subcommands. Pages are addressed by slug.
#[derive(Subcommand, Debug)]
pub enum PageAction {
    /// Create a page.
    New {
        /// Page title.
        title: String,
    },

    /// List all pages.
    List,

    /// Show one page.
    Show {
        /// Page slug.
        slug: String,

        /// Render as markdown instead of JSON.
        #[arg(long)]
        markdown: bool,
    },

    /// Change a page's title, and with it the slug.
    Rename {
        /// Current slug.
        slug: String,

        /// New title.
        title: String,

        /// Explicit new slug instead of one derived from the title.
        #[arg(long)]
        new_slug: Option<String>,
    },

    /// Publish a page.
    Publish {
        /// Page slug.
        slug: String,

        /// Unpublish instead.
        #[arg(long)]
        undo: bool,
    },

    /// Delete a page.
    Delete {
        /// Page slug.
        slug: String,
    },

    /// Import a markdown document as a new page.
    Import {
        /// Markdown file with frontmatter.
        file: String,
    },
}

/// Config-specific subcommands.
#[derive(Parser, Debug)]
pub struct ConfigCommand {
    /// Config subcommand to execute.
    #[command(subcommand)]
    pub command: ConfigAction,
}

/// Available config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path.
    Path,

    /// Get a configuration value by dotted key.
    Get {
        /// Dotted key (e.g., "toc.max_depth").
        key: String,
    },

    /// Set a configuration value by dotted key.
    Set {
        /// Dotted key (e.g., "toc.max_depth").
        key: String,

        /// Value to set.
        value: String,
    },

    /// Create a default configuration file.
    Init {
        /// Output file path (defaults to the platform config path).
        #[arg(short, long)]
        file: Option<String>,

        /// Overwrite existing file.
        #[arg(long)]
        force: bool,
    },

    /// Export configuration as environment variables.
    Export {
        /// Format as Docker --env flags.
        #[arg(long)]
        docker_env: bool,
    },
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_args_default() {
        let args = CliArgs::parse_from(["folio"]);
        assert!(!args.verbose);
        assert!(!args.quiet);
        assert!(args.command.is_none());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = CliArgs::parse_from(["folio", "scan", "--verbose", "--config", "/c.toml"]);
        assert!(args.verbose);
        assert_eq!(args.config.as_deref(), Some("/c.toml"));
    }

    // ------------------------------------------------------------------------
    // Content commands
    // ------------------------------------------------------------------------

    #[test]
    fn test_parse_command() {
        let args = CliArgs::parse_from(["folio", "parse", "post.mdx", "--json"]);
        match args.command {
            Some(Command::Parse { file, json }) => {
                assert_eq!(file, "post.mdx");
                assert!(json);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_toc_command_max_depth() {
        let args = CliArgs::parse_from(["folio", "toc", "post.mdx", "--max-depth", "3"]);
        match args.command {
            Some(Command::Toc { max_depth, json, .. }) => {
                assert_eq!(max_depth, Some(3));
                assert!(!json);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_scan_command_root() {
        let args = CliArgs::parse_from(["folio", "scan", "--root", "/srv/content", "--all"]);
        match args.command {
            Some(Command::Scan { root, all }) => {
                assert_eq!(root.as_deref(), Some("/srv/content"));
                assert!(all);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_show_command() {
        let args = CliArgs::parse_from(["folio", "show", "guides/setup", "--json"]);
        match args.command {
            Some(Command::Show { slug, root, json }) => {
                assert_eq!(slug, "guides/setup");
                assert!(root.is_none());
                assert!(json);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    // ------------------------------------------------------------------------
    // Page commands
    // ------------------------------------------------------------------------

    #[test]
    fn test_page_rename_command() {
        let args = CliArgs::parse_from(["folio", "page", "rename", "old", "New Title", "--new-slug", "fresh"]);
        match args.command {
            Some(Command::Page(PageCommand {
                command: PageAction::Rename { slug, title, new_slug },
            })) => {
                assert_eq!(slug, "old");
                assert_eq!(title, "New Title");
                assert_eq!(new_slug.as_deref(), Some("fresh"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_page_publish_undo() {
        let args = CliArgs::parse_from(["folio", "page", "publish", "about", "--undo"]);
        assert!(matches!(
            args.command,
            Some(Command::Page(PageCommand {
                command: PageAction::Publish { undo: true, .. }
            }))
        ));
    }

    // ------------------------------------------------------------------------
    // Config commands
    // ------------------------------------------------------------------------

    #[test]
    fn test_config_set_command() {
        let args = CliArgs::parse_from(["folio", "config", "set", "toc.max_depth", "3"]);
        match args.command {
            Some(Command::Config(ConfigCommand {
                command: ConfigAction::Set { key, value },
            })) => {
                assert_eq!(key, "toc.max_depth");
                assert_eq!(value, "3");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_config_init_force() {
        let args = CliArgs::parse_from(["folio", "config", "init", "--force"]);
        assert!(matches!(
            args.command,
            Some(Command::Config(ConfigCommand {
                command: ConfigAction::Init { force: true, file: None }
            }))
        ));
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        CliArgs::command().debug_assert();
    }
}
