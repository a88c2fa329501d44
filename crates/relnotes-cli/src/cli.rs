//! Command-line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

/// Parse, validate, and extend release-note changelogs
#[derive(Parser, Debug)]
#[command(name = "relnotes")]
#[command(about = "Parse, validate, and extend release-note changelogs", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Changelog file; overrides `changelog.path` from the config
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List every release
    Parse {
        /// Print release records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check ordering and completeness
    Validate {
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print one release as Markdown
    Show {
        /// Release version
        version: String,
    },

    /// Print the latest release's version, build date, and commit
    Latest,

    /// List releases newer than a version
    Since {
        /// Exclusive lower bound
        version: String,
    },

    /// Search feature and deprecation bullets
    Search {
        /// Case-insensitive search term
        term: String,
    },

    /// Rewrite the changelog in canonical form
    Fmt {
        /// Only check that the file is already canonical
        #[arg(long)]
        check: bool,
    },

    /// Add a new release at the top
    Add {
        /// Version of the new release
        #[arg(long = "version", value_name = "VERSION")]
        release: String,

        /// Build date (YYYYMMDD by default)
        #[arg(long)]
        date: String,

        /// Pinned upstream commit
        #[arg(long)]
        commit: Option<String>,

        /// Pinned upstream version
        #[arg(long)]
        upstream_version: Option<String>,

        /// Feature bullet (repeatable)
        #[arg(long = "feature", value_name = "TEXT")]
        features: Vec<String>,

        /// Deprecation bullet (repeatable)
        #[arg(long = "deprecation", value_name = "TEXT")]
        deprecations: Vec<String>,

        /// Write the result back instead of printing it
        #[arg(long)]
        write: bool,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// `config` subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Show the resolved config file path
    Path,

    /// Print a value by dotted key (e.g. `parse.date_format`)
    Get {
        /// Dotted key
        key: String,
    },

    /// Set a value by dotted key in the config file
    Set {
        /// Dotted key
        key: String,
        /// New value
        value: String,
    },

    /// Write a default config file
    Init {
        /// Where to write; defaults to the platform config path
        #[arg(long)]
        file: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration as environment variables
    Export {
        /// Format as `--env KEY=value` for `docker run`
        #[arg(long)]
        docker_env: bool,
    },
}
