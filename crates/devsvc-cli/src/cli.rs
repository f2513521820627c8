//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Dev services - keep the bundled compose file and Kafka wiring in place
#[derive(Parser, Debug)]
#[command(name = "devsvc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Project root (defaults to the current directory)
    #[arg(long, global = true, env = "DEVSVC_ROOT")]
    pub root: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Extract or update the compose file in the target directory
    ///
    /// Examples:
    ///   devsvc sync                   # Extract, or update if untouched
    ///   devsvc sync --force           # Replace local edits, keeping a backup
    ///   devsvc sync --no-auto-update  # Only extract, never replace
    Sync {
        /// Replace a manually edited file after backing it up
        #[arg(long)]
        force: bool,

        /// Leave an outdated file alone even if it was not edited
        #[arg(long)]
        no_auto_update: bool,
    },

    /// Show whether the compose file is absent, current, outdated or edited
    Status,

    /// Show the effective configuration and published values
    Config,

    /// List declared channels and their connector properties
    Channels,

    /// Show the topics provisioning would create
    Topics,
}
