//! Dev services CLI
//!
//! Keeps the bundled compose file in the project and shows the Kafka channel
//! wiring derived from configuration.

mod cli;
mod commands;
mod error;
mod logging;

use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use devsvc_core::ConfigResolver;

use cli::{Cli, Commands};
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: could not set up logging: {}", "warning".yellow().bold(), e);
    }
    tracing::debug!("Verbose mode enabled");

    let Some(cmd) = cli.command else {
        // No command provided - show help hint
        println!("{} Dev services CLI", "devsvc".green().bold());
        println!();
        println!("Run {} for available commands.", "devsvc --help".cyan());
        return Ok(());
    };

    let root = project_root(cli.root)?;
    tracing::debug!(root = %root.display(), "Resolved project root");
    execute_command(&commands::resolver(&root), cmd, cli.json)
}

fn project_root(root: Option<PathBuf>) -> Result<PathBuf> {
    let root = match root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };
    if !root.is_dir() {
        return Err(CliError::user(format!(
            "project root {} is not a directory",
            root.display()
        )));
    }
    Ok(devsvc_fs::io::absolute(&root)?)
}

fn execute_command(resolver: &ConfigResolver, cmd: Commands, json: bool) -> Result<()> {
    match cmd {
        Commands::Sync {
            force,
            no_auto_update,
        } => commands::run_sync(resolver, force, no_auto_update, json),
        Commands::Status => commands::run_status(resolver, json),
        Commands::Config => commands::run_config(resolver, json),
        Commands::Channels => commands::run_channels(resolver, json),
        Commands::Topics => commands::run_topics(resolver, json),
    }
}
