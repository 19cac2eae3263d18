//! Command-line interface for mini-chunks
//!
//! Provides the main CLI structure using clap with subcommands for:
//! - `build`: Run the chunk loading pass over a serialized build

mod build;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

pub use build::BuildCommand;

/// Shared chunk loading for mini program bundles
#[derive(Parser, Debug)]
#[command(name = "mini-chunks")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to mini-chunks.toml config file
    #[arg(short, long, global = true, default_value = "mini-chunks.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inject shared chunks and merge shared stylesheets
    Build(BuildCommand),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<()> {
        print_banner();

        match &self.command {
            Commands::Build(cmd) => cmd.execute(&self.config).await,
        }
    }
}

/// Print the banner
fn print_banner() {
    eprintln!(
        "\n{} {}\n",
        "mini-chunks".bold().cyan(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
}
