//! Build command implementation

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tracing::info;

use crate::bundler::{BuildInput, Bundler};
use crate::config::Config;
use crate::utils::format_duration;

/// Run the chunk loading pass over a finished chunk graph
#[derive(Args, Debug)]
pub struct BuildCommand {
    /// JSON file with the pages, modules, chunks, sources and assets of the build
    #[arg(short, long)]
    pub input: PathBuf,

    /// Where to write the resulting JSON (stdout when omitted)
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

impl BuildCommand {
    pub async fn execute(&self, config_path: &str) -> Result<()> {
        let start = Instant::now();

        info!("Loading configuration from {}", config_path);
        let config = Config::load(config_path)?;

        let content = tokio::fs::read_to_string(&self.input)
            .await
            .with_context(|| format!("Failed to read build input: {}", self.input.display()))?;
        let input: BuildInput = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse build input: {}", self.input.display()))?;

        eprintln!("{} Loading shared chunks...", "→".blue());

        let bundler = Bundler::new(config);
        let before = input.sources.clone();
        let output = bundler.run(input)?;

        let json = serde_json::to_string_pretty(&output)?;
        match &self.out {
            Some(path) => tokio::fs::write(path, json)
                .await
                .with_context(|| format!("Failed to write output: {}", path.display()))?,
            None => println!("{}", json),
        }

        eprintln!(
            "\n{} Processed {} chunk(s) in {}\n",
            "✓".green().bold(),
            output.sources.len(),
            format_duration(start.elapsed())
        );

        // Print summary of rewritten chunks
        for (key, code) in &output.sources {
            if before.get(key) != Some(code) {
                eprintln!("  {} {}", "•".dimmed(), key.cyan());
            }
        }
        if !output.components.is_empty() {
            eprintln!(
                "  {} {}",
                "components:".dimmed(),
                output.components.join(", ")
            );
        }

        eprintln!();

        Ok(())
    }
}
