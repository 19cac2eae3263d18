//! Configuration handling for the chunk loading pass
//!
//! Parses and manages mini-chunks.toml configuration files.

mod schema;

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::plugins::load_chunks::AddChunkPages;

pub use schema::*;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Names of the chunks shared across entries, in configured precedence
    #[serde(default)]
    pub common_chunks: Vec<String>,

    /// Target platform
    #[serde(default)]
    pub build_adapter: BuildAdapter,

    /// Building a plugin/library: every chunk with an entry gets injected
    #[serde(default)]
    pub is_build_plugin: bool,

    /// UI framework the project is written in
    #[serde(default = "default_framework")]
    pub framework: String,

    /// Request of the framework components library whose used exports feed
    /// the component registry
    #[serde(default = "default_components_library")]
    pub components_library: String,

    /// Fixed page to shared chunk assignment, used when no callback is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_pages: Option<IndexMap<String, Vec<String>>>,

    /// Page assignment callback, settable only from code
    #[serde(skip)]
    pub add_chunk_pages: Option<AddChunkPages>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            common_chunks: Vec::new(),
            build_adapter: BuildAdapter::default(),
            is_build_plugin: false,
            framework: default_framework(),
            components_library: default_components_library(),
            chunk_pages: None,
            add_chunk_pages: None,
        }
    }
}

impl Config {
    /// Load configuration from a file path
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let canonical_path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };

        let content = fs::read_to_string(&canonical_path)
            .with_context(|| format!("Failed to read config file: {}", canonical_path.display()))?;

        Self::from_toml(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).with_context(|| "Failed to parse mini-chunks.toml")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for name in &self.common_chunks {
            if name.trim().is_empty() {
                anyhow::bail!("common_chunks must not contain empty names");
            }
            if !seen.insert(name.as_str()) {
                anyhow::bail!("Shared chunk '{}' is listed more than once in common_chunks", name);
            }
        }

        if self.components_library.trim().is_empty() {
            anyhow::bail!("components_library must not be empty");
        }

        if let Some(table) = &self.chunk_pages {
            for (page, chunks) in table {
                if chunks.iter().any(|chunk| chunk.trim().is_empty()) {
                    anyhow::bail!("chunk_pages entry for '{}' contains an empty chunk name", page);
                }
            }
        }

        Ok(())
    }

    /// The page assignment callback: the one set in code, otherwise one
    /// built from `[chunk_pages]`
    pub fn page_assigner(&self) -> Option<AddChunkPages> {
        self.add_chunk_pages.clone().or_else(|| {
            self.chunk_pages
                .as_ref()
                .map(|table| AddChunkPages::from_table(table.clone()))
        })
    }
}
