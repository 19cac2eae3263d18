//! Host pipeline driver
//!
//! Holds the data model the host bundler hands over (chunk graph, rendered
//! chunk sources, emitted assets) and fires the plugin phases over it in
//! their fixed order.

mod asset;
mod chunk;
mod graph;

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::Config;
use crate::plugins::load_chunks::LoadChunksPlugin;
use crate::plugins::{BuildContext, PluginManager};

pub use asset::{AssetContent, AssetMap, ConcatSource};
pub use chunk::{Chunk, ChunkId};
pub use graph::{ChunkGraph, MiniType, Module, ModuleId};

/// A page known to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub name: String,
    #[serde(default)]
    pub path: String,
}

impl Page {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Everything the host supplies for one build
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildInput {
    #[serde(default)]
    pub pages: Vec<Page>,

    #[serde(default)]
    pub modules: Vec<Module>,

    /// Chunks in the order the bundler produced them
    #[serde(default)]
    pub chunks: Vec<Chunk>,

    /// Rendered source of each chunk, by chunk key
    #[serde(default)]
    pub sources: IndexMap<String, String>,

    #[serde(default)]
    pub assets: AssetMap,
}

/// Result of a build operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildOutput {
    /// Final source of every rendered chunk, by chunk key
    pub sources: IndexMap<String, String>,

    /// Assets after style merging
    pub assets: AssetMap,

    /// Framework components the bundle references
    pub components: Vec<String>,
}

/// Runs the post-optimization passes for a build
pub struct Bundler {
    plugins: PluginManager,
}

impl Bundler {
    /// Create a new bundler instance with the chunk loading pass registered
    pub fn new(config: Config) -> Self {
        let mut plugins = PluginManager::new();
        plugins.register(Arc::new(LoadChunksPlugin::new(Arc::new(config))));

        Self { plugins }
    }

    /// Run one build. Every build gets fresh state, and the first failing
    /// hook aborts the phases after it.
    pub fn run(&self, input: BuildInput) -> Result<BuildOutput> {
        let start = Instant::now();
        let mut ctx = BuildContext::new();

        let BuildInput {
            pages,
            modules,
            chunks,
            mut sources,
            mut assets,
        } = input;
        let graph = ChunkGraph::from_parts(modules, chunks);

        // 1. Pages
        self.plugins.run_pages(&mut ctx, &pages)?;

        // 2. Chunk optimization finished
        info!("Optimizing {} chunk(s)...", graph.chunks().len());
        self.plugins.run_after_optimize_chunks(&mut ctx, &graph)?;

        // 3. Render chunks with an entry module
        info!("Rendering entry chunks...");
        for chunk in graph.chunks().iter().filter(|chunk| chunk.has_entry()) {
            let key = chunk.id_or_name();
            let Some(source) = sources.get_mut(key) else {
                debug!("No rendered source for chunk '{}'", key);
                continue;
            };
            let code = self
                .plugins
                .render_with_entry(&mut ctx, &graph, chunk, source)
                .with_context(|| format!("Failed to render chunk '{}'", key))?;
            *source = code;
        }

        // 4. Asset optimization finished
        info!("Merging stylesheets...");
        self.plugins
            .run_after_optimize_assets(&mut ctx, &mut assets)
            .context("Failed to merge shared stylesheets")?;

        debug!("Pass completed in {:?}", start.elapsed());

        Ok(BuildOutput {
            sources,
            assets,
            components: ctx.components.iter().map(str::to_string).collect(),
        })
    }
}
