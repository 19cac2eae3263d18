//! Module and chunk graph data structures

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::Chunk;

/// Unique identifier for a module
pub type ModuleId = String;

/// Role tag assigned to modules by upstream mini program tooling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MiniType {
    /// The app's root module
    Entry,
    Page,
    Component,
    /// Any other tag upstream assigns (`normal`, `config`, `exports`, ...)
    #[serde(other)]
    Other,
}

impl MiniType {
    /// Pages and components are the units a quick app loads on their own
    pub fn is_page_or_component(&self) -> bool {
        matches!(self, MiniType::Page | MiniType::Component)
    }
}

/// A module in the chunk graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    pub id: ModuleId,

    /// The request string the module was imported with
    #[serde(default)]
    pub raw_request: String,

    /// Role tag, absent for modules upstream never classified
    #[serde(default)]
    pub mini_type: Option<MiniType>,

    /// Export names used by other modules, absent when not analyzed
    #[serde(default)]
    pub used_exports: Option<Vec<String>>,

    /// Concrete root module when this module is a facade over it
    #[serde(default)]
    pub root_module: Option<ModuleId>,
}

impl Module {
    pub fn new(id: impl Into<ModuleId>, raw_request: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            raw_request: raw_request.into(),
            mini_type: None,
            used_exports: None,
            root_module: None,
        }
    }

    pub fn with_type(mut self, mini_type: MiniType) -> Self {
        self.mini_type = Some(mini_type);
        self
    }

    pub fn with_used_exports<I, S>(mut self, exports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.used_exports = Some(exports.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_root(mut self, root: impl Into<ModuleId>) -> Self {
        self.root_module = Some(root.into());
        self
    }
}

/// The finished chunk graph handed over by the host bundler
#[derive(Debug, Default, Clone)]
pub struct ChunkGraph {
    /// All modules indexed by their ID
    modules: HashMap<ModuleId, Module>,

    /// Chunks in the order the bundler produced them
    chunks: Vec<Chunk>,
}

impl ChunkGraph {
    /// Create a new empty chunk graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from the host's module and chunk records
    pub fn from_parts(modules: Vec<Module>, chunks: Vec<Chunk>) -> Self {
        let mut graph = Self {
            modules: HashMap::with_capacity(modules.len()),
            chunks,
        };
        for module in modules {
            graph.add_module(module);
        }
        graph
    }

    /// Add a module to the graph, replacing any module with the same id
    pub fn add_module(&mut self, module: Module) {
        self.modules.insert(module.id.clone(), module);
    }

    pub fn add_chunk(&mut self, chunk: Chunk) {
        self.chunks.push(chunk);
    }

    /// Get a module by ID
    pub fn get_module(&self, id: &str) -> Option<&Module> {
        self.modules.get(id)
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Iterate the modules of a chunk, skipping ids the graph doesn't know
    pub fn chunk_modules<'a>(&'a self, chunk: &'a Chunk) -> impl Iterator<Item = &'a Module> + 'a {
        chunk.modules.iter().filter_map(move |id| self.get_module(id))
    }

    /// Resolve the module that governs a chunk's role: the entry module's
    /// root module when it is a facade, otherwise the entry module itself.
    pub fn resolve_entry(&self, chunk: &Chunk) -> Option<&Module> {
        let entry_id = chunk.entry_module.as_deref()?;
        let Some(entry) = self.get_module(entry_id) else {
            warn!("Chunk '{}' references unknown entry module '{}'", chunk.name, entry_id);
            return None;
        };

        match entry.root_module.as_deref() {
            Some(root_id) => match self.get_module(root_id) {
                Some(root) => Some(root),
                None => {
                    warn!("Module '{}' references unknown root module '{}'", entry.id, root_id);
                    None
                }
            },
            None => Some(entry),
        }
    }
}
