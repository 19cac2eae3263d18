//! Chunks produced by the host bundler's chunk graph

use serde::{Deserialize, Serialize};

use super::ModuleId;

/// Identifier assigned to a chunk by the host bundler
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChunkId {
    /// Named id, usable as an output path
    Name(String),
    /// Numeric id assigned by the chunk graph
    Index(u64),
}

/// A chunk is a group of modules that will be emitted together
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Chunk id, if the host assigned one
    #[serde(default)]
    pub id: Option<ChunkId>,

    /// Chunk name (used for output filename)
    pub name: String,

    /// Module IDs included in this chunk
    #[serde(default)]
    pub modules: Vec<ModuleId>,

    /// Output files emitted for this chunk
    #[serde(default)]
    pub files: Vec<String>,

    /// Module the bundler considers the root of this chunk
    #[serde(default)]
    pub entry_module: Option<ModuleId>,
}

impl Chunk {
    /// Create a chunk with the given name and no id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            modules: Vec::new(),
            files: Vec::new(),
            entry_module: None,
        }
    }

    pub fn with_id(mut self, id: ChunkId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_modules<I, S>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ModuleId>,
    {
        self.modules = modules.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_entry(mut self, module: impl Into<ModuleId>) -> Self {
        self.entry_module = Some(module.into());
        self
    }

    /// The key used for output paths: a named id wins, otherwise the chunk name
    pub fn id_or_name(&self) -> &str {
        match &self.id {
            Some(ChunkId::Name(id)) => id,
            _ => &self.name,
        }
    }

    /// Check if chunk has an entry module
    pub fn has_entry(&self) -> bool {
        self.entry_module.is_some()
    }
}
