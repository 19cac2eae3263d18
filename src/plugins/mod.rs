//! Plugin system for the post-optimization passes
//!
//! Hooks mirror the host bundler's phases. They fire once per build in a
//! fixed order: pages, after chunk optimization, per-chunk render, after
//! asset optimization. All build-scoped state lives in [`BuildContext`],
//! which the driver creates fresh for every build.

pub mod load_chunks;

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::bundler::{AssetMap, Chunk, ChunkGraph, Page};
use crate::error::LoadChunksError;

use load_chunks::LoadChunksState;

/// Host pipeline phases, in the order they fire
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Created,
    Pages,
    AfterOptimizeChunks,
    RenderWithEntry,
    AfterOptimizeAssets,
}

impl Phase {
    pub fn hook_name(&self) -> &'static str {
        match self {
            Phase::Created => "build_start",
            Phase::Pages => "pages",
            Phase::AfterOptimizeChunks => "after_optimize_chunks",
            Phase::RenderWithEntry => "render_with_entry",
            Phase::AfterOptimizeAssets => "after_optimize_assets",
        }
    }
}

/// Names of framework components referenced by the bundle.
///
/// Downstream passes read it to prune unused component templates. It only
/// grows within a build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentRegistry {
    names: BTreeSet<String>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Build-scoped state threaded through every hook
#[derive(Debug, Default)]
pub struct BuildContext {
    phase: Option<Phase>,

    /// Chunk keys already handed to the render phase
    rendered: HashSet<String>,

    /// Component names referenced by the bundle
    pub components: ComponentRegistry,

    /// State owned by the chunk loading pass
    pub load_chunks: LoadChunksState,
}

impl BuildContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase, `Created` until the first hook fires
    pub fn phase(&self) -> Phase {
        self.phase.unwrap_or(Phase::Created)
    }

    /// Move the build into `phase`; phases may be skipped but never revisited
    fn enter(&mut self, phase: Phase) -> Result<(), LoadChunksError> {
        let current = self.phase();
        if phase < current || (phase == current && phase != Phase::RenderWithEntry) {
            return Err(LoadChunksError::PhaseAlreadyPassed {
                hook: phase.hook_name(),
                current: current.hook_name(),
            });
        }
        self.phase = Some(phase);
        Ok(())
    }
}

/// Result of a render hook
pub enum RenderResult {
    /// Continue to next plugin (no rewrite)
    Skip,
    /// Rewritten chunk source
    Rendered(String),
}

/// Plugin trait - implement this to take part in the post-optimization phases
pub trait Plugin: Send + Sync {
    /// Plugin name for logging and debugging
    fn name(&self) -> &str;

    /// Called once with the pages the host knows about
    fn pages(&self, _ctx: &mut BuildContext, _pages: &[Page]) -> Result<()> {
        Ok(())
    }

    /// Called once chunk optimization has finished
    fn after_optimize_chunks(&self, _ctx: &mut BuildContext, _graph: &ChunkGraph) -> Result<()> {
        Ok(())
    }

    /// Rewrite the rendered source of a chunk that has an entry module
    /// Return RenderResult::Skip to leave the source unchanged
    fn render_with_entry(
        &self,
        _ctx: &mut BuildContext,
        _graph: &ChunkGraph,
        _chunk: &Chunk,
        _source: &str,
    ) -> Result<RenderResult> {
        Ok(RenderResult::Skip)
    }

    /// Called once after asset optimization, with every emitted asset
    fn after_optimize_assets(&self, _ctx: &mut BuildContext, _assets: &mut AssetMap) -> Result<()> {
        Ok(())
    }
}

/// Plugin manager
pub struct PluginManager {
    plugins: Vec<Arc<dyn Plugin>>,
}

impl PluginManager {
    /// Create a new plugin manager
    pub fn new() -> Self {
        Self { plugins: Vec::new() }
    }

    /// Register a plugin
    pub fn register(&mut self, plugin: Arc<dyn Plugin>) {
        self.plugins.push(plugin);
    }

    /// Run pages hooks
    pub fn run_pages(&self, ctx: &mut BuildContext, pages: &[Page]) -> Result<()> {
        ctx.enter(Phase::Pages)?;
        for plugin in &self.plugins {
            plugin.pages(ctx, pages)?;
        }
        Ok(())
    }

    /// Run after_optimize_chunks hooks
    pub fn run_after_optimize_chunks(&self, ctx: &mut BuildContext, graph: &ChunkGraph) -> Result<()> {
        ctx.enter(Phase::AfterOptimizeChunks)?;
        for plugin in &self.plugins {
            plugin.after_optimize_chunks(ctx, graph)?;
        }
        Ok(())
    }

    /// Run render_with_entry hooks, each plugin seeing the previous one's output.
    ///
    /// A chunk may be rendered at most once per build: injecting twice would
    /// duplicate the pulled-in chunks.
    pub fn render_with_entry(
        &self,
        ctx: &mut BuildContext,
        graph: &ChunkGraph,
        chunk: &Chunk,
        source: &str,
    ) -> Result<String> {
        ctx.enter(Phase::RenderWithEntry)?;

        let key = chunk.id_or_name().to_string();
        if !ctx.rendered.insert(key.clone()) {
            return Err(LoadChunksError::ChunkAlreadyRendered(key).into());
        }

        let mut current = source.to_string();
        for plugin in &self.plugins {
            match plugin.render_with_entry(ctx, graph, chunk, &current)? {
                RenderResult::Skip => continue,
                RenderResult::Rendered(code) => {
                    debug!("Plugin '{}' rewrote chunk '{}'", plugin.name(), key);
                    current = code;
                }
            }
        }

        Ok(current)
    }

    /// Run after_optimize_assets hooks
    pub fn run_after_optimize_assets(&self, ctx: &mut BuildContext, assets: &mut AssetMap) -> Result<()> {
        ctx.enter(Phase::AfterOptimizeAssets)?;
        for plugin in &self.plugins {
            plugin.after_optimize_assets(ctx, assets)?;
        }
        Ok(())
    }
}

impl Default for PluginManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Banner(&'static str);

    impl Plugin for Banner {
        fn name(&self) -> &str {
            "banner"
        }

        fn render_with_entry(
            &self,
            _ctx: &mut BuildContext,
            _graph: &ChunkGraph,
            _chunk: &Chunk,
            source: &str,
        ) -> Result<RenderResult> {
            Ok(RenderResult::Rendered(format!("{}{}", self.0, source)))
        }
    }

    fn manager() -> PluginManager {
        let mut manager = PluginManager::new();
        manager.register(Arc::new(Banner("/*a*/")));
        manager.register(Arc::new(Banner("/*b*/")));
        manager
    }

    #[test]
    fn test_render_runs_plugins_in_order() {
        let manager = manager();
        let mut ctx = BuildContext::new();
        let graph = ChunkGraph::new();
        let chunk = Chunk::new("app").with_entry("app");

        let code = manager.render_with_entry(&mut ctx, &graph, &chunk, "x").unwrap();
        assert_eq!(code, "/*b*//*a*/x");
    }

    #[test]
    fn test_render_same_chunk_twice_fails() {
        let manager = manager();
        let mut ctx = BuildContext::new();
        let graph = ChunkGraph::new();
        let chunk = Chunk::new("app").with_entry("app");

        manager.render_with_entry(&mut ctx, &graph, &chunk, "x").unwrap();
        let err = manager.render_with_entry(&mut ctx, &graph, &chunk, "x").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadChunksError>(),
            Some(LoadChunksError::ChunkAlreadyRendered(key)) if key == "app"
        ));
    }

    #[test]
    fn test_phases_cannot_go_backwards() {
        let manager = PluginManager::new();
        let mut ctx = BuildContext::new();
        let mut assets = AssetMap::new();

        manager.run_pages(&mut ctx, &[]).unwrap();
        manager.run_after_optimize_assets(&mut ctx, &mut assets).unwrap();
        assert_eq!(ctx.phase(), Phase::AfterOptimizeAssets);

        let err = manager
            .run_after_optimize_chunks(&mut ctx, &ChunkGraph::new())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadChunksError>(),
            Some(LoadChunksError::PhaseAlreadyPassed { .. })
        ));
        assert!(manager.run_pages(&mut ctx, &[]).is_err());
    }

    #[test]
    fn test_component_registry_grows_without_duplicates() {
        let mut registry = ComponentRegistry::new();
        assert!(registry.insert("view"));
        assert!(!registry.insert("view"));
        registry.insert("scroll-view");
        assert_eq!(registry.iter().collect::<Vec<_>>(), vec!["scroll-view", "view"]);
    }
}
