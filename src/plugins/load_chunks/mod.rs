//! Shared chunk loading for mini program entries
//!
//! Mini program runtimes load each page, component and the app itself as a
//! separate script, so the chunks they share have to be required explicitly.
//! This pass picks the shared chunks once chunk optimization is done,
//! prepends `require` calls to the chunks that need them, and merges shared
//! stylesheets into the app stylesheet once assets are optimized.

mod common;
mod pages;
mod render;
mod styles;

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::bundler::{AssetMap, Chunk, ChunkGraph, Page};
use crate::config::Config;
use crate::error::LoadChunksError;

use super::{BuildContext, Plugin, RenderResult};

pub use common::{collect_used_components, select_common_chunks};
pub use pages::{AddChunkPages, PageChunkAssignment, PageRegistry};
pub use render::{add_require_to_source, decide_injection, Injection};
pub use styles::StyleMergeJob;

/// Build-scoped state of the chunk loading pass
#[derive(Debug, Default)]
pub struct LoadChunksState {
    /// Pages known to the host
    pub pages: PageRegistry,

    /// Shared chunks in injection order, set after chunk optimization
    pub common_chunks: Option<Vec<Chunk>>,

    /// Page-specific chunk lists filled in by the page callback
    pub page_chunks: PageChunkAssignment,

    /// Style merges to run after asset optimization, in registration order
    pub style_merges: Vec<StyleMergeJob>,
}

impl LoadChunksState {
    pub fn common_chunk_names(&self) -> Vec<&str> {
        self.common_chunks
            .iter()
            .flatten()
            .map(|chunk| chunk.name.as_str())
            .collect()
    }
}

/// The plugin wiring the pass into the host phases
pub struct LoadChunksPlugin {
    config: Arc<Config>,
    add_chunk_pages: Option<AddChunkPages>,
}

impl LoadChunksPlugin {
    pub fn new(config: Arc<Config>) -> Self {
        let add_chunk_pages = config.page_assigner();
        Self {
            config,
            add_chunk_pages,
        }
    }
}

impl Plugin for LoadChunksPlugin {
    fn name(&self) -> &str {
        "load-chunks"
    }

    fn pages(&self, ctx: &mut BuildContext, pages: &[Page]) -> Result<()> {
        debug!("Recording {} page(s)", pages.len());
        ctx.load_chunks.pages.record(pages);
        Ok(())
    }

    fn after_optimize_chunks(&self, ctx: &mut BuildContext, graph: &ChunkGraph) -> Result<()> {
        let common_chunks = select_common_chunks(graph, &self.config.common_chunks);
        info!(
            "Selected {} shared chunk(s) for {} ({})",
            common_chunks.len(),
            self.config.build_adapter,
            self.config.framework
        );

        let found = collect_used_components(
            graph,
            &common_chunks,
            &self.config.components_library,
            &mut ctx.components,
        );
        if !found {
            debug!("No shared chunk contains '{}'", self.config.components_library);
        }

        ctx.load_chunks.common_chunks = Some(common_chunks);
        Ok(())
    }

    fn render_with_entry(
        &self,
        ctx: &mut BuildContext,
        graph: &ChunkGraph,
        chunk: &Chunk,
        source: &str,
    ) -> Result<RenderResult> {
        if ctx.load_chunks.common_chunks.is_none() {
            return Err(LoadChunksError::PhaseNotReached {
                hook: "render_with_entry",
                requires: "after_optimize_chunks",
            }
            .into());
        }

        let state = &mut ctx.load_chunks;
        let injection = decide_injection(&self.config, self.add_chunk_pages.as_ref(), state, graph, chunk);
        if matches!(injection, Injection::PageChunks(_)) && !state.pages.is_recorded() {
            warn!("Page chunks were assigned before the host supplied any pages");
        }

        let id = chunk.id_or_name();
        let code = match injection {
            Injection::None => return Ok(RenderResult::Skip),
            Injection::Common => add_require_to_source(id, source, state.common_chunk_names())?,
            Injection::App => {
                state.style_merges.push(StyleMergeJob {
                    chunk: id.to_string(),
                    files: chunk.files.clone(),
                    common_chunks: self.config.common_chunks.clone(),
                });
                add_require_to_source(id, source, state.common_chunk_names())?
            }
            Injection::PageChunks(chunks) => {
                add_require_to_source(id, source, chunks.iter().map(String::as_str))?
            }
        };

        Ok(RenderResult::Rendered(code))
    }

    fn after_optimize_assets(&self, ctx: &mut BuildContext, assets: &mut AssetMap) -> Result<()> {
        for job in &ctx.load_chunks.style_merges {
            let rewritten = job.run(assets)?;
            debug!("Style merge for '{}' rewrote {} stylesheet(s)", job.chunk, rewritten);
        }
        Ok(())
    }
}
