//! Injection of shared chunk requires into entry chunks

use tracing::debug;

use crate::bundler::{Chunk, ChunkGraph, ConcatSource, MiniType};
use crate::config::Config;
use crate::error::{LoadChunksError, Result};
use crate::utils::promote_relative_path;

use super::{AddChunkPages, LoadChunksState};

/// How a chunk's source is rewritten
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Injection {
    /// Leave the source unchanged
    None,
    /// Require the build's shared chunks
    Common,
    /// Require the shared chunks and merge their stylesheets into the app's
    App,
    /// Require a page-specific list of chunks
    PageChunks(Vec<String>),
}

/// Decide how the chunk gets injected. The first matching rule wins.
pub fn decide_injection(
    config: &Config,
    add_chunk_pages: Option<&AddChunkPages>,
    state: &mut LoadChunksState,
    graph: &ChunkGraph,
    chunk: &Chunk,
) -> Injection {
    if !chunk.has_entry() {
        return Injection::None;
    }

    if config.is_build_plugin {
        return Injection::Common;
    }

    let Some(mini_type) = graph.resolve_entry(chunk).and_then(|entry| entry.mini_type) else {
        debug!("Chunk '{}' has no typed entry module", chunk.id_or_name());
        return Injection::None;
    };

    if mini_type == MiniType::Entry {
        return Injection::App;
    }

    if config.build_adapter.is_quick_app() && mini_type.is_page_or_component() {
        return Injection::Common;
    }

    if let (Some(add_chunk_pages), MiniType::Page) = (add_chunk_pages, mini_type) {
        let id = chunk.id_or_name();
        let pages = state.pages.names();
        add_chunk_pages.call(&mut state.page_chunks, &pages);

        return match state.page_chunks.get(id) {
            Some(chunks) => Injection::PageChunks(chunks.clone()),
            None => {
                debug!("No chunks assigned to page '{}'", id);
                Injection::None
            }
        };
    }

    Injection::None
}

/// Prepend one require per chunk to `source`, in the given order.
///
/// Each require points at the chunk name relative to the chunk `id`.
pub fn add_require_to_source<'a, I>(id: &str, source: &str, chunks: I) -> Result<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut output = ConcatSource::new();
    for name in chunks {
        let request = promote_relative_path(id, name).ok_or_else(|| {
            LoadChunksError::UnresolvableRelativePath {
                from: id.to_string(),
                to: name.to_string(),
            }
        })?;
        output.add(format!(
            "require({});\n",
            serde_json::Value::String(request)
        ));
    }
    output.add("\n");
    output.add(source);
    output.add(";");
    Ok(output.source())
}
