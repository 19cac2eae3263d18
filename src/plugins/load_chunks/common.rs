//! Selection of the shared chunks entries pull in

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::bundler::{Chunk, ChunkGraph};
use crate::plugins::ComponentRegistry;
use crate::utils::to_dashed;

/// Chunks whose name is configured as shared, in reverse graph order.
///
/// A name the graph carries twice is only kept once, on its first chunk.
pub fn select_common_chunks(graph: &ChunkGraph, names: &[String]) -> Vec<Chunk> {
    let mut seen = HashSet::new();
    let mut selected: Vec<Chunk> = graph
        .chunks()
        .iter()
        .filter(|chunk| names.iter().any(|name| *name == chunk.name))
        .filter(|chunk| {
            let first = seen.insert(chunk.name.clone());
            if !first {
                warn!("Ignoring duplicate shared chunk '{}'", chunk.name);
            }
            first
        })
        .cloned()
        .collect();
    selected.reverse();
    selected
}

/// Record the components used through the framework components library.
///
/// Only the first shared chunk holding the library module contributes.
/// Returns whether such a module was found.
pub fn collect_used_components(
    graph: &ChunkGraph,
    common_chunks: &[Chunk],
    library: &str,
    registry: &mut ComponentRegistry,
) -> bool {
    for chunk in common_chunks {
        let Some(module) = graph
            .chunk_modules(chunk)
            .find(|module| module.raw_request == library)
        else {
            continue;
        };

        match &module.used_exports {
            Some(exports) => {
                for export in exports {
                    registry.insert(to_dashed(export));
                }
                debug!(
                    "Chunk '{}' uses {} export(s) of '{}'",
                    chunk.name,
                    exports.len(),
                    library
                );
            }
            None => debug!("Used exports of '{}' were not analyzed", library),
        }
        return true;
    }

    false
}
