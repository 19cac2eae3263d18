//! Error types for the chunk loading pass

use thiserror::Error;

/// Errors that abort the current build
#[derive(Debug, Error)]
pub enum LoadChunksError {
    /// No portable relative reference exists from the chunk to a shared chunk
    #[error("cannot compute a relative path from chunk '{from}' to shared chunk '{to}'")]
    UnresolvableRelativePath { from: String, to: String },

    /// Asset content is neither a source object nor a plain value
    #[error("asset '{asset}' has binary content and cannot be merged as a stylesheet")]
    UnsupportedAssetContent { asset: String },

    /// A style merge job refers to an asset the host never emitted
    #[error("chunk '{chunk}' lists output file '{file}' which is missing from the asset map")]
    MissingAsset { chunk: String, file: String },

    /// A hook fired before the phase it depends on
    #[error("'{hook}' fired before '{requires}' for this build")]
    PhaseNotReached {
        hook: &'static str,
        requires: &'static str,
    },

    /// A hook fired after the build already moved past its phase
    #[error("'{hook}' fired after '{current}' for this build")]
    PhaseAlreadyPassed {
        hook: &'static str,
        current: &'static str,
    },

    /// The same chunk was handed to the render phase twice in one build
    #[error("chunk '{0}' was already rendered in this build")]
    ChunkAlreadyRendered(String),
}

pub type Result<T, E = LoadChunksError> = std::result::Result<T, E>;
