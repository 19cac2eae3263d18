//! mini-chunks library
//!
//! Post-optimization pass that makes mini program entries require the
//! shared chunks they depend on.

pub mod cli;
pub mod config;
pub mod bundler;
pub mod error;
pub mod plugins;
pub mod utils;

pub use cli::Cli;
pub use config::Config;
pub use bundler::Bundler;
pub use error::LoadChunksError;
