//! Error handling - Zero-cost, hierarchical errors

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// SynthFlow error hierarchy
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Sink could not be created or truncated for writing
    #[error("Failed to initialize sink {path}: {source}")]
    SinkInit {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An append to the sink failed mid-run
    #[error("Failed to append to sink: {0}")]
    SinkWrite(#[from] std::io::Error),
}
