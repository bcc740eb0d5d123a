//! Common error types for Bard

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for Bard operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across Bard crates
#[derive(Error, Debug)]
pub enum Error {
    /// File could not be read
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Configuration parsing or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
