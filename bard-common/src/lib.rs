//! # Bard Common Library
//!
//! Shared code for the Bard song generation service:
//! - Error types
//! - Configuration model, loading and validation
//! - API token resolution

pub mod config;
pub mod error;

pub use config::BardConfig;
pub use error::{Error, Result};
