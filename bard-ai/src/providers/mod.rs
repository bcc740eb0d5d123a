//! Provider capabilities consumed by the song pipeline
//!
//! Each creative model sits behind one trait:
//! - [`LyricsProvider`]: prompt → lyrics text
//! - [`VocalsProvider`]: one lyric line → encoded speech
//! - [`MusicProvider`]: prompt → encoded instrumental
//!
//! Providers report failures as a [`ProviderError`] carrying a structured
//! [`ProviderErrorKind`], so callers never inspect message text.
//! Transport deadlines belong to the provider implementation.

pub mod huggingface;

use async_trait::async_trait;
use bard_common::config::GenerationConfig;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::models::EncodedAudio;

pub use huggingface::HfInferenceClient;

/// Failure category reported by a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProviderErrorKind {
    /// Token missing, invalid or lacking permission
    Authentication,
    /// Model does not exist or the caller has no access to it
    ModelAccess,
    RateLimited,
    /// Connection, DNS or timeout failure
    Transport,
    /// Any other non-success HTTP status
    Api(u16),
    /// Response body could not be interpreted
    InvalidResponse,
    /// Provider succeeded but returned nothing usable
    Empty,
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderErrorKind::Authentication => f.write_str("authentication error"),
            ProviderErrorKind::ModelAccess => f.write_str("model access error"),
            ProviderErrorKind::RateLimited => f.write_str("rate limited"),
            ProviderErrorKind::Transport => f.write_str("transport error"),
            ProviderErrorKind::Api(status) => write!(f, "API error {}", status),
            ProviderErrorKind::InvalidResponse => f.write_str("invalid response"),
            ProviderErrorKind::Empty => f.write_str("empty response"),
        }
    }
}

/// Provider failure with structured kind
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Transport, message)
    }

    pub fn empty(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Empty, message)
    }
}

/// Sampling parameters passed to the lyrics provider
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub max_length: u32,
    /// 0.0-1.0
    pub temperature: f32,
    pub top_p: f32,
    pub repetition_penalty: f32,
}

impl From<&GenerationConfig> for GenerationParams {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            max_length: config.max_length,
            temperature: config.temperature,
            top_p: config.top_p,
            repetition_penalty: config.repetition_penalty,
        }
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self::from(&GenerationConfig::default())
    }
}

/// Lyrics text generation
#[async_trait]
pub trait LyricsProvider: Send + Sync {
    /// Generate raw lyrics text for a prompt
    async fn generate_lyrics(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, ProviderError>;
}

/// Text-to-speech for a single lyric line
#[async_trait]
pub trait VocalsProvider: Send + Sync {
    async fn synthesize_line(&self, line: &str) -> Result<EncodedAudio, ProviderError>;
}

/// Instrumental generation
#[async_trait]
pub trait MusicProvider: Send + Sync {
    async fn generate_music(&self, prompt: &str) -> Result<EncodedAudio, ProviderError>;
}

/// The three providers a pipeline needs
#[derive(Clone)]
pub struct Providers {
    pub lyrics: Arc<dyn LyricsProvider>,
    pub vocals: Arc<dyn VocalsProvider>,
    pub music: Arc<dyn MusicProvider>,
}

impl Providers {
    /// Use one client for every capability
    pub fn from_client<C>(client: Arc<C>) -> Self
    where
        C: LyricsProvider + VocalsProvider + MusicProvider + 'static,
    {
        Self {
            lyrics: client.clone(),
            vocals: client.clone(),
            music: client,
        }
    }
}

// ============================================================================
// Mock Providers for Testing
// ============================================================================
