//! Error types for bard-ai
//!
//! Only [`PipelineError`] crosses the pipeline boundary. Vocals, music and mix
//! failures are absorbed by the pipeline and show up as absent artifacts.
//! [`SongFailure`] is the user-facing classification of a pipeline error.

use std::path::PathBuf;
use thiserror::Error;

use crate::providers::{ProviderError, ProviderErrorKind};

/// Audio decoding, mixing and encoding errors
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("Failed to decode audio: {0}")]
    Decode(String),

    #[error("No audio track found")]
    NoAudioTrack,

    #[error("Audio buffer has no channels")]
    NoChannels,

    #[error("Too many channels: {0}")]
    TooManyChannels(usize),

    #[error("Invalid sample rate: {0}")]
    InvalidSampleRate(u32),

    #[error("Channel {channel} has {actual} samples, expected {expected}")]
    ChannelLengthMismatch {
        channel: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Sample rate mismatch: vocals {vocals} Hz, music {music} Hz")]
    SampleRateMismatch { vocals: u32, music: u32 },

    #[error("Audio too large for WAV container: {0} data bytes")]
    TooLarge(u64),
}

/// Hard failures of the song pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Lyrics generation failed: {0}")]
    LyricsGenerationFailed(#[source] ProviderError),
}

/// File store errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid song id: {0}")]
    InvalidSongId(String),

    #[error("Failed to create {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// User-facing failure categories for a song request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SongFailure {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Authentication failed. Please check your Hugging Face token has the necessary permissions.")]
    Authentication,

    #[error("Model access error. Please check if you have access to the specified models.")]
    ModelAccess,

    #[error("Failed to generate song. Please try again later or contact support if the issue persists.")]
    Unspecified,
}

impl From<&PipelineError> for SongFailure {
    fn from(err: &PipelineError) -> Self {
        match err {
            PipelineError::InvalidRequest(msg) => SongFailure::InvalidRequest(msg.clone()),
            PipelineError::LyricsGenerationFailed(cause) => match cause.kind {
                ProviderErrorKind::Authentication => SongFailure::Authentication,
                ProviderErrorKind::ModelAccess => SongFailure::ModelAccess,
                _ => SongFailure::Unspecified,
            },
        }
    }
}

impl From<PipelineError> for SongFailure {
    fn from(err: PipelineError) -> Self {
        SongFailure::from(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lyrics_failure(kind: ProviderErrorKind) -> PipelineError {
        PipelineError::LyricsGenerationFailed(ProviderError::new(kind, "boom"))
    }

    #[test]
    fn test_classification_uses_error_kind() {
        assert_eq!(
            SongFailure::from(lyrics_failure(ProviderErrorKind::Authentication)),
            SongFailure::Authentication
        );
        assert_eq!(
            SongFailure::from(lyrics_failure(ProviderErrorKind::ModelAccess)),
            SongFailure::ModelAccess
        );
        for kind in [
            ProviderErrorKind::Transport,
            ProviderErrorKind::RateLimited,
            ProviderErrorKind::Api(503),
            ProviderErrorKind::InvalidResponse,
            ProviderErrorKind::Empty,
        ] {
            assert_eq!(SongFailure::from(lyrics_failure(kind)), SongFailure::Unspecified);
        }
    }

    #[test]
    fn test_message_text_does_not_drive_classification() {
        // A transport error that happens to mention "model" stays generic
        let err = PipelineError::LyricsGenerationFailed(ProviderError::new(
            ProviderErrorKind::Transport,
            "connection reset while loading model auth method",
        ));
        assert_eq!(SongFailure::from(&err), SongFailure::Unspecified);
    }

    #[test]
    fn test_invalid_request_passes_message_through() {
        let err = PipelineError::InvalidRequest("topic must not be empty".to_string());
        let failure = SongFailure::from(err);
        assert_eq!(failure.to_string(), "Invalid request: topic must not be empty");
    }

    #[test]
    fn test_pipeline_error_keeps_cause() {
        let err = lyrics_failure(ProviderErrorKind::Api(500));
        let source = std::error::Error::source(&err).unwrap();
        assert!(source.to_string().contains("boom"));
    }
}
