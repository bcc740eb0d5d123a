//! bard-ai library interface
//!
//! Turns a song request (topic, optional style and mood) into lyrics, a vocal
//! track, an instrumental and a mixed master.

pub mod audio;
pub mod error;
pub mod models;
pub mod providers;
pub mod service;
pub mod storage;
pub mod workflow;

pub use crate::error::{AudioError, PipelineError, SongFailure, StorageError};
pub use crate::models::{EncodedAudio, LyricsText, SongArtifacts, SongOutcome, SongRequest, Stage};
pub use crate::service::{SongResponse, SongService};
pub use crate::workflow::{SongEvent, SongPipeline};
