//! Song generation workflow
//!
//! Lyrics are mandatory. Vocals and music run concurrently once lyrics exist,
//! and each is optional. The mix runs only when both audio layers succeeded.
//!
//! # Modules
//! - [`pipeline`]: stage orchestration and degradation policy
//! - [`vocals`]: per-line vocal synthesis joined in line order
//! - [`fan_out`]: index-preserving concurrent fan-out/fan-in
//! - [`prompts`]: prompt construction and lyrics formatting

pub mod fan_out;
pub mod pipeline;
pub mod prompts;
pub mod vocals;

use crate::models::Stage;

pub use fan_out::fan_out_indexed;
pub use pipeline::SongPipeline;
pub use vocals::VocalSynthesisJoiner;

/// Song workflow progress events
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
pub enum SongEvent {
    /// Stage started
    StageStarted { stage: Stage },

    /// Stage produced its artifact
    StageCompleted {
        stage: Stage,
        /// Artifact size (bytes of text or encoded audio)
        bytes: usize,
    },

    /// Stage failed; for optional stages the artifact is absent
    StageFailed { stage: Stage, message: String },

    /// Stage not attempted
    StageSkipped { stage: Stage, reason: String },

    /// All stages attempted
    SongCompleted {
        /// Audio layers produced
        layers: Vec<Stage>,
        /// Unix timestamp (seconds since epoch)
        timestamp: i64,
    },
}
