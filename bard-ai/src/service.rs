//! Song generation capability
//!
//! Wraps the pipeline with song ids, persistence and the user-facing response.
//! Pipeline failures are classified into [`SongFailure`]; nothing is persisted
//! when lyrics fail.

use tracing::{error, info};
use uuid::Uuid;

use crate::error::SongFailure;
use crate::models::{SongArtifacts, SongRequest};
use crate::storage::{FileStore, SavedFiles};
use crate::workflow::SongPipeline;

/// Result of one successful song request
#[derive(Debug, Clone)]
pub struct SongResponse {
    pub song_id: String,
    pub artifacts: SongArtifacts,
    pub files: SavedFiles,
    /// Rendered text for the caller
    pub text: String,
}

pub struct SongService {
    pipeline: SongPipeline,
    store: FileStore,
}

impl SongService {
    pub fn new(pipeline: SongPipeline, store: FileStore) -> Self {
        Self { pipeline, store }
    }

    /// Generate, persist and render a song
    pub async fn generate_song(&self, request: &SongRequest) -> Result<SongResponse, SongFailure> {
        let song_id = Uuid::new_v4().simple().to_string();
        info!(song_id = %song_id, "Song request received");

        let outcome = self.pipeline.generate(request).await.map_err(|e| {
            error!(song_id = %song_id, "Error generating song: {}", e);
            SongFailure::from(&e)
        })?;

        let files = self
            .store
            .save_song_files(&song_id, &outcome.artifacts)
            .await
            .map_err(|e| {
                error!(song_id = %song_id, "Failed to save song files: {}", e);
                SongFailure::Unspecified
            })?;

        let text = render_response(&outcome.artifacts, &files);
        Ok(SongResponse {
            song_id,
            artifacts: outcome.artifacts,
            files,
            text,
        })
    }
}

/// User-facing response: lyrics, saved file list, audio layer sizes
pub fn render_response(artifacts: &SongArtifacts, files: &SavedFiles) -> String {
    let mut response = format!("🎵 Generated Song 🎵\n\nLyrics:\n{}\n\n", artifacts.lyrics);

    response.push_str(&format!("Files saved in {}/:\n", files.dir.display()));
    response.push_str(&format!("- Lyrics: {}\n", files.lyrics.display()));
    for (label, path) in [
        ("Vocals", &files.vocals),
        ("Music", &files.music),
        ("Final Mix", &files.mix),
    ] {
        if let Some(path) = path {
            response.push_str(&format!("- {}: {}\n", label, path.display()));
        }
    }
    response.push('\n');

    response.push_str(&artifacts.audio_layers_section());
    response
}
