//! Song file persistence
//!
//! Layout: `{output_dir}/{song_id}/`
//! - `lyrics.txt` (always)
//! - `vocals.wav`, `music.wav`, `final-mix.wav` (when produced)

use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::StorageError;
use crate::models::{EncodedAudio, SongArtifacts};

pub const LYRICS_FILE: &str = "lyrics.txt";
pub const VOCALS_FILE: &str = "vocals.wav";
pub const MUSIC_FILE: &str = "music.wav";
pub const MIX_FILE: &str = "final-mix.wav";

/// Paths actually written for one song
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFiles {
    pub dir: PathBuf,
    pub lyrics: PathBuf,
    pub vocals: Option<PathBuf>,
    pub music: Option<PathBuf>,
    pub mix: Option<PathBuf>,
}

/// Writes song artifacts under an output directory
#[derive(Debug, Clone)]
pub struct FileStore {
    output_dir: PathBuf,
}

impl FileStore {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Persist every present artifact; absent layers are skipped, not errors
    pub async fn save_song_files(
        &self,
        song_id: &str,
        artifacts: &SongArtifacts,
    ) -> Result<SavedFiles, StorageError> {
        validate_song_id(song_id)?;

        let dir = self.output_dir.join(song_id);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| StorageError::CreateDir {
                path: dir.clone(),
                source,
            })?;

        let lyrics = dir.join(LYRICS_FILE);
        write_file(&lyrics, artifacts.lyrics.as_str().as_bytes()).await?;

        let vocals = write_optional(&dir, VOCALS_FILE, artifacts.vocals.as_ref()).await?;
        let music = write_optional(&dir, MUSIC_FILE, artifacts.music.as_ref()).await?;
        let mix = write_optional(&dir, MIX_FILE, artifacts.mix.as_ref()).await?;

        info!(song_id = song_id, dir = %dir.display(), "Song files saved");

        Ok(SavedFiles {
            dir,
            lyrics,
            vocals,
            music,
            mix,
        })
    }
}

/// Song ids become directory names; only `[A-Za-z0-9_-]` is accepted
fn validate_song_id(song_id: &str) -> Result<(), StorageError> {
    let valid = !song_id.is_empty()
        && song_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidSongId(song_id.to_string()))
    }
}

async fn write_optional(
    dir: &Path,
    name: &str,
    audio: Option<&EncodedAudio>,
) -> Result<Option<PathBuf>, StorageError> {
    match audio {
        Some(audio) => {
            let path = dir.join(name);
            write_file(&path, audio.as_bytes()).await?;
            Ok(Some(path))
        }
        None => Ok(None),
    }
}

async fn write_file(path: &Path, contents: &[u8]) -> Result<(), StorageError> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|source| StorageError::Write {
            path: path.to_path_buf(),
            source,
        })
}
