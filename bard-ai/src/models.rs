//! Core data types for song generation
//!
//! - [`SongRequest`]: what the caller asked for
//! - [`LyricsText`]: formatted lyrics (trimmed lines, no blanks)
//! - [`EncodedAudio`]: container bytes exchanged with providers and storage
//! - [`SongArtifacts`]: whatever the pipeline managed to produce

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PipelineError;

/// Song generation request
///
/// `style` and `mood` are optional qualifiers; blank strings are treated as absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongRequest {
    pub topic: String,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub mood: Option<String>,
}

impl SongRequest {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            style: None,
            mood: None,
        }
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn with_mood(mut self, mood: impl Into<String>) -> Self {
        self.mood = Some(mood.into());
        self
    }

    /// Style qualifier, if present and non-blank
    pub fn style(&self) -> Option<&str> {
        non_blank(self.style.as_deref())
    }

    /// Mood qualifier, if present and non-blank
    pub fn mood(&self) -> Option<&str> {
        non_blank(self.mood.as_deref())
    }

    /// Reject requests without a topic
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.topic.trim().is_empty() {
            return Err(PipelineError::InvalidRequest(
                "topic must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Formatted lyrics: every line trimmed, blank lines removed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LyricsText(String);

impl LyricsText {
    /// Format raw generated text; `None` if nothing usable remains
    pub fn from_raw(raw: &str) -> Option<Self> {
        let formatted = raw
            .trim()
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        if formatted.is_empty() {
            None
        } else {
            Some(Self(formatted))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.0.lines()
    }

    pub fn first_line(&self) -> &str {
        self.0.lines().next().unwrap_or_default()
    }

    pub fn line_count(&self) -> usize {
        self.0.lines().count()
    }
}

impl fmt::Display for LyricsText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Encoded audio container bytes (WAV or whatever a provider returned)
///
/// Cloning is cheap; the bytes are reference counted.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedAudio(Bytes);

impl EncodedAudio {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Shared handle to the underlying bytes
    pub fn to_bytes(&self) -> Bytes {
        self.0.clone()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Size in kilobytes, rounded to nearest
    pub fn size_kb(&self) -> u64 {
        (self.0.len() as u64 + 512) / 1024
    }
}

impl From<Vec<u8>> for EncodedAudio {
    fn from(bytes: Vec<u8>) -> Self {
        Self(Bytes::from(bytes))
    }
}

impl fmt::Debug for EncodedAudio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncodedAudio({} bytes)", self.0.len())
    }
}

/// Pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Lyrics,
    Vocals,
    Music,
    Mix,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Lyrics => "lyrics",
            Stage::Vocals => "vocals",
            Stage::Music => "music",
            Stage::Mix => "mix",
        };
        f.write_str(name)
    }
}

/// Artifacts produced for one request
///
/// Lyrics are always present; each audio layer is independently optional.
#[derive(Debug, Clone)]
pub struct SongArtifacts {
    pub lyrics: LyricsText,
    pub vocals: Option<EncodedAudio>,
    pub music: Option<EncodedAudio>,
    pub mix: Option<EncodedAudio>,
}

impl SongArtifacts {
    pub fn new(lyrics: LyricsText) -> Self {
        Self {
            lyrics,
            vocals: None,
            music: None,
            mix: None,
        }
    }

    /// Audio layers that were produced, in presentation order
    pub fn layers(&self) -> Vec<Stage> {
        [
            (Stage::Vocals, &self.vocals),
            (Stage::Music, &self.music),
            (Stage::Mix, &self.mix),
        ]
        .into_iter()
        .filter(|(_, audio)| audio.is_some())
        .map(|(stage, _)| stage)
        .collect()
    }

    /// "Audio Layers:" section listing each produced layer with its size
    pub fn audio_layers_section(&self) -> String {
        let mut section = String::from("Audio Layers:\n");
        let entries = [
            ("Vocals", "Synthesized vocals", &self.vocals),
            ("Music", "Instrumental accompaniment", &self.music),
            ("Final Mix", "Combined audio", &self.mix),
        ];

        let mut any = false;
        for (label, description, audio) in entries {
            if let Some(audio) = audio {
                any = true;
                section.push_str(&format!(
                    "- {}: {} [{}KB]\n",
                    label,
                    description,
                    audio.size_kb()
                ));
            }
        }
        if !any {
            section.push_str("- None (lyrics only)\n");
        }
        section
    }

    /// Human-readable summary of the lyrics and produced layers
    pub fn summary(&self) -> String {
        format!("Lyrics:\n{}\n\n{}", self.lyrics, self.audio_layers_section())
    }
}

/// Pipeline result: artifacts plus summary
#[derive(Debug, Clone)]
pub struct SongOutcome {
    pub artifacts: SongArtifacts,
    pub summary: String,
}
