//! Song pipeline orchestrator
//!
//! **Stages:**
//! 1. Lyrics (mandatory): any failure aborts the request with no artifacts
//! 2. Vocals and music (optional): run concurrently, each failure isolated
//! 3. Mix (conditional): only when both audio layers exist
//! 4. Assembly: artifacts plus summary
//!
//! No stage is retried and no deadline is applied here; providers own their timeouts.

use bard_common::config::BardConfig;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use super::prompts::{build_lyrics_prompt, build_music_prompt, format_lyrics};
use super::{SongEvent, VocalSynthesisJoiner};
use crate::audio::{AudioMixer, SymphoniaDecoder, WavEncoder};
use crate::error::PipelineError;
use crate::models::{EncodedAudio, LyricsText, SongArtifacts, SongOutcome, SongRequest, Stage};
use crate::providers::{GenerationParams, Providers};

/// Orchestrates one song request end to end
pub struct SongPipeline {
    providers: Providers,
    params: GenerationParams,
    mixer: Arc<AudioMixer>,
    event_tx: Option<mpsc::Sender<SongEvent>>,
}

impl SongPipeline {
    pub fn new(providers: Providers, params: GenerationParams, mixer: AudioMixer) -> Self {
        Self {
            providers,
            params,
            mixer: Arc::new(mixer),
            event_tx: None,
        }
    }

    /// Standard pipeline: symphonia decoding, WAV output per `audio.byte_rate`
    pub fn from_config(providers: Providers, config: &BardConfig) -> Self {
        let mixer = AudioMixer::new(
            Arc::new(SymphoniaDecoder::new()),
            WavEncoder::new(config.audio.byte_rate),
        );
        Self::new(providers, GenerationParams::from(&config.generation), mixer)
    }

    /// Attach an event channel for progress reporting
    pub fn events(mut self, event_tx: mpsc::Sender<SongEvent>) -> Self {
        self.event_tx = Some(event_tx);
        self
    }

    /// Generate a song
    ///
    /// # Returns
    /// * `Ok` with lyrics and whichever audio layers succeeded
    /// * `Err` only for an invalid request or a lyrics failure
    pub async fn generate(&self, request: &SongRequest) -> Result<SongOutcome, PipelineError> {
        request.validate()?;
        info!(
            topic = %request.topic,
            style = request.style().unwrap_or("-"),
            mood = request.mood().unwrap_or("-"),
            "Generating song"
        );

        // Stage 1: lyrics (mandatory)
        let lyrics = self.run_lyrics(request).await?;

        // Stage 2: vocals and music, independent of each other
        let (vocals, music) = tokio::join!(self.run_vocals(&lyrics), self.run_music(request, &lyrics));

        // Stage 3: mix only when both layers exist
        let mix = match (&vocals, &music) {
            (Some(vocals), Some(music)) => self.run_mix(vocals.clone(), music.clone()).await,
            _ => {
                let reason = match (&vocals, &music) {
                    (None, None) => "vocals and music unavailable",
                    (None, Some(_)) => "vocals unavailable",
                    _ => "music unavailable",
                };
                info!("Skipping mix: {}", reason);
                self.emit(SongEvent::StageSkipped {
                    stage: Stage::Mix,
                    reason: reason.to_string(),
                });
                None
            }
        };

        // Stage 4: assembly
        let artifacts = SongArtifacts {
            lyrics,
            vocals,
            music,
            mix,
        };
        let summary = artifacts.summary();
        let layers = artifacts.layers();

        info!(layers = ?layers, "Song generation complete");
        self.emit(SongEvent::SongCompleted {
            layers,
            timestamp: chrono::Utc::now().timestamp(),
        });

        Ok(SongOutcome { artifacts, summary })
    }

    async fn run_lyrics(&self, request: &SongRequest) -> Result<LyricsText, PipelineError> {
        self.emit(SongEvent::StageStarted {
            stage: Stage::Lyrics,
        });

        let prompt = build_lyrics_prompt(request);
        let result = match self.providers.lyrics.generate_lyrics(&prompt, &self.params).await {
            Ok(raw) => format_lyrics(&raw),
            Err(e) => Err(e),
        };

        match result {
            Ok(lyrics) => {
                info!(lines = lyrics.line_count(), "Lyrics generated");
                self.emit(SongEvent::StageCompleted {
                    stage: Stage::Lyrics,
                    bytes: lyrics.as_str().len(),
                });
                Ok(lyrics)
            }
            Err(e) => {
                error!("Lyrics generation failed: {}", e);
                self.emit(SongEvent::StageFailed {
                    stage: Stage::Lyrics,
                    message: e.to_string(),
                });
                Err(PipelineError::LyricsGenerationFailed(e))
            }
        }
    }

    async fn run_vocals(&self, lyrics: &LyricsText) -> Option<EncodedAudio> {
        self.emit(SongEvent::StageStarted {
            stage: Stage::Vocals,
        });

        let joiner = VocalSynthesisJoiner::new(self.providers.vocals.clone());
        match joiner.synthesize(lyrics).await {
            Ok(audio) => {
                info!(bytes = audio.len(), "Vocals synthesized");
                self.emit(SongEvent::StageCompleted {
                    stage: Stage::Vocals,
                    bytes: audio.len(),
                });
                Some(audio)
            }
            Err(e) => {
                warn!("Vocals unavailable: {}", e);
                self.emit(SongEvent::StageFailed {
                    stage: Stage::Vocals,
                    message: e.to_string(),
                });
                None
            }
        }
    }

    async fn run_music(&self, request: &SongRequest, lyrics: &LyricsText) -> Option<EncodedAudio> {
        self.emit(SongEvent::StageStarted {
            stage: Stage::Music,
        });

        let prompt = build_music_prompt(request, lyrics);
        match self.providers.music.generate_music(&prompt).await {
            Ok(audio) => {
                info!(bytes = audio.len(), "Music generated");
                self.emit(SongEvent::StageCompleted {
                    stage: Stage::Music,
                    bytes: audio.len(),
                });
                Some(audio)
            }
            Err(e) => {
                warn!("Music unavailable: {}", e);
                self.emit(SongEvent::StageFailed {
                    stage: Stage::Music,
                    message: e.to_string(),
                });
                None
            }
        }
    }

    /// Decode, blend and encode off the async executor
    ///
    /// Mixer errors mean "mix absent". A panic inside the mixer is an invariant
    /// breach and is resumed on this task.
    async fn run_mix(&self, vocals: EncodedAudio, music: EncodedAudio) -> Option<EncodedAudio> {
        self.emit(SongEvent::StageStarted { stage: Stage::Mix });

        let mixer = Arc::clone(&self.mixer);
        let result = match tokio::task::spawn_blocking(move || mixer.mix(&vocals, &music)).await {
            Ok(result) => result.map_err(|e| e.to_string()),
            Err(join_err) if join_err.is_panic() => std::panic::resume_unwind(join_err.into_panic()),
            Err(join_err) => Err(format!("mix task cancelled: {}", join_err)),
        };

        match result {
            Ok(audio) => {
                info!(bytes = audio.len(), "Audio layers mixed");
                self.emit(SongEvent::StageCompleted {
                    stage: Stage::Mix,
                    bytes: audio.len(),
                });
                Some(audio)
            }
            Err(message) => {
                warn!("Mix unavailable: {}", message);
                self.emit(SongEvent::StageFailed {
                    stage: Stage::Mix,
                    message,
                });
                None
            }
        }
    }

    /// Publish an event if a channel is configured; never blocks
    fn emit(&self, event: SongEvent) {
        if let Some(tx) = &self.event_tx {
            if let Err(e) = tx.try_send(event) {
                tracing::debug!("Dropped song event: {}", e);
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
