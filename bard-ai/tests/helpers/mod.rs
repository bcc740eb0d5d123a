//! Shared test helpers: scripted providers and WAV fixtures

#![allow(dead_code)]

use async_trait::async_trait;
use bard_ai::providers::{
    GenerationParams, LyricsProvider, MusicProvider, ProviderError, ProviderErrorKind, Providers,
    VocalsProvider,
};
use bard_ai::EncodedAudio;
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Encode a constant-amplitude 16-bit WAV with hound
///
/// Channel `c` holds `amplitude * (c + 1) / channels`, so channels are distinguishable.
pub fn wav_bytes(sample_rate: u32, channels: u16, frames: usize, amplitude: f32) -> EncodedAudio {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for _ in 0..frames {
            for c in 0..channels {
                let value = amplitude * (c + 1) as f32 / channels as f32;
                writer.write_sample((value * 32767.0) as i16).unwrap();
            }
        }
        writer.finalize().unwrap();
    }
    EncodedAudio::from(cursor.into_inner())
}

/// Read every sample of a WAV as i16, with its spec
pub fn read_wav(audio: &EncodedAudio) -> (hound::WavSpec, Vec<i16>) {
    let reader = hound::WavReader::new(Cursor::new(audio.as_bytes().to_vec())).unwrap();
    let spec = reader.spec();
    let samples = reader.into_samples::<i16>().map(|s| s.unwrap()).collect();
    (spec, samples)
}

/// Lyrics provider with a fixed result
pub struct ScriptedLyrics {
    result: Result<String, ProviderErrorKind>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedLyrics {
    pub fn ok(text: &str) -> Self {
        Self {
            result: Ok(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(kind: ProviderErrorKind) -> Self {
        Self {
            result: Err(kind),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl LyricsProvider for ScriptedLyrics {
    async fn generate_lyrics(
        &self,
        prompt: &str,
        _params: &GenerationParams,
    ) -> Result<String, ProviderError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.result
            .clone()
            .map_err(|kind| ProviderError::new(kind, "scripted lyrics failure"))
    }
}

/// Vocals provider returning one WAV per line, or failing every call
pub struct ScriptedVocals {
    audio: Option<EncodedAudio>,
    delay: Duration,
    pub lines: Mutex<Vec<String>>,
}

impl ScriptedVocals {
    pub fn ok(audio: EncodedAudio) -> Self {
        Self {
            audio: Some(audio),
            delay: Duration::ZERO,
            lines: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            audio: None,
            delay: Duration::ZERO,
            lines: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl VocalsProvider for ScriptedVocals {
    async fn synthesize_line(&self, line: &str) -> Result<EncodedAudio, ProviderError> {
        tokio::time::sleep(self.delay).await;
        self.lines.lock().unwrap().push(line.to_string());
        self.audio
            .clone()
            .ok_or_else(|| ProviderError::new(ProviderErrorKind::Transport, "tts unavailable"))
    }
}

/// Music provider with a fixed result
pub struct ScriptedMusic {
    audio: Option<EncodedAudio>,
    delay: Duration,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedMusic {
    pub fn ok(audio: EncodedAudio) -> Self {
        Self {
            audio: Some(audio),
            delay: Duration::ZERO,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            audio: None,
            delay: Duration::ZERO,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl MusicProvider for ScriptedMusic {
    async fn generate_music(&self, prompt: &str) -> Result<EncodedAudio, ProviderError> {
        tokio::time::sleep(self.delay).await;
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.audio
            .clone()
            .ok_or_else(|| ProviderError::new(ProviderErrorKind::Api(503), "music model loading"))
    }
}

pub fn providers(
    lyrics: Arc<ScriptedLyrics>,
    vocals: Arc<ScriptedVocals>,
    music: Arc<ScriptedMusic>,
) -> Providers {
    Providers {
        lyrics,
        vocals,
        music,
    }
}
