//! Decoded multi-channel PCM

use crate::error::AudioError;

/// Largest channel count whose 16-bit block align fits a WAV header
pub const MAX_CHANNELS: usize = (u16::MAX / 2) as usize;

/// Per-channel f32 samples at one sample rate
///
/// Construction enforces the buffer invariants: a positive sample rate, at
/// least one channel (at most [`MAX_CHANNELS`]), and equal sample counts
/// across channels. Samples are
/// not clamped here; the encoder clamps.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

impl AudioBuffer {
    pub fn new(sample_rate: u32, channels: Vec<Vec<f32>>) -> Result<Self, AudioError> {
        if sample_rate == 0 {
            return Err(AudioError::InvalidSampleRate(sample_rate));
        }
        if channels.is_empty() {
            return Err(AudioError::NoChannels);
        }
        if channels.len() > MAX_CHANNELS {
            return Err(AudioError::TooManyChannels(channels.len()));
        }

        let expected = channels[0].len();
        if let Some((channel, samples)) = channels
            .iter()
            .enumerate()
            .find(|(_, samples)| samples.len() != expected)
        {
            return Err(AudioError::ChannelLengthMismatch {
                channel,
                expected,
                actual: samples.len(),
            });
        }

        Ok(Self {
            sample_rate,
            channels,
        })
    }

    /// All-zero buffer of the given shape
    pub fn silent(sample_rate: u32, channel_count: usize, frames: usize) -> Result<Self, AudioError> {
        Self::new(sample_rate, vec![vec![0.0; frames]; channel_count])
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel
    pub fn frames(&self) -> usize {
        self.channels[0].len()
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// Sample at (channel, index), or silence when out of range
    pub fn sample(&self, channel: usize, index: usize) -> f32 {
        self.channels
            .get(channel)
            .and_then(|samples| samples.get(index))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn duration_seconds(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }
}
