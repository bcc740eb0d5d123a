//! 16-bit PCM WAV encoder
//!
//! Byte layout (little-endian):
//!
//! | Offset | Field |
//! |---|---|
//! | 0 | `RIFF` |
//! | 4 | 36 + data length |
//! | 8 | `WAVE` |
//! | 12 | `fmt ` |
//! | 16 | 16 (fmt chunk length) |
//! | 20 | 1 (PCM) |
//! | 22 | channel count |
//! | 24 | sample rate |
//! | 28 | byte rate (see [`ByteRateMode`]) |
//! | 32 | block align = channels * 2 |
//! | 34 | 16 (bits per sample) |
//! | 36 | `data` |
//! | 40 | data length = frames * channels * 2 |
//! | 44 | interleaved samples, frame-major |

use bard_common::config::ByteRateMode;

use super::AudioBuffer;
use crate::error::AudioError;
use crate::models::EncodedAudio;

pub const HEADER_LEN: usize = 44;
const BYTES_PER_SAMPLE: u32 = 2;

/// Clamp to [-1, 1] and quantize to i16
///
/// Negative values scale by 32768 and non-negative by 32767, so -1.0 maps to
/// -32768 and +1.0 to 32767. Output must stay byte-compatible with this mapping.
pub fn quantize_sample(sample: f32) -> i16 {
    let s = sample.clamp(-1.0, 1.0);
    if s < 0.0 {
        (s * 32768.0) as i16
    } else {
        (s * 32767.0) as i16
    }
}

/// Serializes [`AudioBuffer`]s into WAV bytes
#[derive(Debug, Clone, Copy, Default)]
pub struct WavEncoder {
    byte_rate: ByteRateMode,
}

impl WavEncoder {
    pub fn new(byte_rate: ByteRateMode) -> Self {
        Self { byte_rate }
    }

    /// Byte-rate header field for a buffer
    pub fn byte_rate(&self, sample_rate: u32, channels: u16) -> u32 {
        match self.byte_rate {
            ByteRateMode::Legacy => sample_rate.wrapping_mul(BYTES_PER_SAMPLE),
            ByteRateMode::Exact => sample_rate
                .wrapping_mul(channels as u32)
                .wrapping_mul(BYTES_PER_SAMPLE),
        }
    }

    /// Encode a buffer; fails only if the data does not fit a 32-bit chunk size
    pub fn encode(&self, buffer: &AudioBuffer) -> Result<EncodedAudio, AudioError> {
        let channel_count = buffer.channel_count();
        let frames = buffer.frames();

        let data_len = frames as u64 * channel_count as u64 * BYTES_PER_SAMPLE as u64;
        if data_len + 36 > u32::MAX as u64 {
            return Err(AudioError::TooLarge(data_len));
        }
        let data_len = data_len as u32;
        // AudioBuffer caps channel count at MAX_CHANNELS, so block align fits u16
        let channels = channel_count as u16;
        let block_align = channels * BYTES_PER_SAMPLE as u16;

        let mut out = Vec::with_capacity(HEADER_LEN + data_len as usize);
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36 + data_len).to_le_bytes());
        out.extend_from_slice(b"WAVE");
        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&channels.to_le_bytes());
        out.extend_from_slice(&buffer.sample_rate().to_le_bytes());
        out.extend_from_slice(&self.byte_rate(buffer.sample_rate(), channels).to_le_bytes());
        out.extend_from_slice(&block_align.to_le_bytes());
        out.extend_from_slice(&16u16.to_le_bytes());
        out.extend_from_slice(b"data");
        out.extend_from_slice(&data_len.to_le_bytes());

        let channel_slices: Vec<&[f32]> = (0..channel_count)
            .filter_map(|c| buffer.channel(c))
            .collect();
        for i in 0..frames {
            for samples in &channel_slices {
                out.extend_from_slice(&quantize_sample(samples[i]).to_le_bytes());
            }
        }

        Ok(EncodedAudio::from(out))
    }
}
