//! Vocals + instrumental blend
//!
//! Fixed linear blend with silence padding. The shorter (or narrower) input is
//! zero-extended, never looped. No normalization follows the blend.

use std::sync::Arc;

use super::{AudioBuffer, AudioDecoder, WavEncoder};
use crate::error::AudioError;
use crate::models::EncodedAudio;

/// Blend weights; vocals dominate
struct MixWeights {
    vocals: f32,
    music: f32,
}

const WEIGHTS: MixWeights = MixWeights {
    vocals: 0.7,
    music: 0.3,
};

/// Blend two decoded buffers sample by sample at 0.7 vocals / 0.3 music
///
/// Output has `max` of both channel counts and `max` of both lengths.
/// Both inputs must share a sample rate; no resampling is performed.
pub fn mix_buffers(vocals: &AudioBuffer, music: &AudioBuffer) -> Result<AudioBuffer, AudioError> {
    if vocals.sample_rate() != music.sample_rate() {
        return Err(AudioError::SampleRateMismatch {
            vocals: vocals.sample_rate(),
            music: music.sample_rate(),
        });
    }

    let frames = vocals.frames().max(music.frames());
    let channel_count = vocals.channel_count().max(music.channel_count());

    let channels = (0..channel_count)
        .map(|c| {
            (0..frames)
                .map(|i| vocals.sample(c, i) * WEIGHTS.vocals + music.sample(c, i) * WEIGHTS.music)
                .collect()
        })
        .collect();

    AudioBuffer::new(vocals.sample_rate(), channels)
}

/// Decodes, blends and re-encodes two tracks
pub struct AudioMixer {
    decoder: Arc<dyn AudioDecoder>,
    encoder: WavEncoder,
}

impl AudioMixer {
    pub fn new(decoder: Arc<dyn AudioDecoder>, encoder: WavEncoder) -> Self {
        Self { decoder, encoder }
    }

    /// Mix encoded vocals over an encoded instrumental
    ///
    /// Any decode failure or sample-rate mismatch is returned to the caller.
    pub fn mix(&self, vocals: &EncodedAudio, music: &EncodedAudio) -> Result<EncodedAudio, AudioError> {
        let vocals = self.decoder.decode(vocals)?;
        let music = self.decoder.decode(music)?;

        tracing::debug!(
            vocals_channels = vocals.channel_count(),
            vocals_frames = vocals.frames(),
            music_channels = music.channel_count(),
            music_frames = music.frames(),
            vocals_secs = vocals.duration_seconds(),
            music_secs = music.duration_seconds(),
            sample_rate = vocals.sample_rate(),
            "Mixing audio layers"
        );

        let mixed = mix_buffers(&vocals, &music)?;
        self.encoder.encode(&mixed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(len: usize, scale: f32) -> Vec<f32> {
        (0..len).map(|i| ((i % 100) as f32 / 100.0) * scale).collect()
    }

    #[test]
    fn test_pads_shorter_and_narrower_input_with_silence() {
        let vocals = AudioBuffer::new(44100, (0..4).map(|_| ramp(1000, 0.8)).collect()).unwrap();
        let music = AudioBuffer::new(44100, (0..2).map(|_| ramp(1500, -0.6)).collect()).unwrap();

        let mixed = mix_buffers(&vocals, &music).unwrap();
        assert_eq!(mixed.channel_count(), 4);
        assert_eq!(mixed.frames(), 1500);

        for c in 0..4 {
            for i in 0..1500 {
                let expected = vocals.sample(c, i) * 0.7 + music.sample(c, i) * 0.3;
                assert!((mixed.sample(c, i) - expected).abs() < 1e-6);
            }
        }
        // Channels beyond the music width carry vocals only, then silence
        assert!((mixed.sample(3, 10) - vocals.sample(3, 10) * 0.7).abs() < 1e-6);
        assert_eq!(mixed.sample(3, 1200), 0.0);
        // Past the vocals length, music alone at its weight
        assert!((mixed.sample(0, 1200) - music.sample(0, 1200) * 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_weights_sum_to_one() {
        assert!((WEIGHTS.vocals + WEIGHTS.music - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_sample_rate_mismatch_is_error() {
        let vocals = AudioBuffer::silent(22050, 1, 10).unwrap();
        let music = AudioBuffer::silent(32000, 1, 10).unwrap();
        assert!(matches!(
            mix_buffers(&vocals, &music),
            Err(AudioError::SampleRateMismatch {
                vocals: 22050,
                music: 32000
            })
        ));
    }

    #[test]
    fn test_no_normalization_after_blend() {
        let vocals = AudioBuffer::new(8000, vec![vec![1.0]]).unwrap();
        let music = AudioBuffer::new(8000, vec![vec![1.0]]).unwrap();
        let mixed = mix_buffers(&vocals, &music).unwrap();
        assert!((mixed.sample(0, 0) - 1.0).abs() < 1e-6);
    }
}
