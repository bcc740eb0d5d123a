//! In-memory audio decoding
//!
//! Uses symphonia for format-agnostic decoding (WAV, FLAC, MP3, OGG, etc.).
//! Output keeps every channel separate; samples are converted to f32 but not clamped.

use std::io::Cursor;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::AudioBuffer;
use crate::error::AudioError;
use crate::models::EncodedAudio;

/// Turns encoded audio into an [`AudioBuffer`]
///
/// Decoding is CPU-bound and synchronous; callers run it off the async executor.
pub trait AudioDecoder: Send + Sync {
    fn decode(&self, audio: &EncodedAudio) -> Result<AudioBuffer, AudioError>;
}

/// Symphonia-backed decoder
#[derive(Debug, Clone, Copy, Default)]
pub struct SymphoniaDecoder;

impl SymphoniaDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl AudioDecoder for SymphoniaDecoder {
    fn decode(&self, audio: &EncodedAudio) -> Result<AudioBuffer, AudioError> {
        tracing::debug!(bytes = audio.len(), "Decoding audio");

        let source = Cursor::new(audio.to_bytes());
        let mss = MediaSourceStream::new(Box::new(source), Default::default());

        let probed = symphonia::default::get_probe()
            .format(
                &Hint::new(),
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| AudioError::Decode(e.to_string()))?;

        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or(AudioError::NoAudioTrack)?;

        let track_id = track.id;
        let mut sample_rate = track.codec_params.sample_rate;
        let mut channel_count = track.codec_params.channels.map(|c| c.count());

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| AudioError::Decode(e.to_string()))?;

        let mut interleaved: Vec<f32> = Vec::new();
        let mut sample_buf: Option<SampleBuffer<f32>> = None;
        let mut sample_buf_frames = 0usize;

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    break;
                }
                Err(e) => return Err(AudioError::Decode(e.to_string())),
            };

            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(decoded) => decoded,
                Err(SymphoniaError::DecodeError(e)) => {
                    tracing::warn!("Skipping undecodable packet: {}", e);
                    continue;
                }
                Err(e) => return Err(AudioError::Decode(e.to_string())),
            };

            let spec = *decoded.spec();
            sample_rate.get_or_insert(spec.rate);
            channel_count.get_or_insert(spec.channels.count());

            // Reallocate when a packet holds more frames than the current buffer
            if sample_buf.is_none() || decoded.capacity() > sample_buf_frames {
                sample_buf_frames = decoded.capacity();
                sample_buf = Some(SampleBuffer::new(sample_buf_frames as u64, spec));
            }

            if let Some(buf) = sample_buf.as_mut() {
                buf.copy_interleaved_ref(decoded);
                interleaved.extend_from_slice(buf.samples());
            }
        }

        let sample_rate = sample_rate.ok_or(AudioError::InvalidSampleRate(0))?;
        let channel_count = channel_count.filter(|c| *c > 0).ok_or(AudioError::NoChannels)?;

        let buffer = AudioBuffer::new(sample_rate, deinterleave(&interleaved, channel_count))?;

        tracing::debug!(
            sample_rate = buffer.sample_rate(),
            channels = buffer.channel_count(),
            frames = buffer.frames(),
            "Audio decoding complete"
        );

        Ok(buffer)
    }
}

/// Split frame-major samples into per-channel vectors
///
/// A trailing partial frame is dropped.
fn deinterleave(interleaved: &[f32], channel_count: usize) -> Vec<Vec<f32>> {
    let frames = interleaved.len() / channel_count;
    let mut channels = vec![Vec::with_capacity(frames); channel_count];
    for frame in interleaved.chunks_exact(channel_count) {
        for (channel, sample) in channels.iter_mut().zip(frame) {
            channel.push(*sample);
        }
    }
    channels
}
