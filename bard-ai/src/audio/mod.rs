//! Audio signal handling: decoded buffers, WAV encoding, decoding and mixing

pub mod buffer;
pub mod decode;
pub mod mixer;
pub mod wav;

pub use buffer::AudioBuffer;
pub use decode::{AudioDecoder, SymphoniaDecoder};
pub use mixer::{mix_buffers, AudioMixer};
pub use wav::{quantize_sample, WavEncoder};
