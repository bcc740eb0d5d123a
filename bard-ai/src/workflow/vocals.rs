//! Per-line vocal synthesis
//!
//! Each lyric line is synthesized by its own concurrent provider call. The
//! per-line payloads are joined in line order (not completion order) by raw
//! byte concatenation. No re-encoding happens here: if the provider returns a
//! full container per line, the joined stream is several containers back to back.

use bytes::BytesMut;
use std::sync::Arc;

use super::fan_out_indexed;
use crate::models::{EncodedAudio, LyricsText};
use crate::providers::{ProviderError, VocalsProvider};

/// Fans out one synthesis call per line and joins the results in order
pub struct VocalSynthesisJoiner {
    provider: Arc<dyn VocalsProvider>,
}

impl VocalSynthesisJoiner {
    pub fn new(provider: Arc<dyn VocalsProvider>) -> Self {
        Self { provider }
    }

    /// Synthesize every lyric line; any single line failure fails the whole call
    pub async fn synthesize(&self, lyrics: &LyricsText) -> Result<EncodedAudio, ProviderError> {
        self.synthesize_lines(lyrics.lines()).await
    }

    /// Synthesize arbitrary lines; blank lines are skipped
    pub async fn synthesize_lines<'a, I>(&self, lines: I) -> Result<EncodedAudio, ProviderError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let lines: Vec<&str> = lines
            .into_iter()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        if lines.is_empty() {
            return Err(ProviderError::empty("no lyric lines to synthesize"));
        }

        tracing::debug!(lines = lines.len(), "Synthesizing vocals per line");

        let provider = &self.provider;
        let segments = fan_out_indexed(lines, |line| provider.synthesize_line(line)).await?;

        let total: usize = segments.iter().map(EncodedAudio::len).sum();
        let mut joined = BytesMut::with_capacity(total);
        for segment in &segments {
            joined.extend_from_slice(segment.as_bytes());
        }

        tracing::debug!(segments = segments.len(), bytes = total, "Vocal segments joined");
        Ok(EncodedAudio::new(joined.freeze()))
    }
}
