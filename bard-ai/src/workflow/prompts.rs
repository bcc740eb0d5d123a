//! Prompt construction and lyrics formatting

use crate::models::{LyricsText, SongRequest};
use crate::providers::ProviderError;

const DEFAULT_MUSIC_STYLE: &str = "pop";
const DEFAULT_MUSIC_MOOD: &str = "upbeat";

const LYRICS_INSTRUCTIONS: &str = "Please follow these steps:
1. First, think about the main theme and emotions we want to convey
2. Then, create engaging lyrics with clear verses and a chorus
3. Make sure the lyrics tell a cohesive story
4. Add a bridge if it enhances the song's structure

Please write the lyrics in this format:

Verse 1:
[First verse lyrics]

Chorus:
[Chorus lyrics]

Verse 2:
[Second verse lyrics]

[Continue with Bridge and/or additional verses as needed]";

/// Lyrics prompt; style and mood qualifiers appear only when present
pub fn build_lyrics_prompt(request: &SongRequest) -> String {
    let mut qualifiers = Vec::new();
    if let Some(style) = request.style() {
        qualifiers.push(format!("in {} style", style));
    }
    if let Some(mood) = request.mood() {
        qualifiers.push(format!("with a {} mood", mood));
    }

    let mut opening = String::from("Let's write a song ");
    if !qualifiers.is_empty() {
        opening.push_str(&qualifiers.join(" "));
        opening.push(' ');
    }

    format!(
        "{}about {}. \n{}",
        opening,
        request.topic.trim(),
        LYRICS_INSTRUCTIONS
    )
}

/// Instrumental prompt keyed to the first lyric line
pub fn build_music_prompt(request: &SongRequest, lyrics: &LyricsText) -> String {
    format!(
        "{} instrumental music with {} mood, melodic and atmospheric, \
         with a clear rhythm that matches these lyrics: {}",
        request.style().unwrap_or(DEFAULT_MUSIC_STYLE),
        request.mood().unwrap_or(DEFAULT_MUSIC_MOOD),
        lyrics.first_line()
    )
}

/// Format raw generated text; nothing usable is an `Empty` provider error
pub fn format_lyrics(raw: &str) -> Result<LyricsText, ProviderError> {
    LyricsText::from_raw(raw)
        .ok_or_else(|| ProviderError::empty("lyrics provider returned only whitespace"))
}
