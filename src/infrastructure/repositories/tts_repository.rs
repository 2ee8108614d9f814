use async_trait::async_trait;
use regex::Regex;
use std::sync::OnceLock;

/// Repository for TTS synthesis operations.
/// Abstracts the underlying TTS provider (AWS Polly, OpenAI, etc.)
///
/// Implementations are responsible for:
/// - Handling provider-specific text length limitations
/// - Splitting text into batches if needed
/// - Merging audio chunks into a single audio stream
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Synthesize text to speech with the requested voice
    ///
    /// Returns merged audio data ready for playback (MP3 format)
    ///
    /// # Arguments
    /// * `text` - The cleaned text to synthesize
    /// * `voice_id` - Provider voice identifier, e.g. "Joanna"
    /// * `language_code` - BCP-47 language code, e.g. "en-US"
    ///
    /// # Errors
    /// Returns error if synthesis fails or provider is unavailable
    async fn synthesize(
        &self,
        text: &str,
        voice_id: &str,
        language_code: &str,
    ) -> Result<Vec<u8>, String>;
}

fn sentence_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"([.!?]+\s+)").expect("valid sentence regex"))
}

/// Split text into batches that respect sentence boundaries.
/// Each batch is at most `max_batch_size` bytes; text without usable
/// sentence boundaries is cut by characters.
pub fn split_into_batches(text: &str, max_batch_size: usize) -> Vec<String> {
    if text.len() <= max_batch_size {
        return vec![text.to_string()];
    }

    let mut batches = Vec::new();
    let mut current_batch = String::new();
    let mut last_end = 0;

    for mat in sentence_pattern().find_iter(text) {
        let sentence = &text[last_end..mat.end()];

        if !current_batch.is_empty() && current_batch.len() + sentence.len() > max_batch_size {
            batches.push(current_batch.trim().to_string());
            current_batch = String::new();
        }

        if sentence.len() > max_batch_size {
            push_char_slices(&mut batches, sentence, max_batch_size);
        } else {
            current_batch.push_str(sentence);
        }
        last_end = mat.end();
    }

    // Remaining text after the last sentence boundary
    if last_end < text.len() {
        let remaining = &text[last_end..];

        if !current_batch.is_empty() && current_batch.len() + remaining.len() > max_batch_size {
            batches.push(current_batch.trim().to_string());
            current_batch = String::new();
        }

        if remaining.len() > max_batch_size {
            push_char_slices(&mut batches, remaining, max_batch_size);
        } else {
            current_batch.push_str(remaining);
        }
    }

    if !current_batch.trim().is_empty() {
        batches.push(current_batch.trim().to_string());
    }

    batches.retain(|batch| !batch.is_empty());
    batches
}

fn push_char_slices(batches: &mut Vec<String>, text: &str, max_batch_size: usize) {
    let mut current = String::new();
    for ch in text.chars() {
        if current.len() + ch.len_utf8() > max_batch_size {
            batches.push(std::mem::take(&mut current));
        }
        current.push(ch);
    }
    if !current.trim().is_empty() {
        batches.push(current);
    }
}
