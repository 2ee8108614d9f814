use super::cleaner::TextCleaner;
use super::dto::SynthesisRequest;
use super::error::SpeechServiceError;
use super::spa::is_spa;
use crate::infrastructure::repositories::{PageFetcher, TtsRepository};
use async_trait::async_trait;
use std::sync::Arc;

/// Cleaned text shorter than this (after trimming) is not worth narrating
const MIN_CLEANED_CHARS: usize = 50;

pub struct SpeechService {
    page_fetcher: Arc<dyn PageFetcher>,
    text_cleaner: Arc<TextCleaner>,
    tts_repo: Arc<dyn TtsRepository>,
}

impl SpeechService {
    pub fn new(
        page_fetcher: Arc<dyn PageFetcher>,
        text_cleaner: Arc<TextCleaner>,
        tts_repo: Arc<dyn TtsRepository>,
    ) -> Self {
        Self {
            page_fetcher,
            text_cleaner,
            tts_repo,
        }
    }
}

#[async_trait]
pub trait SpeechServiceApi: Send + Sync {
    /// Narrate a webpage
    ///
    /// This operation:
    /// - Fetches the page
    /// - Rejects client-rendered or near-empty pages
    /// - Cleans the HTML into speakable text through the LLM
    /// - Synthesizes the text with the requested voice
    ///
    /// Returns raw MP3 bytes
    async fn narrate(&self, request: &SynthesisRequest) -> Result<Vec<u8>, SpeechServiceError>;
}

#[async_trait]
impl SpeechServiceApi for SpeechService {
    async fn narrate(&self, request: &SynthesisRequest) -> Result<Vec<u8>, SpeechServiceError> {
        let start_time = std::time::Instant::now();
        tracing::info!(
            url = %request.url,
            voice = %request.voice_id,
            language = %request.language_code,
            "Narration request"
        );

        // 1. Fetch
        let html = self
            .page_fetcher
            .fetch(&request.url)
            .await
            .map_err(SpeechServiceError::Fetch)?;

        // 2. Gate client-rendered shells before spending LLM calls on them
        if is_spa(&html) {
            tracing::info!(url = %request.url, html_length = html.len(), "Page rejected as SPA");
            return Err(SpeechServiceError::SpaDetected);
        }

        // 3. Clean
        let cleaned_text = self
            .text_cleaner
            .clean(&html)
            .await
            .map_err(|e| SpeechServiceError::Cleanup(e.to_string()))?;

        // 4. Length gate
        let cleaned_text = cleaned_text.trim();
        if cleaned_text.chars().count() < MIN_CLEANED_CHARS {
            tracing::info!(
                url = %request.url,
                cleaned_length = cleaned_text.len(),
                "Cleaned text too short to narrate"
            );
            return Err(SpeechServiceError::InsufficientContent);
        }

        tracing::info!(
            html_length = html.len(),
            cleaned_length = cleaned_text.len(),
            "Text cleaned"
        );

        // 5. Synthesize
        let audio_data = self
            .tts_repo
            .synthesize(cleaned_text, &request.voice_id, &request.language_code)
            .await
            .map_err(SpeechServiceError::Synthesis)?;

        tracing::info!(
            url = %request.url,
            audio_size_bytes = audio_data.len(),
            latency_ms = start_time.elapsed().as_millis(),
            "Narration completed"
        );

        Ok(audio_data)
    }
}
