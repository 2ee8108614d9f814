use super::tts_repository::{split_into_batches, TtsRepository};
use crate::domain::speech::voice::is_voice_neural_compatible;
use async_trait::async_trait;
use aws_sdk_polly::{
    error::DisplayErrorContext,
    types::{Engine, LanguageCode, OutputFormat, VoiceId},
    Client as PollyClient,
};
use std::sync::Arc;

/// AWS Polly has a limit of 3000 characters per request
const MAX_BATCH_SIZE: usize = 3000;

/// AWS Polly implementation of TTS repository
pub struct PollyTtsRepository {
    polly_client: Arc<PollyClient>,
    prefer_neural: bool,
}

impl PollyTtsRepository {
    pub fn new(polly_client: Arc<PollyClient>, prefer_neural: bool) -> Self {
        Self {
            polly_client,
            prefer_neural,
        }
    }

    fn engine_for_voice(&self, voice_id: &str) -> Engine {
        if self.prefer_neural && is_voice_neural_compatible(voice_id) {
            Engine::Neural
        } else {
            Engine::Standard
        }
    }

    /// Call AWS Polly to synthesize a single text batch
    async fn call_polly(
        &self,
        text: &str,
        voice_id: &str,
        language_code: &str,
    ) -> Result<Vec<u8>, String> {
        let engine = self.engine_for_voice(voice_id);

        tracing::info!(
            voice = voice_id,
            language = language_code,
            engine = ?engine,
            output_format = "Mp3",
            text_length = text.len(),
            "Calling AWS Polly synthesize_speech"
        );

        let result = self
            .polly_client
            .synthesize_speech()
            .text(text)
            .voice_id(VoiceId::from(voice_id))
            .language_code(LanguageCode::from(language_code))
            .output_format(OutputFormat::Mp3)
            .engine(engine.clone())
            .send()
            .await
            .map_err(|e| {
                let message = format!("{}", DisplayErrorContext(&e));
                tracing::error!(
                    error = %message,
                    voice = voice_id,
                    language = language_code,
                    engine = ?engine,
                    text_length = text.len(),
                    "AWS Polly synthesize_speech failed"
                );
                format!("AWS Polly error: {}", message)
            })?;

        let audio_stream = result.audio_stream.collect().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to collect audio stream from Polly response");
            format!("Failed to read audio stream: {}", e)
        })?;

        let audio_bytes = audio_stream.into_bytes().to_vec();
        tracing::debug!(
            audio_size = audio_bytes.len(),
            "Audio stream collected successfully"
        );

        Ok(audio_bytes)
    }
}

#[async_trait]
impl TtsRepository for PollyTtsRepository {
    async fn synthesize(
        &self,
        text: &str,
        voice_id: &str,
        language_code: &str,
    ) -> Result<Vec<u8>, String> {
        let start_time = std::time::Instant::now();

        let batches = split_into_batches(text, MAX_BATCH_SIZE);
        tracing::info!(
            batch_count = batches.len(),
            text_length = text.len(),
            "Text split into batches"
        );

        // MP3 frames concatenate cleanly, so batches are merged in order
        let mut audio_data = Vec::new();
        for (index, batch) in batches.iter().enumerate() {
            let audio = self.call_polly(batch, voice_id, language_code).await?;
            audio_data.extend(audio);

            tracing::debug!(
                batch_index = index,
                total_audio_size = audio_data.len(),
                "Batch synthesized and merged"
            );
        }

        tracing::info!(
            provider = "polly",
            latency_ms = start_time.elapsed().as_millis(),
            characters_count = text.len(),
            batch_count = batches.len(),
            audio_size_bytes = audio_data.len(),
            "TTS synthesis completed"
        );

        Ok(audio_data)
    }
}
