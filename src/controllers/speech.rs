use axum::{body::Bytes, extract::State, Json};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::Arc;

use crate::{
    domain::speech::{SpeechRequest, SpeechResponse, SpeechService, SpeechServiceApi},
    error::AppResult,
};

pub struct SpeechController {
    speech_service: Arc<SpeechService>,
}

impl SpeechController {
    pub fn new(speech_service: Arc<SpeechService>) -> Self {
        Self { speech_service }
    }

    /// POST /api/speech - Narrate a webpage
    ///
    /// The body is read raw so that both flat payloads and `{"body": "<json>"}`
    /// envelopes are accepted, and malformed JSON still gets a JSON error.
    pub async fn synthesize(
        State(controller): State<Arc<SpeechController>>,
        body: Bytes,
    ) -> AppResult<Json<SpeechResponse>> {
        let request = SpeechRequest::from_bytes(&body).validate()?;

        let audio_data = controller.speech_service.narrate(&request).await?;

        Ok(Json(SpeechResponse {
            audio: STANDARD.encode(audio_data),
        }))
    }
}
