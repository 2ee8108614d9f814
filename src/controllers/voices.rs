use axum::Json;

use crate::domain::speech::{VoiceOption, VOICE_OPTIONS};

/// GET /api/voices - Voices the front-end offers
pub async fn list_voices() -> Json<&'static [VoiceOption]> {
    Json(VOICE_OPTIONS)
}
