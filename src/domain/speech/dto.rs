use super::error::SpeechServiceError;
use super::voice::{DEFAULT_LANGUAGE_CODE, DEFAULT_VOICE_ID};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Inbound payload for POST /api/speech, as sent by the front-end.
///
/// Decoded by hand from a JSON value since the payload may arrive flat or
/// wrapped in an envelope.
#[derive(Debug, Default)]
pub struct SpeechRequest {
    pub url: Option<String>,
    pub voice_id: Option<String>,
    pub language: Option<String>,
}

/// Response for a successful synthesis
#[derive(Debug, Serialize, Deserialize)]
pub struct SpeechResponse {
    /// Base64-encoded MP3
    pub audio: String,
}

/// A validated narration request
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    pub url: String,
    pub voice_id: String,
    pub language_code: String,
}

impl SpeechRequest {
    /// Decode a request that is either flat or wrapped in a gateway-style
    /// envelope whose `body` holds the JSON-encoded payload.
    pub fn from_envelope(event: &Value) -> Self {
        let fields = match event.get("body") {
            Some(Value::String(body)) if !body.trim().is_empty() => {
                match serde_json::from_str::<Value>(body) {
                    Ok(Value::Object(inner)) => Some(inner),
                    _ => None,
                }
            }
            Some(Value::Object(inner)) => Some(inner.clone()),
            _ => None,
        };

        match fields {
            Some(inner) => Self::from_fields(&inner),
            None => event
                .as_object()
                .map(Self::from_fields)
                .unwrap_or_default(),
        }
    }

    /// Decode raw request bytes; anything that is not JSON counts as an empty request
    pub fn from_bytes(bytes: &[u8]) -> Self {
        serde_json::from_slice::<Value>(bytes)
            .map(|event| Self::from_envelope(&event))
            .unwrap_or_default()
    }

    fn from_fields(fields: &Map<String, Value>) -> Self {
        let text = |key: &str| {
            fields
                .get(key)
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
        };

        Self {
            url: text("url"),
            voice_id: text("voiceId"),
            language: text("language"),
        }
    }

    /// Apply defaults and reject requests without a URL
    pub fn validate(self) -> Result<SynthesisRequest, SpeechServiceError> {
        let url = self
            .url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .ok_or_else(|| SpeechServiceError::Validation("Missing URL parameter".to_string()))?;

        let voice_id = self
            .voice_id
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_VOICE_ID.to_string());
        let language_code = self
            .language
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LANGUAGE_CODE.to_string());

        Ok(SynthesisRequest {
            url,
            voice_id,
            language_code,
        })
    }
}
