use serde::Serialize;

pub const DEFAULT_VOICE_ID: &str = "Joanna";
pub const DEFAULT_LANGUAGE_CODE: &str = "en-US";

/// A voice the front-end offers, with the language it speaks.
///
/// Serialized with the same field names a speech request uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoiceOption {
    pub label: &'static str,
    #[serde(rename = "voiceId")]
    pub voice_id: &'static str,
    #[serde(rename = "language")]
    pub language_code: &'static str,
}

/// Voices offered by the web front-end
pub const VOICE_OPTIONS: &[VoiceOption] = &[
    VoiceOption {
        label: "Joanna (English US)",
        voice_id: "Joanna",
        language_code: "en-US",
    },
    VoiceOption {
        label: "Matthew (English US)",
        voice_id: "Matthew",
        language_code: "en-US",
    },
    VoiceOption {
        label: "Lucia (Spanish Spain)",
        voice_id: "Lucia",
        language_code: "es-ES",
    },
    VoiceOption {
        label: "Celine (French)",
        voice_id: "Celine",
        language_code: "fr-FR",
    },
];

/// Check if a voice supports neural engine
pub fn is_voice_neural_compatible(voice: &str) -> bool {
    // Based on AWS Polly documentation
    const NEURAL_VOICES: &[&str] = &[
        // English
        "Joanna", "Matthew", "Ivy", "Kendra", "Kimberly", "Salli", "Joey", "Justin", "Kevin",
        "Amy", "Brian", "Emma", // Spanish
        "Lucia", "Sergio", "Lupe", "Pedro", // French
        "Lea", "Remi", // German
        "Vicki", "Daniel", // Italian
        "Bianca", "Adriano", // Portuguese
        "Ines", "Camila", "Vitoria", "Thiago",
    ];

    NEURAL_VOICES.contains(&voice)
}
