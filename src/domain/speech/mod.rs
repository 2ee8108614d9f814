pub mod cleaner;
pub mod dto;
pub mod error;
pub mod retry;
pub mod service;
pub mod spa;
pub mod voice;

pub use cleaner::TextCleaner;
pub use dto::{SpeechRequest, SpeechResponse, SynthesisRequest};
pub use error::SpeechServiceError;
pub use retry::RetryPolicy;
pub use service::{SpeechService, SpeechServiceApi};
pub use voice::{VoiceOption, VOICE_OPTIONS};
