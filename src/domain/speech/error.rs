use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum SpeechServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("Error fetching page: {0}")]
    Fetch(String),
    #[error("The requested page appears to be a single-page application (SPA) or contains little readable text")]
    SpaDetected,
    #[error("AI cleanup error: {0}")]
    Cleanup(String),
    #[error("Unable to extract meaningful text from the page after AI processing")]
    InsufficientContent,
    #[error("Speech synthesis error: {0}")]
    Synthesis(String),
}

impl From<SpeechServiceError> for AppError {
    fn from(err: SpeechServiceError) -> Self {
        match err {
            SpeechServiceError::Validation(msg) => AppError::BadRequest(msg),
            SpeechServiceError::SpaDetected | SpeechServiceError::InsufficientContent => {
                AppError::Unprocessable(err.to_string())
            }
            SpeechServiceError::Fetch(_)
            | SpeechServiceError::Cleanup(_)
            | SpeechServiceError::Synthesis(_) => AppError::ExternalService(err.to_string()),
        }
    }
}
