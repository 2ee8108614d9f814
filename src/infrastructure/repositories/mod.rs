pub mod bedrock_llm_repository;
pub mod llm_repository;
pub mod openai_tts_repository;
pub mod page_fetcher;
pub mod polly_tts_repository;
pub mod tts_repository;

pub use bedrock_llm_repository::{create_bedrock_client, BedrockLlmRepository};
pub use llm_repository::{LlmError, LlmRepository};
pub use openai_tts_repository::OpenAiTtsRepository;
pub use page_fetcher::{HttpPageFetcher, PageFetcher};
pub use polly_tts_repository::PollyTtsRepository;
pub use tts_repository::TtsRepository;
