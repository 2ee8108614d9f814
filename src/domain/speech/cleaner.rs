use super::retry::RetryPolicy;
use crate::infrastructure::repositories::{LlmError, LlmRepository};
use futures::future::try_join_all;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Largest slice of raw HTML sent to the LLM in one request
pub const DEFAULT_CHUNK_SIZE: usize = 4000;
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

const CLEANUP_INSTRUCTIONS: &str = "You are given raw HTML content of a webpage. \
Your task is to extract and structure only the meaningful visible text content suitable for natural speech reading. \
Ensure proper punctuation (commas, periods, etc.). \
Remove any navigation, footer, ads, or irrelevant elements. \
IMPORTANT: Your response must contain ONLY the cleaned text of the webpage. \
Do not include any explanations, descriptions, or notes about what you did. \
Do not say things like 'Here is the extracted text' or anything similar. \
Just output the plain cleaned text, nothing else.";

/// Split `html` into consecutive slices of at most `max_chars` characters.
///
/// Slices never cut through a UTF-8 code point and concatenate back to the
/// original input.
pub fn split_into_chunks(html: &str, max_chars: usize) -> Vec<&str> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;

    for (index, _) in html.char_indices() {
        if count == max_chars {
            chunks.push(&html[start..index]);
            start = index;
            count = 0;
        }
        count += 1;
    }

    if start < html.len() {
        chunks.push(&html[start..]);
    }

    chunks
}

pub fn build_prompt(html_chunk: &str) -> String {
    format!("{}\n\n{}", CLEANUP_INSTRUCTIONS, html_chunk)
}

/// Turns raw HTML into speakable plain text through an LLM
pub struct TextCleaner {
    llm_repo: Arc<dyn LlmRepository>,
    chunk_size: usize,
    max_concurrency: usize,
    retry_policy: RetryPolicy,
}

impl TextCleaner {
    pub fn new(llm_repo: Arc<dyn LlmRepository>) -> Self {
        Self {
            llm_repo,
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            retry_policy: RetryPolicy::default(),
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// Clean the whole document.
    ///
    /// Chunks are processed concurrently (bounded by `max_concurrency`) and
    /// their outputs joined with a single space in document order. The first
    /// chunk that fails permanently aborts the whole clean.
    pub async fn clean(&self, html: &str) -> Result<String, LlmError> {
        let chunks = split_into_chunks(html, self.chunk_size);
        let chunk_count = chunks.len();
        tracing::info!(
            chunk_count,
            chunk_size = self.chunk_size,
            html_length = html.len(),
            "HTML split into chunks"
        );

        let permits = Semaphore::new(self.max_concurrency);
        let tasks = chunks.into_iter().enumerate().map(|(index, chunk)| {
            let permits = &permits;
            async move {
                let _permit = permits
                    .acquire()
                    .await
                    .map_err(|e| LlmError::Service(e.to_string()))?;
                self.clean_chunk(index, chunk_count, chunk).await
            }
        });

        // try_join_all keeps input order and drops the rest on first error
        let cleaned_parts = try_join_all(tasks).await?;

        Ok(cleaned_parts.join(" "))
    }

    async fn clean_chunk(
        &self,
        index: usize,
        chunk_count: usize,
        chunk: &str,
    ) -> Result<String, LlmError> {
        let prompt = build_prompt(chunk);

        let result = self
            .retry_policy
            .run(|attempt| {
                tracing::debug!(chunk_index = index, chunk_count, attempt, "Cleaning chunk");
                self.llm_repo.complete(&prompt)
            })
            .await;

        match &result {
            Ok(text) => tracing::debug!(
                chunk_index = index,
                cleaned_length = text.len(),
                "Chunk cleaned"
            ),
            Err(e) => tracing::error!(
                chunk_index = index,
                error = %e,
                "Chunk cleanup failed"
            ),
        }

        result
    }
}
