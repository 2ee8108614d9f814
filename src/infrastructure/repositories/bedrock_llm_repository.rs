use super::llm_repository::{LlmError, LlmRepository};
use async_trait::async_trait;
use aws_sdk_bedrockruntime::{
    config::{retry::RetryConfig, Region},
    error::DisplayErrorContext,
    primitives::Blob,
    Client as BedrockClient,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    anthropic_version: &'static str,
    messages: Vec<Message<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Build the Bedrock runtime client from the shared AWS config.
///
/// SDK-level retries are disabled: throttling is retried by the cleaner's
/// `RetryPolicy`, which owns the attempt budget and the backoff.
pub fn create_bedrock_client(sdk_config: &aws_config::SdkConfig, region: &str) -> BedrockClient {
    let config = aws_sdk_bedrockruntime::config::Builder::from(sdk_config)
        .region(Region::new(region.to_string()))
        .retry_config(RetryConfig::disabled())
        .build();

    BedrockClient::from_conf(config)
}

/// Amazon Bedrock (Anthropic Claude messages API) implementation of LLM repository
pub struct BedrockLlmRepository {
    bedrock_client: Arc<BedrockClient>,
    model_id: String,
    max_tokens: u32,
    temperature: f32,
}

impl BedrockLlmRepository {
    pub fn new(
        bedrock_client: Arc<BedrockClient>,
        model_id: String,
        max_tokens: u32,
        temperature: f32,
    ) -> Self {
        Self {
            bedrock_client,
            model_id,
            max_tokens,
            temperature,
        }
    }

    fn build_body(&self, prompt: &str) -> Result<Vec<u8>, LlmError> {
        let request = MessagesRequest {
            anthropic_version: ANTHROPIC_VERSION,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        serde_json::to_vec(&request)
            .map_err(|e| LlmError::Service(format!("Failed to encode Bedrock request: {}", e)))
    }
}

/// Join the text blocks of a messages API response
fn extract_text(body: &[u8]) -> Result<String, LlmError> {
    let response: MessagesResponse = serde_json::from_slice(body)
        .map_err(|e| LlmError::Service(format!("Failed to parse Bedrock response: {}", e)))?;

    let text = response
        .content
        .into_iter()
        .filter(|block| block.kind == "text")
        .filter_map(|block| block.text)
        .collect::<Vec<_>>()
        .join(" ");

    if text.trim().is_empty() {
        return Err(LlmError::Service(
            "Bedrock response missing usable text".to_string(),
        ));
    }

    Ok(text)
}

#[async_trait]
impl LlmRepository for BedrockLlmRepository {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let start_time = std::time::Instant::now();
        let body = self.build_body(prompt)?;

        tracing::debug!(
            model_id = %self.model_id,
            prompt_length = prompt.len(),
            "Calling Bedrock invoke_model"
        );

        let output = self
            .bedrock_client
            .invoke_model()
            .model_id(&self.model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(body))
            .send()
            .await
            .map_err(|e| {
                let throttled = e
                    .as_service_error()
                    .map(|se| se.is_throttling_exception())
                    .unwrap_or(false);
                let message = format!("{}", DisplayErrorContext(&e));
                if throttled {
                    LlmError::Throttled(message)
                } else {
                    tracing::error!(
                        error = %message,
                        model_id = %self.model_id,
                        "Bedrock invoke_model failed"
                    );
                    LlmError::Service(message)
                }
            })?;

        let text = extract_text(output.body().as_ref())?;

        tracing::debug!(
            model_id = %self.model_id,
            latency_ms = start_time.elapsed().as_millis(),
            output_length = text.len(),
            "Bedrock invoke_model completed"
        );

        Ok(text)
    }
}
