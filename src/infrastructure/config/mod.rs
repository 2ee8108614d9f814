use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub aws_region: String,
    pub log_format: LogFormat,
    // Page fetching
    pub fetch_timeout_secs: u64,
    // Bedrock cleanup
    pub bedrock_region: String,
    pub bedrock_model_id: String,
    pub llm_max_tokens: u32,
    pub llm_temperature: f32,
    pub cleaner_chunk_size: usize,
    pub cleaner_max_concurrency: usize,
    // Speech synthesis
    pub tts_provider: TtsProvider,
    pub polly_neural: bool,
    pub openai_api_key: Option<String>,
    pub openai_tts_model: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum TtsProvider {
    Polly,
    OpenAi,
}

impl TtsProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            TtsProvider::Polly => "polly",
            TtsProvider::OpenAi => "openai",
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let aws_region = env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string());

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            bedrock_region: env::var("BEDROCK_REGION").unwrap_or_else(|_| aws_region.clone()),
            aws_region,
            log_format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            fetch_timeout_secs: env::var("FETCH_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()?,
            bedrock_model_id: env::var("BEDROCK_MODEL_ID")
                .unwrap_or_else(|_| "anthropic.claude-3-sonnet-20240229-v1:0".to_string()),
            llm_max_tokens: env::var("LLM_MAX_TOKENS")
                .unwrap_or_else(|_| "2000".to_string())
                .parse()?,
            llm_temperature: env::var("LLM_TEMPERATURE")
                .unwrap_or_else(|_| "0.6".to_string())
                .parse()?,
            cleaner_chunk_size: env::var("CLEANER_CHUNK_SIZE")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()?,
            cleaner_max_concurrency: env::var("CLEANER_MAX_CONCURRENCY")
                .unwrap_or_else(|_| "4".to_string())
                .parse()?,
            tts_provider: match env::var("TTS_PROVIDER")
                .unwrap_or_else(|_| "polly".to_string())
                .to_lowercase()
                .as_str()
            {
                "openai" => TtsProvider::OpenAi,
                _ => TtsProvider::Polly,
            },
            polly_neural: env::var("POLLY_NEURAL")
                .map(|s| s.to_lowercase() == "true")
                .unwrap_or(false),
            openai_api_key: env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            openai_tts_model: env::var("OPENAI_TTS_MODEL").unwrap_or_else(|_| "tts-1".to_string()),
        };

        if config.cleaner_chunk_size == 0 {
            return Err("CLEANER_CHUNK_SIZE must be greater than zero".into());
        }
        if config.cleaner_max_concurrency == 0 {
            return Err("CLEANER_MAX_CONCURRENCY must be greater than zero".into());
        }
        if config.tts_provider == TtsProvider::OpenAi && config.openai_api_key.is_none() {
            return Err("OPENAI_API_KEY is required when TTS_PROVIDER=openai".into());
        }

        Ok(config)
    }
}
