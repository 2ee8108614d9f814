use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use page_narrator::controllers::speech::SpeechController;
use page_narrator::domain::speech::{RetryPolicy, SpeechService, TextCleaner};
use page_narrator::infrastructure::config::{Config, LogFormat, TtsProvider};
use page_narrator::infrastructure::http::start_http_server;
use page_narrator::infrastructure::repositories::{
    create_bedrock_client, BedrockLlmRepository, HttpPageFetcher, OpenAiTtsRepository,
    PollyTtsRepository, TtsRepository,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting Page Narrator on {}:{}",
        config.host,
        config.port
    );

    let has_access_key = std::env::var("AWS_ACCESS_KEY_ID").is_ok();
    let has_secret_key = std::env::var("AWS_SECRET_ACCESS_KEY").is_ok();
    if !has_access_key || !has_secret_key {
        tracing::warn!("AWS credentials not found in environment variables. Will attempt to use other credential providers (instance metadata, etc.)");
    }

    let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.aws_region.clone()))
        .load()
        .await;

    // Bedrock model availability differs per region, so it may use its own
    let bedrock_client = Arc::new(create_bedrock_client(&aws_config, &config.bedrock_region));
    tracing::info!(
        region = %config.bedrock_region,
        model_id = %config.bedrock_model_id,
        "Bedrock client initialized"
    );

    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate repositories
    tracing::info!("Instantiating repositories...");
    let page_fetcher = Arc::new(HttpPageFetcher::new(Duration::from_secs(
        config.fetch_timeout_secs,
    ))?);
    let llm_repo = Arc::new(BedrockLlmRepository::new(
        bedrock_client,
        config.bedrock_model_id.clone(),
        config.llm_max_tokens,
        config.llm_temperature,
    ));
    let tts_repo: Arc<dyn TtsRepository> = match config.tts_provider {
        TtsProvider::Polly => {
            let polly_client = Arc::new(aws_sdk_polly::Client::new(&aws_config));
            tracing::info!(region = %config.aws_region, neural = config.polly_neural, "AWS Polly client initialized");
            Arc::new(PollyTtsRepository::new(polly_client, config.polly_neural))
        }
        TtsProvider::OpenAi => {
            let api_key = config
                .openai_api_key
                .clone()
                .ok_or("OPENAI_API_KEY is required when TTS_PROVIDER=openai")?;
            let openai_client = Arc::new(async_openai::Client::with_config(
                async_openai::config::OpenAIConfig::new().with_api_key(api_key),
            ));
            tracing::info!(model = %config.openai_tts_model, "OpenAI TTS client initialized");
            Arc::new(OpenAiTtsRepository::new(
                openai_client,
                config.openai_tts_model.clone(),
            ))
        }
    };

    // 2. Instantiate services
    tracing::info!("Instantiating services...");
    let text_cleaner = Arc::new(
        TextCleaner::new(llm_repo)
            .with_chunk_size(config.cleaner_chunk_size)
            .with_max_concurrency(config.cleaner_max_concurrency)
            .with_retry_policy(RetryPolicy::default()),
    );
    let speech_service = Arc::new(SpeechService::new(page_fetcher, text_cleaner, tts_repo));

    // 3. Instantiate controllers
    tracing::info!("Instantiating controllers...");
    let speech_controller = Arc::new(SpeechController::new(speech_service));

    start_http_server(config, speech_controller).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "page_narrator=debug,tower_http=debug".into());

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
