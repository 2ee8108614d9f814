use crate::e2e::helpers;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use helpers::{
    aws_mocks,
    fakes::{FakeLlm, FakeTts, TtsCall},
    TestContext, CLEANED_ARTICLE, FAKE_AUDIO,
};
use hyper::StatusCode;
use page_narrator::infrastructure::repositories::{
    page_fetcher::BROWSER_USER_AGENT, BedrockLlmRepository, LlmRepository, PollyTtsRepository,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_narrate_a_server_rendered_page(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/api/speech", &json!({ "url": ctx.pages.url("/article") }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.audio(), "SUQzYXVkaW8=");
    assert_eq!(STANDARD.decode(response.audio()).unwrap(), FAKE_AUDIO);

    assert_eq!(ctx.pages.hits(), 1);
    assert_eq!(ctx.llm.call_count(), 1);
    assert_eq!(
        ctx.tts.calls(),
        vec![TtsCall {
            text: CLEANED_ARTICLE.to_string(),
            voice_id: "Joanna".to_string(),
            language_code: "en-US".to_string(),
        }]
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_fetch_pages_as_a_desktop_browser(ctx: &TestContext) {
    ctx.client
        .post("/api/speech", &json!({ "url": ctx.pages.url("/article") }))
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    assert_eq!(
        ctx.pages.last_user_agent().as_deref(),
        Some(BROWSER_USER_AGENT)
    );
    assert!(BROWSER_USER_AGENT.starts_with("Mozilla/5.0"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_send_the_page_html_inside_the_cleanup_prompt(ctx: &TestContext) {
    ctx.client
        .post("/api/speech", &json!({ "url": ctx.pages.url("/article") }))
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let prompts = ctx.llm.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("ONLY the cleaned text"));
    assert!(prompts[0].contains("Hello world repeated enough to pass length checks."));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_accept_a_gateway_envelope_with_string_body(ctx: &TestContext) {
    let inner = json!({
        "url": ctx.pages.url("/article"),
        "voiceId": "Lucia",
        "language": "es-ES"
    });

    let response = ctx
        .client
        .post("/api/speech", &json!({ "body": inner.to_string() }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let calls = ctx.tts.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].voice_id, "Lucia");
    assert_eq!(calls[0].language_code, "es-ES");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_serve_the_root_endpoint(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/", &json!({ "url": ctx.pages.url("/article"), "voiceId": "Matthew" }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(ctx.tts.calls()[0].voice_id, "Matthew");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_missing_url_without_network_calls(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/api/speech", &json!({ "voiceId": "Joanna" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Missing URL parameter");

    assert_eq!(ctx.pages.hits(), 0);
    assert_eq!(ctx.llm.call_count(), 0);
    assert_eq!(ctx.tts.call_count(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_malformed_json_as_missing_url(ctx: &TestContext) {
    let response = ctx.client.post_raw("/api/speech", "{not json").await.unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Missing URL parameter");
    assert_eq!(ctx.pages.hits(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_spa_shells_before_cleanup(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/api/speech", &json!({ "url": ctx.pages.url("/spa") }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY)
        .assert_error_message("single-page application");

    assert_eq!(ctx.pages.hits(), 1);
    assert_eq!(ctx.llm.call_count(), 0);
    assert_eq!(ctx.tts.call_count(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_long_pages_with_framework_markers(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/api/speech", &json!({ "url": ctx.pages.url("/react") }))
        .await
        .unwrap();

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(ctx.llm.call_count(), 0);
}

#[tokio::test]
async fn it_should_fail_when_the_page_times_out() {
    let ctx = TestContext::builder()
        .fetch_timeout(Duration::from_secs(1))
        .start()
        .await;

    let response = ctx
        .client
        .post("/api/speech", &json!({ "url": ctx.pages.url("/slow") }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_message("Error fetching page");
    assert_eq!(ctx.llm.call_count(), 0);
    assert_eq!(ctx.tts.call_count(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_fail_when_the_page_returns_an_error_status(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/api/speech", &json!({ "url": ctx.pages.url("/gone") }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_message("HTTP 404");
    assert_eq!(ctx.llm.call_count(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_fail_when_the_host_is_unreachable(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/api/speech", &json!({ "url": "http://127.0.0.1:9/nothing" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_message("Error fetching page");
}

#[tokio::test]
async fn it_should_reject_cleaned_text_that_is_too_short() {
    let ctx = TestContext::builder()
        .llm(FakeLlm::returning("   Menu. Login.   "))
        .start()
        .await;

    let response = ctx
        .client
        .post("/api/speech", &json!({ "url": ctx.pages.url("/article") }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY)
        .assert_error_message("Unable to extract meaningful text");
    assert_eq!(ctx.llm.call_count(), 1);
    assert_eq!(ctx.tts.call_count(), 0);
}

#[tokio::test]
async fn it_should_clean_every_chunk_of_a_long_page_in_order() {
    let ctx = TestContext::builder().start().await;

    let response = ctx
        .client
        .post("/api/speech", &json!({ "url": ctx.pages.url("/long") }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(ctx.llm.call_count(), 3);
    assert_eq!(
        ctx.tts.calls()[0].text,
        [CLEANED_ARTICLE; 3].join(" ")
    );
}

#[tokio::test]
async fn it_should_retry_throttled_cleanup_until_it_succeeds() {
    let ctx = TestContext::builder()
        .llm(FakeLlm::throttling(4, CLEANED_ARTICLE))
        .start()
        .await;

    let response = ctx
        .client
        .post("/api/speech", &json!({ "url": ctx.pages.url("/article") }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(ctx.llm.call_count(), 5);
    assert_eq!(ctx.tts.call_count(), 1);
}

#[tokio::test]
async fn it_should_give_up_after_five_throttled_attempts() {
    let ctx = TestContext::builder()
        .llm(FakeLlm::always_throttling())
        .start()
        .await;

    let response = ctx
        .client
        .post("/api/speech", &json!({ "url": ctx.pages.url("/article") }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_message("AI cleanup error");
    assert_eq!(ctx.llm.call_count(), 5);
    assert_eq!(ctx.tts.call_count(), 0);
}

#[tokio::test]
async fn it_should_not_retry_other_cleanup_failures() {
    let ctx = TestContext::builder()
        .llm(FakeLlm::failing("AccessDeniedException: no model access"))
        .start()
        .await;

    let response = ctx
        .client
        .post("/api/speech", &json!({ "url": ctx.pages.url("/article") }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_message("AccessDeniedException");
    assert_eq!(ctx.llm.call_count(), 1);
}

#[tokio::test]
async fn it_should_report_synthesis_failures() {
    let ctx = TestContext::builder()
        .tts(FakeTts::failing("Voice Nobody is not available"))
        .start()
        .await;

    let response = ctx
        .client
        .post(
            "/api/speech",
            &json!({ "url": ctx.pages.url("/article"), "voiceId": "Nobody" }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_message("Speech synthesis error");
    assert_eq!(ctx.tts.call_count(), 1);
}

#[tokio::test]
async fn it_should_surface_polly_outages_as_synthesis_errors() {
    let polly_client = Arc::new(aws_mocks::create_unreachable_polly_client());
    let ctx = TestContext::builder()
        .tts_repository(Arc::new(PollyTtsRepository::new(polly_client, false)))
        .start()
        .await;

    let response = ctx
        .client
        .post("/api/speech", &json!({ "url": ctx.pages.url("/article") }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_message("Speech synthesis error");
}

#[tokio::test]
async fn it_should_surface_bedrock_outages_as_cleanup_errors() {
    let bedrock_client = Arc::new(aws_mocks::create_unreachable_bedrock_client());
    let ctx = TestContext::builder()
        .llm_repository(Arc::new(BedrockLlmRepository::new(
            bedrock_client,
            "anthropic.claude-3-sonnet-20240229-v1:0".to_string(),
            2000,
            0.6,
        )))
        .start()
        .await;

    let response = ctx
        .client
        .post("/api/speech", &json!({ "url": ctx.pages.url("/article") }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_message("AI cleanup error");
    assert_eq!(ctx.tts.call_count(), 0);
}

#[tokio::test]
async fn it_should_call_bedrock_once_per_attempt_when_throttled() {
    let bedrock = aws_mocks::ThrottlingBedrock::start().await;
    let repo = BedrockLlmRepository::new(
        Arc::new(bedrock.client().await),
        "anthropic.claude-3-sonnet-20240229-v1:0".to_string(),
        2000,
        0.6,
    );

    let err = repo.complete("Clean this").await.unwrap_err();

    assert!(err.is_throttling());
    assert_eq!(bedrock.hits(), 1);
}

#[tokio::test]
async fn it_should_keep_throttled_bedrock_cleanup_within_five_calls() {
    let bedrock = aws_mocks::ThrottlingBedrock::start().await;
    let ctx = TestContext::builder()
        .llm_repository(Arc::new(BedrockLlmRepository::new(
            Arc::new(bedrock.client().await),
            "anthropic.claude-3-sonnet-20240229-v1:0".to_string(),
            2000,
            0.6,
        )))
        .start()
        .await;

    let response = ctx
        .client
        .post("/api/speech", &json!({ "url": ctx.pages.url("/article") }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_message("AI cleanup error");
    assert_eq!(bedrock.hits(), 5);
    assert_eq!(ctx.tts.call_count(), 0);
}
