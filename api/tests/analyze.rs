use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::{
    TestServer,
    multipart::{MultipartForm, Part},
};
use bitewise_api::{
    application::http::server::http_server::{router, state},
    args::Args,
};
use clap::Parser;
use serde_json::Value;
use test_context::{AsyncTestContext, test_context};

// Every collaborator points at a closed local port or a missing binary, so the
// pipeline always lands on the deterministic fallback defaults.
fn offline_args(fallback_enabled: bool) -> Args {
    Args::parse_from([
        "bitewise-api",
        "--gemini-api-key",
        "test-key",
        "--gemini-base-url",
        "http://127.0.0.1:9",
        "--vision-timeout-secs",
        "2",
        "--open-food-facts-base-url",
        "http://127.0.0.1:9",
        "--translate-base-url",
        "http://127.0.0.1:9",
        "--lookup-timeout-secs",
        "1",
        "--tesseract-binary",
        "bitewise-missing-tesseract",
        "--fallback-enabled",
        if fallback_enabled { "true" } else { "false" },
    ])
}

fn test_server(args: Args) -> TestServer {
    let state = state(Arc::new(args)).unwrap();
    TestServer::new(router(state).unwrap()).unwrap()
}

struct OfflineApi {
    server: TestServer,
}

impl AsyncTestContext for OfflineApi {
    async fn setup() -> Self {
        Self {
            server: test_server(offline_args(true)),
        }
    }
}

fn image_form(language: Option<&str>) -> MultipartForm {
    let image = Part::bytes(b"not really a photo".to_vec())
        .file_name("meal.png")
        .mime_type("image/png");

    let form = MultipartForm::new().add_part("image", image);
    match language {
        Some(language) => form.add_text("language", language),
        None => form,
    }
}

#[test_context(OfflineApi)]
#[tokio::test]
async fn test_root_banner(ctx: &mut OfflineApi) {
    let response = ctx.server.get("/").await;

    response.assert_status_ok();
    response.assert_text("Bitewise Backend is running!");
}

#[test_context(OfflineApi)]
#[tokio::test]
async fn test_health_check(ctx: &mut OfflineApi) {
    let response = ctx.server.get("/health").await;

    response.assert_status_ok();
    response.assert_json(&serde_json::json!({ "status": "ok" }));
}

#[test_context(OfflineApi)]
#[tokio::test]
async fn test_missing_image_is_rejected(ctx: &mut OfflineApi) {
    let form = MultipartForm::new().add_text("language", "en");
    let response = ctx.server.post("/analyze").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&serde_json::json!({ "error": "No image provided" }));
}

#[test_context(OfflineApi)]
#[tokio::test]
async fn test_non_multipart_body_gets_json_error(ctx: &mut OfflineApi) {
    let empty = ctx.server.post("/analyze").await;
    empty.assert_status(StatusCode::BAD_REQUEST);
    empty.assert_json(&serde_json::json!({ "error": "No image provided" }));

    let plain_text = ctx.server.post("/analyze").text("language=en").await;
    plain_text.assert_status(StatusCode::BAD_REQUEST);
    plain_text.assert_json(&serde_json::json!({ "error": "No image provided" }));
}

#[tokio::test]
async fn test_router_can_be_built_repeatedly() {
    let first = test_server(offline_args(true));
    let second = test_server(offline_args(true));

    first.get("/health").await.assert_status_ok();
    second.get("/metrics").await.assert_status_ok();
}

#[test_context(OfflineApi)]
#[tokio::test]
async fn test_empty_image_counts_as_missing(ctx: &mut OfflineApi) {
    let form = MultipartForm::new().add_part("image", Part::bytes(Vec::new()).file_name("empty.jpg"));
    let response = ctx.server.post("/analyze").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[test_context(OfflineApi)]
#[tokio::test]
async fn test_invalid_language_is_rejected(ctx: &mut OfflineApi) {
    let response = ctx
        .server
        .post("/analyze")
        .multipart(image_form(Some("x")))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[test_context(OfflineApi)]
#[tokio::test]
async fn test_unreachable_collaborators_yield_fallback_result(ctx: &mut OfflineApi) {
    let response = ctx
        .server
        .post("/analyze")
        .multipart(image_form(Some("en")))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(body["healthScore"], "Unhealthy");
    assert_eq!(
        body["reason"],
        "This food is unhealthy due to High sodium, High sugar."
    );
    assert_eq!(body["warnings"], serde_json::json!(["High sodium", "High sugar"]));
    assert_eq!(body["allergens"], serde_json::json!(["None detected."]));
    assert_eq!(body["diseaseRisk"], serde_json::json!(["None detected", "Diabetes"]));
    assert_eq!(body["suggestions"].as_array().map(Vec::len), Some(5));
    assert_eq!(body["nutrientValues"]["calories"], "N/A");
}

#[test_context(OfflineApi)]
#[tokio::test]
async fn test_language_defaults_when_omitted(ctx: &mut OfflineApi) {
    let response = ctx.server.post("/analyze").multipart(image_form(None)).await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_vision_failure_without_fallback_is_a_server_error() {
    let server = test_server(offline_args(false));

    let response = server.post("/analyze").multipart(image_form(Some("en"))).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    let error = body["error"].as_str().unwrap_or_default();
    assert!(error.starts_with("Analysis failed: "), "{}", error);
}
