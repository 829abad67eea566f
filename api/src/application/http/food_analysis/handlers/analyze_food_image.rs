use axum::{
    extract::{
        Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::StatusCode,
};
use bytes::Bytes;
use tracing::{info, warn};
use validator::Validate;

use crate::application::http::{
    food_analysis::validators::{AnalyzeFoodForm, AnalyzeFoodLanguage},
    server::{
        api_entities::{
            api_error::{ApiError, ApiErrorResponse},
            response::Response,
        },
        app_state::AppState,
    },
};
use bitewise_core::domain::food_analysis::{
    entities::AnalysisResult, ports::FoodAnalysisService, value_objects::AnalyzeFoodInput,
};

pub const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024; // 10MB
/// Body limit for the whole multipart request; leaves room for boundaries and text fields.
pub const MAX_REQUEST_SIZE: usize = MAX_IMAGE_SIZE + 64 * 1024;

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(format!(
            "Image too large. Max size is {} bytes",
            MAX_IMAGE_SIZE
        ))
    } else {
        ApiError::BadRequest(format!("Failed to read multipart field: {}", e))
    }
}

#[utoipa::path(
    post,
    path = "/analyze",
    tag = "food-analysis",
    summary = "Analyze food from image",
    description = "Scores a food photo or ingredient label with the vision model, falling back to OCR and a local classifier when the model is unavailable",
    request_body(content = AnalyzeFoodForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, body = AnalysisResult),
        (status = 400, description = "No image provided or invalid language", body = ApiErrorResponse),
        (status = 413, description = "Image too large", body = ApiErrorResponse),
        (status = 500, description = "Analysis failed", body = ApiErrorResponse)
    ),
)]
pub async fn analyze_food_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response<AnalysisResult>, ApiError> {
    // A body that is not multipart cannot carry an image.
    let mut multipart = multipart.map_err(|rejection| {
        warn!(error = %rejection, "Analyze request is not multipart");
        ApiError::BadRequest("No image provided".to_string())
    })?;

    let mut image: Option<(Bytes, Option<String>)> = None;
    let mut language: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "image" => {
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(multipart_error)?;

                if data.len() > MAX_IMAGE_SIZE {
                    return Err(ApiError::PayloadTooLarge(format!(
                        "Image too large. Max size is {} bytes",
                        MAX_IMAGE_SIZE
                    )));
                }

                if !data.is_empty() {
                    image = Some((data, content_type));
                }
            }
            "language" => {
                let value = field.text().await.map_err(multipart_error)?;
                language = Some(value.trim().to_string()).filter(|value| !value.is_empty());
            }
            _ => {}
        }
    }

    let (image_data, content_type) = image.ok_or_else(|| {
        warn!("Analyze request without image");
        ApiError::BadRequest("No image provided".to_string())
    })?;

    let form = AnalyzeFoodLanguage {
        language: language.unwrap_or_else(|| state.args.fallback.default_language.clone()),
    };
    form.validate()
        .map_err(|e| ApiError::BadRequest(format!("Invalid language: {}", e)))?;

    let input = AnalyzeFoodInput::new(image_data, content_type.as_deref(), form.language);
    info!(
        mime_type = %input.mime_type,
        bytes = input.image_data.len(),
        language = %input.language,
        "Analyzing food image"
    );

    let result = state.service.analyze_food(input).await?;

    Ok(Response::OK(result))
}
