use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Multipart body of `POST /analyze`, as documented in the OpenAPI schema.
#[derive(Debug, Deserialize, ToSchema)]
#[allow(dead_code)]
pub struct AnalyzeFoodForm {
    /// Photo of the dish or of its ingredient label.
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
    /// Language of the ingredient label, e.g. `en` or `fr`.
    #[schema(example = "en")]
    pub language: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct AnalyzeFoodLanguage {
    #[validate(length(
        min = 2,
        max = 10,
        message = "language must be between 2 and 10 characters"
    ))]
    pub language: String,
}
