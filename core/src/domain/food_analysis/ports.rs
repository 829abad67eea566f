use std::future::Future;

use image::GrayImage;

use crate::domain::{
    common::entities::app_errors::CoreError,
    food_analysis::{
        entities::{AnalysisResult, NutritionSample},
        value_objects::AnalyzeFoodInput,
    },
};

/// Multimodal model client used by the primary analysis path
#[cfg_attr(test, mockall::automock)]
pub trait VisionClient: Send + Sync {
    fn generate_with_image(
        &self,
        prompt: String,
        image_data: Vec<u8>,
        mime_type: String,
        response_schema: serde_json::Value,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;
}

/// Text recognition engine fed with a binarized image
#[cfg_attr(test, mockall::automock)]
pub trait OcrEngine: Send + Sync {
    fn recognize_text(
        &self,
        image: GrayImage,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;
}

/// External food database keyed by a free-text query.
///
/// `Ok(None)` means the database answered but had no matching record.
#[cfg_attr(test, mockall::automock)]
pub trait NutritionDatabase: Send + Sync {
    fn lookup(
        &self,
        query: String,
    ) -> impl Future<Output = Result<Option<NutritionSample>, CoreError>> + Send;
}

#[cfg_attr(test, mockall::automock)]
pub trait Translator: Send + Sync {
    fn translate(
        &self,
        text: String,
        source_language: String,
        target_language: String,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;
}

/// Service trait for the food analysis pipeline
#[cfg_attr(test, mockall::automock)]
pub trait FoodAnalysisService: Send + Sync {
    fn analyze_food(
        &self,
        input: AnalyzeFoodInput,
    ) -> impl Future<Output = Result<AnalysisResult, CoreError>> + Send;
}
