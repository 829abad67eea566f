use std::time::Duration;

use uuid::Uuid;

pub mod entities;
pub mod services;

#[derive(Clone, Debug)]
pub struct BitewiseConfig {
    pub llm: LLMConfig,
    pub fallback: FallbackConfig,
}

#[derive(Clone, Debug)]
pub struct LLMConfig {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub vision_timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct FallbackConfig {
    pub enabled: bool,
    pub default_language: String,
    pub lookup_timeout: Duration,
    pub open_food_facts_base_url: String,
    pub translate_base_url: String,
    pub tesseract_binary: String,
    pub ocr_timeout: Duration,
}

/// Correlation id attached to the tracing span of one analysis.
pub fn generate_uuid_v7() -> Uuid {
    Uuid::now_v7()
}
