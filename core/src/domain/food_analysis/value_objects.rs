use std::time::Duration;

use bytes::Bytes;

use crate::domain::{
    common::FallbackConfig,
    food_analysis::{entities::HealthScore, vision::VisionAnalysis},
};

#[derive(Debug, Clone)]
pub struct AnalyzeFoodInput {
    pub image_data: Bytes,
    pub mime_type: String,
    pub language: String,
}

pub const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

impl AnalyzeFoodInput {
    /// Keeps a declared `image/*` type, otherwise sniffs the bytes and falls back to JPEG.
    pub fn new(image_data: Bytes, declared_mime: Option<&str>, language: impl Into<String>) -> Self {
        let mime_type = declared_mime
            .map(str::trim)
            .filter(|mime| mime.starts_with("image/"))
            .map(str::to_string)
            .or_else(|| detect_image_mime(&image_data).map(str::to_string))
            .unwrap_or_else(|| DEFAULT_IMAGE_MIME.to_string());

        Self {
            image_data,
            mime_type,
            language: language.into(),
        }
    }
}

pub fn detect_image_mime(data: &[u8]) -> Option<&'static str> {
    image::guess_format(data)
        .ok()
        .map(|format| format.to_mime_type())
}

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub fallback_enabled: bool,
    pub default_language: String,
    pub lookup_timeout: Duration,
}

impl From<&FallbackConfig> for PipelineSettings {
    fn from(config: &FallbackConfig) -> Self {
        Self {
            fallback_enabled: config.enabled,
            default_language: config.default_language.clone(),
            lookup_timeout: config.lookup_timeout,
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            fallback_enabled: true,
            default_language: "en".to_string(),
            lookup_timeout: Duration::from_secs(5),
        }
    }
}

/// Outcome of the local classifier on the fallback path.
#[derive(Debug, Clone, PartialEq)]
pub struct HeuristicAssessment {
    pub health_score: HealthScore,
    pub probability: f64,
    pub reason: String,
    pub warnings: Vec<String>,
}

/// Whichever upstream analysis produced a result for the merger.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamAnalysis {
    Vision(VisionAnalysis),
    Heuristic(HeuristicAssessment),
}
