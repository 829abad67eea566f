use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Vision analysis is not configured")]
    VisionUnavailable,

    #[error("External service error: {0}")]
    ExternalServiceError(String),

    #[error("Vision analysis failed: {0}")]
    InvalidVisionResponse(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("OCR failed: {0}")]
    OcrFailed(String),
}
