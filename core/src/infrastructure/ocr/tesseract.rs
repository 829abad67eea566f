//! Tesseract OCR backend.
//!
//! Runs the `tesseract` command-line tool on a temporary PNG and reads the text from
//! stdout.

use std::time::Duration;

use image::{GrayImage, ImageFormat};
use tempfile::NamedTempFile;
use tokio::process::Command;
use tracing::{debug, instrument};

use crate::domain::{
    common::{FallbackConfig, entities::app_errors::CoreError},
    food_analysis::ports::OcrEngine,
};

#[derive(Debug, Clone)]
pub struct TesseractOcrEngine {
    binary: String,
    timeout: Duration,
}

impl TesseractOcrEngine {
    pub fn new(binary: impl Into<String>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    pub fn from_config(config: &FallbackConfig) -> Self {
        Self::new(config.tesseract_binary.clone(), config.ocr_timeout)
    }

    async fn run_tesseract(&self, image: GrayImage) -> Result<String, CoreError> {
        // PNG encoding and the file write are blocking work.
        let input = tokio::task::spawn_blocking(move || write_temp_png(&image))
            .await
            .map_err(|e| CoreError::OcrFailed(format!("image export task failed: {}", e)))??;

        let output = Command::new(&self.binary)
            .arg(input.path())
            .arg("stdout")
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(self.timeout, output).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CoreError::OcrFailed(format!(
                    "{} not found (install tesseract-ocr)",
                    self.binary
                )));
            }
            Ok(Err(e)) => return Err(CoreError::OcrFailed(e.to_string())),
            Err(_) => {
                return Err(CoreError::OcrFailed(format!(
                    "{} timed out after {:?}",
                    self.binary, self.timeout
                )));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CoreError::OcrFailed(format!("tesseract failed: {}", stderr.trim())));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Writes the image to a temporary PNG that is removed when the handle drops.
fn write_temp_png(image: &GrayImage) -> Result<NamedTempFile, CoreError> {
    let file = tempfile::Builder::new()
        .prefix("bitewise-ocr-")
        .suffix(".png")
        .tempfile()
        .map_err(|e| CoreError::OcrFailed(format!("temporary file: {}", e)))?;

    image
        .save_with_format(file.path(), ImageFormat::Png)
        .map_err(|e| CoreError::OcrFailed(format!("could not write image: {}", e)))?;

    Ok(file)
}

impl OcrEngine for TesseractOcrEngine {
    #[instrument(skip(self, image), fields(width = image.width(), height = image.height()))]
    async fn recognize_text(&self, image: GrayImage) -> Result<String, CoreError> {
        let text = self.run_tesseract(image).await?;
        debug!(chars = text.len(), "Tesseract finished");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use image::Luma;

    use super::*;

    #[tokio::test]
    async fn test_missing_binary_is_reported() {
        let engine = TesseractOcrEngine::new(
            "bitewise-no-such-tesseract-binary",
            Duration::from_secs(5),
        );
        let image = GrayImage::from_pixel(8, 8, Luma([255]));

        let err = engine.recognize_text(image).await.unwrap_err();
        assert!(matches!(err, CoreError::OcrFailed(message) if message.contains("not found")));
    }

    #[test]
    fn test_temp_png_round_trips_and_is_removed() {
        let image = GrayImage::from_fn(6, 3, |x, _| Luma([if x % 2 == 0 { 0 } else { 255 }]));

        let file = write_temp_png(&image).unwrap();
        let path = file.path().to_path_buf();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("png"));
        assert_eq!(image::open(&path).unwrap().to_luma8(), image);

        drop(file);
        assert!(!path.exists());
    }
}
