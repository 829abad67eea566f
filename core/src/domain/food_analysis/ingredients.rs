use std::sync::LazyLock;

use bytes::Bytes;
use image::{DynamicImage, GrayImage, ImageError, Luma};
use regex::Regex;
use tracing::{debug, warn};

use crate::domain::food_analysis::{entities::IngredientToken, ports::OcrEngine};

/// Cutoff used when the histogram has no separable foreground/background.
pub const BASE_THRESHOLD: u8 = 150;

static INGREDIENT_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;\n]").expect("separator pattern is valid"));

/// Reads the ingredient list printed on the photographed packaging.
///
/// Never fails: undecodable images, OCR errors and blank text all yield an empty list,
/// which callers treat as "no ingredient text found".
pub async fn extract_ingredients<O: OcrEngine>(
    ocr_engine: &O,
    image_data: Bytes,
) -> Vec<IngredientToken> {
    // Decoding and thresholding are CPU bound; keep them off the async workers.
    let binary = match tokio::task::spawn_blocking(move || decode_for_ocr(&image_data)).await {
        Ok(Ok(binary)) => binary,
        Ok(Err(e)) => {
            warn!(error = %e, "Image could not be decoded for OCR");
            return Vec::new();
        }
        Err(e) => {
            warn!(error = %e, "Image preprocessing task failed");
            return Vec::new();
        }
    };

    let text = match ocr_engine.recognize_text(binary).await {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "OCR produced no text");
            String::new()
        }
    };

    let tokens = parse_ingredients(&text);
    debug!(token_count = tokens.len(), "Ingredient tokens extracted");
    tokens
}

/// Decodes an encoded image and binarizes it for OCR.
pub fn decode_for_ocr(image_data: &[u8]) -> Result<GrayImage, ImageError> {
    let image = image::load_from_memory(image_data)?;
    Ok(preprocess_for_ocr(&image))
}

/// Grayscale followed by a global Otsu binarization.
pub fn preprocess_for_ocr(image: &DynamicImage) -> GrayImage {
    let mut gray = image.to_luma8();
    let threshold = otsu_threshold(&gray);

    for pixel in gray.pixels_mut() {
        *pixel = if pixel.0[0] > threshold {
            Luma([255])
        } else {
            Luma([0])
        };
    }

    gray
}

/// Threshold maximising the between-class variance of the intensity histogram.
pub fn otsu_threshold(gray: &GrayImage) -> u8 {
    let mut histogram = [0u64; 256];
    for pixel in gray.pixels() {
        histogram[pixel.0[0] as usize] += 1;
    }

    let total: u64 = histogram.iter().sum();
    if total == 0 {
        return BASE_THRESHOLD;
    }

    let weighted_total: f64 = histogram
        .iter()
        .enumerate()
        .map(|(level, count)| level as f64 * *count as f64)
        .sum();

    let mut background_weight = 0u64;
    let mut background_sum = 0f64;
    let mut best_variance = 0f64;
    let mut best_threshold = None;

    for (level, count) in histogram.iter().enumerate() {
        background_weight += count;
        if background_weight == 0 {
            continue;
        }
        let foreground_weight = total - background_weight;
        if foreground_weight == 0 {
            break;
        }

        background_sum += level as f64 * *count as f64;
        let background_mean = background_sum / background_weight as f64;
        let foreground_mean = (weighted_total - background_sum) / foreground_weight as f64;
        let variance = background_weight as f64
            * foreground_weight as f64
            * (background_mean - foreground_mean).powi(2);

        if variance > best_variance {
            best_variance = variance;
            best_threshold = Some(level as u8);
        }
    }

    best_threshold.unwrap_or(BASE_THRESHOLD)
}

/// Splits OCR text on commas, semicolons and newlines. Order and duplicates are kept.
pub fn parse_ingredients(text: &str) -> Vec<IngredientToken> {
    INGREDIENT_SEPARATORS
        .split(text)
        .filter_map(IngredientToken::parse)
        .collect()
}
