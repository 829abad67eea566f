use std::sync::Arc;

use reqwest::Client;
use tracing::info;

use crate::{
    domain::{
        common::{BitewiseConfig, entities::app_errors::CoreError, services::Service},
        food_analysis::{classifier::HealthClassifier, value_objects::PipelineSettings},
    },
    infrastructure::{
        llm::gemini_client::GeminiLLMClient, nutrition::open_food_facts::OpenFoodFactsClient,
        ocr::tesseract::TesseractOcrEngine, translation::google_translate::GoogleTranslateClient,
    },
};

pub type BitewiseService =
    Service<GeminiLLMClient, TesseractOcrEngine, OpenFoodFactsClient, GoogleTranslateClient>;

pub fn create_service(config: BitewiseConfig) -> Result<BitewiseService, CoreError> {
    let vision_client = GeminiLLMClient::new(&config.llm)?;
    let ocr_engine = TesseractOcrEngine::from_config(&config.fallback);

    // Translation and nutrition lookups share one pooled client bounded by the lookup timeout.
    let lookup_client = Client::builder()
        .timeout(config.fallback.lookup_timeout)
        .build()
        .map_err(|e| CoreError::ExternalServiceError(format!("HTTP client error: {}", e)))?;
    let nutrition_database =
        OpenFoodFactsClient::new(&config.fallback.open_food_facts_base_url, lookup_client.clone());
    let translator = GoogleTranslateClient::new(&config.fallback.translate_base_url, lookup_client);

    let classifier = HealthClassifier::fit_default();
    info!(
        weights = ?classifier.weights(),
        intercept = classifier.intercept(),
        "Health classifier fitted"
    );

    if config.llm.gemini_api_key.trim().is_empty() {
        info!("GEMINI_API_KEY is empty, every request will use the OCR fallback");
    }

    Ok(Service::new(
        vision_client,
        ocr_engine,
        nutrition_database,
        translator,
        Arc::new(classifier),
        PipelineSettings::from(&config.fallback),
    ))
}
