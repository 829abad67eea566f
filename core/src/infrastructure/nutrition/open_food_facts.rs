use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::domain::{
    common::entities::app_errors::CoreError,
    food_analysis::{entities::NutritionSample, ports::NutritionDatabase},
};

/// Client for the Open Food Facts product search.
#[derive(Debug, Clone)]
pub struct OpenFoodFactsClient {
    base_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct Product {
    #[serde(default)]
    nutriments: serde_json::Map<String, serde_json::Value>,
}

impl OpenFoodFactsClient {
    pub fn new(base_url: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }
}

impl NutritionDatabase for OpenFoodFactsClient {
    #[instrument(skip(self))]
    async fn lookup(&self, query: String) -> Result<Option<NutritionSample>, CoreError> {
        let url = format!("{}/cgi/search.pl", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("search_terms", query.as_str()),
                ("search_simple", "1"),
                ("action", "process"),
                ("json", "1"),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CoreError::Timeout("nutrition lookup".to_string())
                } else {
                    CoreError::ExternalServiceError(format!("Open Food Facts error: {}", e))
                }
            })?;

        if !response.status().is_success() {
            return Err(CoreError::ExternalServiceError(format!(
                "Open Food Facts returned {}",
                response.status()
            )));
        }

        let body: SearchResponse = response.json().await.map_err(|e| {
            CoreError::ExternalServiceError(format!("Invalid Open Food Facts payload: {}", e))
        })?;

        body.products
            .first()
            .map(|product| sample_from_nutriments(&product.nutriments))
            .transpose()
    }
}

/// Reads the per-100g fields; absent fields count as 0, present but non-numeric
/// fields make the whole record unusable.
fn sample_from_nutriments(
    nutriments: &serde_json::Map<String, serde_json::Value>,
) -> Result<NutritionSample, CoreError> {
    let field = |key: &str| -> Result<f64, CoreError> {
        match nutriments.get(key) {
            None | Some(serde_json::Value::Null) => Ok(0.0),
            Some(serde_json::Value::Number(number)) => number
                .as_f64()
                .ok_or_else(|| CoreError::ExternalServiceError(format!("{} is not a number", key))),
            Some(serde_json::Value::String(text)) => text.trim().parse::<f64>().map_err(|_| {
                CoreError::ExternalServiceError(format!("{} is not a number: {}", key, text))
            }),
            Some(other) => Err(CoreError::ExternalServiceError(format!(
                "{} has unexpected value {}",
                key, other
            ))),
        }
    };

    Ok(NutritionSample::new(
        field("saturated-fat_100g")?,
        field("sodium_100g")?,
        field("sugars_100g")?,
    ))
}
