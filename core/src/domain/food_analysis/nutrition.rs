use tokio::time::timeout;
use tracing::{debug, warn};

use crate::domain::food_analysis::{
    entities::{IngredientToken, NutritionSample},
    ports::{NutritionDatabase, Translator},
    value_objects::PipelineSettings,
};

pub const DEFAULT_QUERY: &str = "food";

/// Looks up per-100g nutrients for the first ingredient.
///
/// Total by construction: translation problems fall back to the untranslated term and
/// every lookup problem (timeout, transport, no record) yields
/// [`NutritionSample::FALLBACK`].
pub async fn fetch_nutrition_data<N, T>(
    nutrition_database: &N,
    translator: &T,
    ingredients: &[IngredientToken],
    language: &str,
    settings: &PipelineSettings,
) -> NutritionSample
where
    N: NutritionDatabase,
    T: Translator,
{
    let mut query = ingredients
        .first()
        .map(|token| token.as_str().to_string())
        .unwrap_or_else(|| DEFAULT_QUERY.to_string());

    if language != settings.default_language {
        let translation = timeout(
            settings.lookup_timeout,
            translator.translate(
                query.clone(),
                settings.default_language.clone(),
                language.to_string(),
            ),
        )
        .await;

        match translation {
            Ok(Ok(translated)) if !translated.trim().is_empty() => {
                debug!(language, translated = %translated, "Translated nutrition query");
                query = translated.trim().to_string();
            }
            Ok(Ok(_)) => warn!(language, "Translation came back empty, using original query"),
            Ok(Err(e)) => warn!(language, error = %e, "Translation failed, using original query"),
            Err(_) => warn!(language, "Translation timed out, using original query"),
        }
    }

    match timeout(settings.lookup_timeout, nutrition_database.lookup(query.clone())).await {
        Ok(Ok(Some(sample))) => sample,
        Ok(Ok(None)) => {
            warn!(query = %query, "No nutrition record found, using defaults");
            NutritionSample::FALLBACK
        }
        Ok(Err(e)) => {
            warn!(query = %query, error = %e, "Nutrition lookup failed, using defaults");
            NutritionSample::FALLBACK
        }
        Err(_) => {
            warn!(query = %query, "Nutrition lookup timed out, using defaults");
            NutritionSample::FALLBACK
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use mockall::predicate::eq;

    use super::*;
    use crate::domain::{
        common::entities::app_errors::CoreError,
        food_analysis::ports::{MockNutritionDatabase, MockTranslator},
    };

    fn settings() -> PipelineSettings {
        PipelineSettings {
            lookup_timeout: Duration::from_millis(50),
            ..PipelineSettings::default()
        }
    }

    fn tokens(raw: &[&str]) -> Vec<IngredientToken> {
        raw.iter().filter_map(|t| IngredientToken::parse(t)).collect()
    }

    #[tokio::test]
    async fn test_uses_first_token_as_query() {
        let mut database = MockNutritionDatabase::new();
        database
            .expect_lookup()
            .with(eq("oats".to_string()))
            .times(1)
            .returning(|_| Box::pin(async { Ok(Some(NutritionSample::new(1.0, 0.1, 2.0))) }));
        let mut translator = MockTranslator::new();
        translator.expect_translate().times(0);

        let sample = fetch_nutrition_data(
            &database,
            &translator,
            &tokens(&["oats", "honey"]),
            "en",
            &settings(),
        )
        .await;

        assert_eq!(sample, NutritionSample::new(1.0, 0.1, 2.0));
    }

    #[tokio::test]
    async fn test_empty_tokens_query_food() {
        let mut database = MockNutritionDatabase::new();
        database
            .expect_lookup()
            .with(eq("food".to_string()))
            .returning(|_| Box::pin(async { Ok(None) }));
        let translator = MockTranslator::new();

        let sample = fetch_nutrition_data(&database, &translator, &[], "en", &settings()).await;
        assert_eq!(sample, NutritionSample::FALLBACK);
    }

    #[tokio::test]
    async fn test_timeout_returns_exact_defaults() {
        let mut database = MockNutritionDatabase::new();
        database
            .expect_lookup()
            .returning(|_| {
                Box::pin(std::future::pending::<Result<Option<NutritionSample>, CoreError>>())
            });
        let translator = MockTranslator::new();

        let sample =
            fetch_nutrition_data(&database, &translator, &tokens(&["crisps"]), "en", &settings())
                .await;

        assert_eq!(sample.saturated_fat, 5.0);
        assert_eq!(sample.sodium, 1.2);
        assert_eq!(sample.sugar, 10.0);
    }

    #[tokio::test]
    async fn test_lookup_error_returns_defaults() {
        let mut database = MockNutritionDatabase::new();
        database.expect_lookup().returning(|_| {
            Box::pin(async { Err(CoreError::ExternalServiceError("HTTP 503".to_string())) })
        });
        let translator = MockTranslator::new();

        let sample = fetch_nutrition_data(&database, &translator, &[], "en", &settings()).await;
        assert_eq!(sample, NutritionSample::FALLBACK);
    }

    #[tokio::test]
    async fn test_translates_for_non_default_language() {
        let mut translator = MockTranslator::new();
        translator
            .expect_translate()
            .with(
                eq("bread".to_string()),
                eq("en".to_string()),
                eq("fr".to_string()),
            )
            .returning(|_, _, _| Box::pin(async { Ok("pain".to_string()) }));
        let mut database = MockNutritionDatabase::new();
        database
            .expect_lookup()
            .with(eq("pain".to_string()))
            .returning(|_| Box::pin(async { Ok(Some(NutritionSample::new(0.3, 0.5, 2.0))) }));

        let sample =
            fetch_nutrition_data(&database, &translator, &tokens(&["bread"]), "fr", &settings())
                .await;

        assert_eq!(sample, NutritionSample::new(0.3, 0.5, 2.0));
    }

    #[tokio::test]
    async fn test_translation_failure_keeps_original_term() {
        let mut translator = MockTranslator::new();
        translator.expect_translate().returning(|_, _, _| {
            Box::pin(async { Err(CoreError::ExternalServiceError("blocked".to_string())) })
        });
        let mut database = MockNutritionDatabase::new();
        database
            .expect_lookup()
            .with(eq("bread".to_string()))
            .times(1)
            .returning(|_| Box::pin(async { Ok(None) }));

        let sample =
            fetch_nutrition_data(&database, &translator, &tokens(&["bread"]), "hi", &settings())
                .await;

        assert_eq!(sample, NutritionSample::FALLBACK);
    }
}
