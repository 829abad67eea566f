use tracing::{Instrument, info, info_span, instrument, warn};

use crate::domain::{
    common::{entities::app_errors::CoreError, generate_uuid_v7, services::Service},
    food_analysis::{
        entities::{AnalysisResult, IngredientToken},
        ingredients::extract_ingredients,
        merger::combine_analysis_results,
        nutrition::fetch_nutrition_data,
        ports::{FoodAnalysisService, NutritionDatabase, OcrEngine, Translator, VisionClient},
        schema::{FOOD_ANALYSIS_PROMPT, get_food_analysis_schema},
        value_objects::{AnalyzeFoodInput, UpstreamAnalysis},
        vision::{VisionAnalysis, parse_vision_response},
    },
};

impl<V, O, N, T> Service<V, O, N, T>
where
    V: VisionClient,
    O: OcrEngine,
    N: NutritionDatabase,
    T: Translator,
{
    /// Primary path: one call to the vision model, parsed against the response schema.
    #[instrument(skip(self, input), fields(mime_type = %input.mime_type, bytes = input.image_data.len()))]
    async fn analyze_with_vision(&self, input: &AnalyzeFoodInput) -> Result<VisionAnalysis, CoreError> {
        let raw_response = self
            .vision_client
            .generate_with_image(
                FOOD_ANALYSIS_PROMPT.to_string(),
                input.image_data.to_vec(),
                input.mime_type.clone(),
                get_food_analysis_schema(),
            )
            .await?;

        let analysis = parse_vision_response(&raw_response)?;
        if analysis.is_inconclusive() {
            return Err(CoreError::InvalidVisionResponse(
                "response carried no assessment".to_string(),
            ));
        }

        Ok(analysis)
    }

    /// Fallback path: OCR, nutrition lookup and the local classifier. Never fails.
    #[instrument(skip(self, input), fields(language = %input.language))]
    async fn analyze_with_fallback(
        &self,
        input: &AnalyzeFoodInput,
    ) -> (UpstreamAnalysis, Vec<IngredientToken>) {
        let ingredients = extract_ingredients(&self.ocr_engine, input.image_data.clone()).await;

        let sample = fetch_nutrition_data(
            &self.nutrition_database,
            &self.translator,
            &ingredients,
            &input.language,
            &self.settings,
        )
        .await;

        let assessment = self.classifier.assess(&sample, &ingredients);
        (UpstreamAnalysis::Heuristic(assessment), ingredients)
    }
}

impl<V, O, N, T> FoodAnalysisService for Service<V, O, N, T>
where
    V: VisionClient,
    O: OcrEngine,
    N: NutritionDatabase,
    T: Translator,
{
    async fn analyze_food(&self, input: AnalyzeFoodInput) -> Result<AnalysisResult, CoreError> {
        let span = info_span!("analyze_food", analysis_id = %generate_uuid_v7());

        async move {
            let (upstream, ingredients) = match self.analyze_with_vision(&input).await {
                Ok(analysis) => {
                    info!("Vision analysis succeeded");
                    (UpstreamAnalysis::Vision(analysis), Vec::new())
                }
                Err(e) if self.settings.fallback_enabled => {
                    warn!(error = %e, "Vision analysis failed, using OCR fallback");
                    self.analyze_with_fallback(&input).await
                }
                Err(e) => {
                    warn!(error = %e, "Vision analysis failed and fallback is disabled");
                    return Err(e);
                }
            };

            Ok(combine_analysis_results(&upstream, &ingredients))
        }
        .instrument(span)
        .await
    }
}
