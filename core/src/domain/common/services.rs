use std::sync::Arc;

use crate::domain::food_analysis::{
    classifier::HealthClassifier,
    ports::{NutritionDatabase, OcrEngine, Translator, VisionClient},
    value_objects::PipelineSettings,
};

/// Analysis service wired once at start-up and shared by every request.
///
/// Collaborators are plain values; the fitted classifier is shared behind an [`Arc`]
/// and never mutated after construction.
#[derive(Clone)]
pub struct Service<V, O, N, T>
where
    V: VisionClient,
    O: OcrEngine,
    N: NutritionDatabase,
    T: Translator,
{
    pub(crate) vision_client: V,
    pub(crate) ocr_engine: O,
    pub(crate) nutrition_database: N,
    pub(crate) translator: T,
    pub(crate) classifier: Arc<HealthClassifier>,
    pub(crate) settings: PipelineSettings,
}

impl<V, O, N, T> Service<V, O, N, T>
where
    V: VisionClient,
    O: OcrEngine,
    N: NutritionDatabase,
    T: Translator,
{
    pub fn new(
        vision_client: V,
        ocr_engine: O,
        nutrition_database: N,
        translator: T,
        classifier: Arc<HealthClassifier>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            vision_client,
            ocr_engine,
            nutrition_database,
            translator,
            classifier,
            settings,
        }
    }
}
