use serde::{Deserialize, Deserializer};

use crate::domain::{
    common::entities::app_errors::CoreError,
    food_analysis::entities::{HealthScore, NOT_AVAILABLE, NutrientValues},
};

/// Structured answer of the vision model. Every field is optional on the wire and
/// falls back to an empty value; only a non-object root or a mistyped list is rejected.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisionAnalysis {
    #[serde(default)]
    pub health_score: HealthScore,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub warnings: Vec<String>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub allergens: Vec<String>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub disease_risk: Vec<String>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub suggestions: Vec<String>,
    #[serde(default, deserialize_with = "lenient_nutrients")]
    pub nutrient_values: NutrientValues,
}

impl VisionAnalysis {
    /// A response carrying neither a tier nor an explanation says nothing usable.
    pub fn is_inconclusive(&self) -> bool {
        self.health_score == HealthScore::Unknown
            && self
                .reason
                .as_deref()
                .is_none_or(|reason| reason.trim().is_empty())
    }
}

/// Removes a surrounding Markdown code fence (```` ```json ```` or bare ```` ``` ````).
pub fn strip_code_fence(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        text = rest.strip_prefix("json").unwrap_or(rest);
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }

    text.trim()
}

/// Parses the model's textual answer into a [`VisionAnalysis`].
pub fn parse_vision_response(raw: &str) -> Result<VisionAnalysis, CoreError> {
    let body = strip_code_fence(raw);

    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| {
        tracing::error!("Failed to parse vision response: {}", e);
        CoreError::InvalidVisionResponse(format!("response is not JSON: {}", e))
    })?;

    if !value.is_object() {
        return Err(CoreError::InvalidVisionResponse(
            "response root is not an object".to_string(),
        ));
    }

    serde_json::from_value(value).map_err(|e| {
        tracing::error!("Invalid vision response shape: {}", e);
        CoreError::InvalidVisionResponse(format!("unexpected response shape: {}", e))
    })
}

fn nullable_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let list = Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(list
        .into_iter()
        .map(|entry| entry.trim().to_string())
        .filter(|entry| !entry.is_empty())
        .collect())
}

#[derive(Deserialize, Default)]
struct RawNutrients {
    calories: Option<serde_json::Value>,
    protein: Option<serde_json::Value>,
    carbohydrates: Option<serde_json::Value>,
    fat: Option<serde_json::Value>,
    fiber: Option<serde_json::Value>,
}

fn lenient_nutrients<'de, D>(deserializer: D) -> Result<NutrientValues, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawNutrients>::deserialize(deserializer)?.unwrap_or_default();

    Ok(NutrientValues {
        calories: nutrient_text(raw.calories, "kcal"),
        protein: nutrient_text(raw.protein, "g"),
        carbohydrates: nutrient_text(raw.carbohydrates, "g"),
        fat: nutrient_text(raw.fat, "g"),
        fiber: nutrient_text(raw.fiber, "g"),
    })
}

fn nutrient_text(value: Option<serde_json::Value>, unit: &str) -> String {
    match value {
        Some(serde_json::Value::String(text)) if !text.trim().is_empty() => {
            text.trim().to_string()
        }
        Some(serde_json::Value::Number(number)) => format!("{} {}", number, unit),
        _ => NOT_AVAILABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: &str = r#"{
        "healthScore": "Moderately Healthy",
        "reason": "Fried but portioned.",
        "warnings": ["High in saturated fat"],
        "allergens": ["Gluten"],
        "diseaseRisk": [],
        "suggestions": ["Bake instead of frying"],
        "nutrientValues": {
            "calories": "320 kcal",
            "protein": "12 g",
            "carbohydrates": "30 g",
            "fat": "18 g",
            "fiber": "2 g"
        }
    }"#;

    #[test]
    fn test_fenced_json_matches_raw_json() {
        let fenced = format!("```json\n{}\n```", RAW);

        let from_raw = parse_vision_response(RAW).unwrap();
        let from_fenced = parse_vision_response(&fenced).unwrap();

        assert_eq!(from_raw, from_fenced);
        assert_eq!(from_raw.health_score, HealthScore::ModeratelyHealthy);
        assert_eq!(from_raw.nutrient_values.calories, "320 kcal");
    }

    #[test]
    fn test_bare_fence_is_stripped() {
        let fenced = format!("```\n{}\n```", RAW);
        assert!(parse_vision_response(&fenced).is_ok());
    }

    #[test]
    fn test_strip_code_fence_leaves_plain_text() {
        assert_eq!(strip_code_fence("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let parsed = parse_vision_response("{}").unwrap();
        assert_eq!(parsed.health_score, HealthScore::Unknown);
        assert!(parsed.reason.is_none());
        assert!(parsed.warnings.is_empty());
        assert_eq!(parsed.nutrient_values, NutrientValues::default());
        assert!(parsed.is_inconclusive());
    }

    #[test]
    fn test_null_lists_and_numeric_nutrients() {
        let parsed = parse_vision_response(
            r#"{"healthScore": "Healthy", "warnings": null,
                "nutrientValues": {"calories": 120, "protein": "", "fat": 2.5}}"#,
        )
        .unwrap();

        assert!(parsed.warnings.is_empty());
        assert_eq!(parsed.nutrient_values.calories, "120 kcal");
        assert_eq!(parsed.nutrient_values.protein, "N/A");
        assert_eq!(parsed.nutrient_values.fat, "2.5 g");
        assert_eq!(parsed.nutrient_values.fiber, "N/A");
        assert!(!parsed.is_inconclusive());
    }

    #[test]
    fn test_non_json_is_rejected() {
        let err = parse_vision_response("I think this is a salad.").unwrap_err();
        assert!(matches!(err, CoreError::InvalidVisionResponse(_)));
    }

    #[test]
    fn test_non_object_root_is_rejected() {
        assert!(parse_vision_response("[1, 2, 3]").is_err());
    }

    #[test]
    fn test_mistyped_list_is_rejected() {
        assert!(parse_vision_response(r#"{"warnings": "too much sugar"}"#).is_err());
    }
}
