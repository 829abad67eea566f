use crate::domain::food_analysis::{
    entities::{
        AnalysisResult, IngredientToken, NO_ALLERGENS_SENTINEL, NO_DISEASE_RISK_SENTINEL,
        NO_WARNINGS_SENTINEL, NutrientValues,
    },
    value_objects::UpstreamAnalysis,
};

pub const DEFAULT_REASON: &str = "Analysis provided by AI.";

pub const DEFAULT_SUGGESTIONS: [&str; 5] = [
    "Quinoa salad (vegetarian)",
    "Lentil soup (vegetarian)",
    "Grilled chicken (non-vegetarian)",
    "Fish curry (non-vegetarian)",
    "Eat a balanced diet and consult a nutritionist.",
];

pub const ALLERGEN_KEYWORDS: [&str; 8] = [
    "peanut", "gluten", "milk", "egg", "soy", "wheat", "nut", "lactose",
];

const DIABETES: &str = "Diabetes";
const HEART_DISEASE: &str = "Heart Disease";
const OBESITY: &str = "Obesity";

/// Builds the single response returned to the caller. Pure: identical inputs always
/// produce identical output.
pub fn combine_analysis_results(
    upstream: &UpstreamAnalysis,
    ingredients: &[IngredientToken],
) -> AnalysisResult {
    let (health_score, reason, warnings, allergens, disease_risk, suggestions, nutrient_values) =
        match upstream {
            UpstreamAnalysis::Vision(vision) => (
                vision.health_score,
                vision.reason.clone(),
                vision.warnings.clone(),
                vision.allergens.clone(),
                vision.disease_risk.clone(),
                vision.suggestions.clone(),
                vision.nutrient_values.clone(),
            ),
            UpstreamAnalysis::Heuristic(assessment) => (
                assessment.health_score,
                Some(assessment.reason.clone()),
                assessment.warnings.clone(),
                Vec::new(),
                Vec::new(),
                Vec::new(),
                NutrientValues::default(),
            ),
        };

    let reason = reason
        .map(|reason| reason.trim().to_string())
        .filter(|reason| !reason.is_empty())
        .unwrap_or_else(|| DEFAULT_REASON.to_string());

    let suggestions = if suggestions.is_empty() {
        DEFAULT_SUGGESTIONS.iter().map(|s| s.to_string()).collect()
    } else {
        suggestions
    };

    let warnings = dedup(warnings.into_iter().filter(|w| w != NO_WARNINGS_SENTINEL));

    let mut allergens = dedup(allergens.into_iter().filter(|a| !is_allergen_sentinel(a)));
    for finding in detect_allergens(ingredients) {
        if !allergens.iter().any(|known| known.eq_ignore_ascii_case(&finding)) {
            allergens.push(finding);
        }
    }

    let disease_risk = dedup(disease_risk);
    let disease_risk = if disease_risk.is_empty() {
        derive_disease_risk(&warnings, &nutrient_values)
    } else {
        disease_risk
    };

    AnalysisResult {
        health_score,
        reason,
        warnings: or_sentinel(warnings, NO_WARNINGS_SENTINEL),
        allergens: or_sentinel(allergens, NO_ALLERGENS_SENTINEL),
        disease_risk,
        suggestions,
        nutrient_values,
    }
}

/// Allergen keywords found as substrings of any ingredient, in keyword order.
pub fn detect_allergens(ingredients: &[IngredientToken]) -> Vec<String> {
    ALLERGEN_KEYWORDS
        .iter()
        .filter(|keyword| ingredients.iter().any(|token| token.contains(keyword)))
        .map(|keyword| keyword.to_string())
        .collect()
}

/// Baseline sentinel plus the conditions suggested by warnings and nutrient estimates.
pub fn derive_disease_risk(warnings: &[String], nutrients: &NutrientValues) -> Vec<String> {
    let mentions = |needle: &str| {
        warnings
            .iter()
            .any(|warning| warning.to_lowercase().contains(needle))
    };

    let mut risks = vec![NO_DISEASE_RISK_SENTINEL.to_string()];
    if mentions("sugar") || parse_nutrient_amount(&nutrients.carbohydrates) > 20.0 {
        risks.push(DIABETES.to_string());
    }
    if mentions("fat") || parse_nutrient_amount(&nutrients.fat) > 10.0 {
        risks.push(HEART_DISEASE.to_string());
    }
    if parse_nutrient_amount(&nutrients.calories) > 500.0 {
        risks.push(OBESITY.to_string());
    }
    risks
}

/// Leading numeric part of a unit-suffixed value (`"20g"`, `"120 kcal"`, `"1,200 kcal"`).
/// Anything without a leading number, such as `"N/A"`, counts as 0.
pub fn parse_nutrient_amount(value: &str) -> f64 {
    let chars: Vec<char> = value.trim().chars().collect();
    let mut number = String::new();

    for (i, &c) in chars.iter().enumerate() {
        // Thousands separator: a comma after a digit followed by exactly three digits.
        let grouping_comma = c == ','
            && i > 0
            && chars[i - 1].is_ascii_digit()
            && chars.len() >= i + 4
            && chars[i + 1..i + 4].iter().all(char::is_ascii_digit)
            && !chars.get(i + 4).is_some_and(char::is_ascii_digit);

        if c.is_ascii_digit() || c == '.' || (i == 0 && c == '-') {
            number.push(c);
        } else if !grouping_comma {
            break;
        }
    }

    number.parse::<f64>().unwrap_or(0.0)
}

fn is_allergen_sentinel(value: &str) -> bool {
    value == NO_ALLERGENS_SENTINEL || value == NO_DISEASE_RISK_SENTINEL
}

fn dedup(values: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::new();
    for value in values {
        if !unique.contains(&value) {
            unique.push(value);
        }
    }
    unique
}

fn or_sentinel(values: Vec<String>, sentinel: &str) -> Vec<String> {
    if values.is_empty() {
        vec![sentinel.to_string()]
    } else {
        values
    }
}
