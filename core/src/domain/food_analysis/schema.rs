use serde_json::json;

/// Instruction sent with every image to the vision model.
pub const FOOD_ANALYSIS_PROMPT: &str = r#"Analyze the food in this image. Provide a detailed health analysis in a JSON format.
The JSON should have the following structure:
{
  "healthScore": "Healthy" | "Moderately Healthy" | "Unhealthy",
  "reason": "Brief explanation of why it's healthy/unhealthy.",
  "warnings": ["List of potential warnings, e.g., 'High in sugar', 'High in saturated fat', 'High in sodium', 'Processed food', 'Contains artificial ingredients'"],
  "allergens": ["List of common allergens detected or likely present (e.g., 'Gluten', 'Dairy', 'Nuts', 'Soy', 'Eggs')"],
  "diseaseRisk": ["List of potential disease risks based on the food, e.g., 'Diabetes', 'Heart Disease', 'Obesity', 'None detected'"],
  "suggestions": ["List of suggestions for healthier alternatives or portion control."],
  "nutrientValues": {
    "calories": "X kcal",
    "protein": "X g",
    "carbohydrates": "X g",
    "fat": "X g",
    "fiber": "X g"
  }
}
If you cannot confidently determine a specific value or list, use 'N/A' for values or an empty array for lists.
Focus on general health, common nutrient estimates based on visual identification, and identify potential disease risks (e.g., diabetes from high sugar, heart disease from high fat) linked to the food's appearance or common knowledge."#;

/// Returns the JSON schema for vision model responses
pub fn get_food_analysis_schema() -> serde_json::Value {
    let string_list = json!({
        "type": "array",
        "items": { "type": "string" }
    });

    json!({
        "type": "object",
        "properties": {
            "healthScore": {
                "type": "string",
                "enum": ["Healthy", "Moderately Healthy", "Unhealthy"]
            },
            "reason": { "type": "string" },
            "warnings": string_list,
            "allergens": string_list,
            "diseaseRisk": string_list,
            "suggestions": string_list,
            "nutrientValues": {
                "type": "object",
                "properties": {
                    "calories": { "type": "string" },
                    "protein": { "type": "string" },
                    "carbohydrates": { "type": "string" },
                    "fat": { "type": "string" },
                    "fiber": { "type": "string" }
                },
                "required": ["calories", "protein", "carbohydrates", "fat", "fiber"]
            }
        },
        "required": [
            "healthScore", "reason", "warnings", "allergens",
            "diseaseRisk", "suggestions", "nutrientValues"
        ]
    })
}
