use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

pub const NO_WARNINGS_SENTINEL: &str = "No specific warnings detected.";
pub const NO_ALLERGENS_SENTINEL: &str = "None detected.";
pub const NO_DISEASE_RISK_SENTINEL: &str = "None detected";
pub const NOT_AVAILABLE: &str = "N/A";

/// Coarse health tier reported to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub enum HealthScore {
    #[serde(rename = "Healthy")]
    Healthy,
    #[serde(rename = "Moderately Healthy")]
    ModeratelyHealthy,
    #[serde(rename = "Unhealthy")]
    Unhealthy,
    #[default]
    #[serde(rename = "Unknown")]
    Unknown,
}

impl HealthScore {
    pub fn as_str(&self) -> &str {
        match self {
            HealthScore::Healthy => "Healthy",
            HealthScore::ModeratelyHealthy => "Moderately Healthy",
            HealthScore::Unhealthy => "Unhealthy",
            HealthScore::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for HealthScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for HealthScore {
    fn from(s: &str) -> Self {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "healthy" => HealthScore::Healthy,
            "moderatelyhealthy" => HealthScore::ModeratelyHealthy,
            "unhealthy" => HealthScore::Unhealthy,
            _ => HealthScore::Unknown,
        }
    }
}

// Model output is free text; anything outside the known tiers becomes Unknown.
impl<'de> Deserialize<'de> for HealthScore {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.as_deref().map(HealthScore::from).unwrap_or_default())
    }
}

/// Approximate nutrient values, each a unit-suffixed number or `"N/A"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NutrientValues {
    #[schema(example = "120 kcal")]
    pub calories: String,
    #[schema(example = "4 g")]
    pub protein: String,
    #[schema(example = "22 g")]
    pub carbohydrates: String,
    #[schema(example = "2 g")]
    pub fat: String,
    #[schema(example = "3 g")]
    pub fiber: String,
}

impl Default for NutrientValues {
    fn default() -> Self {
        Self {
            calories: NOT_AVAILABLE.to_string(),
            protein: NOT_AVAILABLE.to_string(),
            carbohydrates: NOT_AVAILABLE.to_string(),
            fat: NOT_AVAILABLE.to_string(),
            fiber: NOT_AVAILABLE.to_string(),
        }
    }
}

/// The canonical response of one analysis. Every collection is either populated or
/// carries its sentinel entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub health_score: HealthScore,
    pub reason: String,
    pub warnings: Vec<String>,
    pub allergens: Vec<String>,
    pub disease_risk: Vec<String>,
    pub suggestions: Vec<String>,
    pub nutrient_values: NutrientValues,
}
