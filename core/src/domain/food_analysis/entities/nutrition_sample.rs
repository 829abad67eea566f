use serde::{Deserialize, Serialize};

/// Per-100g nutrients used by the heuristic classifier. Fields are never negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionSample {
    pub saturated_fat: f64,
    pub sodium: f64,
    pub sugar: f64,
}

impl NutritionSample {
    /// Substituted whenever the nutrition lookup cannot produce a record.
    pub const FALLBACK: NutritionSample = NutritionSample {
        saturated_fat: 5.0,
        sodium: 1.2,
        sugar: 10.0,
    };

    pub fn new(saturated_fat: f64, sodium: f64, sugar: f64) -> Self {
        Self {
            saturated_fat: non_negative(saturated_fat),
            sodium: non_negative(sodium),
            sugar: non_negative(sugar),
        }
    }
}

impl Default for NutritionSample {
    fn default() -> Self {
        Self::FALLBACK
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_negative_and_nan() {
        let sample = NutritionSample::new(-1.0, f64::NAN, 3.5);
        assert_eq!(sample.saturated_fat, 0.0);
        assert_eq!(sample.sodium, 0.0);
        assert_eq!(sample.sugar, 3.5);
    }

    #[test]
    fn test_default_is_fallback() {
        assert_eq!(NutritionSample::default(), NutritionSample::new(5.0, 1.2, 10.0));
    }
}
