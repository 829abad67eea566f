use tracing::debug;

use crate::domain::food_analysis::{
    entities::{HealthScore, IngredientToken, NutritionSample},
    value_objects::HeuristicAssessment,
};

pub const FEATURE_COUNT: usize = 4;

const REGULARIZATION: f64 = 1.0;
const MAX_ITERATIONS: usize = 100;
const TOLERANCE: f64 = 1e-10;

/// Synthetic reference foods: saturated fat, sodium, sugar, whole-grain flag.
const TRAINING_FEATURES: [[f64; FEATURE_COUNT]; 4] = [
    [5.0, 1.2, 10.0, 0.0],
    [2.0, 0.5, 3.0, 1.0],
    [8.0, 1.5, 15.0, 0.0],
    [3.0, 0.7, 5.0, 1.0],
];
const TRAINING_LABELS: [f64; 4] = [0.0, 1.0, 0.0, 1.0];

const HEALTHY_ABOVE: f64 = 0.7;
const MODERATE_ABOVE: f64 = 0.3;

/// Binary logistic model scoring how likely a food is to be healthy.
///
/// Fitted once and read-only afterwards, so one instance can be shared by every
/// request without synchronization.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthClassifier {
    weights: [f64; FEATURE_COUNT],
    intercept: f64,
}

impl HealthClassifier {
    /// Fits the model on the built-in reference foods.
    pub fn fit_default() -> Self {
        Self::fit(&TRAINING_FEATURES, &TRAINING_LABELS)
    }

    /// L2-regularised logistic regression fitted with Newton's method. The intercept is
    /// treated as a constant feature and regularised with the weights.
    pub fn fit(features: &[[f64; FEATURE_COUNT]], labels: &[f64]) -> Self {
        const N: usize = FEATURE_COUNT + 1;
        let mut theta = [0.0f64; N];

        for _ in 0..MAX_ITERATIONS {
            let mut gradient = theta;
            let mut hessian = [[0.0f64; N]; N];
            for (i, row) in hessian.iter_mut().enumerate() {
                row[i] = 1.0;
            }

            for (x, y) in features.iter().zip(labels) {
                let augmented = augment(x);
                let p = sigmoid(dot(&theta, &augmented));
                let curvature = REGULARIZATION * p * (1.0 - p);

                for i in 0..N {
                    gradient[i] += REGULARIZATION * (p - y) * augmented[i];
                    for j in 0..N {
                        hessian[i][j] += curvature * augmented[i] * augmented[j];
                    }
                }
            }

            let Some(step) = solve(hessian, gradient) else {
                break;
            };
            for (value, delta) in theta.iter_mut().zip(step.iter()) {
                *value -= delta;
            }

            if step.iter().all(|delta| delta.abs() < TOLERANCE) {
                break;
            }
        }

        let mut weights = [0.0; FEATURE_COUNT];
        weights.copy_from_slice(&theta[..FEATURE_COUNT]);

        Self {
            weights,
            intercept: theta[FEATURE_COUNT],
        }
    }

    pub fn weights(&self) -> &[f64; FEATURE_COUNT] {
        &self.weights
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Probability of the positive ("healthy") class.
    pub fn predict_probability(&self, features: &[f64; FEATURE_COUNT]) -> f64 {
        sigmoid(dot(&self.weights, features) + self.intercept)
    }

    pub fn assess(&self, sample: &NutritionSample, ingredients: &[IngredientToken]) -> HeuristicAssessment {
        let features = feature_vector(sample, ingredients);
        let probability = self.predict_probability(&features);
        let health_score = tier_for_probability(probability);
        let warnings = nutrient_warnings(sample);

        debug!(probability, health_score = %health_score, "Heuristic classifier scored sample");

        let causes = if warnings.is_empty() {
            "balanced nutrition".to_string()
        } else {
            warnings.join(", ")
        };
        let reason = format!(
            "This food is {} due to {}.",
            health_score.as_str().to_lowercase(),
            causes
        );

        HeuristicAssessment {
            health_score,
            probability,
            reason,
            warnings,
        }
    }
}

pub fn feature_vector(sample: &NutritionSample, ingredients: &[IngredientToken]) -> [f64; FEATURE_COUNT] {
    let whole_grain = ingredients.iter().any(|token| token.contains("whole"));
    [
        sample.saturated_fat,
        sample.sodium,
        sample.sugar,
        if whole_grain { 1.0 } else { 0.0 },
    ]
}

pub fn tier_for_probability(probability: f64) -> HealthScore {
    if probability > HEALTHY_ABOVE {
        HealthScore::Healthy
    } else if probability > MODERATE_ABOVE {
        HealthScore::ModeratelyHealthy
    } else {
        HealthScore::Unhealthy
    }
}

pub fn nutrient_warnings(sample: &NutritionSample) -> Vec<String> {
    let mut warnings = Vec::new();
    if sample.saturated_fat > 5.0 {
        warnings.push("High saturated fat".to_string());
    }
    if sample.sodium > 1.0 {
        warnings.push("High sodium".to_string());
    }
    if sample.sugar > 8.0 {
        warnings.push("High sugar".to_string());
    }
    warnings
}

fn augment(x: &[f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT + 1] {
    let mut augmented = [1.0; FEATURE_COUNT + 1];
    augmented[..FEATURE_COUNT].copy_from_slice(x);
    augmented
}

fn dot<const L: usize>(a: &[f64; L], b: &[f64; L]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Gaussian elimination with partial pivoting; `None` for a singular system.
fn solve<const L: usize>(mut a: [[f64; L]; L], mut b: [f64; L]) -> Option<[f64; L]> {
    for col in 0..L {
        let pivot = (col..L).max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))?;
        if a[pivot][col].abs() < f64::EPSILON {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in 0..L {
            if row == col {
                continue;
            }
            let factor = a[row][col] / a[col][col];
            for k in col..L {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = [0.0; L];
    for i in 0..L {
        x[i] = b[i] / a[i][i];
    }
    Some(x)
}
