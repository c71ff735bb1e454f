//! Retention-strength estimation per topic.

use crate::types::{Attempt, MasteryLevel};

const DEFAULT_PRIOR_STRENGTH: f64 = 0.5;
const PRIOR_WEIGHT: f64 = 0.7;
const OUTCOME_WEIGHT: f64 = 0.3;

/// Single-step exponential smoothing used on every progress update.
///
/// Cheaper than, and consistent with, the full history recompute below.
pub fn update_strength(prior_strength: Option<f64>, mastery: MasteryLevel) -> f64 {
    let prior = prior_strength.unwrap_or(DEFAULT_PRIOR_STRENGTH);
    let outcome = mastery.quality() as f64 / 5.0;
    (prior * PRIOR_WEIGHT + outcome * OUTCOME_WEIGHT).clamp(0.0, 1.0)
}

/// Recency-weighted strength over a full attempt history, for analytics.
///
/// Attempts are weighted `exp(-index * decay)` from most recent to oldest;
/// with no history the default prior is returned.
pub fn strength_from_history(attempts: &[Attempt], decay: f64) -> f64 {
    if attempts.is_empty() {
        return DEFAULT_PRIOR_STRENGTH;
    }

    let mut ordered: Vec<&Attempt> = attempts.iter().collect();
    ordered.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;
    for (index, attempt) in ordered.iter().enumerate() {
        let weight = (-(index as f64) * decay).exp();
        weighted_sum += attempt.mastery.strength_score() * weight;
        weight_total += weight;
    }

    (weighted_sum / weight_total).clamp(0.0, 1.0)
}
