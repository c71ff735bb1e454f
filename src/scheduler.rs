//! SM-2 review scheduling over (interval, ease factor, repetition count).
//!
//! A struggling attempt hard-resets the repetition count and interval; a
//! successful one applies the classic non-linear ease-factor delta and grows
//! the interval 1 -> 6 -> round(prior * ease'). First-time topics get an
//! adaptive initial schedule biased by the learner's overall performance
//! tier.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::debug;

use crate::strength::update_strength;
use crate::types::{Attempt, MasteryLevel, PerformanceTier, Topic, TopicProgress};

pub const INITIAL_EASE_FACTOR: f64 = 2.5;
pub const MIN_EASE_FACTOR: f64 = 1.3;

const FIRST_INTERVAL_DAYS: u32 = 1;
const SECOND_INTERVAL_DAYS: u32 = 6;
const HIGH_PERFORMER_FIRST_INTERVAL_DAYS: u32 = 3;
const HIGH_PERFORMER_EASE_FACTOR: f64 = 2.8;
const STRUGGLING_EASE_FACTOR: f64 = 2.3;

const TIER_MIN_ATTEMPTS: usize = 5;
const HIGH_TIER_MIN_STRENGTH: f64 = 0.75;
const HIGH_TIER_MIN_MASTERY_RATE: f64 = 0.7;
const LOW_TIER_MAX_STRENGTH: f64 = 0.5;
const LOW_TIER_MAX_STRUGGLE_RATE: f64 = 0.5;

const LAPSE_OVERDUE_MULTIPLIER: f64 = 2.0;

/// Scheduler output for one review.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub interval_days: u32,
    pub ease_factor: f64,
    pub review_count: u32,
}

/// One SM-2 transition. Quality below 3 resets the repetition state and
/// leaves the ease factor untouched; otherwise the ease delta
/// `0.1 - (5-q)(0.08 + (5-q)*0.02)` applies, floored at 1.3.
pub fn calculate_next_review(
    prior_interval_days: u32,
    ease_factor: f64,
    quality: u8,
    review_count: u32,
) -> Schedule {
    if quality < 3 {
        return Schedule {
            interval_days: FIRST_INTERVAL_DAYS,
            ease_factor: ease_factor.max(MIN_EASE_FACTOR),
            review_count: 0,
        };
    }

    let q = quality.min(5) as f64;
    let delta = 0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02);
    let ease = (ease_factor + delta).max(MIN_EASE_FACTOR);

    let interval_days = match review_count {
        0 => FIRST_INTERVAL_DAYS,
        1 => SECOND_INTERVAL_DAYS,
        _ => ((prior_interval_days as f64 * ease).round() as u32).max(1),
    };

    Schedule {
        interval_days,
        ease_factor: ease,
        review_count: review_count + 1,
    }
}

/// Classify the learner's aggregate history across all topics. Requires at
/// least 5 attempts; below that the caller uses the non-adaptive baseline.
pub fn performance_tier(attempts: &[Attempt]) -> Option<PerformanceTier> {
    if attempts.len() < TIER_MIN_ATTEMPTS {
        return None;
    }

    let total = attempts.len() as f64;
    let avg_strength = attempts
        .iter()
        .map(|a| a.mastery.strength_score())
        .sum::<f64>()
        / total;
    let mastery_rate = attempts
        .iter()
        .filter(|a| a.mastery == MasteryLevel::Mastered)
        .count() as f64
        / total;
    let struggling_rate = attempts
        .iter()
        .filter(|a| a.mastery == MasteryLevel::Struggling)
        .count() as f64
        / total;

    if avg_strength >= HIGH_TIER_MIN_STRENGTH && mastery_rate >= HIGH_TIER_MIN_MASTERY_RATE {
        Some(PerformanceTier::HighPerformer)
    } else if avg_strength < LOW_TIER_MAX_STRENGTH || struggling_rate > LOW_TIER_MAX_STRUGGLE_RATE {
        Some(PerformanceTier::Struggling)
    } else {
        Some(PerformanceTier::Average)
    }
}

/// Starting ease factor for a first-time topic, nudged around the 2.5
/// baseline by tier.
pub fn initial_ease_factor(tier: Option<PerformanceTier>) -> f64 {
    match tier {
        Some(PerformanceTier::HighPerformer) => HIGH_PERFORMER_EASE_FACTOR,
        Some(PerformanceTier::Struggling) => STRUGGLING_EASE_FACTOR,
        _ => INITIAL_EASE_FACTOR,
    }
}

/// Fold one classified attempt into a topic's progress record.
///
/// Pure: returns the proposed new record; the caller persists it.
/// `history` is the learner's full attempt history across all topics and
/// only influences the schedule of first-time topics.
pub fn apply_attempt(
    prior: Option<&TopicProgress>,
    topic: Topic,
    mastery: MasteryLevel,
    history: &[Attempt],
    now: DateTime<Utc>,
) -> TopicProgress {
    let quality = mastery.quality();
    let tier = performance_tier(history);

    let (prior_interval, prior_ease, prior_count, prior_strength) = match prior {
        Some(p) => (
            p.interval_days.max(1),
            p.ease_factor.max(MIN_EASE_FACTOR),
            p.review_count,
            Some(p.strength),
        ),
        None => (FIRST_INTERVAL_DAYS, initial_ease_factor(tier), 0, None),
    };

    let mut schedule = calculate_next_review(prior_interval, prior_ease, quality, prior_count);

    // High performers skip the one-day probe on brand-new topics, unless the
    // first attempt itself went badly.
    if prior.is_none() && quality >= 3 && tier == Some(PerformanceTier::HighPerformer) {
        schedule.interval_days = HIGH_PERFORMER_FIRST_INTERVAL_DAYS;
    }

    let strength = update_strength(prior_strength, mastery);

    debug!(
        topic = topic.as_str(),
        mastery = mastery.as_str(),
        interval_days = schedule.interval_days,
        ease_factor = schedule.ease_factor,
        review_count = schedule.review_count,
        "scheduled next review"
    );

    TopicProgress {
        topic,
        strength,
        review_count: schedule.review_count,
        ease_factor: schedule.ease_factor,
        interval_days: schedule.interval_days,
        last_reviewed: Some(now),
        next_review: Some(now + Duration::days(schedule.interval_days as i64)),
    }
}

/// Reconstruct the last interval from the repetition count. The true last
/// interval is not stored separately, so `0 -> 1, 1 -> 6, n -> 6 * ease^(n-1)`
/// is an approximation inherited from the original scheduler design.
pub fn approximate_last_interval(review_count: u32, ease_factor: f64) -> f64 {
    match review_count {
        0 => 1.0,
        n => 6.0 * ease_factor.powi(n as i32 - 1),
    }
}

/// A topic has lapsed when it is overdue by more than twice its
/// reconstructed last interval.
pub fn is_lapsed(progress: &TopicProgress, now: DateTime<Utc>) -> bool {
    let Some(next_review) = progress.next_review else {
        return false;
    };
    let overdue_days = (now - next_review).num_seconds() as f64 / 86_400.0;
    overdue_days
        > LAPSE_OVERDUE_MULTIPLIER
            * approximate_last_interval(progress.review_count, progress.ease_factor)
}
