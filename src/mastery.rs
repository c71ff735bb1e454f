//! Mastery classification for a single attempt.
//!
//! Three escalating strategies, picked by which optional signals are
//! present: step-based efficiency when a step count is known, type-adjusted
//! turn thresholds when only the problem type is known, and plain turn
//! thresholds otherwise. A struggle-weighted post-pass can then downgrade
//! (never upgrade) the base result.

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::types::{MasteryLevel, StruggleSignals};

const STEP_EFFICIENCY_MASTERED: f64 = 0.8;
const STEP_EFFICIENCY_COMPETENT: f64 = 0.5;
const EXPECTED_TURNS_PER_STEP: u32 = 2;

const HINT_WEIGHT: f64 = 0.15;
const MISTAKE_WEIGHT: f64 = 0.20;
const CLARIFICATION_WEIGHT: f64 = 0.10;
const STRUGGLE_FORCE_THRESHOLD: f64 = 0.6;
const STRUGGLE_DOWNGRADE_THRESHOLD: f64 = 0.3;

/// Per-problem-type difficulty multipliers, range [1.0, 2.0]. Unknown
/// labels fall back to 1.0.
const DIFFICULTY_MULTIPLIERS: &[(&str, f64)] = &[
    ("arithmetic", 1.0),
    ("linear-equation", 1.1),
    ("algebra", 1.2),
    ("geometry", 1.4),
    ("word-problem", 1.5),
    ("trigonometry", 1.6),
    ("calculus", 1.8),
    ("proof", 2.0),
];

pub fn difficulty_multiplier(problem_type: &str) -> f64 {
    let lowered = problem_type.trim().to_lowercase();
    DIFFICULTY_MULTIPLIERS
        .iter()
        .find(|(label, _)| *label == lowered)
        .map(|(_, multiplier)| *multiplier)
        .unwrap_or(1.0)
}

/// Classify one attempt's mastery from its effort signals.
///
/// `turns_taken` must be at least 1; a step count of zero is treated as
/// zero efficiency, not rejected.
pub fn classify_mastery(
    config: &EngineConfig,
    turns_taken: u32,
    problem_type: Option<&str>,
    step_count: Option<u32>,
    struggle: Option<&StruggleSignals>,
) -> Result<MasteryLevel, EngineError> {
    if turns_taken == 0 {
        return Err(EngineError::InvalidInput(
            "turnsTaken must be at least 1".to_string(),
        ));
    }

    let base = if let Some(steps) = step_count {
        classify_by_steps(steps, turns_taken)
    } else if let Some(problem_type) = problem_type {
        classify_by_turns(config, turns_taken, difficulty_multiplier(problem_type))
    } else {
        classify_by_turns(config, turns_taken, 1.0)
    };

    Ok(match struggle {
        Some(signals) => apply_struggle_signals(base, signals),
        None => base,
    })
}

fn classify_by_steps(step_count: u32, turns_taken: u32) -> MasteryLevel {
    let expected_turns = (step_count * EXPECTED_TURNS_PER_STEP) as f64;
    let efficiency = expected_turns / turns_taken as f64;
    if efficiency >= STEP_EFFICIENCY_MASTERED {
        MasteryLevel::Mastered
    } else if efficiency >= STEP_EFFICIENCY_COMPETENT {
        MasteryLevel::Competent
    } else {
        MasteryLevel::Struggling
    }
}

fn classify_by_turns(config: &EngineConfig, turns_taken: u32, multiplier: f64) -> MasteryLevel {
    let mastered_max = (config.mastered_max_turns as f64 * multiplier).round() as u32;
    let competent_max = (config.competent_max_turns as f64 * multiplier).round() as u32;
    if turns_taken <= mastered_max {
        MasteryLevel::Mastered
    } else if turns_taken <= competent_max {
        MasteryLevel::Competent
    } else {
        MasteryLevel::Struggling
    }
}

/// Aggregate struggle score in [0, 1].
pub fn struggle_score(signals: &StruggleSignals) -> f64 {
    let raw = HINT_WEIGHT * signals.hints as f64
        + MISTAKE_WEIGHT * signals.incorrect_attempts as f64
        + CLARIFICATION_WEIGHT * signals.clarification_requests as f64;
    raw.min(1.0)
}

/// Downgrade-only refinement of a base classification. Forces struggling
/// above 0.6, drops exactly one level in [0.3, 0.6), and otherwise keeps
/// the base result.
pub fn apply_struggle_signals(base: MasteryLevel, signals: &StruggleSignals) -> MasteryLevel {
    let score = struggle_score(signals);
    if score >= STRUGGLE_FORCE_THRESHOLD {
        MasteryLevel::Struggling
    } else if score >= STRUGGLE_DOWNGRADE_THRESHOLD {
        base.downgraded()
    } else {
        base
    }
}
