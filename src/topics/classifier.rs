//! Weighted keyword scorer, the deterministic half of topic classification.
//!
//! Always produces an answer: text matching nothing falls back to
//! linear equations, the most common topic in practice.

use crate::types::{ClassificationResult, Topic};

use super::keywords::{priority_boost, KEYWORD_TABLE};

const FALLBACK_TOPIC: Topic = Topic::LinearEquations;
/// Runners-up scoring at least this fraction of the winner are reported.
const ALTERNATIVE_RATIO: f64 = 0.7;

/// Lowercase and collapse runs of whitespace. Shared with the cache so
/// that reformatted copies of one problem hit the same entry.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Word-boundary-aware containment. A keyword made of alphanumeric
/// characters only matches when not embedded in a longer word, so "cos"
/// does not fire inside "cost". Symbolic keywords ("<", "x^2") match
/// anywhere.
fn contains_keyword(text: &str, keyword: &str) -> bool {
    if !keyword.chars().all(|c| c.is_alphanumeric() || c == ' ') {
        return text.contains(keyword);
    }
    let mut search_from = 0;
    while let Some(offset) = text[search_from..].find(keyword) {
        let start = search_from + offset;
        let end = start + keyword.len();
        let boundary_before = text[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let boundary_after = text[end..].chars().next().map_or(true, |c| !c.is_alphanumeric());
        if boundary_before && boundary_after {
            return true;
        }
        search_from = end;
    }
    false
}

fn score_topic(text: &str, keywords: &[&str], weight: f64, tier: u8) -> f64 {
    let matched = keywords.iter().filter(|k| contains_keyword(text, k)).count();
    matched as f64 * weight * priority_boost(tier)
}

/// Best-scoring topic for a piece of problem text.
///
/// Ties resolve to the earlier table entry; no match at all resolves to
/// the fallback topic.
pub fn classify_topic(problem_text: &str) -> Topic {
    classify_topic_with_confidence(problem_text).topic
}

/// Like [`classify_topic`] but reporting a confidence estimate and close
/// runners-up. Confidence is 0.0 when nothing matched, 1.0 when exactly
/// one topic scored, and otherwise grows with the winner's margin over
/// the second place.
pub fn classify_topic_with_confidence(problem_text: &str) -> ClassificationResult {
    let text = normalize_text(problem_text);

    let mut scored: Vec<(Topic, f64)> = Vec::new();
    for entry in KEYWORD_TABLE {
        let score = score_topic(&text, entry.keywords, entry.weight, entry.tier);
        if score > 0.0 {
            scored.push((entry.topic, score));
        }
    }

    if scored.is_empty() {
        return ClassificationResult {
            topic: FALLBACK_TOPIC,
            confidence: 0.0,
            alternatives: Vec::new(),
        };
    }

    // Strictly-greater keeps the earliest entry on ties.
    let mut best = scored[0];
    let mut second_score = 0.0;
    for &(topic, score) in &scored[1..] {
        if score > best.1 {
            second_score = best.1;
            best = (topic, score);
        } else if score > second_score {
            second_score = score;
        }
    }

    let confidence = if scored.len() == 1 {
        1.0
    } else {
        (0.5 + (best.1 - second_score) / best.1).min(1.0)
    };

    let alternatives = scored
        .iter()
        .filter(|(topic, score)| *topic != best.0 && *score >= best.1 * ALTERNATIVE_RATIO)
        .map(|(topic, _)| *topic)
        .collect();

    ClassificationResult {
        topic: best.0,
        confidence,
        alternatives,
    }
}
