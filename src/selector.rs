//! Practice-set composition: due reviews first, then weak topics, then
//! variety, with an interference-aware ordering pass.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::types::{PlannedTopic, PracticePlan, SelectionReason, Topic, TopicProgress};

/// Topics below this strength count as weak for selection purposes.
const WEAK_STRENGTH_THRESHOLD: f64 = 0.6;

/// Topics that share solution machinery and blur together when practiced
/// back to back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterferenceGroup {
    EquationSolving,
    PolynomialAlgebra,
    PowersAndRoots,
    FunctionsAndGraphs,
}

pub fn interference_group(topic: Topic) -> Option<InterferenceGroup> {
    match topic {
        Topic::LinearEquations
        | Topic::QuadraticEquations
        | Topic::SystemsOfEquations
        | Topic::Inequalities => Some(InterferenceGroup::EquationSolving),
        Topic::Polynomials | Topic::Factoring | Topic::RationalExpressions => {
            Some(InterferenceGroup::PolynomialAlgebra)
        }
        Topic::Exponents | Topic::Radicals => Some(InterferenceGroup::PowersAndRoots),
        Topic::Functions | Topic::Graphing => Some(InterferenceGroup::FunctionsAndGraphs),
        Topic::Geometry | Topic::Trigonometry | Topic::Calculus | Topic::WordProblems => None,
    }
}

/// Compose a duplicate-free practice set of at most `target_count` topics.
///
/// Due reviews (most overdue first) fill up to half the set, weak topics
/// (weakest first) come next, and remaining topics pad out the rest. The
/// returned order is uniformly shuffled; priority only decides membership.
pub fn select_practice_set(
    progress: &[TopicProgress],
    target_count: usize,
    now: DateTime<Utc>,
) -> Vec<PlannedTopic> {
    select_practice_set_with_rng(progress, target_count, now, &mut rand::rng())
}

pub fn select_practice_set_with_rng<R: Rng + ?Sized>(
    progress: &[TopicProgress],
    target_count: usize,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<PlannedTopic> {
    if target_count == 0 {
        return Vec::new();
    }

    let mut selected: Vec<PlannedTopic> = Vec::new();
    let mut seen: HashSet<Topic> = HashSet::new();

    // Due reviews, most overdue first, capped at half the set so one
    // backlog cannot crowd out everything else.
    let due_cap = target_count.div_ceil(2);
    let mut due: Vec<&TopicProgress> = progress
        .iter()
        .filter(|p| p.next_review.is_some_and(|at| at <= now))
        .collect();
    due.sort_by(|a, b| a.next_review.cmp(&b.next_review));
    for record in due.into_iter().take(due_cap) {
        if seen.insert(record.topic) {
            selected.push(PlannedTopic { topic: record.topic, reason: SelectionReason::Due });
        }
    }

    // Weak topics, weakest first.
    let mut weak: Vec<&TopicProgress> = progress
        .iter()
        .filter(|p| p.strength < WEAK_STRENGTH_THRESHOLD)
        .collect();
    weak.sort_by(|a, b| a.strength.partial_cmp(&b.strength).unwrap_or(std::cmp::Ordering::Equal));
    for record in weak {
        if selected.len() >= target_count {
            break;
        }
        if seen.insert(record.topic) {
            selected.push(PlannedTopic { topic: record.topic, reason: SelectionReason::Weak });
        }
    }

    // Variety: whatever is left, in random order.
    let mut remainder: Vec<Topic> = progress
        .iter()
        .map(|p| p.topic)
        .filter(|t| !seen.contains(t))
        .collect();
    remainder.shuffle(rng);
    for topic in remainder {
        if selected.len() >= target_count {
            break;
        }
        if seen.insert(topic) {
            selected.push(PlannedTopic { topic, reason: SelectionReason::Variety });
        }
    }

    selected.truncate(target_count);
    // Final shuffle so the learner cannot read priority off the order.
    selected.shuffle(rng);
    debug!(count = selected.len(), target_count, "composed practice set");
    selected
}

/// Drop candidates whose interference group appeared in the last
/// `min_spacing` practiced topics. If that would empty the candidate
/// list, filtering is skipped: practicing something beats practicing
/// nothing.
pub fn filter_interfering_topics(
    candidates: &[Topic],
    recent: &[Topic],
    min_spacing: usize,
) -> Vec<Topic> {
    let recent_groups: HashSet<InterferenceGroup> = recent
        .iter()
        .rev()
        .take(min_spacing)
        .filter_map(|t| interference_group(*t))
        .collect();

    let filtered: Vec<Topic> = candidates
        .iter()
        .copied()
        .filter(|t| match interference_group(*t) {
            Some(group) => !recent_groups.contains(&group),
            None => true,
        })
        .collect();

    if filtered.is_empty() {
        candidates.to_vec()
    } else {
        filtered
    }
}

/// Greedy reordering that maximizes the gap between same-group topics.
///
/// At each position the topic whose group was seen longest ago (or never)
/// is placed next; ties keep input order.
pub fn optimize_topic_spacing(topics: &[Topic]) -> Vec<Topic> {
    let mut remaining: Vec<Topic> = topics.to_vec();
    let mut ordered: Vec<Topic> = Vec::with_capacity(remaining.len());

    while !remaining.is_empty() {
        let mut best_index = 0;
        let mut best_distance = spacing_distance(remaining[0], &ordered);
        for (index, topic) in remaining.iter().enumerate().skip(1) {
            let distance = spacing_distance(*topic, &ordered);
            if distance > best_distance {
                best_index = index;
                best_distance = distance;
            }
        }
        ordered.push(remaining.remove(best_index));
    }

    ordered
}

/// Positions since a same-group topic was placed; `usize::MAX` when the
/// group has not appeared (or the topic is ungrouped).
fn spacing_distance(topic: Topic, placed: &[Topic]) -> usize {
    let group = match interference_group(topic) {
        Some(group) => group,
        None => return usize::MAX,
    };
    for (back, prior) in placed.iter().rev().enumerate() {
        if interference_group(*prior) == Some(group) {
            return back;
        }
    }
    usize::MAX
}

/// Full pipeline: compose, drop candidates that interfere with recent
/// practice, then spread what is left.
pub fn prioritize_topics_for_practice(
    progress: &[TopicProgress],
    recent: &[Topic],
    target_count: usize,
    min_spacing: usize,
    now: DateTime<Utc>,
) -> PracticePlan {
    prioritize_topics_for_practice_with_rng(
        progress,
        recent,
        target_count,
        min_spacing,
        now,
        &mut rand::rng(),
    )
}

pub fn prioritize_topics_for_practice_with_rng<R: Rng + ?Sized>(
    progress: &[TopicProgress],
    recent: &[Topic],
    target_count: usize,
    min_spacing: usize,
    now: DateTime<Utc>,
    rng: &mut R,
) -> PracticePlan {
    let selected = select_practice_set_with_rng(progress, target_count, now, rng);

    let candidates: Vec<Topic> = selected.iter().map(|p| p.topic).collect();
    let kept: HashSet<Topic> = filter_interfering_topics(&candidates, recent, min_spacing)
        .into_iter()
        .collect();
    let surviving: Vec<Topic> = candidates.iter().copied().filter(|t| kept.contains(t)).collect();

    let spaced = optimize_topic_spacing(&surviving);
    let topics = spaced
        .into_iter()
        .map(|topic| PlannedTopic {
            topic,
            reason: selected
                .iter()
                .find(|p| p.topic == topic)
                .map(|p| p.reason)
                .unwrap_or(SelectionReason::Variety),
        })
        .collect();

    PracticePlan { topics }
}

/// Deterministic plan for tests and reproducible sessions.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn record(topic: Topic, strength: f64, due_days_ago: Option<i64>) -> TopicProgress {
        let mut progress = TopicProgress::new(topic);
        progress.strength = strength;
        progress.next_review = due_days_ago.map(|d| fixed_now() - Duration::days(d));
        progress
    }

    #[test]
    fn test_most_overdue_wins_the_due_slot() {
        // Target 2 leaves a single due slot; the most overdue topic gets it.
        let progress = vec![
            record(Topic::Geometry, 0.9, Some(1)),
            record(Topic::Calculus, 0.9, Some(7)),
            record(Topic::Functions, 0.9, Some(3)),
        ];
        let plan = select_practice_set_with_rng(&progress, 2, fixed_now(), &mut seeded_rng(7));
        let due: Vec<Topic> = plan
            .iter()
            .filter(|p| p.reason == SelectionReason::Due)
            .map(|p| p.topic)
            .collect();
        assert_eq!(due, vec![Topic::Calculus]);
    }

    #[test]
    fn test_due_capped_at_half_the_set() {
        let progress: Vec<TopicProgress> = vec![
            record(Topic::Geometry, 0.9, Some(4)),
            record(Topic::Calculus, 0.9, Some(3)),
            record(Topic::Trigonometry, 0.9, Some(2)),
            record(Topic::WordProblems, 0.9, Some(1)),
            record(Topic::Functions, 0.2, None),
        ];
        let plan = select_practice_set_with_rng(&progress, 4, fixed_now(), &mut seeded_rng(7));
        let due_count = plan.iter().filter(|p| p.reason == SelectionReason::Due).count();
        assert_eq!(due_count, 2);
        assert!(plan.iter().any(|p| p.topic == Topic::Functions));
    }

    #[test]
    fn test_weakest_topics_win_limited_slots() {
        let progress = vec![
            record(Topic::Radicals, 0.5, None),
            record(Topic::Exponents, 0.1, None),
            record(Topic::Factoring, 0.3, None),
        ];
        let plan = select_practice_set_with_rng(&progress, 2, fixed_now(), &mut seeded_rng(7));
        let mut weak: Vec<&str> = plan
            .iter()
            .filter(|p| p.reason == SelectionReason::Weak)
            .map(|p| p.topic.as_str())
            .collect();
        weak.sort_unstable();
        assert_eq!(weak, vec!["exponents", "factoring"]);
    }

    #[test]
    fn test_no_duplicates_and_capped() {
        // Due and weak at once: must appear exactly once, as due.
        let progress = vec![
            record(Topic::Exponents, 0.2, Some(1)),
            record(Topic::Radicals, 0.9, None),
        ];
        let plan = select_practice_set_with_rng(&progress, 5, fixed_now(), &mut seeded_rng(7));
        assert_eq!(plan.len(), 2);
        let exponents: Vec<&PlannedTopic> =
            plan.iter().filter(|p| p.topic == Topic::Exponents).collect();
        assert_eq!(exponents.len(), 1);
        assert_eq!(exponents[0].reason, SelectionReason::Due);
    }

    #[test]
    fn test_membership_is_stable_across_seeds() {
        let progress = vec![
            record(Topic::Geometry, 0.9, Some(2)),
            record(Topic::Exponents, 0.2, None),
            record(Topic::Calculus, 0.9, None),
            record(Topic::Functions, 0.4, None),
        ];
        let pick = |seed| -> HashSet<Topic> {
            select_practice_set_with_rng(&progress, 3, fixed_now(), &mut seeded_rng(seed))
                .iter()
                .map(|p| p.topic)
                .collect()
        };
        // Due and weak membership is deterministic; only order and the
        // variety tail may vary, and here due + weak fill every slot.
        assert_eq!(pick(1), pick(99));
    }

    #[test]
    fn test_zero_target_is_empty() {
        let progress = vec![record(Topic::Geometry, 0.2, Some(1))];
        assert!(select_practice_set_with_rng(&progress, 0, fixed_now(), &mut seeded_rng(7))
            .is_empty());
    }

    #[test]
    fn test_filter_drops_recently_interfering_group() {
        let candidates = [Topic::QuadraticEquations, Topic::Geometry];
        let recent = [Topic::LinearEquations];
        let kept = filter_interfering_topics(&candidates, &recent, 2);
        assert_eq!(kept, vec![Topic::Geometry]);
    }

    #[test]
    fn test_filter_window_is_bounded() {
        // The interfering topic is outside the two-item lookback.
        let candidates = [Topic::QuadraticEquations];
        let recent = [Topic::LinearEquations, Topic::Geometry, Topic::Calculus];
        let kept = filter_interfering_topics(&candidates, &recent, 2);
        assert_eq!(kept, vec![Topic::QuadraticEquations]);
    }

    #[test]
    fn test_filter_never_empties_candidates() {
        let candidates = [Topic::QuadraticEquations, Topic::Inequalities];
        let recent = [Topic::LinearEquations];
        let kept = filter_interfering_topics(&candidates, &recent, 3);
        assert_eq!(kept, candidates.to_vec());
    }

    #[test]
    fn test_spacing_separates_same_group_runs() {
        let input = [
            Topic::LinearEquations,
            Topic::QuadraticEquations,
            Topic::Geometry,
            Topic::Calculus,
        ];
        let ordered = optimize_topic_spacing(&input);
        assert_eq!(ordered.len(), 4);
        let first_pair_groups = (
            interference_group(ordered[0]),
            interference_group(ordered[1]),
        );
        assert_ne!(
            first_pair_groups.0, first_pair_groups.1,
            "adjacent same-group topics should be split: {ordered:?}"
        );
    }

    #[test]
    fn test_spacing_preserves_membership() {
        let input = [
            Topic::Polynomials,
            Topic::Factoring,
            Topic::RationalExpressions,
        ];
        let ordered = optimize_topic_spacing(&input);
        let mut sorted_in: Vec<&str> = input.iter().map(|t| t.as_str()).collect();
        let mut sorted_out: Vec<&str> = ordered.iter().map(|t| t.as_str()).collect();
        sorted_in.sort_unstable();
        sorted_out.sort_unstable();
        assert_eq!(sorted_in, sorted_out);
    }

    #[test]
    fn test_prioritize_end_to_end() {
        let progress = vec![
            record(Topic::LinearEquations, 0.2, Some(2)),
            record(Topic::QuadraticEquations, 0.3, None),
            record(Topic::Geometry, 0.9, Some(1)),
            record(Topic::Trigonometry, 0.9, None),
        ];
        let plan = prioritize_topics_for_practice_with_rng(
            &progress,
            &[],
            4,
            2,
            fixed_now(),
            &mut seeded_rng(7),
        );
        let topics = plan.topic_list();
        assert_eq!(topics.len(), 4);
        let unique: HashSet<Topic> = topics.iter().copied().collect();
        assert_eq!(unique.len(), 4);
        // Reasons survive the reordering.
        assert!(plan
            .topics
            .iter()
            .any(|p| p.topic == Topic::Geometry && p.reason == SelectionReason::Due));
    }
}
