//! Property tests for the numeric invariants and the selector.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use proptest::sample::select;
use tutor_engine::selector::{seeded_rng, select_practice_set_with_rng};
use tutor_engine::{
    calculate_next_review, filter_interfering_topics, optimize_topic_spacing, update_strength,
    MasteryLevel, Topic, TopicProgress, MIN_EASE_FACTOR,
};

fn topic_strategy() -> impl Strategy<Value = Topic> {
    select(Topic::ALL.to_vec())
}

fn mastery_strategy() -> impl Strategy<Value = MasteryLevel> {
    select(vec![
        MasteryLevel::Mastered,
        MasteryLevel::Competent,
        MasteryLevel::Struggling,
    ])
}

fn progress_strategy() -> impl Strategy<Value = TopicProgress> {
    (topic_strategy(), 0.0f64..=1.0, proptest::option::of(-30i64..30)).prop_map(
        |(topic, strength, due_offset_days)| {
            let mut progress = TopicProgress::new(topic);
            progress.strength = strength;
            progress.next_review = due_offset_days
                .map(|d| Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap() + Duration::days(d));
            progress
        },
    )
}

proptest! {
    #[test]
    fn strength_stays_in_unit_interval(
        prior in proptest::option::of(0.0f64..=1.0),
        mastery in mastery_strategy(),
    ) {
        let updated = update_strength(prior, mastery);
        prop_assert!((0.0..=1.0).contains(&updated));
    }

    #[test]
    fn schedule_respects_floors(
        interval in 1u32..400,
        ease in 1.3f64..3.0,
        quality in 0u8..=5,
        count in 0u32..20,
    ) {
        let schedule = calculate_next_review(interval, ease, quality, count);
        prop_assert!(schedule.ease_factor >= MIN_EASE_FACTOR);
        prop_assert!(schedule.interval_days >= 1);
        if quality < 3 {
            prop_assert_eq!(schedule.review_count, 0);
        } else {
            prop_assert_eq!(schedule.review_count, count + 1);
        }
    }

    #[test]
    fn practice_set_is_capped_and_duplicate_free(
        progress in proptest::collection::vec(progress_strategy(), 0..30),
        target in 0usize..10,
        seed in any::<u64>(),
    ) {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let plan = select_practice_set_with_rng(&progress, target, now, &mut seeded_rng(seed));
        prop_assert!(plan.len() <= target);

        let mut topics: Vec<Topic> = plan.iter().map(|p| p.topic).collect();
        topics.sort_by_key(|t| t.as_str());
        topics.dedup();
        prop_assert_eq!(topics.len(), plan.len(), "plan contains a duplicate topic");
    }

    #[test]
    fn interference_filter_preserves_nonempty_candidates(
        candidates in proptest::collection::vec(topic_strategy(), 1..10),
        recent in proptest::collection::vec(topic_strategy(), 0..10),
        min_spacing in 0usize..5,
    ) {
        let kept = filter_interfering_topics(&candidates, &recent, min_spacing);
        prop_assert!(!kept.is_empty());
        for topic in &kept {
            prop_assert!(candidates.contains(topic));
        }
    }

    #[test]
    fn spacing_is_a_permutation(
        topics in proptest::collection::vec(topic_strategy(), 0..12),
    ) {
        let ordered = optimize_topic_spacing(&topics);
        let mut sorted_in: Vec<&str> = topics.iter().map(|t| t.as_str()).collect();
        let mut sorted_out: Vec<&str> = ordered.iter().map(|t| t.as_str()).collect();
        sorted_in.sort_unstable();
        sorted_out.sort_unstable();
        prop_assert_eq!(sorted_in, sorted_out);
    }
}
