//! Adaptive mastery engine for a math tutoring service.
//!
//! Pure decision logic: given attempt outcomes and per-topic progress it
//! classifies mastery, estimates retention strength, schedules spaced
//! reviews (SM-2 with performance-aware first intervals), and composes
//! interference-aware practice sets. Persistence, transport, and retry
//! policy belong to the caller.

pub mod config;
pub mod error;
pub mod mastery;
pub mod scheduler;
pub mod selector;
pub mod strength;
pub mod topics;
pub mod types;

pub use config::EngineConfig;
pub use error::EngineError;
pub use mastery::{apply_struggle_signals, classify_mastery, difficulty_multiplier, struggle_score};
pub use scheduler::{
    apply_attempt, calculate_next_review, initial_ease_factor, is_lapsed, performance_tier,
    Schedule, INITIAL_EASE_FACTOR, MIN_EASE_FACTOR,
};
pub use selector::{
    filter_interfering_topics, interference_group, optimize_topic_spacing,
    prioritize_topics_for_practice, select_practice_set, InterferenceGroup,
};
pub use strength::{strength_from_history, update_strength};
pub use topics::{
    classify_topic, classify_topic_with_confidence, SemanticClassifier, TopicClassifier,
};
pub use types::{
    Attempt, ClassificationResult, MasteryLevel, PerformanceTier, PlannedTopic, PracticePlan,
    SelectionReason, StruggleSignals, Topic, TopicProgress,
};
