use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Closed set of topic tags the engine can assign to a practice problem.
///
/// The declaration order here is load-bearing for classification: when two
/// topics tie on keyword score, the first-declared entry in the keyword
/// table wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Topic {
    LinearEquations,
    QuadraticEquations,
    SystemsOfEquations,
    Inequalities,
    Polynomials,
    Factoring,
    Exponents,
    Radicals,
    RationalExpressions,
    Functions,
    Graphing,
    Geometry,
    Trigonometry,
    Calculus,
    WordProblems,
}

impl Topic {
    pub const ALL: [Topic; 15] = [
        Topic::LinearEquations,
        Topic::QuadraticEquations,
        Topic::SystemsOfEquations,
        Topic::Inequalities,
        Topic::Polynomials,
        Topic::Factoring,
        Topic::Exponents,
        Topic::Radicals,
        Topic::RationalExpressions,
        Topic::Functions,
        Topic::Graphing,
        Topic::Geometry,
        Topic::Trigonometry,
        Topic::Calculus,
        Topic::WordProblems,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LinearEquations => "linear-equations",
            Self::QuadraticEquations => "quadratic-equations",
            Self::SystemsOfEquations => "systems-of-equations",
            Self::Inequalities => "inequalities",
            Self::Polynomials => "polynomials",
            Self::Factoring => "factoring",
            Self::Exponents => "exponents",
            Self::Radicals => "radicals",
            Self::RationalExpressions => "rational-expressions",
            Self::Functions => "functions",
            Self::Graphing => "graphing",
            Self::Geometry => "geometry",
            Self::Trigonometry => "trigonometry",
            Self::Calculus => "calculus",
            Self::WordProblems => "word-problems",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let lowered = s.trim().to_lowercase();
        Self::ALL.iter().copied().find(|t| t.as_str() == lowered)
    }
}

/// Discrete outcome of one completed attempt, ordered by decreasing
/// performance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MasteryLevel {
    Mastered,
    Competent,
    Struggling,
}

impl MasteryLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mastered => "mastered",
            Self::Competent => "competent",
            Self::Struggling => "struggling",
        }
    }

    /// SM-2 quality score fed to the scheduler.
    pub fn quality(&self) -> u8 {
        match self {
            Self::Mastered => 5,
            Self::Competent => 3,
            Self::Struggling => 1,
        }
    }

    /// Contribution of one attempt to the retention-strength estimate.
    pub fn strength_score(&self) -> f64 {
        match self {
            Self::Mastered => 1.0,
            Self::Competent => 0.6,
            Self::Struggling => 0.3,
        }
    }

    /// One level down; struggling stays struggling.
    pub fn downgraded(&self) -> Self {
        match self {
            Self::Mastered => Self::Competent,
            _ => Self::Struggling,
        }
    }
}

/// Coarse classification of a learner's overall history. Only used to bias
/// the first schedule of a previously unseen topic; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PerformanceTier {
    HighPerformer,
    Average,
    Struggling,
}

/// Effort signals collected while the learner worked through a problem.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StruggleSignals {
    pub hints: u32,
    pub incorrect_attempts: u32,
    pub clarification_requests: u32,
}

/// One completed practice interaction. Append-only; never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    pub topic: Topic,
    pub mastery: MasteryLevel,
    pub turns_taken: u32,
    pub created_at: DateTime<Utc>,
}

/// Per-(learner, topic) aggregate the scheduler and estimator mutate after
/// every attempt. The engine only ever returns a proposed new value;
/// persisting it atomically is the caller's responsibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicProgress {
    pub topic: Topic,
    pub strength: f64,
    pub review_count: u32,
    pub ease_factor: f64,
    pub interval_days: u32,
    pub last_reviewed: Option<DateTime<Utc>>,
    pub next_review: Option<DateTime<Utc>>,
}

impl TopicProgress {
    /// Fresh record for a first-time topic, before any attempt is applied.
    pub fn new(topic: Topic) -> Self {
        Self {
            topic,
            strength: 0.5,
            review_count: 0,
            ease_factor: crate::scheduler::INITIAL_EASE_FACTOR,
            interval_days: 1,
            last_reviewed: None,
            next_review: None,
        }
    }
}

/// Why a topic was placed in a practice plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionReason {
    Due,
    Weak,
    Variety,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedTopic {
    pub topic: Topic,
    pub reason: SelectionReason,
}

/// Ordered, duplicate-free session composition returned by the selector.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticePlan {
    pub topics: Vec<PlannedTopic>,
}

impl PracticePlan {
    pub fn topic_list(&self) -> Vec<Topic> {
        self.topics.iter().map(|p| p.topic).collect()
    }
}

/// Weighted-scorer output with a confidence estimate and close runners-up.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub topic: Topic,
    pub confidence: f64,
    pub alternatives: Vec<Topic>,
}
