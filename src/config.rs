use std::time::Duration;

const DEFAULT_MASTERED_MAX_TURNS: u32 = 5;
const DEFAULT_COMPETENT_MAX_TURNS: u32 = 10;
const DEFAULT_STRENGTH_DECAY: f64 = 0.2;
const DEFAULT_MIN_SPACING: usize = 2;
const DEFAULT_CACHE_TTL_SECS: u64 = 24 * 60 * 60;

/// Engine tunables, resolved once at process start. Environment variables
/// override the defaults; malformed values fall back silently.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Basic classification: turns at or below this are mastered.
    pub mastered_max_turns: u32,
    /// Basic classification: turns at or below this are competent.
    pub competent_max_turns: u32,
    /// Recency decay applied to attempt history in the strength estimator.
    pub strength_decay: f64,
    /// How many trailing selections the interference filter looks back over.
    pub min_spacing: usize,
    /// Lifetime of cached semantic-classifier results.
    pub cache_ttl: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mastered_max_turns: DEFAULT_MASTERED_MAX_TURNS,
            competent_max_turns: DEFAULT_COMPETENT_MAX_TURNS,
            strength_decay: DEFAULT_STRENGTH_DECAY,
            min_spacing: DEFAULT_MIN_SPACING,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            mastered_max_turns: env_u32("TUTOR_MASTERED_MAX_TURNS")
                .unwrap_or(defaults.mastered_max_turns),
            competent_max_turns: env_u32("TUTOR_COMPETENT_MAX_TURNS")
                .unwrap_or(defaults.competent_max_turns),
            strength_decay: env_f64("TUTOR_STRENGTH_DECAY").unwrap_or(defaults.strength_decay),
            min_spacing: env_u32("TUTOR_MIN_SPACING")
                .map(|v| v as usize)
                .unwrap_or(defaults.min_spacing),
            cache_ttl: env_u64("TUTOR_CACHE_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.cache_ttl),
        }
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_u32(key: &str) -> Option<u32> {
    env_string(key)?.parse().ok()
}

fn env_u64(key: &str) -> Option<u64> {
    env_string(key)?.parse().ok()
}

fn env_f64(key: &str) -> Option<f64> {
    env_string(key)?.parse().ok()
}
