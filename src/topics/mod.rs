//! Topic classification: cache, semantic classifier, keyword fallback.

mod cache;
mod classifier;
mod keywords;
mod semantic;

pub use cache::ClassificationCache;
pub use classifier::{classify_topic, classify_topic_with_confidence, normalize_text};
pub use keywords::{priority_boost, TopicKeywords, KEYWORD_TABLE};
pub use semantic::{SemanticClassifier, SemanticError};

use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::types::Topic;

/// Layered classifier: cache hit first, then the semantic classifier when
/// one is configured, then the weighted keyword scorer. Semantic failures
/// never surface to the caller; they degrade to the keyword result.
pub struct TopicClassifier {
    cache: ClassificationCache,
    semantic: Option<SemanticClassifier>,
}

impl TopicClassifier {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            cache: ClassificationCache::new(config.cache_ttl),
            semantic: None,
        }
    }

    pub fn with_semantic(config: &EngineConfig, semantic: SemanticClassifier) -> Self {
        Self {
            cache: ClassificationCache::new(config.cache_ttl),
            semantic: semantic.is_available().then_some(semantic),
        }
    }

    pub async fn classify(&self, problem_text: &str) -> Result<Topic, EngineError> {
        let key = normalize_text(problem_text);
        if key.is_empty() {
            return Err(EngineError::InvalidInput(
                "problem text must not be empty".to_string(),
            ));
        }

        if let Some(topic) = self.cache.get(&key) {
            debug!(topic = topic.as_str(), "classification cache hit");
            return Ok(topic);
        }

        if let Some(semantic) = &self.semantic {
            match semantic.classify(problem_text).await {
                Ok(topic) => {
                    self.cache.set(key, topic);
                    return Ok(topic);
                }
                Err(e) => {
                    warn!(error = %e, "semantic classification failed, using keyword scorer");
                }
            }
        }

        Ok(classify_topic(problem_text))
    }
}
