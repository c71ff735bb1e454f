//! In-process TTL cache for semantic classification results.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use crate::types::Topic;

struct CacheEntry {
    topic: Topic,
    inserted_at: Instant,
}

/// Keyed by normalized problem text so reformatted duplicates share an
/// entry. Expired entries are evicted lazily on read.
pub struct ClassificationCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl ClassificationCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &str) -> Option<Topic> {
        {
            let entries = self.entries.read();
            match entries.get(key) {
                Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                    return Some(entry.topic);
                }
                Some(_) => {}
                None => return None,
            }
        }
        // Entry exists but has expired; drop it under the write lock.
        self.entries.write().remove(key);
        None
    }

    pub fn set(&self, key: String, topic: Topic) {
        self.entries.write().insert(
            key,
            CacheEntry {
                topic,
                inserted_at: Instant::now(),
            },
        );
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }
}
