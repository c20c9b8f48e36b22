//! Memoisation of built maps.
//!
//! Interactive front ends rebuild the map whenever the user switches subject
//! or domain and then switches back. [`LayoutCache`] finds finished maps by a
//! content hash of the topics and the settings that affect layout, and keeps
//! at most `capacity` of them, evicting the oldest entry first. Each entry
//! keeps its inputs, so a hash collision is a miss, never a wrong map.

use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    sync::Arc,
};

use indexmap::IndexMap;
use log::{debug, trace};

use weakmap_core::topic::Topic;

use crate::{
    config::{AppConfig, GraphConfig, LayoutConfig},
    map::WeaknessMap,
};

/// A built map together with the inputs it was built from.
#[derive(Debug)]
struct CacheEntry {
    topics: Vec<Topic>,
    graph: GraphConfig,
    layout: LayoutConfig,
    map: Arc<WeaknessMap>,
}

impl CacheEntry {
    fn matches(&self, topics: &[Topic], config: &AppConfig) -> bool {
        self.graph == *config.graph() && self.layout == *config.layout() && self.topics == topics
    }
}

#[derive(Debug)]
pub struct LayoutCache {
    entries: IndexMap<u64, CacheEntry>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new(16)
    }
}

impl LayoutCache {
    /// Creates a cache holding at most `capacity` maps (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: IndexMap::new(),
            capacity: capacity.max(1),
            hits: 0,
            misses: 0,
        }
    }

    /// Returns the cached map for `topics` and `config`, building it on a miss.
    pub fn get_or_build(&mut self, topics: &[Topic], config: &AppConfig) -> Arc<WeaknessMap> {
        let key = cache_key(topics, config);
        match self.entries.get(&key) {
            Some(entry) if entry.matches(topics, config) => {
                self.hits += 1;
                trace!(key = key; "Layout cache hit");
                return Arc::clone(&entry.map);
            }
            Some(_) => {
                debug!(key = key; "Layout cache key collision, rebuilding");
                self.entries.shift_remove(&key);
            }
            None => {}
        }

        self.misses += 1;
        trace!(key = key; "Layout cache miss");
        let map = Arc::new(WeaknessMap::build(topics, config));
        if self.entries.len() >= self.capacity {
            self.entries.shift_remove_index(0);
        }
        self.entries.insert(
            key,
            CacheEntry {
                topics: topics.to_vec(),
                graph: *config.graph(),
                layout: *config.layout(),
                map: Arc::clone(&map),
            },
        );
        map
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

fn cache_key(topics: &[Topic], config: &AppConfig) -> u64 {
    let mut hasher = DefaultHasher::new();
    topics.hash(&mut hasher);
    config.graph().hash(&mut hasher);
    config.layout().hash(&mut hasher);
    hasher.finish()
}
