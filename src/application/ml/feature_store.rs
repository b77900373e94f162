use crate::domain::errors::{AnalyticsError, Result};
use crate::domain::ml::feature::{FeatureSnapshot, MarketFeature, feature_key};
use std::collections::{HashMap, VecDeque};
use tracing::debug;

/// Bounded, time-ordered observation buffers keyed by `<asset>_<feature>`.
///
/// Each bucket holds at most `max_per_key` entries sorted by timestamp
/// (insertion order breaks ties). When a bucket overflows, its oldest entry
/// is evicted; other buckets are never touched.
#[derive(Debug)]
pub struct FeatureStore {
    max_per_key: usize,
    buckets: HashMap<String, VecDeque<MarketFeature>>,
}

impl FeatureStore {
    pub fn new(max_per_key: usize) -> Self {
        Self {
            max_per_key,
            buckets: HashMap::new(),
        }
    }

    /// Append an observation, returning the entry evicted to make room (if any).
    ///
    /// An observation older than everything in a full bucket is itself the
    /// oldest entry and is the one evicted.
    pub fn add(&mut self, feature: MarketFeature) -> Result<Option<MarketFeature>> {
        if self.max_per_key == 0 {
            return Err(AnalyticsError::Capacity {
                resource: "feature store".to_string(),
                limit: 0,
            });
        }

        let key = feature.key();
        let bucket = self.buckets.entry(key).or_default();

        let pos = bucket.partition_point(|existing| existing.timestamp <= feature.timestamp);
        bucket.insert(pos, feature);

        if bucket.len() > self.max_per_key {
            let evicted = bucket.pop_front();
            if let Some(ref old) = evicted {
                debug!(
                    "FeatureStore: evicted {} @ {} (bucket full at {})",
                    old.key(),
                    old.timestamp,
                    self.max_per_key
                );
            }
            return Ok(evicted);
        }
        Ok(None)
    }

    /// Ordered copy of one bucket, oldest first.
    pub fn features(&self, asset: &str, feature: &str) -> Vec<MarketFeature> {
        self.buckets
            .get(&feature_key(asset, feature))
            .map(|bucket| bucket.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Most recent value of every feature recorded for `asset`.
    pub fn latest_snapshot(&self, asset: &str) -> FeatureSnapshot {
        self.buckets
            .values()
            .filter_map(|bucket| bucket.back())
            .filter(|latest| latest.asset == asset)
            .map(|latest| (latest.feature.clone(), latest.value))
            .collect()
    }

    pub fn bucket_len(&self, asset: &str, feature: &str) -> usize {
        self.buckets
            .get(&feature_key(asset, feature))
            .map_or(0, VecDeque::len)
    }

    /// Total observations across all buckets
    pub fn len(&self) -> usize {
        self.buckets.values().map(VecDeque::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn max_per_key(&self) -> usize {
        self.max_per_key
    }
}
