//! Bounded FIFO memoization of pipeline results.
//!
//! Entries are keyed by a SHA-256 digest of the image pixels plus the food
//! label. Only capacity triggers eviction, and the earliest insertion always
//! goes first. The map and the insertion queue share one mutex; the compute
//! closure runs with the lock released, so concurrent misses on the same key
//! may both compute, but only the first insertion is kept.

use crate::error::EstimateError;
use crate::image::ImageRgb8;
use crate::nutrition::NutritionEstimate;
use log::{debug, trace};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

pub const DEFAULT_CACHE_CAPACITY: usize = 100;

/// Stable content digest of an RGB image (dimensions and pixel rows; row
/// padding beyond `3 * w` is ignored).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageDigest([u8; 32]);

impl ImageDigest {
    pub fn of(image: &ImageRgb8<'_>) -> Self {
        let mut hasher = Sha256::new();
        hasher.update((image.w as u64).to_le_bytes());
        hasher.update((image.h as u64).to_le_bytes());
        for y in 0..image.h {
            hasher.update(image.row(y));
        }
        Self(hasher.finalize().into())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub image: ImageDigest,
    pub food_type: String,
}

impl CacheKey {
    pub fn new(image: ImageDigest, food_type: impl Into<String>) -> Self {
        Self {
            image,
            food_type: food_type.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

#[derive(Debug, Default)]
struct Inner {
    map: HashMap<CacheKey, NutritionEstimate>,
    order: VecDeque<CacheKey>,
    stats: CacheStats,
}

#[derive(Debug)]
pub struct ResultCache {
    capacity: usize,
    inner: Mutex<Inner>,
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl ResultCache {
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(Inner::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Every critical section leaves the map and queue consistent, so a
        // poisoned lock is still safe to reuse.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lock().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.lock().map.contains_key(key)
    }

    pub fn get(&self, key: &CacheKey) -> Option<NutritionEstimate> {
        self.lock().map.get(key).cloned()
    }

    pub fn stats(&self) -> CacheStats {
        self.lock().stats
    }

    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.map.clear();
        inner.order.clear();
    }

    /// Keys in insertion order, oldest first.
    pub fn keys(&self) -> Vec<CacheKey> {
        self.lock().order.iter().cloned().collect()
    }

    /// Insert `value` unless `key` is already present; returns the stored
    /// value either way. Evicts the oldest entry when full.
    pub fn insert(&self, key: CacheKey, value: NutritionEstimate) -> NutritionEstimate {
        let mut inner = self.lock();
        if let Some(existing) = inner.map.get(&key) {
            return existing.clone();
        }
        if inner.map.len() >= self.capacity {
            if let Some(oldest) = inner.order.pop_front() {
                inner.map.remove(&oldest);
                inner.stats.evictions += 1;
                debug!("ResultCache: evicted '{}'", oldest.food_type);
            }
        }
        inner.order.push_back(key.clone());
        inner.map.insert(key, value.clone());
        value
    }

    /// Cached estimate for `(image, food_type)`, computing and storing it on a
    /// miss. Errors are returned as-is and never cached.
    pub fn get_or_compute<F>(
        &self,
        image: &ImageRgb8<'_>,
        food_type: &str,
        compute: F,
    ) -> Result<NutritionEstimate, EstimateError>
    where
        F: FnOnce() -> Result<NutritionEstimate, EstimateError>,
    {
        let key = CacheKey::new(ImageDigest::of(image), food_type);
        {
            let mut inner = self.lock();
            if let Some(hit) = inner.map.get(&key).cloned() {
                inner.stats.hits += 1;
                trace!("ResultCache: hit for '{food_type}'");
                return Ok(hit);
            }
            inner.stats.misses += 1;
        }
        let value = compute()?;
        Ok(self.insert(key, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimate(calories: f32) -> NutritionEstimate {
        NutritionEstimate {
            calories,
            protein_g: 1,
            carbs_g: 2,
            fat_g: 3,
            mass_g: 10.0,
            volume_cm3: 20.0,
            health_score: 5,
            confidence_score: 80,
        }
    }

    fn key(i: u8) -> CacheKey {
        CacheKey::new(ImageDigest([i; 32]), "pizza")
    }

    #[test]
    fn overflow_evicts_exactly_the_oldest_entry() {
        let cache = ResultCache::new(100);
        for i in 0..100u8 {
            cache.insert(key(i), estimate(i as f32));
        }
        assert_eq!(cache.len(), 100);
        cache.insert(key(200), estimate(200.0));
        assert_eq!(cache.len(), 100);
        assert!(!cache.contains(&key(0)));
        for i in 1..100u8 {
            assert!(cache.contains(&key(i)), "key {i} missing");
        }
        assert!(cache.contains(&key(200)));
        assert_eq!(cache.keys().first(), Some(&key(1)));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn reinserting_a_key_keeps_first_value_and_order() {
        let cache = ResultCache::new(2);
        cache.insert(key(1), estimate(1.0));
        cache.insert(key(2), estimate(2.0));
        let stored = cache.insert(key(1), estimate(99.0));
        assert_eq!(stored.calories, 1.0);
        cache.insert(key(3), estimate(3.0));
        assert!(!cache.contains(&key(1)));
        assert!(cache.contains(&key(2)));
    }

    #[test]
    fn get_or_compute_runs_once_per_key_and_skips_errors() {
        let cache = ResultCache::default();
        let buf = vec![7u8; 60 * 60 * 3];
        let img = ImageRgb8::packed(60, 60, &buf);

        let failed = cache.get_or_compute(&img, "sushi", || Err(EstimateError::VolumeDegenerate));
        assert_eq!(failed, Err(EstimateError::VolumeDegenerate));
        assert!(cache.is_empty());

        let mut calls = 0;
        for _ in 0..3 {
            let got = cache
                .get_or_compute(&img, "sushi", || {
                    calls += 1;
                    Ok(estimate(42.0))
                })
                .unwrap();
            assert_eq!(got, estimate(42.0));
        }
        assert_eq!(calls, 1);
        assert_eq!(cache.stats(), CacheStats { hits: 2, misses: 2, evictions: 0 });

        let other = cache.get_or_compute(&img, "pizza", || Ok(estimate(1.0))).unwrap();
        assert_eq!(other.calories, 1.0);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn digest_ignores_row_padding() {
        let packed: Vec<u8> = (0..4 * 2 * 3).map(|v| v as u8).collect();
        let mut padded = Vec::new();
        for row in packed.chunks(12) {
            padded.extend_from_slice(row);
            padded.extend_from_slice(&[0xAA; 4]);
        }
        let a = ImageRgb8::packed(4, 2, &packed);
        let b = ImageRgb8 {
            w: 4,
            h: 2,
            stride: 16,
            data: &padded,
        };
        assert_eq!(ImageDigest::of(&a), ImageDigest::of(&b));
        let c = ImageRgb8::packed(2, 4, &packed);
        assert_ne!(ImageDigest::of(&a), ImageDigest::of(&c));
    }
}
