//! Bounded generational cache used to intern immutable values.
//!
//! Each bucket keeps two generations. A hit in the older generation that
//! outscores the younger one swaps them; a miss evicts the older generation
//! and demotes the younger. Memory stays bounded and frequently used values
//! survive churn from one-off values, at the cost of occasionally dropping
//! an entry. Callers must not depend on identity for correctness.

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

struct Generation<T> {
    value: T,
    hits: u32,
}

struct Bucket<T> {
    young: Option<Generation<T>>,
    old: Option<Generation<T>>,
}

impl<T> Default for Bucket<T> {
    fn default() -> Self {
        Bucket {
            young: None,
            old: None,
        }
    }
}

/// Fixed-size set of canonical values.
pub struct HashGenCacheSet<T> {
    buckets: Box<[Bucket<T>]>,
}

impl<T: Hash + Eq + Clone> HashGenCacheSet<T> {
    /// Create a cache with `capacity` buckets (rounded up to a power of two).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1).next_power_of_two();
        HashGenCacheSet {
            buckets: (0..capacity).map(|_| Bucket::default()).collect(),
        }
    }

    fn bucket_index(&self, value: &T) -> usize {
        let mut hasher = FxHasher::default();
        value.hash(&mut hasher);
        // capacity is a power of two
        #[allow(
            clippy::cast_possible_truncation,
            reason = "masked to the bucket count"
        )]
        let hash = hasher.finish() as usize;
        hash & (self.buckets.len() - 1)
    }

    /// Return the cached instance equal to `value`, caching `value` on a miss.
    pub fn put(&mut self, value: T) -> T {
        let index = self.bucket_index(&value);
        let bucket = &mut self.buckets[index];

        if let Some(young) = bucket.young.as_mut() {
            if young.value == value {
                young.hits = young.hits.saturating_add(1);
                return young.value.clone();
            }
        }

        let young_hits = bucket.young.as_ref().map_or(0, |g| g.hits);
        if let Some(old) = bucket.old.as_mut() {
            if old.value == value {
                old.hits = old.hits.saturating_add(1);
                let canonical = old.value.clone();
                if old.hits > young_hits {
                    std::mem::swap(&mut bucket.young, &mut bucket.old);
                }
                return canonical;
            }
        }

        bucket.old = bucket.young.take();
        bucket.young = Some(Generation {
            value: value.clone(),
            hits: 0,
        });
        value
    }

    /// Look up a cached instance without recording a hit.
    pub fn get(&self, value: &T) -> Option<&T> {
        let bucket = &self.buckets[self.bucket_index(value)];
        [&bucket.young, &bucket.old]
            .into_iter()
            .flatten()
            .map(|g| &g.value)
            .find(|cached| *cached == value)
    }

    /// Number of cached values.
    pub fn len(&self) -> usize {
        self.buckets
            .iter()
            .map(|b| usize::from(b.young.is_some()) + usize::from(b.old.is_some()))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Upper bound on `len()`.
    pub fn capacity(&self) -> usize {
        self.buckets.len() * 2
    }
}
