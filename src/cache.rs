//! Memoization of binary operations.
//!
//! Every top-level operation (`combine`, `compare`, ...) creates a fresh
//! [`OpCache`] and threads it through its recursion, so cached results never
//! outlive the call. Keys hold the operands themselves, which keeps them
//! alive for as long as the cache exists.

use std::collections::HashMap;
use std::hash::Hash;

use crate::utils::MyHash;

/// A cache of `(lhs, rhs) -> result`, backed by a [HashMap].
///
/// A commutative cache stores `(a, b)` and `(b, a)` in the same slot, ordering
/// the pair by [`MyHash::hash`] of the operands.
#[derive(Debug)]
pub struct OpCache<K, R> {
    map: HashMap<(K, K), R>,
    commutative: bool,
    hits: usize,
    misses: usize,
}

impl<K, R> OpCache<K, R> {
    /// Create a cache pre-sized for `2^bits` entries.
    pub fn new(commutative: bool, bits: usize) -> Self {
        assert!(bits <= 31, "Bits should be in the range 0..=31");
        Self {
            map: HashMap::with_capacity(1 << bits),
            commutative,
            hits: 0,
            misses: 0,
        }
    }

    pub fn is_commutative(&self) -> bool {
        self.commutative
    }

    /// Returns the number of entries in the cache.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns the number of cache hits.
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Returns the number of cache misses.
    pub fn misses(&self) -> usize {
        self.misses
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }
}

impl<K, R> OpCache<K, R>
where
    K: Hash + Eq + Clone + MyHash,
{
    fn key(&self, lhs: &K, rhs: &K) -> (K, K) {
        if self.commutative && MyHash::hash(lhs) > MyHash::hash(rhs) {
            (rhs.clone(), lhs.clone())
        } else {
            (lhs.clone(), rhs.clone())
        }
    }

    /// Looks up the result for `(lhs, rhs)`.
    pub fn get(&mut self, lhs: &K, rhs: &K) -> Option<&R> {
        let key = self.key(lhs, rhs);
        match self.map.get(&key) {
            Some(r) => {
                self.hits += 1;
                Some(r)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn contains(&self, lhs: &K, rhs: &K) -> bool {
        self.map.contains_key(&self.key(lhs, rhs))
    }

    pub fn insert(&mut self, lhs: &K, rhs: &K, result: R) {
        let key = self.key(lhs, rhs);
        self.map.insert(key, result);
    }
}
