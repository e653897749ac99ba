//! Storage of terminal values.
//!
//! Terminals are deduplicated with the lattice's own `equal`/`hash` pair, not
//! with the type's `PartialEq`: two floats the lattice considers equal share
//! one index, and therefore one terminal node.

use std::collections::HashMap;

use log::trace;

use crate::lattice::Lattice;

#[derive(Debug, Clone)]
pub struct TerminalStore<T> {
    values: Vec<T>,
    /// Lattice hash -> chain of indices with that hash.
    buckets: HashMap<u64, Vec<usize>>,
}

impl<T> Default for TerminalStore<T> {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            buckets: HashMap::new(),
        }
    }
}

impl<T> TerminalStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the index of `value`, storing it if no equal value is present.
    pub fn put<L>(&mut self, lattice: &L, value: T) -> usize
    where
        L: Lattice<T>,
    {
        let hash = lattice.hash(&value);
        let chain = self.buckets.entry(hash).or_default();
        for &index in chain.iter() {
            if lattice.equal(&self.values[index], &value) {
                return index;
            }
        }
        let index = self.values.len();
        trace!("new terminal #{} (hash = {:#x})", index, hash);
        chain.push(index);
        self.values.push(value);
        index
    }

    /// Find the index of `value` without storing it.
    pub fn find<L>(&self, lattice: &L, value: &T) -> Option<usize>
    where
        L: Lattice<T>,
    {
        self.buckets
            .get(&lattice.hash(value))?
            .iter()
            .copied()
            .find(|&index| lattice.equal(&self.values[index], value))
    }

    /// The value with the given index.
    ///
    /// # Panics
    ///
    /// Panics if the index was never handed out.
    pub fn get(&self, index: usize) -> &T {
        assert!(
            index < self.values.len(),
            "Terminal index {} is out of range (size = {})",
            index,
            self.values.len()
        );
        &self.values[index]
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.values.iter().enumerate()
    }
}
