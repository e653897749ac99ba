//! Dense bidirectional ids for first-seen values.
//!
//! The manager uses an [`Internalizer`] for variables: the id handed out on
//! first use is the variable's position in the diagram order.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone)]
pub struct Internalizer<T> {
    by_value: HashMap<T, usize>,
    by_index: Vec<T>,
}

impl<T> Default for Internalizer<T> {
    fn default() -> Self {
        Self {
            by_value: HashMap::new(),
            by_index: Vec::new(),
        }
    }
}

impl<T> Internalizer<T> {
    pub fn len(&self) -> usize {
        debug_assert_eq!(self.by_value.len(), self.by_index.len());
        self.by_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_index.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.by_index.iter().enumerate()
    }
}

impl<T> Internalizer<T>
where
    T: Hash + Eq + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id of `value`, allocating the next one if it is new.
    pub fn internalize(&mut self, value: T) -> usize {
        if let Some(&index) = self.by_value.get(&value) {
            return index;
        }
        let index = self.by_index.len();
        self.by_index.push(value.clone());
        self.by_value.insert(value, index);
        index
    }

    /// The value with the given id.
    ///
    /// # Panics
    ///
    /// Panics if the id was never allocated.
    pub fn at(&self, index: usize) -> &T {
        assert!(
            index < self.by_index.len(),
            "Index {} is out of range (size = {})",
            index,
            self.by_index.len()
        );
        &self.by_index[index]
    }

    /// The id of an already internalized value.
    ///
    /// # Panics
    ///
    /// Panics if the value is unknown.
    pub fn index(&self, value: &T) -> usize {
        match self.by_value.get(value) {
            Some(&index) => index,
            None => panic!("Value is not internalized"),
        }
    }

    pub fn get_index(&self, value: &T) -> Option<usize> {
        self.by_value.get(value).copied()
    }

    pub fn contains(&self, value: &T) -> bool {
        self.by_value.contains_key(value)
    }

    /// Order two internalized values by their ids.
    pub fn compare(&self, v1: &T, v2: &T) -> Ordering {
        self.index(v1).cmp(&self.index(v2))
    }

    pub fn clear(&mut self) {
        self.by_value.clear();
        self.by_index.clear();
    }

    /// Clear, then internalize `values` in order. Invalidates all ids.
    pub fn clear_keeping(&mut self, values: impl IntoIterator<Item = T>) {
        self.clear();
        for value in values {
            self.internalize(value);
        }
    }

    /// Renumber the ids in place.
    ///
    /// `permutation` maps old ids to new ids; ids absent from the map keep
    /// their number. The result must again be a bijection on `0..len`.
    pub fn permute(&mut self, permutation: &HashMap<usize, usize>) {
        let n = self.by_index.len();
        let mut slots: Vec<Option<T>> = vec![None; n];
        for (old, value) in self.by_index.drain(..).enumerate() {
            let new = permutation.get(&old).copied().unwrap_or(old);
            assert!(new < n, "Permuted index {} is out of range (size = {})", new, n);
            assert!(slots[new].is_none(), "Permutation maps two ids to {}", new);
            slots[new] = Some(value);
        }
        self.by_index = slots.into_iter().flatten().collect();
        assert_eq!(self.by_index.len(), n, "Permutation is not a bijection");
        for (index, value) in self.by_index.iter().enumerate() {
            self.by_value.insert(value.clone(), index);
        }
    }
}
