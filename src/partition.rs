//! Piecewise-constant functions of one real variable.
//!
//! A [`Partition`] is a run-length encoding of a total function over
//! `(-∞, +∞)`: an ordered list of `(end, value)` entries where entry *i*
//! covers everything after the end of entry *i-1* up to its own end. The
//! last end is always [`UPPER_SENTINEL`].
//!
//! ```text
//!   a until -10] , b until 10] , a until +∞)
//!   ───a───────────]──────b──────]──────a──────▶
//! ```
//!
//! # Invariants
//!
//! - End points are strictly increasing and the last one is `+∞`.
//! - Adjacent entries never carry equal values: every operation merges runs
//!   whose values became equal. For diagram children, equality is pointer
//!   identity of canonical nodes.

use std::fmt::{Display, Formatter};
use std::iter::Peekable;

use crate::interval::{Boundary, HalfInterval, Interval, LOWER_SENTINEL, UPPER_SENTINEL};
use crate::utils::Murmur;

const TAG_OPEN: u64 = 0x239b_961b_ab0e_9789;
const TAG_CLOSED: u64 = 0x38b3_4ae5_a1e3_8b93;

#[derive(Debug, Clone, PartialEq)]
pub struct Partition<V> {
    entries: Vec<(HalfInterval, V)>,
}

/// Append a run, merging it with the previous one when the values are equal.
fn push_merged<V: PartialEq>(entries: &mut Vec<(HalfInterval, V)>, end: HalfInterval, value: V) {
    match entries.last_mut() {
        Some((last_end, last_value)) if *last_value == value => *last_end = end,
        _ => entries.push((end, value)),
    }
}

impl<V> Partition<V> {
    /// The constant function `default`.
    pub fn new(default: V) -> Self {
        Self {
            entries: vec![(UPPER_SENTINEL, default)],
        }
    }

    /// Number of runs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`: a partition has at least one run.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check whether the partition has a single run, i.e. is constant.
    pub fn is_trivial(&self) -> bool {
        self.entries.len() == 1
    }

    pub fn first_value(&self) -> &V {
        &self.entries[0].1
    }

    /// Iterate over the raw `(end, value)` entries.
    pub fn iter(&self) -> std::slice::Iter<'_, (HalfInterval, V)> {
        self.entries.iter()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, value)| value)
    }

    /// The value at `point`.
    ///
    /// # Panics
    ///
    /// Panics if no run contains the point, which only happens for `+∞`, NaN,
    /// or a broken partition.
    pub fn lookup(&self, point: f64) -> &V {
        for (end, value) in &self.entries {
            if end.contains(point) {
                return value;
            }
        }
        panic!("Point {} is not covered by the partition", point)
    }

    /// Order-sensitive hash over `(end, tag, element)` triples and the length.
    pub fn hash_with(&self, mut element_hash: impl FnMut(&V) -> u64) -> u64 {
        let mut state = Murmur::new();
        for (end, value) in &self.entries {
            let tag = match end.boundary {
                Boundary::Open => TAG_OPEN,
                Boundary::Closed => TAG_CLOSED,
            };
            state.block(end.value_bits() ^ tag);
            state.xor(element_hash(value));
        }
        state.xor(self.entries.len() as u64);
        state.finish()
    }

    /// All runs, left to right.
    pub fn runs(&self) -> Runs<'_, V> {
        Runs::new(self, RunFilter::All)
    }

    /// Runs that overlap `interval`.
    ///
    /// # Panics
    ///
    /// Panics if the interval is empty.
    pub fn covers(&self, interval: &Interval) -> Runs<'_, V> {
        assert!(!interval.is_empty(), "Query interval {} is empty", interval);
        Runs::new(self, RunFilter::Overlapping(*interval))
    }

    /// Runs entirely contained in `interval`.
    ///
    /// # Panics
    ///
    /// Panics if the interval is empty.
    pub fn covered_by(&self, interval: &Interval) -> Runs<'_, V> {
        assert!(!interval.is_empty(), "Query interval {} is empty", interval);
        Runs::new(self, RunFilter::CoveredBy(*interval))
    }

    /// Intervals of the runs whose value satisfies `predicate`.
    pub fn filter(&self, mut predicate: impl FnMut(&V) -> bool) -> Vec<Interval> {
        self.runs()
            .filter(|run| predicate(run.value))
            .map(|run| run.interval())
            .collect()
    }

    /// Left fold over the values of the runs.
    pub fn foldl<B>(&self, init: B, f: impl FnMut(B, &V) -> B) -> B {
        self.values().fold(init, f)
    }

    /// Apply `f` to every value, merging runs that map to equal values.
    pub fn map<B>(&self, mut f: impl FnMut(&V) -> B) -> Partition<B>
    where
        B: PartialEq,
    {
        let mut entries = Vec::with_capacity(self.entries.len());
        for (end, value) in &self.entries {
            push_merged(&mut entries, *end, f(value));
        }
        Partition { entries }
    }

    /// Combine two partitions point by point.
    ///
    /// The result breaks at the union of both partitions' end points (minus
    /// those where the combined values agree).
    pub fn merge<W, B>(&self, other: &Partition<W>, mut f: impl FnMut(&V, &W) -> B) -> Partition<B>
    where
        B: PartialEq,
    {
        let mut entries = Vec::with_capacity(self.entries.len() + other.entries.len());
        for (end, lhs, rhs) in self.segments(other) {
            push_merged(&mut entries, end, f(lhs, rhs));
        }
        Partition { entries }
    }

    /// Walk the common refinement of two partitions.
    ///
    /// Yields `(end, lhs, rhs)` for every segment delimited by the union of
    /// both partitions' end points, left to right.
    pub fn segments<'a, W>(&'a self, other: &'a Partition<W>) -> Segments<'a, V, W> {
        Segments {
            lhs: self.entries.iter().peekable(),
            rhs: other.entries.iter().peekable(),
        }
    }

    /// Check the ordering and sentinel invariants, and the compaction one if
    /// values can be compared.
    pub fn check_invariants(&self) -> bool
    where
        V: PartialEq,
    {
        let Some((last, _)) = self.entries.last() else {
            return false;
        };
        if *last != UPPER_SENTINEL {
            return false;
        }
        self.entries
            .windows(2)
            .all(|w| w[0].0.lt(&w[1].0) && w[0].1 != w[1].1)
    }
}

impl<V> Partition<V>
where
    V: Clone + PartialEq,
{
    /// Splice `value` over `interval`.
    ///
    /// Runs fully covered by the interval disappear, runs straddling one of
    /// its ends are cut, and boundaries are only created where the values on
    /// both sides differ.
    ///
    /// # Panics
    ///
    /// Panics if the interval is empty.
    pub fn insert(&mut self, interval: &Interval, value: V) {
        assert!(!interval.is_empty(), "Cannot insert an empty interval {}", interval);

        let before = interval.starts_after();
        let end = interval.ends();

        let old = std::mem::take(&mut self.entries);
        let mut entries = Vec::with_capacity(old.len() + 2);
        let mut iter = old.into_iter().peekable();

        // Runs ending before the interval starts are untouched.
        let mut previous = LOWER_SENTINEL;
        while let Some(entry) = iter.next_if(|(e, _)| e.le(&before)) {
            previous = entry.0;
            entries.push(entry);
        }

        // The run in which the interval starts keeps its head.
        if let Some((_, v)) = iter.peek() {
            if previous.lt(&before) && *v != value {
                entries.push((before, v.clone()));
            }
        }

        // Runs ending inside the interval are swallowed.
        while iter.next_if(|(e, _)| e.le(&end)).is_some() {}

        if matches!(entries.last(), Some((_, v)) if *v == value) {
            entries.pop();
        }
        match iter.peek() {
            // The run in which the interval ends carries the same value.
            Some((_, v)) if *v == value => {}
            _ => entries.push((end, value)),
        }
        entries.extend(iter);

        self.entries = entries;
        debug_assert!(self.check_invariants(), "Partition invariants are broken");
    }
}

impl<V: Display> Display for Partition<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, (end, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} until {}", value, end)?;
        }
        Ok(())
    }
}

/// Which runs a [`Runs`] iterator yields.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum RunFilter {
    All,
    /// Runs sharing at least one point with the interval.
    Overlapping(Interval),
    /// Runs contained in the interval.
    CoveredBy(Interval),
}

impl RunFilter {
    pub fn accepts(&self, run: &Interval) -> bool {
        match self {
            RunFilter::All => true,
            RunFilter::Overlapping(query) => run.overlaps(query),
            RunFilter::CoveredBy(query) => query.covers(run),
        }
    }
}

/// A run of a partition with its reconstructed left boundary.
#[derive(Debug)]
pub struct Run<'a, V> {
    /// Left boundary of the run (`(-∞, Open)` for the first one).
    pub lower: HalfInterval,
    /// End point of the run.
    pub upper: HalfInterval,
    pub value: &'a V,
}

impl<V> Clone for Run<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for Run<'_, V> {}

impl<V> Run<'_, V> {
    pub fn interval(&self) -> Interval {
        Interval::new(self.lower, self.upper)
    }
}

/// Lazy forward iterator over the runs of a partition.
///
/// Cloning the iterator restarts nothing: the clone continues from the same
/// position. Call [`Partition::runs`] (or `covers`/`covered_by`) again to
/// start over.
#[derive(Debug)]
pub struct Runs<'a, V> {
    entries: std::slice::Iter<'a, (HalfInterval, V)>,
    lower: HalfInterval,
    filter: RunFilter,
}

impl<V> Clone for Runs<'_, V> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            lower: self.lower,
            filter: self.filter,
        }
    }
}

impl<'a, V> Runs<'a, V> {
    pub fn new(partition: &'a Partition<V>, filter: RunFilter) -> Self {
        Self {
            entries: partition.entries.iter(),
            lower: LOWER_SENTINEL,
            filter,
        }
    }
}

impl<'a, V> Iterator for Runs<'a, V> {
    type Item = Run<'a, V>;

    fn next(&mut self) -> Option<Self::Item> {
        for (upper, value) in self.entries.by_ref() {
            let run = Run {
                lower: self.lower,
                upper: *upper,
                value,
            };
            if !upper.is_upper_sentinel() {
                self.lower = upper.complement();
            }
            if self.filter.accepts(&run.interval()) {
                return Some(run);
            }
        }
        None
    }
}

/// Synchronized scan over two partitions, see [`Partition::segments`].
#[derive(Debug)]
pub struct Segments<'a, V, W> {
    lhs: Peekable<std::slice::Iter<'a, (HalfInterval, V)>>,
    rhs: Peekable<std::slice::Iter<'a, (HalfInterval, W)>>,
}

impl<'a, V, W> Iterator for Segments<'a, V, W> {
    type Item = (HalfInterval, &'a V, &'a W);

    fn next(&mut self) -> Option<Self::Item> {
        let lhs: &'a (HalfInterval, V) = *self.lhs.peek()?;
        let rhs: &'a (HalfInterval, W) = *self.rhs.peek()?;
        let end = lhs.0.min(rhs.0);
        if lhs.0.le(&end) {
            self.lhs.next();
        }
        if rhs.0.le(&end) {
            self.rhs.next();
        }
        Some((end, &lhs.1, &rhs.1))
    }
}
