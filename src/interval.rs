//! Interval arithmetic over the extended reals.
//!
//! Partitions store only the *right* end of every run, so most of the
//! machinery here revolves around [`HalfInterval`]: a real value paired with
//! a [`Boundary`] telling whether the value itself is included.
//!
//! ```text
//! (3.0, Closed)  ~  "up to and including 3"   ~  ..3]
//! (3.0, Open)    ~  "up to but excluding 3"   ~  ..3)
//! ```
//!
//! End points are totally ordered (NaN is never a valid boundary): values are
//! compared first, and at equal values an open end point comes strictly
//! before a closed one.
//!
//! An [`Interval`] is a pair of half intervals: the lower one is a *left*
//! boundary (the complement of the end point just before the interval), the
//! upper one a regular end point.

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// Whether a boundary value belongs to the interval.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Boundary {
    Open,
    Closed,
}

impl Boundary {
    pub const fn complement(self) -> Self {
        match self {
            Boundary::Open => Boundary::Closed,
            Boundary::Closed => Boundary::Open,
        }
    }

    pub const fn is_open(self) -> bool {
        matches!(self, Boundary::Open)
    }

    pub const fn is_closed(self) -> bool {
        matches!(self, Boundary::Closed)
    }
}

impl Display for Boundary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Boundary::Open => write!(f, "Open"),
            Boundary::Closed => write!(f, "Closed"),
        }
    }
}

/// A value with an open/closed marker.
///
/// Unless stated otherwise, a half interval is interpreted as the right end
/// of some run.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HalfInterval {
    pub value: f64,
    pub boundary: Boundary,
}

/// The canonical lowest bound, `-∞` (always open).
pub const LOWER_SENTINEL: HalfInterval = HalfInterval::open(f64::NEG_INFINITY);
/// The end of every partition, `+∞` (always open).
pub const UPPER_SENTINEL: HalfInterval = HalfInterval::open(f64::INFINITY);

impl HalfInterval {
    pub const fn new(value: f64, boundary: Boundary) -> Self {
        Self { value, boundary }
    }

    pub const fn open(value: f64) -> Self {
        Self::new(value, Boundary::Open)
    }

    pub const fn closed(value: f64) -> Self {
        Self::new(value, Boundary::Closed)
    }

    pub fn is_lower_sentinel(&self) -> bool {
        self.value == f64::NEG_INFINITY
    }

    pub fn is_upper_sentinel(&self) -> bool {
        self.value == f64::INFINITY
    }

    /// Turn the end of a run into the start of the run that follows it.
    ///
    /// `-∞` maps to the open lower sentinel. The complement of `+∞` does not
    /// exist: nothing starts after the end of the real line.
    pub fn complement(&self) -> Self {
        assert!(
            !self.is_upper_sentinel(),
            "Cannot complement the upper sentinel"
        );
        if self.is_lower_sentinel() {
            LOWER_SENTINEL
        } else {
            Self::new(self.value, self.boundary.complement())
        }
    }

    /// Check whether `self`, the end of a run, comes before `start`, the
    /// start of another one.
    pub fn ends_before(&self, start: &HalfInterval) -> bool {
        self.value < start.value || (self.value == start.value && self.boundary.is_open())
    }

    /// End-point order: `self <= other`.
    pub fn le(&self, other: &HalfInterval) -> bool {
        self.value < other.value
            || (self.value == other.value
                && (self.boundary.is_open() || other.boundary.is_closed()))
    }

    /// End-point order: `self < other`.
    pub fn lt(&self, other: &HalfInterval) -> bool {
        self.value < other.value
            || (self.value == other.value
                && self.boundary.is_open()
                && other.boundary.is_closed())
    }

    /// Check whether the point lies at or before this end point.
    pub fn contains(&self, point: f64) -> bool {
        point < self.value || (point == self.value && self.boundary.is_closed())
    }

    /// The end point that ends first.
    pub fn min(self, other: HalfInterval) -> HalfInterval {
        if self.ends_before(&other) {
            self
        } else {
            other
        }
    }

    /// Bits of the value with the sign of zero normalised, so that points
    /// equal under `==` hash identically.
    pub(crate) fn value_bits(&self) -> u64 {
        if self.value == 0.0 {
            0.0f64.to_bits()
        } else {
            self.value.to_bits()
        }
    }
}

impl PartialOrd for HalfInterval {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.value.partial_cmp(&other.value)? {
            Ordering::Equal => Some(match (self.boundary, other.boundary) {
                (Boundary::Open, Boundary::Closed) => Ordering::Less,
                (Boundary::Closed, Boundary::Open) => Ordering::Greater,
                _ => Ordering::Equal,
            }),
            ord => Some(ord),
        }
    }
}

impl Display for HalfInterval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.boundary {
            Boundary::Open => write!(f, "{})", self.value),
            Boundary::Closed => write!(f, "{}]", self.value),
        }
    }
}

/// An interval of the real line.
///
/// `lower` is a left boundary: `(a, Closed)` means "starting at `a`
/// inclusive". `upper` is a regular end point.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Interval {
    pub lower: HalfInterval,
    pub upper: HalfInterval,
}

impl Interval {
    /// Build an interval from a left boundary and an end point.
    ///
    /// Infinite ends are always open: `[0; +∞]` is stored as `[0; +∞)`, and
    /// a lower end at `-∞` becomes the lower sentinel.
    ///
    /// # Panics
    ///
    /// Panics if either end is NaN.
    pub fn new(lower: HalfInterval, upper: HalfInterval) -> Self {
        assert!(!lower.value.is_nan(), "NaN is not a valid boundary");
        assert!(!upper.value.is_nan(), "NaN is not a valid boundary");
        let lower = if lower.is_lower_sentinel() { LOWER_SENTINEL } else { lower };
        let upper = if upper.is_upper_sentinel() { UPPER_SENTINEL } else { upper };
        Self { lower, upper }
    }

    /// Build an interval from its four components.
    pub fn from_bounds(low: f64, low_boundary: Boundary, high: f64, high_boundary: Boundary) -> Self {
        Self::new(
            HalfInterval::new(low, low_boundary),
            HalfInterval::new(high, high_boundary),
        )
    }

    /// The run that starts right after the end point `previous` and ends at `end`.
    pub fn after(previous: HalfInterval, end: HalfInterval) -> Self {
        Self::new(previous.complement(), end)
    }

    /// `[low; high]`
    pub fn closed(low: f64, high: f64) -> Self {
        Self::from_bounds(low, Boundary::Closed, high, Boundary::Closed)
    }

    /// `(low; high)`
    pub fn open(low: f64, high: f64) -> Self {
        Self::from_bounds(low, Boundary::Open, high, Boundary::Open)
    }

    /// `(low; high]`
    pub fn left_open(low: f64, high: f64) -> Self {
        Self::from_bounds(low, Boundary::Open, high, Boundary::Closed)
    }

    /// `[low; high)`
    pub fn right_open(low: f64, high: f64) -> Self {
        Self::from_bounds(low, Boundary::Closed, high, Boundary::Open)
    }

    /// `[value; value]`
    pub fn singleton(value: f64) -> Self {
        Self::closed(value, value)
    }

    /// The whole real line, `(-∞; +∞)`.
    pub fn full() -> Self {
        Self::new(LOWER_SENTINEL, UPPER_SENTINEL)
    }

    pub fn is_empty(&self) -> bool {
        self.lower.value > self.upper.value
            || (self.lower.value == self.upper.value
                && (self.lower.boundary.is_open() || self.upper.boundary.is_open()))
    }

    pub fn is_singleton(&self) -> bool {
        self.lower.value == self.upper.value
            && self.lower.boundary.is_closed()
            && self.upper.boundary.is_closed()
    }

    pub fn contains(&self, point: f64) -> bool {
        (point > self.lower.value || (point == self.lower.value && self.lower.boundary.is_closed()))
            && self.upper.contains(point)
    }

    /// The end point just before the interval: the interval starts after it.
    pub fn starts_after(&self) -> HalfInterval {
        assert!(
            !self.lower.is_upper_sentinel(),
            "An interval cannot start at the upper sentinel"
        );
        if self.lower.is_lower_sentinel() {
            LOWER_SENTINEL
        } else {
            HalfInterval::new(self.lower.value, self.lower.boundary.complement())
        }
    }

    /// The end point of the interval.
    pub fn ends(&self) -> HalfInterval {
        self.upper
    }

    /// Check whether the two intervals share at least one point.
    pub fn overlaps(&self, other: &Interval) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        let (s1, e1) = (self.starts_after(), self.ends());
        let (s2, e2) = (other.starts_after(), other.ends());
        (s1.le(&s2) && s2.lt(&e1)) || (s2.le(&s1) && s1.lt(&e2))
    }

    /// Check whether `inner` is entirely contained in `self`.
    pub fn covers(&self, inner: &Interval) -> bool {
        !self.is_empty()
            && !inner.is_empty()
            && self.starts_after().le(&inner.starts_after())
            && inner.ends().le(&self.ends())
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.lower.boundary {
            Boundary::Open => write!(f, "(")?,
            Boundary::Closed => write!(f, "[")?,
        }
        write!(f, "{};{}", self.lower.value, self.upper)
    }
}
