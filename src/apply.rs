//! Pointwise combination of diagrams.
//!
//! [`IddManager::combine`] is the generalized *apply*: given two diagrams and a
//! binary function on terminals, it builds the diagram of `x ↦ f(lhs(x), rhs(x))`.
//!
//! ```text
//!   combine(T(a), T(b))                = T(f(a, b))
//!   combine(N(x, P), T(b))             = N(x, map(P, c ↦ combine(c, T(b))))
//!   combine(N(x, P), N(y, Q)), x < y   = N(x, map(P, c ↦ combine(c, N(y, Q))))
//!   combine(N(x, P), N(x, Q))          = N(x, merge(P, Q, combine))
//! ```
//!
//! Argument order is preserved throughout, so `f` does not need to be
//! commutative. Results are memoized in a per-call [`OpCache`].

use log::{debug, trace};

use crate::cache::OpCache;
use crate::lattice::Lattice;
use crate::manager::IddManager;
use crate::node::{Idd, NodeKind};

impl<V, T, L> IddManager<V, T, L>
where
    T: Clone,
    L: Lattice<T>,
{
    /// Combine two diagrams pointwise with `f`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::HashMap;
    ///
    /// use idd_rs::interval::Interval;
    /// use idd_rs::manager::IddManager;
    ///
    /// let manager = IddManager::<&str, i32>::new();
    /// manager.internalize_variable("x");
    /// let f = manager.from_box(&HashMap::from([("x", Interval::closed(0.0, 10.0))]), 5, 1);
    /// let g = manager.from_box(&HashMap::from([("x", Interval::closed(5.0, 20.0))]), 3, 0);
    ///
    /// let diff = manager.combine(&f, &g, |a, b| a - b);
    /// assert_eq!(manager.lookup(&diff, &HashMap::from([("x", 7.0)])), 2);
    /// assert_eq!(manager.lookup(&diff, &HashMap::from([("x", 15.0)])), -2);
    /// assert_eq!(manager.lookup(&diff, &HashMap::from([("x", -1.0)])), 1);
    /// ```
    pub fn combine(&self, lhs: &Idd, rhs: &Idd, mut f: impl FnMut(&T, &T) -> T) -> Idd {
        debug!("combine(lhs = {}, rhs = {})", lhs, rhs);
        self.assert_owned(lhs);
        self.assert_owned(rhs);
        let mut cache = OpCache::new(false, self.config().cache_bits);
        let res = self.combine_(lhs, rhs, &mut f, &mut cache);
        debug!(
            "combine: {} -> {} (cache: {} entries, {} hits, {} misses)",
            lhs,
            res,
            cache.len(),
            cache.hits(),
            cache.misses()
        );
        res
    }

    /// Same as [`combine`][IddManager::combine], for a commutative `f`.
    ///
    /// `(a, b)` and `(b, a)` share cache entries.
    pub fn combine_commutative(&self, lhs: &Idd, rhs: &Idd, mut f: impl FnMut(&T, &T) -> T) -> Idd {
        debug!("combine_commutative(lhs = {}, rhs = {})", lhs, rhs);
        self.assert_owned(lhs);
        self.assert_owned(rhs);
        let mut cache = OpCache::new(true, self.config().cache_bits);
        self.combine_(lhs, rhs, &mut f, &mut cache)
    }

    fn combine_<F>(&self, lhs: &Idd, rhs: &Idd, f: &mut F, cache: &mut OpCache<Idd, Idd>) -> Idd
    where
        F: FnMut(&T, &T) -> T,
    {
        if let Some(res) = cache.get(lhs, rhs) {
            trace!("cache: combine({}, {}) -> {}", lhs, rhs, res);
            return res.clone();
        }

        let res = match (lhs.kind(), rhs.kind()) {
            (NodeKind::Terminal { terminal: a }, NodeKind::Terminal { terminal: b }) => {
                let value = f(&self.terminal_at(*a), &self.terminal_at(*b));
                self.from_terminal(value)
            }
            (NodeKind::Internal { variable, partition }, NodeKind::Terminal { .. }) => {
                let partition = partition.map(|child| self.combine_(child, rhs, f, cache));
                self.mk_node(*variable, partition)
            }
            (NodeKind::Terminal { .. }, NodeKind::Internal { variable, partition }) => {
                let partition = partition.map(|child| self.combine_(lhs, child, f, cache));
                self.mk_node(*variable, partition)
            }
            (
                NodeKind::Internal {
                    variable: x,
                    partition: p,
                },
                NodeKind::Internal {
                    variable: y,
                    partition: q,
                },
            ) => {
                if x < y {
                    let partition = p.map(|child| self.combine_(child, rhs, f, cache));
                    self.mk_node(*x, partition)
                } else if y < x {
                    let partition = q.map(|child| self.combine_(lhs, child, f, cache));
                    self.mk_node(*y, partition)
                } else {
                    let partition = p.merge(q, |a, b| self.combine_(a, b, f, cache));
                    self.mk_node(*x, partition)
                }
            }
        };

        trace!("computed: combine({}, {}) -> {}", lhs, rhs, res);
        cache.insert(lhs, rhs, res.clone());
        res
    }

    /// Pointwise greatest lower bound.
    pub fn apply_and(&self, lhs: &Idd, rhs: &Idd) -> Idd {
        debug!("apply_and(lhs = {}, rhs = {})", lhs, rhs);
        if lhs == rhs {
            self.assert_owned(lhs);
            return lhs.clone();
        }
        let lattice = self.lattice();
        self.combine_commutative(lhs, rhs, |a, b| lattice.greatest_lower_bound(a, b))
    }

    /// Pointwise least upper bound.
    pub fn apply_or(&self, lhs: &Idd, rhs: &Idd) -> Idd {
        debug!("apply_or(lhs = {}, rhs = {})", lhs, rhs);
        if lhs == rhs {
            self.assert_owned(lhs);
            return lhs.clone();
        }
        let lattice = self.lattice();
        self.combine_commutative(lhs, rhs, |a, b| lattice.least_upper_bound(a, b))
    }

    /// Greatest lower bound of all `nodes`; `top` for none.
    pub fn apply_and_many<'a>(&self, nodes: impl IntoIterator<Item = &'a Idd>) -> Idd {
        debug!("apply_and_many(...)");
        let mut res = self.top();
        for node in nodes {
            res = self.apply_and(&res, node);
        }
        res
    }

    /// Least upper bound of all `nodes`; `bottom` for none.
    pub fn apply_or_many<'a>(&self, nodes: impl IntoIterator<Item = &'a Idd>) -> Idd {
        debug!("apply_or_many(...)");
        let mut res = self.bottom();
        for node in nodes {
            res = self.apply_or(&res, node);
        }
        res
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use test_log::test;

    use crate::interval::Interval;
    use crate::manager::IddManager;

    fn manager<T>() -> IddManager<&'static str, T>
    where
        T: Clone,
        crate::lattice::Natural: crate::lattice::Lattice<T>,
    {
        let m = IddManager::new();
        for v in ["x", "y", "z"] {
            m.internalize_variable(v);
        }
        m
    }

    #[test]
    fn test_xor_with_itself() {
        let m = manager::<bool>();
        let b = HashMap::from([("x", Interval::closed(0.0, 1.0))]);
        let dd = m.from_box(&b, true, false);

        let mut calls = 0;
        let res = m.combine(&dd, &dd, |a, b| {
            calls += 1;
            a ^ b
        });
        assert_eq!(calls, 2);
        assert_eq!(res, m.bottom());
    }

    #[test]
    fn test_terminals() {
        let m = manager::<i32>();
        let a = m.from_terminal(3);
        let b = m.from_terminal(4);
        let c = m.combine(&a, &b, |x, y| x * y);
        assert_eq!(m.terminal_value(&c), Some(12));
        assert_eq!(c, m.from_terminal(12));
    }

    #[test]
    fn test_argument_order_is_preserved() {
        let m = manager::<i32>();
        let f = m.from_box(&HashMap::from([("x", Interval::closed(0.0, 1.0))]), 10, 0);
        let g = m.from_box(&HashMap::from([("y", Interval::closed(0.0, 1.0))]), 3, 1);

        let fg = m.combine(&f, &g, |a, b| a - b);
        let gf = m.combine(&g, &f, |a, b| a - b);
        let at = |x: f64, y: f64| HashMap::from([("x", x), ("y", y)]);

        assert_eq!(m.lookup(&fg, &at(0.5, 0.5)), 7);
        assert_eq!(m.lookup(&gf, &at(0.5, 0.5)), -7);
        assert_eq!(m.lookup(&fg, &at(5.0, 0.5)), -3);
        assert_eq!(m.lookup(&gf, &at(0.5, 5.0)), -9);

        // Terminal on either side.
        let t = m.from_terminal(100);
        let ft = m.combine(&f, &t, |a, b| a - b);
        let tf = m.combine(&t, &f, |a, b| a - b);
        assert_eq!(m.lookup(&ft, &at(0.5, 0.0)), -90);
        assert_eq!(m.lookup(&tf, &at(0.5, 0.0)), 90);
    }

    #[test]
    fn test_combine_collapses() {
        let m = manager::<i32>();
        let f = m.from_box(&HashMap::from([("x", Interval::closed(0.0, 1.0))]), 1, 0);
        let g = m.from_box(&HashMap::from([("x", Interval::closed(0.0, 1.0))]), 2, 1);
        let diff = m.combine(&g, &f, |a, b| a - b);
        assert_eq!(diff, m.from_terminal(1));
    }

    #[test]
    fn test_and_or() {
        let m = manager::<bool>();
        let f = m.from_box(&HashMap::from([("x", Interval::closed(0.0, 2.0))]), true, false);
        let g = m.from_box(&HashMap::from([("x", Interval::closed(1.0, 3.0))]), true, false);

        let and = m.apply_and(&f, &g);
        let expected = m.from_box(&HashMap::from([("x", Interval::closed(1.0, 2.0))]), true, false);
        assert_eq!(and, expected);

        let or = m.apply_or(&f, &g);
        let expected = m.from_box(&HashMap::from([("x", Interval::closed(0.0, 3.0))]), true, false);
        assert_eq!(or, expected);

        assert_eq!(m.apply_and(&f, &g), m.apply_and(&g, &f));
        assert_eq!(m.apply_or(&f, &g), m.apply_or(&g, &f));
    }

    #[test]
    fn test_idempotence_and_absorption() {
        let m = manager::<bool>();
        let f = m.from_box(
            &HashMap::from([("x", Interval::closed(0.0, 2.0)), ("z", Interval::open(-1.0, 1.0))]),
            true,
            false,
        );
        assert_eq!(m.apply_and(&f, &f), f);
        assert_eq!(m.apply_or(&f, &f), f);
        assert_eq!(m.combine_commutative(&f, &f, |a, b| a & b), f);
        assert_eq!(m.apply_and(&m.bottom(), &f), m.bottom());
        assert_eq!(m.apply_or(&m.top(), &f), m.top());
        assert_eq!(m.apply_and(&m.top(), &f), f);
        assert_eq!(m.apply_or(&m.bottom(), &f), f);
    }

    #[test]
    fn test_many() {
        let m = manager::<bool>();
        let boxes = [
            HashMap::from([("x", Interval::closed(0.0, 4.0))]),
            HashMap::from([("x", Interval::closed(1.0, 5.0))]),
            HashMap::from([("y", Interval::closed(0.0, 1.0))]),
        ];
        let nodes: Vec<_> = boxes.iter().map(|b| m.from_box(b, true, false)).collect();

        let all = m.apply_and_many(&nodes);
        let expected = m.from_box(
            &HashMap::from([("x", Interval::closed(1.0, 4.0)), ("y", Interval::closed(0.0, 1.0))]),
            true,
            false,
        );
        assert_eq!(all, expected);

        let any = m.apply_or_many(&nodes);
        assert!(m.lookup(&any, &HashMap::from([("x", 5.0), ("y", 7.0)])));
        assert!(m.lookup(&any, &HashMap::from([("x", -5.0), ("y", 0.5)])));
        assert!(!m.lookup(&any, &HashMap::from([("x", -5.0), ("y", 7.0)])));

        assert_eq!(m.apply_and_many([]), m.top());
        assert_eq!(m.apply_or_many([]), m.bottom());
    }

    #[test]
    #[should_panic(expected = "belongs to manager")]
    fn test_cross_manager_combine() {
        let m1 = manager::<bool>();
        let m2 = manager::<bool>();
        m1.apply_and(&m1.top(), &m2.bottom());
    }
}
