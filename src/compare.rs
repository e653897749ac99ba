//! Pointwise comparison under the lattice order.

use log::{debug, trace};

use crate::cache::OpCache;
use crate::lattice::{Lattice, LatticeOrd};
use crate::manager::IddManager;
use crate::node::{Idd, NodeKind};
use crate::partition::Partition;

impl<V, T, L> IddManager<V, T, L>
where
    T: Clone,
    L: Lattice<T>,
{
    /// Compare two diagrams pointwise.
    ///
    /// The result is `Less` if `lhs(x) <= rhs(x)` everywhere and the two
    /// differ somewhere, `Equal` if they are the same function, `Greater`
    /// symmetrically, and `Unordered` otherwise.
    pub fn compare(&self, lhs: &Idd, rhs: &Idd) -> LatticeOrd {
        debug!("compare(lhs = {}, rhs = {})", lhs, rhs);
        self.assert_owned(lhs);
        self.assert_owned(rhs);
        let mut cache = OpCache::new(false, self.config().cache_bits);
        let res = self.compare_(lhs, rhs, &mut cache);
        debug!("compare: {} {} {}", lhs, res, rhs);
        res
    }

    fn compare_(&self, lhs: &Idd, rhs: &Idd, cache: &mut OpCache<Idd, LatticeOrd>) -> LatticeOrd {
        if lhs == rhs {
            return LatticeOrd::Equal;
        }
        if let Some(&res) = cache.get(lhs, rhs) {
            trace!("cache: compare({}, {}) -> {}", lhs, rhs, res);
            return res;
        }

        let res = match (lhs.kind(), rhs.kind()) {
            (NodeKind::Terminal { terminal: a }, NodeKind::Terminal { terminal: b }) => {
                self.lattice().compare(&self.terminal_at(*a), &self.terminal_at(*b))
            }
            (NodeKind::Terminal { .. }, NodeKind::Internal { .. }) => self.compare_(rhs, lhs, cache).flip(),
            (NodeKind::Internal { partition, .. }, NodeKind::Terminal { .. }) => {
                self.compare_children(partition, rhs, cache)
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
                    self.compare_children(p, rhs, cache)
                } else if y < x {
                    self.compare_children(q, lhs, cache).flip()
                } else {
                    let mut res = LatticeOrd::Equal;
                    for (_, a, b) in p.segments(q) {
                        res = res & self.compare_(a, b, cache);
                        if res == LatticeOrd::Unordered {
                            break;
                        }
                    }
                    res
                }
            }
        };

        trace!("computed: compare({}, {}) -> {}", lhs, rhs, res);
        cache.insert(lhs, rhs, res);
        cache.insert(rhs, lhs, res.flip());
        res
    }

    /// Compare every child of `partition` against the whole `other` node.
    fn compare_children(
        &self,
        partition: &Partition<Idd>,
        other: &Idd,
        cache: &mut OpCache<Idd, LatticeOrd>,
    ) -> LatticeOrd {
        let mut res = LatticeOrd::Equal;
        for child in partition.values() {
            res = res & self.compare_(child, other, cache);
            if res == LatticeOrd::Unordered {
                break;
            }
        }
        res
    }

    pub fn is_equivalent(&self, lhs: &Idd, rhs: &Idd) -> bool {
        self.compare(lhs, rhs) == LatticeOrd::Equal
    }

    pub fn is_less(&self, lhs: &Idd, rhs: &Idd) -> bool {
        self.compare(lhs, rhs) == LatticeOrd::Less
    }

    pub fn is_less_or_equal(&self, lhs: &Idd, rhs: &Idd) -> bool {
        self.compare(lhs, rhs).is_le()
    }

    pub fn is_greater(&self, lhs: &Idd, rhs: &Idd) -> bool {
        self.compare(lhs, rhs) == LatticeOrd::Greater
    }

    pub fn is_greater_or_equal(&self, lhs: &Idd, rhs: &Idd) -> bool {
        self.compare(lhs, rhs).is_ge()
    }
}
