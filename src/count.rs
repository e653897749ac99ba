use std::collections::HashMap;

use num_bigint::BigUint;

use crate::lattice::Lattice;
use crate::manager::IddManager;
use crate::node::{Idd, NodeKind};

impl<V, T, L> IddManager<V, T, L>
where
    L: Lattice<T>,
{
    /// Number of distinct root-to-terminal paths.
    ///
    /// Shared sub-diagrams are counted once per path reaching them, so the
    /// result may be exponential in the size of the diagram.
    pub fn path_count(&self, node: &Idd) -> BigUint {
        self.assert_owned(node);
        let mut cache = HashMap::new();
        self._path_count(node, &mut cache)
    }

    fn _path_count(&self, node: &Idd, cache: &mut HashMap<usize, BigUint>) -> BigUint {
        let partition = match node.kind() {
            NodeKind::Terminal { .. } => return BigUint::from(1u32),
            NodeKind::Internal { partition, .. } => partition,
        };

        if let Some(count) = cache.get(&node.id()) {
            return count.clone();
        }

        let mut count = BigUint::ZERO;
        for child in partition.values() {
            count += self._path_count(child, cache);
        }

        cache.insert(node.id(), count.clone());
        count
    }

    /// Number of paths of the diagram ending in each terminal, by terminal index.
    pub fn path_count_by_terminal(&self, node: &Idd) -> HashMap<usize, BigUint> {
        self.assert_owned(node);
        let mut cache = HashMap::new();
        self._path_count_by_terminal(node, &mut cache)
    }

    fn _path_count_by_terminal(
        &self,
        node: &Idd,
        cache: &mut HashMap<usize, HashMap<usize, BigUint>>,
    ) -> HashMap<usize, BigUint> {
        let partition = match node.kind() {
            NodeKind::Terminal { terminal } => return HashMap::from([(*terminal, BigUint::from(1u32))]),
            NodeKind::Internal { partition, .. } => partition,
        };

        if let Some(counts) = cache.get(&node.id()) {
            return counts.clone();
        }

        let mut counts: HashMap<usize, BigUint> = HashMap::new();
        for child in partition.values() {
            for (terminal, count) in self._path_count_by_terminal(child, cache) {
                *counts.entry(terminal).or_default() += count;
            }
        }

        cache.insert(node.id(), counts.clone());
        counts
    }
}
