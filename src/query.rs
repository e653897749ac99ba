//! Point lookups, traversals and box queries.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use log::debug;

use crate::interval::Interval;
use crate::lattice::Lattice;
use crate::manager::IddManager;
use crate::node::{Idd, NodeKind};

impl<V, T, L> IddManager<V, T, L>
where
    V: Hash + Eq + Clone,
    T: Clone,
    L: Lattice<T>,
{
    /// Evaluate the diagram at `point`.
    ///
    /// # Panics
    ///
    /// Panics if the point has no coordinate for a variable on the path.
    pub fn lookup(&self, node: &Idd, point: &HashMap<V, f64>) -> T {
        self.assert_owned(node);
        let mut current = node;
        loop {
            match current.kind() {
                NodeKind::Terminal { terminal } => return self.terminal_at(*terminal),
                NodeKind::Internal { variable, partition } => {
                    let x = match point.get(&self.variable_at(*variable)) {
                        Some(&x) => x,
                        None => panic!("Point has no coordinate for variable #{}", variable),
                    };
                    current = partition.lookup(x);
                }
            }
        }
    }

    /// Visit every distinct node reachable from `node`, parents first.
    pub fn traverse(&self, node: &Idd, mut visit: impl FnMut(&Idd)) {
        self.assert_owned(node);
        let mut visited = HashSet::new();
        self.traverse_(node, &mut visited, &mut visit);
    }

    fn traverse_<F>(&self, node: &Idd, visited: &mut HashSet<usize>, visit: &mut F)
    where
        F: FnMut(&Idd),
    {
        if !visited.insert(node.id()) {
            return;
        }
        visit(node);
        if let NodeKind::Internal { partition, .. } = node.kind() {
            for child in partition.values() {
                self.traverse_(child, visited, visit);
            }
        }
    }

    /// Visit every node once per edge leading to it, parents first.
    pub fn traverse_all(&self, node: &Idd, mut visit: impl FnMut(&Idd)) {
        self.assert_owned(node);
        let mut stack = vec![node];
        while let Some(node) = stack.pop() {
            visit(node);
            if let NodeKind::Internal { partition, .. } = node.kind() {
                let children: Vec<&Idd> = partition.values().collect();
                stack.extend(children.into_iter().rev());
            }
        }
    }

    /// Number of distinct nodes in the diagram, terminals included.
    pub fn size(&self, node: &Idd) -> usize {
        let mut size = 0;
        self.traverse(node, |_| size += 1);
        size
    }

    /// Terminal values reachable from `node` through runs overlapping the box.
    ///
    /// Values are distinct under the lattice equality and listed in discovery
    /// order. Variables absent from the box are unconstrained.
    ///
    /// # Panics
    ///
    /// Panics if an interval of the box is empty.
    pub fn inf_terminal_cover(&self, node: &Idd, b: &HashMap<V, Interval>) -> Vec<T> {
        debug!("inf_terminal_cover(node = {})", node);
        self.assert_owned(node);
        let window = self.index_box(b);
        let mut visited = HashSet::new();
        let mut found = Vec::new();
        self.terminal_cover_(node, &window, &mut visited, &mut found);
        found.into_iter().map(|t| self.terminal_at(t)).collect()
    }

    fn terminal_cover_(
        &self,
        node: &Idd,
        window: &HashMap<usize, Interval>,
        visited: &mut HashSet<usize>,
        found: &mut Vec<usize>,
    ) {
        if !visited.insert(node.id()) {
            return;
        }
        match node.kind() {
            NodeKind::Terminal { terminal } => {
                if !found.contains(terminal) {
                    found.push(*terminal);
                }
            }
            NodeKind::Internal { variable, partition } => {
                let interval = window.get(variable).copied().unwrap_or_else(Interval::full);
                for run in partition.covers(&interval) {
                    self.terminal_cover_(run.value, window, visited, found);
                }
            }
        }
    }

    /// Runs of the diagram that overlap the box but stick out of it.
    ///
    /// For each box variable the diagram branches on, the first map holds the
    /// run sticking out on the left of the box that reaches furthest right,
    /// and the second map the run sticking out on the right that starts
    /// furthest left. Only runs reachable through the box are considered.
    ///
    /// # Panics
    ///
    /// Panics if an interval of the box is empty.
    pub fn partial_overlaps(
        &self,
        node: &Idd,
        b: &HashMap<V, Interval>,
    ) -> (HashMap<V, Interval>, HashMap<V, Interval>) {
        debug!("partial_overlaps(node = {})", node);
        self.assert_owned(node);
        let window = self.index_box(b);
        let mut visited = HashSet::new();
        let mut lhs = HashMap::new();
        let mut rhs = HashMap::new();
        self.partial_overlaps_(node, &window, &mut visited, &mut lhs, &mut rhs);
        let named = |m: HashMap<usize, Interval>| {
            m.into_iter()
                .map(|(v, interval)| (self.variable_at(v), interval))
                .collect::<HashMap<_, _>>()
        };
        (named(lhs), named(rhs))
    }

    fn partial_overlaps_(
        &self,
        node: &Idd,
        window: &HashMap<usize, Interval>,
        visited: &mut HashSet<usize>,
        lhs: &mut HashMap<usize, Interval>,
        rhs: &mut HashMap<usize, Interval>,
    ) {
        if !visited.insert(node.id()) {
            return;
        }
        let NodeKind::Internal { variable, partition } = node.kind() else {
            return;
        };
        let Some(interval) = window.get(variable) else {
            for child in partition.values() {
                self.partial_overlaps_(child, window, visited, lhs, rhs);
            }
            return;
        };
        for run in partition.covers(interval) {
            let run_interval = run.interval();
            if run_interval.starts_after().lt(&interval.starts_after()) {
                let keep = lhs
                    .get(variable)
                    .map_or(true, |best: &Interval| best.ends().lt(&run_interval.ends()));
                if keep {
                    lhs.insert(*variable, run_interval);
                }
            }
            if interval.ends().lt(&run_interval.ends()) {
                let keep = rhs
                    .get(variable)
                    .map_or(true, |best: &Interval| run_interval.starts_after().lt(&best.starts_after()));
                if keep {
                    rhs.insert(*variable, run_interval);
                }
            }
            self.partial_overlaps_(run.value, window, visited, lhs, rhs);
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::interval::{HalfInterval, LOWER_SENTINEL, UPPER_SENTINEL};

    fn manager<T>() -> IddManager<i32, T>
    where
        T: Clone,
        crate::lattice::Natural: Lattice<T>,
    {
        let m = IddManager::new();
        for v in 0..4 {
            m.internalize_variable(v);
        }
        m
    }

    #[test]
    fn test_lookup() {
        let m = manager::<bool>();
        let b = HashMap::from([(0, Interval::closed(-10.0, 10.0)), (1, Interval::closed(-20.0, 10.0))]);
        let dd = m.from_box(&b, true, false);

        assert!(m.lookup(&dd, &HashMap::from([(0, 0.0), (1, 0.0)])));
        assert!(m.lookup(&dd, &HashMap::from([(0, 10.0), (1, -20.0)])));
        assert!(!m.lookup(&dd, &HashMap::from([(0, 10.5), (1, 0.0)])));
        assert!(!m.lookup(&dd, &HashMap::from([(0, 0.0), (1, 11.0)])));
        // `1` is not needed when `0` is outside.
        assert!(!m.lookup(&dd, &HashMap::from([(0, -11.0)])));
    }

    #[test]
    #[should_panic(expected = "no coordinate")]
    fn test_lookup_missing_coordinate() {
        let m = manager::<bool>();
        let dd = m.from_box(&HashMap::from([(1, Interval::closed(0.0, 1.0))]), true, false);
        m.lookup(&dd, &HashMap::from([(0, 0.0)]));
    }

    #[test]
    fn test_traverse_counts() {
        let m = manager::<bool>();
        let dd = m.from_box(&HashMap::from([(0, Interval::closed(-10.0, 10.0))]), true, false);

        let mut count = 0;
        m.traverse(&dd, |_| count += 1);
        assert_eq!(count, 3);

        let mut count = 0;
        m.traverse_all(&dd, |_| count += 1);
        assert_eq!(count, 4);

        assert_eq!(m.size(&dd), 3);
        assert_eq!(m.size(&m.top()), 1);
    }

    #[test]
    fn test_traverse_order() {
        let m = manager::<i32>();
        let dd = m.from_box(&HashMap::from([(0, Interval::closed(0.0, 1.0))]), 7, 3);

        let mut seen = Vec::new();
        m.traverse(&dd, |node| seen.push(m.terminal_value(node)));
        assert_eq!(seen, vec![None, Some(3), Some(7)]);

        let mut seen = Vec::new();
        m.traverse_all(&dd, |node| seen.push(m.terminal_value(node)));
        assert_eq!(seen, vec![None, Some(3), Some(7), Some(3)]);
    }

    #[test]
    fn test_inf_terminal_cover() {
        let m = manager::<i32>();
        let b = HashMap::from([
            (0, Interval::closed(-2.0, 2.0)),
            (1, Interval::closed(-4.0, 4.0)),
            (2, Interval::closed(-6.0, 6.0)),
            (3, Interval::closed(-8.0, 8.0)),
        ]);
        let dd = m.from_box(&b, 999, -1);

        let query: HashMap<i32, Interval> = (0..4).map(|v| (v, Interval::closed(-100.0, 100.0))).collect();
        let mut cover = m.inf_terminal_cover(&dd, &query);
        cover.sort();
        assert_eq!(cover, vec![-1, 999]);

        let inside: HashMap<i32, Interval> = (0..4).map(|v| (v, Interval::closed(-1.0, 1.0))).collect();
        assert_eq!(m.inf_terminal_cover(&dd, &inside), vec![999]);

        let outside = HashMap::from([(2, Interval::closed(50.0, 60.0))]);
        assert_eq!(m.inf_terminal_cover(&dd, &outside), vec![-1]);

        // Unconstrained variables admit everything.
        let mut cover = m.inf_terminal_cover(&dd, &HashMap::new());
        cover.sort();
        assert_eq!(cover, vec![-1, 999]);
    }

    #[test]
    fn test_partial_overlaps() {
        let m = manager::<bool>();
        let dd = m.from_box(
            &HashMap::from([(0, Interval::closed(0.0, 10.0)), (1, Interval::closed(0.0, 10.0))]),
            true,
            false,
        );

        let query = HashMap::from([(0, Interval::closed(5.0, 20.0)), (1, Interval::closed(-5.0, 5.0))]);
        let (lhs, rhs) = m.partial_overlaps(&dd, &query);

        // Along 0: [0;10] starts before 5, (10;+inf) ends after 20.
        assert_eq!(lhs.get(&0), Some(&Interval::closed(0.0, 10.0)));
        assert_eq!(
            rhs.get(&0),
            Some(&Interval::new(HalfInterval::open(10.0), UPPER_SENTINEL))
        );
        // Along 1: (-inf;0) starts before -5, [0;10] ends after 5.
        assert_eq!(
            lhs.get(&1),
            Some(&Interval::new(LOWER_SENTINEL, HalfInterval::open(0.0)))
        );
        assert_eq!(rhs.get(&1), Some(&Interval::closed(0.0, 10.0)));

        // Nothing sticks out of a query reaching +inf.
        let query = HashMap::from([(0, Interval::new(HalfInterval::closed(5.0), UPPER_SENTINEL))]);
        let (lhs, rhs) = m.partial_overlaps(&dd, &query);
        assert_eq!(lhs.get(&0), Some(&Interval::closed(0.0, 10.0)));
        assert!(rhs.is_empty());
    }

    #[test]
    fn test_partial_overlaps_keeps_extremes() {
        let m = manager::<i32>();
        let a = m.from_box(&HashMap::from([(0, Interval::closed(0.0, 4.0))]), 1, 0);
        let b = m.from_box(&HashMap::from([(0, Interval::closed(2.0, 6.0))]), 2, 0);
        let dd = m.combine(&a, &b, |x, y| x + y);
        // Runs along 0: (-inf,0) 0, [0,2) 1, [2,4] 3, (4,6] 2, (6,inf) 0

        let query = HashMap::from([(0, Interval::closed(3.0, 5.0))]);
        let (lhs, rhs) = m.partial_overlaps(&dd, &query);
        assert_eq!(lhs.get(&0), Some(&Interval::closed(2.0, 4.0)));
        assert_eq!(rhs.get(&0), Some(&Interval::left_open(4.0, 6.0)));

        let query = HashMap::from([(0, Interval::closed(1.0, 3.0))]);
        let (lhs, rhs) = m.partial_overlaps(&dd, &query);
        assert_eq!(lhs.get(&0), Some(&Interval::right_open(0.0, 2.0)));
        assert_eq!(rhs.get(&0), Some(&Interval::closed(2.0, 4.0)));

        let query = HashMap::from([(0, Interval::new(LOWER_SENTINEL, UPPER_SENTINEL))]);
        let (lhs, rhs) = m.partial_overlaps(&dd, &query);
        assert!(lhs.is_empty());
        assert!(rhs.is_empty());
    }
}
