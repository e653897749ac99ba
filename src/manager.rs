//! The diagram manager.
//!
//! All diagrams are built through an [`IddManager`], which interns variables,
//! terminals and nodes so that every function has exactly one representation
//! per manager. Like the rest of the crate, the manager works through `&self`:
//! its tables live behind `RefCell`s.
//!
//! ```
//! use std::collections::HashMap;
//!
//! use idd_rs::interval::Interval;
//! use idd_rs::manager::IddManager;
//!
//! let manager = IddManager::<&str, bool>::new();
//! manager.internalize_variable("x");
//! manager.internalize_variable("y");
//!
//! let b = HashMap::from([("x", Interval::closed(0.0, 1.0)), ("y", Interval::open(-1.0, 1.0))]);
//! let f = manager.from_box(&b, true, false);
//! assert_eq!(f, manager.from_box(&b, true, false));
//!
//! let point = HashMap::from([("x", 0.5), ("y", 0.0)]);
//! assert!(manager.lookup(&f, &point));
//! ```

use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

use log::debug;

use crate::internalizer::Internalizer;
use crate::interval::Interval;
use crate::lattice::{Lattice, Natural};
use crate::node::{Idd, Node, NodeKind};
use crate::partition::Partition;
use crate::terminals::TerminalStore;
use crate::unique::UniqueTable;

static NEXT_MANAGER_ID: AtomicUsize = AtomicUsize::new(1);

/// Sizing knobs of a manager.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct IddConfig {
    /// Initial number of buckets of the canonical node set.
    pub unique_table_capacity: usize,
    /// Per-operation caches are pre-sized for `2^cache_bits` entries.
    pub cache_bits: usize,
}

impl Default for IddConfig {
    fn default() -> Self {
        Self {
            unique_table_capacity: 1 << 12,
            cache_bits: 10,
        }
    }
}

impl IddConfig {
    pub fn with_unique_table_capacity(mut self, capacity: usize) -> Self {
        self.unique_table_capacity = capacity;
        self
    }

    pub fn with_cache_bits(mut self, bits: usize) -> Self {
        assert!(bits <= 31, "Cache bits should be in the range 0..=31");
        self.cache_bits = bits;
        self
    }
}

pub struct IddManager<V, T, L = Natural> {
    id: usize,
    lattice: L,
    config: IddConfig,
    variables: RefCell<Internalizer<V>>,
    terminals: RefCell<TerminalStore<T>>,
    unique: RefCell<UniqueTable>,
    top: RefCell<Option<Idd>>,
    bottom: RefCell<Option<Idd>>,
}

impl<V, T, L> IddManager<V, T, L>
where
    L: Lattice<T> + Default,
{
    pub fn new() -> Self {
        Self::with_config(IddConfig::default())
    }

    pub fn with_config(config: IddConfig) -> Self {
        Self::with_lattice(L::default(), config)
    }
}

impl<V, T, L> Default for IddManager<V, T, L>
where
    L: Lattice<T> + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V, T, L> IddManager<V, T, L>
where
    L: Lattice<T>,
{
    pub fn with_lattice(lattice: L, config: IddConfig) -> Self {
        assert!(config.cache_bits <= 31, "Cache bits should be in the range 0..=31");
        let id = NEXT_MANAGER_ID.fetch_add(1, AtomicOrdering::Relaxed);
        debug!("new manager #{} with {:?}", id, config);
        Self {
            id,
            lattice,
            config,
            variables: RefCell::new(Internalizer::default()),
            terminals: RefCell::new(TerminalStore::new()),
            unique: RefCell::new(UniqueTable::new(config.unique_table_capacity)),
            top: RefCell::new(None),
            bottom: RefCell::new(None),
        }
    }

    /// Process-unique id, stamped on every node of this manager.
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn lattice(&self) -> &L {
        &self.lattice
    }

    pub fn config(&self) -> &IddConfig {
        &self.config
    }

    /// Number of live canonical nodes.
    pub fn num_nodes(&self) -> usize {
        self.unique.borrow().len()
    }

    /// Check that `node` was built by this manager.
    ///
    /// # Panics
    ///
    /// Panics if the node belongs to another manager.
    pub fn assert_owned(&self, node: &Idd) {
        assert_eq!(
            node.manager(),
            self.id,
            "Node {} belongs to manager #{}, not #{}",
            node,
            node.manager(),
            self.id
        );
    }

    /// Intern a leaf for the terminal with the given index.
    pub(crate) fn mk_terminal(&self, terminal: usize) -> Idd {
        self.unique.borrow_mut().put(Node::terminal(terminal, self.id))
    }

    /// Intern a decision node, collapsing it to its only child if the
    /// partition is constant.
    pub fn mk_node(&self, variable: usize, partition: Partition<Idd>) -> Idd {
        if partition.is_trivial() {
            return partition.first_value().clone();
        }
        debug_assert!(partition.check_invariants(), "Partition invariants are broken");
        debug_assert!(
            partition.values().all(|child| child.variable().map_or(true, |v| v > variable)),
            "Children of x{} must branch on later variables",
            variable
        );
        self.unique.borrow_mut().put(Node::internal(variable, partition, self.id))
    }
}

impl<V, T, L> IddManager<V, T, L>
where
    V: Hash + Eq + Clone,
    L: Lattice<T>,
{
    /// Return the index of variable `v`, registering it as the last variable
    /// of the order if it is new.
    pub fn internalize_variable(&self, v: V) -> usize {
        self.variables.borrow_mut().internalize(v)
    }

    pub fn variable_at(&self, index: usize) -> V {
        self.variables.borrow().at(index).clone()
    }

    pub fn variable_index(&self, v: &V) -> Option<usize> {
        self.variables.borrow().get_index(v)
    }

    /// Order two registered variables by their position in the diagram order.
    pub fn compare_variables(&self, v1: &V, v2: &V) -> Ordering {
        self.variables.borrow().compare(v1, v2)
    }

    pub fn number_of_variables(&self) -> usize {
        self.variables.borrow().len()
    }

    /// Translate a box over variables into a box over variable indices.
    ///
    /// Variables the manager does not know are dropped when `strict` is
    /// false, and are a contract violation otherwise.
    pub(crate) fn index_box(&self, b: &HashMap<V, Interval>) -> HashMap<usize, Interval> {
        let variables = self.variables.borrow();
        b.iter()
            .filter_map(|(v, interval)| variables.get_index(v).map(|index| (index, *interval)))
            .collect()
    }
}

impl<V, T, L> IddManager<V, T, L>
where
    T: Clone,
    L: Lattice<T>,
{
    /// Return the index of terminal `t`, deduplicated with the lattice's
    /// equality.
    pub fn internalize_terminal(&self, t: T) -> usize {
        self.terminals.borrow_mut().put(&self.lattice, t)
    }

    pub fn terminal_at(&self, index: usize) -> T {
        self.terminals.borrow().get(index).clone()
    }

    pub fn number_of_terminals(&self) -> usize {
        self.terminals.borrow().len()
    }

    /// The value of a leaf, or `None` for an internal node.
    pub fn terminal_value(&self, node: &Idd) -> Option<T> {
        node.terminal().map(|t| self.terminal_at(t))
    }

    /// The constant function `t`.
    pub fn from_terminal(&self, t: T) -> Idd {
        let terminal = self.internalize_terminal(t);
        self.mk_terminal(terminal)
    }

    /// The constant function `lattice.top()`.
    pub fn top(&self) -> Idd {
        if let Some(top) = self.top.borrow().as_ref() {
            return top.clone();
        }
        let top = self.from_terminal(self.lattice.top());
        *self.top.borrow_mut() = Some(top.clone());
        top
    }

    /// The constant function `lattice.bottom()`.
    pub fn bottom(&self) -> Idd {
        if let Some(bottom) = self.bottom.borrow().as_ref() {
            return bottom.clone();
        }
        let bottom = self.from_terminal(self.lattice.bottom());
        *self.bottom.borrow_mut() = Some(bottom.clone());
        bottom
    }

    pub fn is_top(&self, node: &Idd) -> bool {
        *node == self.top()
    }

    pub fn is_bottom(&self, node: &Idd) -> bool {
        *node == self.bottom()
    }

    pub fn terminal_lub(&self, x: &T, y: &T) -> T {
        self.lattice.least_upper_bound(x, y)
    }

    pub fn terminal_glb(&self, x: &T, y: &T) -> T {
        self.lattice.greatest_lower_bound(x, y)
    }

    /// Keep exactly the nodes reachable from `roots` in the canonical set.
    ///
    /// Nodes that are still alive but not reachable from `roots` stay valid,
    /// but are no longer canonical: building the same function again yields
    /// a different node. Cached `top`/`bottom` are released unless reachable.
    pub fn release_except(&self, roots: &[Idd]) {
        for root in roots {
            self.assert_owned(root);
        }
        let before = self.num_nodes();

        let mut reachable: HashSet<Idd> = HashSet::new();
        let mut stack: Vec<Idd> = roots.to_vec();
        while let Some(node) = stack.pop() {
            if reachable.contains(&node) {
                continue;
            }
            if let NodeKind::Internal { partition, .. } = node.kind() {
                for child in partition.values() {
                    if !reachable.contains(child) {
                        stack.push(child.clone());
                    }
                }
            }
            reachable.insert(node);
        }

        self.unique.borrow_mut().rebuild(reachable.iter());

        for cached in [&self.top, &self.bottom] {
            let mut cached = cached.borrow_mut();
            if matches!(cached.as_ref(), Some(node) if !reachable.contains(node)) {
                *cached = None;
            }
        }

        debug!(
            "release_except: kept {} of {} nodes ({} roots)",
            reachable.len(),
            before,
            roots.len()
        );
    }
}

impl<V, T, L> IddManager<V, T, L>
where
    V: Hash + Eq + Clone,
    T: Clone,
    L: Lattice<T>,
{
    /// The indicator of a box: `inside` within the box, `outside` elsewhere.
    ///
    /// Variables missing from the box are unconstrained, and variables that
    /// were never internalized are ignored. An empty interval on any known
    /// variable makes the box empty, and the result is the constant `outside`.
    pub fn from_box(&self, b: &HashMap<V, Interval>, inside: T, outside: T) -> Idd {
        let indexed = self.index_box(b);
        debug!("from_box(constraints = {})", indexed.len());

        let out = self.from_terminal(outside);
        if indexed.values().any(|interval| interval.is_empty()) {
            debug!("from_box: empty box");
            return out;
        }

        let mut constraints: Vec<(usize, Interval)> = indexed.into_iter().collect();
        constraints.sort_by(|a, b| b.0.cmp(&a.0));

        let mut current = self.from_terminal(inside);
        for (variable, interval) in constraints {
            let mut partition = Partition::new(out.clone());
            partition.insert(&interval, current);
            current = self.mk_node(variable, partition);
        }
        current
    }
}

impl<V, T, L> Debug for IddManager<V, T, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IddManager")
            .field("id", &self.id)
            .field("variables", &self.variables.borrow().len())
            .field("terminals", &self.terminals.borrow().len())
            .field("nodes", &self.unique.borrow().len())
            .field("config", &self.config)
            .finish()
    }
}
