//! The canonical node set.
//!
//! Entries are weak: the table never keeps a node alive. Chains are bucketed
//! by the node's structural hash, and dead entries are purged whenever their
//! chain is visited.

use std::collections::HashMap;
use std::rc::Weak;

use log::{debug, trace};

use crate::node::{Idd, Node};
use crate::utils::MyHash;

#[derive(Debug, Default)]
pub struct UniqueTable {
    buckets: HashMap<u64, Vec<Weak<Node>>>,
}

impl UniqueTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            buckets: HashMap::with_capacity(capacity),
        }
    }

    /// Look up a node structurally equal to `node`.
    pub fn find(&mut self, node: &Node) -> Option<Idd> {
        let hash = MyHash::hash(node);
        let chain = self.buckets.get_mut(&hash)?;
        chain.retain(|entry| entry.strong_count() > 0);
        let found = chain
            .iter()
            .filter_map(|entry| entry.upgrade())
            .find(|candidate| candidate.structurally_equal(node))
            .map(Idd::from_rc);
        if chain.is_empty() {
            self.buckets.remove(&hash);
        }
        found
    }

    /// Return the canonical handle for `node`, registering it if it is new.
    pub fn put(&mut self, node: Node) -> Idd {
        if let Some(existing) = self.find(&node) {
            trace!("unique: hit {}", existing);
            return existing;
        }
        let hash = MyHash::hash(&node);
        let idd = Idd::new(node);
        trace!("unique: new {}", idd);
        self.buckets.entry(hash).or_default().push(idd.downgrade());
        idd
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.buckets
            .values()
            .flatten()
            .filter(|entry| entry.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all dead entries.
    pub fn purge(&mut self) {
        self.buckets.retain(|_, chain| {
            chain.retain(|entry| entry.strong_count() > 0);
            !chain.is_empty()
        });
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
    }

    /// Replace the contents with exactly `nodes`.
    pub fn rebuild<'a>(&mut self, nodes: impl IntoIterator<Item = &'a Idd>) {
        let before = self.buckets.values().map(Vec::len).sum::<usize>();
        self.buckets.clear();
        for idd in nodes {
            self.buckets
                .entry(idd.hash_value())
                .or_default()
                .push(idd.downgrade());
        }
        debug!(
            "unique: rebuilt with {} entries ({} before)",
            self.buckets.values().map(Vec::len).sum::<usize>(),
            before
        );
    }
}
