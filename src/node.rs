use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};

use crate::partition::Partition;
use crate::utils::{Murmur, MyHash};

const TERMINAL_TAG: u64 = 0xffff_ffff << 32;
const INTERNAL_TAG: u64 = 0xffff_ffff;

#[derive(Debug)]
pub enum NodeKind {
    /// A leaf holding the terminal with the given index.
    Terminal { terminal: usize },
    /// A decision on `variable`. Children branch on larger variable indices.
    Internal {
        variable: usize,
        partition: Partition<Idd>,
    },
}

#[derive(Debug)]
pub struct Node {
    kind: NodeKind,
    hash: u64,
    manager: usize,
}

impl Node {
    pub(crate) fn terminal(terminal: usize, manager: usize) -> Self {
        let mut state = Murmur::new();
        state.block(TERMINAL_TAG | terminal as u64);
        state.xor(8);
        Self {
            kind: NodeKind::Terminal { terminal },
            hash: state.finish(),
            manager,
        }
    }

    pub(crate) fn internal(variable: usize, partition: Partition<Idd>, manager: usize) -> Self {
        let mut state = Murmur::new();
        state.block(((variable as u64) << 32) | INTERNAL_TAG);
        state.xor(partition.hash_with(|child| child.node.hash));
        Self {
            kind: NodeKind::Internal { variable, partition },
            hash: state.finish(),
            manager,
        }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn manager(&self) -> usize {
        self.manager
    }

    /// Same variant, same index, and the same partition over identical children.
    pub fn structurally_equal(&self, other: &Node) -> bool {
        if self.hash != other.hash || self.manager != other.manager {
            return false;
        }
        match (&self.kind, &other.kind) {
            (NodeKind::Terminal { terminal: a }, NodeKind::Terminal { terminal: b }) => a == b,
            (
                NodeKind::Internal {
                    variable: v1,
                    partition: p1,
                },
                NodeKind::Internal {
                    variable: v2,
                    partition: p2,
                },
            ) => v1 == v2 && p1 == p2,
            _ => false,
        }
    }
}

impl MyHash for Node {
    fn hash(&self) -> u64 {
        self.hash
    }
}

/// Handle to a canonical diagram node.
///
/// Cloning is cheap (a reference count bump). Two handles are equal iff they
/// point to the same node, which for canonical nodes of one manager means
/// they represent the same function.
#[derive(Clone)]
pub struct Idd {
    node: Rc<Node>,
}

impl Idd {
    pub(crate) fn new(node: Node) -> Self {
        Self { node: Rc::new(node) }
    }

    pub(crate) fn from_rc(node: Rc<Node>) -> Self {
        Self { node }
    }

    pub(crate) fn downgrade(&self) -> Weak<Node> {
        Rc::downgrade(&self.node)
    }

    pub fn kind(&self) -> &NodeKind {
        &self.node.kind
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.node.kind, NodeKind::Terminal { .. })
    }

    pub fn is_internal(&self) -> bool {
        !self.is_terminal()
    }

    /// Index of the terminal, for leaves.
    pub fn terminal(&self) -> Option<usize> {
        match self.node.kind {
            NodeKind::Terminal { terminal } => Some(terminal),
            NodeKind::Internal { .. } => None,
        }
    }

    /// Index of the variable, for internal nodes.
    pub fn variable(&self) -> Option<usize> {
        match self.node.kind {
            NodeKind::Terminal { .. } => None,
            NodeKind::Internal { variable, .. } => Some(variable),
        }
    }

    pub fn partition(&self) -> Option<&Partition<Idd>> {
        match &self.node.kind {
            NodeKind::Terminal { .. } => None,
            NodeKind::Internal { partition, .. } => Some(partition),
        }
    }

    /// Structural hash, stable across runs.
    pub fn hash_value(&self) -> u64 {
        self.node.hash
    }

    /// Id of the manager that created the node.
    pub fn manager(&self) -> usize {
        self.node.manager
    }

    /// Address-based identity, valid while the node is alive.
    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.node) as usize
    }

    /// Number of live handles to this node.
    pub fn ref_count(&self) -> usize {
        Rc::strong_count(&self.node)
    }

    pub(crate) fn node(&self) -> &Node {
        &self.node
    }
}

impl PartialEq for Idd {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }
}

impl Eq for Idd {}

impl Hash for Idd {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.node.hash);
    }
}

impl MyHash for Idd {
    fn hash(&self) -> u64 {
        self.node.hash
    }
}

impl Display for Idd {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.node.kind {
            NodeKind::Terminal { terminal } => write!(f, "#{}", terminal),
            NodeKind::Internal { variable, .. } => {
                write!(f, "x{}@{:08x}", variable, self.node.hash as u32)
            }
        }
    }
}

// Shallow: children are not printed.
impl Debug for Idd {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Idd({})", self)
    }
}
