//! # idd-rs: Interval Decision Diagrams in Rust
//!
//! **`idd-rs`** is a manager-centric library for **multi-terminal Interval Decision Diagrams (IDDs)**.
//! An IDD represents a piecewise-constant function from points of `ℝⁿ` to values of a lattice,
//! such as `bool` indicators of unions of boxes or integer costs over regions.
//!
//! ## What is an IDD?
//!
//! An IDD is a directed acyclic graph. Each internal node tests one real-valued variable and
//! splits its axis into consecutive intervals (runs), each leading to a child diagram.
//! Terminals carry the function values. For a fixed variable order the representation is
//! **canonical**: equal functions share the same node, so equivalence is a pointer comparison.
//!
//! ## Key Features
//!
//! - **Manager-Centric Architecture**: All operations go through the [`IddManager`][crate::manager::IddManager].
//!   It owns the unique table (hash consing), the variable order and the terminal store.
//! - **Reference-Counted Handles**: An [`Idd`][crate::node::Idd] keeps its sub-diagram alive.
//!   Unused nodes are reclaimed with [`release_except`][crate::manager::IddManager::release_except].
//! - **Lattice Terminals**: Terminal values are ordered by a [`Lattice`][crate::lattice::Lattice],
//!   which also provides `∧`/`∨` and pointwise comparison of whole diagrams.
//! - **Rich API**: Pointwise combination, point lookups, box queries, path counting and Graphviz output.
//!
//! ## Basic Usage
//!
//! ```rust
//! use std::collections::HashMap;
//!
//! use idd_rs::interval::Interval;
//! use idd_rs::lattice::LatticeOrd;
//! use idd_rs::manager::IddManager;
//!
//! // 1. Initialize the manager and the variable order
//! let manager = IddManager::<&str, bool>::new();
//! manager.internalize_variable("x");
//! manager.internalize_variable("y");
//!
//! // 2. Build the indicators of two boxes
//! let a = manager.from_box(
//!     &HashMap::from([("x", Interval::closed(0.0, 2.0)), ("y", Interval::closed(0.0, 2.0))]),
//!     true,
//!     false,
//! );
//! let b = manager.from_box(&HashMap::from([("x", Interval::closed(1.0, 3.0))]), true, false);
//!
//! // 3. Intersect them
//! let c = manager.apply_and(&a, &b);
//!
//! // 4. Check properties
//! assert_eq!(manager.compare(&c, &a), LatticeOrd::Less);
//! assert!(manager.lookup(&c, &HashMap::from([("x", 1.5), ("y", 1.0)])));
//! assert!(!manager.lookup(&c, &HashMap::from([("x", 0.5), ("y", 1.0)])));
//!
//! // 5. Canonicity: the same function is the same node
//! let again = manager.apply_and(&b, &a);
//! assert_eq!(c, again);
//! ```
//!
//! ## Core Components
//!
//! - **[`interval`]** and **[`partition`]**: half-intervals, intervals and partitions of the real line.
//! - **[`manager`]**: The [`IddManager`][crate::manager::IddManager], node construction and memory management.
//! - **[`apply`]** and **[`compare`]**: pointwise combination and comparison of diagrams.
//! - **[`query`]**: point lookups, traversals and box queries.
//! - **[`dot`]**: Utilities for visualizing IDDs using Graphviz.

pub mod apply;
pub mod cache;
pub mod compare;
pub mod count;
pub mod display;
pub mod dot;
pub mod internalizer;
pub mod interval;
pub mod lattice;
pub mod manager;
pub mod node;
pub mod partition;
pub mod query;
pub mod terminals;
pub mod unique;
pub mod utils;
