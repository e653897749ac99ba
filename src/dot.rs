//! IDD to DOT (Graphviz) conversion.
//!
//! The generated DOT output follows these conventions:
//! - **Terminal nodes** are rendered as squares at the bottom (sink rank), labeled with their value
//! - **Internal nodes** are rendered as circles labeled with their variable, grouped by variable index
//! - **Edges** go from a node to the child of each of its runs, labeled with the run's interval
//! - **Root nodes** are rendered as rectangles at the top (source rank)
//!
//! # Examples
//!
//! ```
//! use std::collections::HashMap;
//!
//! use idd_rs::interval::Interval;
//! use idd_rs::manager::IddManager;
//!
//! let manager = IddManager::<&str, bool>::new();
//! manager.internalize_variable("x");
//! let f = manager.from_box(&HashMap::from([("x", Interval::closed(0.0, 1.0))]), true, false);
//!
//! let dot = manager.to_dot(&[f]).unwrap();
//! assert!(dot.contains("[0;1]"));
//! // Write to file and render with: dot -Tpng output.dot -o output.png
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::hash::Hash;

use crate::lattice::Lattice;
use crate::manager::IddManager;
use crate::node::{Idd, NodeKind};

/// Configuration options for DOT output generation.
///
/// Use `DotConfig::default()` for standard settings.
#[derive(Debug, Clone)]
pub struct DotConfig {
    /// Shape for internal nodes (default: "circle")
    pub node_shape: &'static str,
    /// Shape for terminal nodes (default: "square")
    pub terminal_shape: &'static str,
    /// Shape for root nodes (default: "rect")
    pub root_shape: &'static str,
    /// Style for run edges (default: "solid")
    pub edge_style: &'static str,
    /// Whether to label edges with their run intervals (default: true)
    pub edge_labels: bool,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            node_shape: "circle",
            terminal_shape: "square",
            root_shape: "rect",
            edge_style: "solid",
            edge_labels: true,
        }
    }
}

impl<V, T, L> IddManager<V, T, L>
where
    V: Hash + Eq + Clone + Display,
    T: Clone + Display,
    L: Lattice<T>,
{
    /// Converts the diagrams rooted at `roots` to DOT (Graphviz) format.
    ///
    /// Nodes shared between roots are displayed once.
    pub fn to_dot(&self, roots: &[Idd]) -> Result<String, std::fmt::Error> {
        self.to_dot_with_config(roots, &DotConfig::default())
    }

    /// Converts the diagrams rooted at `roots` to DOT format with custom configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use idd_rs::dot::DotConfig;
    /// use idd_rs::manager::IddManager;
    ///
    /// let manager = IddManager::<&str, i32>::new();
    /// let config = DotConfig {
    ///     node_shape: "ellipse",
    ///     edge_labels: false,
    ///     ..DotConfig::default()
    /// };
    ///
    /// let dot = manager.to_dot_with_config(&[manager.from_terminal(42)], &config).unwrap();
    /// assert!(dot.contains("label=\"42\""));
    /// ```
    pub fn to_dot_with_config(&self, roots: &[Idd], config: &DotConfig) -> Result<String, std::fmt::Error> {
        use std::fmt::Write as _;

        for root in roots {
            self.assert_owned(root);
        }

        // Number nodes in discovery order, so the output does not depend on addresses.
        let mut names = HashMap::<usize, usize>::new();
        let mut nodes = Vec::<Idd>::new();
        let mut stack: Vec<&Idd> = roots.iter().rev().collect();
        while let Some(node) = stack.pop() {
            if names.contains_key(&node.id()) {
                continue;
            }
            names.insert(node.id(), nodes.len());
            nodes.push(node.clone());
            if let NodeKind::Internal { partition, .. } = node.kind() {
                let children: Vec<&Idd> = partition.values().collect();
                stack.extend(children.into_iter().rev());
            }
        }

        let mut dot = String::new();
        writeln!(dot, "graph {{")?;
        writeln!(dot, "node [shape={}];", config.node_shape)?;

        let mut terminals = Vec::new();
        let mut levels = BTreeMap::<usize, Vec<usize>>::new();
        for (i, node) in nodes.iter().enumerate() {
            match node.kind() {
                NodeKind::Terminal { terminal } => terminals.push((i, *terminal)),
                NodeKind::Internal { variable, .. } => levels.entry(*variable).or_default().push(i),
            }
        }

        writeln!(dot, "{{ rank=sink")?;
        for &(i, terminal) in terminals.iter() {
            writeln!(
                dot,
                "{} [shape={}, label=\"{}\"];",
                i,
                config.terminal_shape,
                self.terminal_at(terminal)
            )?;
        }
        writeln!(dot, "}}")?;

        for (&variable, level) in levels.iter() {
            let label = self.variable_at(variable);
            writeln!(dot, "{{ rank=same")?;
            for &i in level.iter() {
                writeln!(dot, "{} [label=\"{}\"];", i, label)?;
            }
            writeln!(dot, "}}")?;
        }

        for (i, node) in nodes.iter().enumerate() {
            let NodeKind::Internal { partition, .. } = node.kind() else {
                continue;
            };
            for run in partition.runs() {
                let child = names[&run.value.id()];
                if config.edge_labels {
                    writeln!(
                        dot,
                        "{} -- {} [style={}, label=\"{}\"];",
                        i,
                        child,
                        config.edge_style,
                        run.interval()
                    )?;
                } else {
                    writeln!(dot, "{} -- {} [style={}];", i, child, config.edge_style)?;
                }
            }
        }

        writeln!(dot, "{{ rank=source")?;
        for (i, root) in roots.iter().enumerate() {
            writeln!(dot, "r{} [shape={}, label=\"{}\"];", i, config.root_shape, root)?;
        }
        writeln!(dot, "}}")?;

        for (i, root) in roots.iter().enumerate() {
            writeln!(dot, "r{} -- {};", i, names[&root.id()])?;
        }

        writeln!(dot, "}}")?;
        Ok(dot)
    }
}
