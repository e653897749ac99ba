//! Textual rendering of diagrams.

use std::fmt::Display;
use std::hash::Hash;

use crate::lattice::Lattice;
use crate::manager::IddManager;
use crate::node::{Idd, NodeKind};

impl<V, T, L> IddManager<V, T, L>
where
    V: Hash + Eq + Clone + Display,
    T: Clone + Display,
    L: Lattice<T>,
{
    /// Nested rendering of a diagram, one bracketed group per internal node.
    ///
    /// Shared sub-diagrams are expanded at every occurrence.
    ///
    /// ```
    /// use std::collections::HashMap;
    ///
    /// use idd_rs::interval::Interval;
    /// use idd_rs::manager::IddManager;
    ///
    /// let manager = IddManager::<&str, i32>::new();
    /// manager.internalize_variable("x");
    /// let f = manager.from_box(&HashMap::from([("x", Interval::right_open(0.0, 1.0))]), 1, 0);
    /// assert_eq!(manager.to_bracket_string(&f), "x(0 until 0), 1 until 1), 0 until inf))");
    /// ```
    pub fn to_bracket_string(&self, node: &Idd) -> String {
        self.assert_owned(node);
        match node.kind() {
            NodeKind::Terminal { terminal } => self.terminal_at(*terminal).to_string(),
            NodeKind::Internal { variable, partition } => {
                let runs: Vec<String> = partition
                    .iter()
                    .map(|(end, child)| format!("{} until {}", self.to_bracket_string(child), end))
                    .collect();
                format!("{}({})", self.variable_at(*variable), runs.join(", "))
            }
        }
    }

    /// Indented multi-line rendering of a diagram, one run per line.
    pub fn to_pretty_string(&self, node: &Idd) -> String {
        self.assert_owned(node);
        let mut out = String::new();
        self.pretty_(node, 0, &mut out);
        out
    }

    fn pretty_(&self, node: &Idd, depth: usize, out: &mut String) {
        match node.kind() {
            NodeKind::Terminal { terminal } => {
                out.push_str(&self.terminal_at(*terminal).to_string());
                out.push('\n');
            }
            NodeKind::Internal { variable, partition } => {
                out.push_str(&self.variable_at(*variable).to_string());
                out.push('\n');
                for run in partition.runs() {
                    out.push_str(&"  ".repeat(depth + 1));
                    out.push_str(&format!("{} -> ", run.interval()));
                    self.pretty_(run.value, depth + 1, out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use test_log::test;

    use super::*;
    use crate::interval::Interval;

    #[test]
    fn test_bracket_string() {
        let m = IddManager::<&str, bool>::new();
        m.internalize_variable("x");
        m.internalize_variable("y");
        assert_eq!(m.to_bracket_string(&m.top()), "true");

        let f = m.from_box(
            &HashMap::from([("x", Interval::closed(0.0, 1.0)), ("y", Interval::open(2.0, 3.0))]),
            true,
            false,
        );
        assert_eq!(
            m.to_bracket_string(&f),
            "x(false until 0), y(false until 2], true until 3), false until inf) until 1], false until inf))"
        );
    }

    #[test]
    fn test_pretty_string() {
        let m = IddManager::<&str, bool>::new();
        m.internalize_variable("x");
        m.internalize_variable("y");

        let f = m.from_box(
            &HashMap::from([("x", Interval::closed(0.0, 1.0)), ("y", Interval::open(2.0, 3.0))]),
            true,
            false,
        );
        let expected = "\
x
  (-inf;0) -> false
  [0;1] -> y
    (-inf;2] -> false
    (2;3) -> true
    [3;inf) -> false
  (1;inf) -> false
";
        assert_eq!(m.to_pretty_string(&f), expected);
    }
}
