#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The search tree explored by the DPLL engine, kept for diagnostics.
//!
//! Nodes live in an arena and refer to their children by index. The tree is
//! never consulted by the search itself; recording it can be switched off
//! without changing any verdict.

use crate::sat::literal::{Literal, Variable};
use std::fmt::{self, Display};

pub type NodeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecisionNode {
    /// Variable decided on the edge into this node, `None` at the root.
    pub variable: Option<Variable>,
    /// Value tried for `variable`.
    pub value: Option<bool>,
    pub false_child: Option<NodeId>,
    pub true_child: Option<NodeId>,
    /// The subtree rooted here produced a satisfying assignment.
    pub is_solution: bool,
}

impl DecisionNode {
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        self.false_child.is_none() && self.true_child.is_none()
    }

    /// The decision on the edge into this node as a literal.
    #[must_use]
    pub fn decision(&self) -> Option<Literal> {
        Some(Literal::new(self.variable?, self.value?))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionTree {
    nodes: Vec<DecisionNode>,
}

impl Default for DecisionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionTree {
    /// A tree holding only the all-undecided root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![DecisionNode::default()],
        }
    }

    #[must_use]
    pub const fn root(&self) -> NodeId {
        0
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&DecisionNode> {
        self.nodes.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: the root exists from construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds the node reached from `parent` by setting `variable` to `value`.
    ///
    /// A later attempt on the same branch replaces the earlier child link.
    pub fn add_child(&mut self, parent: NodeId, variable: Variable, value: bool) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(DecisionNode {
            variable: Some(variable),
            value: Some(value),
            ..DecisionNode::default()
        });

        let parent = &mut self.nodes[parent];
        if value {
            parent.true_child = Some(id);
        } else {
            parent.false_child = Some(id);
        }
        id
    }

    pub fn mark_solution(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.is_solution = true;
        }
    }

    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.nodes[self.root()].is_solution
    }

    #[must_use]
    pub fn num_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Number of decisions on the longest root-to-leaf path.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self.root(), 0)];

        while let Some((id, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            let node = &self.nodes[id];
            stack.extend(
                [node.false_child, node.true_child]
                    .into_iter()
                    .flatten()
                    .map(|child| (child, depth + 1)),
            );
        }
        deepest
    }

    /// Decisions along the flagged path from the root, empty when the search
    /// failed or solved the formula without branching.
    #[must_use]
    pub fn solution_path(&self) -> Vec<Literal> {
        let mut path = Vec::new();
        let mut current = &self.nodes[self.root()];

        while current.is_solution {
            let next = [current.true_child, current.false_child]
                .into_iter()
                .flatten()
                .map(|id| &self.nodes[id])
                .find(|n| n.is_solution);

            match next {
                Some(node) => {
                    path.extend(node.decision());
                    current = node;
                }
                None => break,
            }
        }
        path
    }

    fn fmt_node(&self, f: &mut fmt::Formatter<'_>, id: NodeId, indent: usize) -> fmt::Result {
        let node = &self.nodes[id];
        let label = node
            .decision()
            .map_or_else(|| "root".to_owned(), |lit| lit.to_string());
        let marker = if node.is_solution {
            " *"
        } else if node.is_leaf() && id != self.root() {
            " x"
        } else {
            ""
        };
        writeln!(f, "{:indent$}{label}{marker}", "", indent = indent * 2)?;

        for child in [node.true_child, node.false_child].into_iter().flatten() {
            self.fmt_node(f, child, indent + 1)?;
        }
        Ok(())
    }
}

/// Indented rendering, true branch first. Solution nodes end in `*`, conflict
/// leaves in `x`.
impl Display for DecisionTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(f, self.root(), 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tree_has_root_only() {
        let tree = DecisionTree::new();
        assert_eq!(tree.len(), 1);
        assert!(!tree.is_empty());
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.num_leaves(), 1);
        assert!(tree.solution_path().is_empty());
        assert_eq!(tree.node(0).unwrap().decision(), None);
    }

    #[test]
    fn test_children_and_solution_path() {
        let mut tree = DecisionTree::new();
        let t = tree.add_child(tree.root(), 1, true);
        let f = tree.add_child(tree.root(), 1, false);
        let ft = tree.add_child(f, 2, true);

        tree.mark_solution(ft);
        tree.mark_solution(f);
        tree.mark_solution(tree.root());

        let root = tree.node(0).unwrap();
        assert_eq!(root.true_child, Some(t));
        assert_eq!(root.false_child, Some(f));
        assert!(tree.node(t).unwrap().is_leaf());
        assert!(tree.is_solved());
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.num_leaves(), 2);
        assert_eq!(
            tree.solution_path(),
            vec![Literal::new(1, false), Literal::new(2, true)]
        );
    }

    #[test]
    fn test_display() {
        let mut tree = DecisionTree::new();
        let t = tree.add_child(0, 1, true);
        tree.mark_solution(t);
        tree.mark_solution(0);
        tree.add_child(0, 1, false);

        assert_eq!(tree.to_string(), "root *\n  1 *\n  -1 x\n");
    }
}
