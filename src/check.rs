//! Independent invariant checker.
//!
//! Walks the whole tree, so it is O(n). Mutations run it after every call in
//! test builds and under the `validate` feature.

use std::fmt;

use compare::Compare;

use crate::node::{Color, Dir, NodeId, NodeSlab};
use crate::path::PATH_CAPACITY;
use crate::tree::RbTree;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// The root is red
    RedRoot(NodeId),
    /// A red node has a red child
    RedRed { parent: NodeId, child: NodeId },
    /// Two subtrees of a node differ in black height
    BlackHeight { node: NodeId, left: usize, right: usize },
    /// A node sits on the wrong side of an ancestor
    Order { node: NodeId, ancestor: NodeId },
    /// The tree is taller than `max_depth` allows for
    DepthBound { height: usize, max_depth: usize },
    /// The links run deeper than any valid tree, so they must cycle
    TooDeep(NodeId),
    /// A link names a vacant slab slot
    Dangling(NodeId),
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RedRoot(id) => write!(f, "root {id:?} is red"),
            Self::RedRed { parent, child } => write!(f, "red {parent:?} has red child {child:?}"),
            Self::BlackHeight { node, left, right } => {
                write!(f, "black height under {node:?} differs: {left} left, {right} right")
            }
            Self::Order { node, ancestor } => write!(f, "{node:?} is on the wrong side of {ancestor:?}"),
            Self::DepthBound { height, max_depth } => {
                write!(f, "height {height} exceeds max_depth {max_depth}")
            }
            Self::TooDeep(id) => write!(f, "links below {id:?} run too deep (cycle?)"),
            Self::Dangling(id) => write!(f, "link to vacant slot {id:?}"),
        }
    }
}

impl std::error::Error for Violation {}

/// Shape of a valid tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub nodes: usize,
    /// Longest root-to-leaf path, in nodes
    pub height: usize,
    /// Black nodes on every root-to-leaf path
    pub black_height: usize,
}

struct Checker<'a, T, C> {
    slab: &'a NodeSlab<T>,
    cmp: &'a C,
    nodes: usize,
    height: usize,
}

impl<'a, T, C: Compare<T>> Checker<'a, T, C> {
    // Returns the black height of the subtree at `node`. `lo` and `hi` are the
    // nearest ancestors `node` must not sort before, and must sort before.
    fn subtree(
        &mut self,
        node: Option<NodeId>,
        parent: Option<NodeId>,
        lo: Option<NodeId>,
        hi: Option<NodeId>,
        depth: usize,
    ) -> Result<usize, Violation> {
        let Some(n) = node else {
            self.height = self.height.max(depth);
            return Ok(0);
        };
        if !self.slab.contains_id(n) {
            return Err(Violation::Dangling(n));
        }
        if depth >= PATH_CAPACITY {
            return Err(Violation::TooDeep(n));
        }
        self.nodes += 1;

        let value = &self.slab[n];
        if let Some(lo) = lo {
            if self.cmp.compares_lt(value, &self.slab[lo]) {
                return Err(Violation::Order { node: n, ancestor: lo });
            }
        }
        if let Some(hi) = hi {
            if !self.cmp.compares_lt(value, &self.slab[hi]) {
                return Err(Violation::Order { node: n, ancestor: hi });
            }
        }

        let red = self.slab.color(n) == Color::Red;
        if let Some(p) = parent {
            if red && self.slab.color(p) == Color::Red {
                return Err(Violation::RedRed { parent: p, child: n });
            }
        }

        let left = self.subtree(self.slab.child(n, Dir::Left), Some(n), lo, Some(n), depth + 1)?;
        let right = self.subtree(self.slab.child(n, Dir::Right), Some(n), Some(n), hi, depth + 1)?;
        if left != right {
            return Err(Violation::BlackHeight { node: n, left, right });
        }
        Ok(left + usize::from(!red))
    }
}

impl<C> RbTree<C> {
    /// Verifies every red-black invariant and the `max_depth` bound.
    pub fn check<T>(&self, slab: &NodeSlab<T>) -> Result<Summary, Violation>
    where
        C: Compare<T>,
    {
        let Some(root) = self.root() else {
            return Ok(Summary::default());
        };
        if slab.contains_id(root) && slab.color(root) == Color::Red {
            return Err(Violation::RedRoot(root));
        }

        let mut checker = Checker { slab, cmp: self.comparator(), nodes: 0, height: 0 };
        let black_height = checker.subtree(Some(root), None, None, None, 0)?;
        if checker.height > self.max_depth() {
            return Err(Violation::DepthBound { height: checker.height, max_depth: self.max_depth() });
        }
        Ok(Summary { nodes: checker.nodes, height: checker.height, black_height })
    }
}
