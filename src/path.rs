use std::ops::{Index, IndexMut};

use compare::Compare;

use crate::node::{Dir, NodeId, NodeSlab};

/// Entries in a path buffer.
///
/// A slab holds at most `2^31 - 1` nodes, so no tree is ever taller than
/// `2 * log2(2^31) = 62`; the extra room covers the one-deeper path that an
/// insertion briefly builds before its fixup.
pub const PATH_CAPACITY: usize = 64;

/// Root-to-node ancestor stack, rebuilt on every call since nodes keep no
/// parent link. Lives on the caller's stack; never allocates.
pub(crate) struct Path {
    nodes: [NodeId; PATH_CAPACITY],
    len: usize,
}

impl Path {
    #[inline]
    pub(crate) fn new() -> Path {
        Path { nodes: [NodeId::DANGLING; PATH_CAPACITY], len: 0 }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn push(&mut self, id: NodeId) {
        debug_assert!(self.len < PATH_CAPACITY, "path buffer overflow");
        self.nodes[self.len] = id;
        self.len += 1;
    }

    #[inline]
    pub(crate) fn pop(&mut self) {
        debug_assert!(self.len > 0);
        self.len -= 1;
    }

    #[inline]
    pub(crate) fn truncate(&mut self, len: usize) {
        debug_assert!(len <= self.len);
        self.len = len;
    }

    #[inline]
    pub(crate) fn top(&self) -> NodeId {
        self[self.len - 1]
    }

    #[inline]
    pub(crate) fn swap(&mut self, a: usize, b: usize) {
        self.nodes[..self.len].swap(a, b)
    }
}

impl Index<usize> for Path {
    type Output = NodeId;

    #[inline]
    fn index(&self, i: usize) -> &NodeId {
        &self.nodes[..self.len][i]
    }
}

impl IndexMut<usize> for Path {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut NodeId {
        &mut self.nodes[..self.len][i]
    }
}

/// Descends from `root` towards `node`, stacking every node visited.
///
/// Stops on `node` itself, or on the last node before an empty slot on the
/// side `node` sorts to, which is where an insertion would link it. Returns
/// the number of entries stacked.
pub(crate) fn find_and_stack<T, C>(
    slab: &NodeSlab<T>,
    cmp: &C,
    root: NodeId,
    node: NodeId,
    path: &mut Path,
) -> usize
where
    C: Compare<T>,
{
    path.push(root);
    while path.top() != node {
        let top = path.top();
        let dir = if cmp.compares_lt(&slab[node], &slab[top]) {
            Dir::Left
        } else {
            Dir::Right
        };
        match slab.child(top, dir) {
            Some(child) => path.push(child),
            None => break,
        }
    }
    path.len()
}
