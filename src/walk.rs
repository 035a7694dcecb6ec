use std::fmt;
use std::iter::FusedIterator;

use crate::node::{Dir, NodeId, NodeSlab};
use crate::path::PATH_CAPACITY;
use crate::tree::RbTree;

/// Recursive in-order visit of the subtree at `node`.
///
/// Recursion depth is the subtree height. Where stack depth must stay flat,
/// use [`RbTree::foreach_next`] or [`RbTree::iter`] instead.
#[cfg(feature = "walk")]
pub fn walk<T, F>(slab: &NodeSlab<T>, node: Option<NodeId>, visit: &mut F)
where
    F: FnMut(NodeId, &T),
{
    if let Some(n) = node {
        walk(slab, slab.child(n, Dir::Left), visit);
        visit(n, &slab[n]);
        walk(slab, slab.child(n, Dir::Right), visit);
    }
}

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
enum State {
    Fresh,
    Running,
    Done,
}

/// Resumable in-order position in a tree, for [`RbTree::foreach_next`].
///
/// Holds the ancestors of the current node and, per ancestor, whether it
/// hangs to the left of the entry below it. Good for one pass; the tree must
/// not change shape while a cursor is in use.
#[derive(Clone)]
pub struct ForeachCursor {
    stack: [NodeId; PATH_CAPACITY],
    // bit i set: stack[i] is the left child of stack[i - 1]
    is_left: u64,
    len: usize,
    state: State,
}

impl ForeachCursor {
    pub const fn new() -> ForeachCursor {
        ForeachCursor {
            stack: [NodeId::DANGLING; PATH_CAPACITY],
            is_left: 0,
            len: 0,
            state: State::Fresh,
        }
    }

    #[inline]
    fn push(&mut self, id: NodeId, is_left: bool) {
        debug_assert!(self.len < PATH_CAPACITY, "cursor stack overflow");
        self.stack[self.len] = id;
        if is_left {
            self.is_left |= 1 << self.len;
        } else {
            self.is_left &= !(1 << self.len);
        }
        self.len += 1;
    }

    #[inline]
    fn top_is_left(&self) -> bool {
        self.is_left & (1 << (self.len - 1)) != 0
    }

    // Stacks `n` and its chain of left children; returns the last one.
    fn stack_left_limb<T>(&mut self, slab: &NodeSlab<T>, mut n: NodeId) -> NodeId {
        self.push(n, false);
        while let Some(l) = slab.child(n, Dir::Left) {
            n = l;
            self.push(n, true);
        }
        n
    }
}

impl Default for ForeachCursor {
    fn default() -> ForeachCursor {
        ForeachCursor::new()
    }
}

impl fmt::Debug for ForeachCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForeachCursor")
            .field("stack", &&self.stack[..self.len])
            .field("state", &self.state)
            .finish()
    }
}

impl<C> RbTree<C> {
    /// Advances `cursor` to the next node in order.
    ///
    /// The first call on a fresh cursor yields the smallest node; `None`
    /// marks the end, after which the cursor stays exhausted. Uses no
    /// recursion and no allocation.
    pub fn foreach_next<T>(&self, slab: &NodeSlab<T>, cursor: &mut ForeachCursor) -> Option<NodeId> {
        let root = self.root()?;
        match cursor.state {
            State::Done => return None,
            State::Fresh => {
                cursor.state = State::Running;
                return Some(cursor.stack_left_limb(slab, root));
            }
            State::Running => {}
        }

        // after a node comes the leftmost node of its right subtree
        let top = cursor.stack[cursor.len - 1];
        if let Some(r) = slab.child(top, Dir::Right) {
            return Some(cursor.stack_left_limb(slab, r));
        }

        // otherwise a left child is followed by its parent; the root is
        // stacked as a non-left entry so this also holds at the top
        if cursor.top_is_left() {
            cursor.len -= 1;
            return Some(cursor.stack[cursor.len - 1]);
        }

        // A right child whose subtree is done: its parent came before it, so
        // climb past right children to the first left child, whose parent is
        // next.
        while cursor.len > 1 && !cursor.top_is_left() {
            cursor.len -= 1;
        }
        cursor.len -= 1;
        if cursor.len > 0 {
            Some(cursor.stack[cursor.len - 1])
        } else {
            cursor.state = State::Done;
            None
        }
    }

    /// In-order iterator over `(handle, record)` pairs.
    pub fn iter<'a, T>(&'a self, slab: &'a NodeSlab<T>) -> Iter<'a, T, C> {
        Iter { tree: self, slab, cursor: ForeachCursor::new() }
    }

    /// Recursive in-order visit of the whole tree.
    #[cfg(feature = "walk")]
    pub fn walk<T, F>(&self, slab: &NodeSlab<T>, mut visit: F)
    where
        F: FnMut(NodeId, &T),
    {
        walk(slab, self.root(), &mut visit)
    }

    /// A `Debug` view of the tree's records, in order.
    pub fn debug<'a, T>(&'a self, slab: &'a NodeSlab<T>) -> TreeDebug<'a, T, C> {
        TreeDebug { tree: self, slab }
    }
}

pub struct Iter<'a, T: 'a, C: 'a> {
    tree: &'a RbTree<C>,
    slab: &'a NodeSlab<T>,
    cursor: ForeachCursor,
}

impl<'a, T, C> Iterator for Iter<'a, T, C> {
    type Item = (NodeId, &'a T);

    fn next(&mut self) -> Option<(NodeId, &'a T)> {
        let slab = self.slab;
        self.tree.foreach_next(slab, &mut self.cursor).map(|id| (id, &slab[id]))
    }
}

impl<'a, T, C> FusedIterator for Iter<'a, T, C> {}

pub struct TreeDebug<'a, T: 'a, C: 'a> {
    tree: &'a RbTree<C>,
    slab: &'a NodeSlab<T>,
}

impl<'a, T: fmt::Debug, C> fmt::Debug for TreeDebug<'a, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (id, value)) in self.tree.iter(self.slab).enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            let color = if self.slab.is_black(id) { 'B' } else { 'R' };
            write!(f, "{id:?}: {value:?} ({color})")?;
        }
        write!(f, "}}")
    }
}
