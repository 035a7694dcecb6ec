use compare::Compare;

use crate::node::{Dir, NodeId, NodeSlab};
use crate::path::{Path, PATH_CAPACITY};

mod insert;
mod remove;

/// A red-black tree over nodes stored in a [`NodeSlab`].
///
/// The tree holds only the root handle, the ordering and `max_depth`, the
/// deepest path any insertion has built since the tree was last empty. The
/// ordering is any [`Compare`]; the tree asks it one question, `compares_lt`,
/// and needs it to be a strict total order over the records it links. Records
/// that compare equal are not supported.
///
/// Insertion, removal, `contains`, `get_minmax` and `foreach_next` neither
/// allocate nor recurse. The diagnostic helpers `height`,
/// `recompute_max_depth`, `check` and the `walk` feature recurse to the tree's
/// height. Callers sharing a tree between execution contexts must serialize
/// every call, queries included.
pub struct RbTree<C> {
    root: Option<NodeId>,
    max_depth: usize,
    cmp: C,
}

impl<C> RbTree<C> {
    #[inline]
    pub const fn new(cmp: C) -> RbTree<C> {
        RbTree { root: None, max_depth: 0, cmp }
    }

    #[inline]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Upper bound on the tree's height, in nodes.
    ///
    /// Grows with insertions and drops to zero when the tree empties; removals
    /// otherwise leave it alone. See [`RbTree::recompute_max_depth`].
    #[inline]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    #[inline]
    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// The extreme node on `dir`: the smallest for `Dir::Left`, the largest
    /// for `Dir::Right`.
    pub fn get_minmax<T>(&self, slab: &NodeSlab<T>, dir: Dir) -> Option<NodeId> {
        let mut n = self.root?;
        while let Some(c) = slab.child(n, dir) {
            n = c;
        }
        Some(n)
    }

    #[inline]
    pub fn min<T>(&self, slab: &NodeSlab<T>) -> Option<NodeId> {
        self.get_minmax(slab, Dir::Left)
    }

    #[inline]
    pub fn max<T>(&self, slab: &NodeSlab<T>) -> Option<NodeId> {
        self.get_minmax(slab, Dir::Right)
    }

    /// Measures the live height, in nodes.
    pub fn height<T>(&self, slab: &NodeSlab<T>) -> usize {
        fn measure<T>(slab: &NodeSlab<T>, node: Option<NodeId>, depth: usize) -> usize {
            match node {
                None => depth,
                // a corrupt tree could cycle; the path buffer bounds any real height
                Some(_) if depth >= PATH_CAPACITY => depth,
                Some(n) => {
                    let l = measure(slab, slab.child(n, Dir::Left), depth + 1);
                    let r = measure(slab, slab.child(n, Dir::Right), depth + 1);
                    l.max(r)
                }
            }
        }
        measure(slab, self.root, 0)
    }

    /// Tightens `max_depth` to the measured height.
    ///
    /// `max_depth` only sizes path buffers, so a stale high-water mark after
    /// many removals is harmless. It is never set below the live height.
    pub fn recompute_max_depth<T>(&mut self, slab: &NodeSlab<T>) -> usize {
        let height = self.height(slab);
        if height != self.max_depth {
            debug!("max_depth {} -> {}", self.max_depth, height);
        }
        self.max_depth = height;
        height
    }
}

impl<C> RbTree<C> {
    /// Whether `node` is linked into this tree.
    ///
    /// Identity matters, not ordering: a different record that compares
    /// equal to a linked one is not contained.
    pub fn contains<T>(&self, slab: &NodeSlab<T>, node: NodeId) -> bool
    where
        C: Compare<T>,
    {
        if !slab.contains_id(node) {
            return false;
        }
        let mut cur = self.root;
        while let Some(n) = cur {
            if n == node {
                return true;
            }
            let dir = if self.cmp.compares_lt(&slab[node], &slab[n]) {
                Dir::Left
            } else {
                Dir::Right
            };
            cur = slab.child(n, dir);
        }
        false
    }

    // Runs the invariant checker after a mutation in test builds, or always
    // with the `validate` feature.
    #[inline]
    fn validate<T>(&self, slab: &NodeSlab<T>, op: &str)
    where
        C: Compare<T>,
    {
        if cfg!(any(test, feature = "validate")) {
            if let Err(violation) = self.check(slab) {
                error!("tree corrupt after {op}: {violation}");
                panic!("tree corrupt after {op}: {violation}");
            }
        }
    }
}

impl<C: Default> Default for RbTree<C> {
    fn default() -> RbTree<C> {
        RbTree::new(C::default())
    }
}

/// Which side of `parent` `child` hangs from.
#[inline]
fn side_of<T>(slab: &NodeSlab<T>, parent: NodeId, child: NodeId) -> Dir {
    let right = slab.child(parent, Dir::Right) == Some(child);
    debug_assert!(right || slab.child(parent, Dir::Left) == Some(child));
    if right {
        Dir::Right
    } else {
        Dir::Left
    }
}

/// Rotates the top entry of `path` above the entry beneath it.
///
/// With `P = path[n-2]` and `C = path[n-1]` hanging from `P` on side `s`, `C`
/// takes `P`'s place under the grandparent (if there is one), `P` becomes
/// `C`'s child on the far side, and the subtree `C` held on that side moves
/// to `P`'s side `s`. In-order sequence is preserved and no color changes.
/// Afterwards `path[n-2] = C` and `path[n-1] = P`, so the path still follows
/// live links. The caller must refresh the root from `path[0]`.
fn rotate<T>(slab: &mut NodeSlab<T>, path: &mut Path) {
    let n = path.len();
    debug_assert!(n >= 2);
    let parent = path[n - 2];
    let child = path[n - 1];
    let side = side_of(slab, parent, child);
    let inner = slab.child(child, side.turnaround());

    if n >= 3 {
        let grandparent = path[n - 3];
        let gside = side_of(slab, grandparent, parent);
        slab.set_child(grandparent, gside, Some(child));
    }
    slab.set_child(child, side.turnaround(), Some(parent));
    slab.set_child(parent, side, inner);

    path[n - 2] = child;
    path[n - 1] = parent;
    trace!("rotate {child:?} above {parent:?}");
}
