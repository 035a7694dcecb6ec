use compare::Compare;

use super::{rotate, side_of, RbTree};
use crate::node::{Color, Dir, Links, NodeId, NodeSlab};
use crate::path::{find_and_stack, Path, PATH_CAPACITY};

impl<C> RbTree<C> {
    /// Links `node` into the tree.
    ///
    /// `node` must not be linked into any tree, and must not compare equal to
    /// a node already in this one. Its links are reset before use.
    pub fn insert<T>(&mut self, slab: &mut NodeSlab<T>, node: NodeId)
    where
        C: Compare<T>,
    {
        debug_assert!(!self.contains(slab, node), "{node:?} is already linked");
        *slab.links_mut(node) = Links::EMPTY;

        let Some(root) = self.root else {
            slab.set_color(node, Color::Black);
            self.root = Some(node);
            self.max_depth = 1;
            debug!("{node:?} is the new root");
            self.validate(slab, "insert");
            return;
        };

        debug_assert!(self.max_depth < PATH_CAPACITY);
        let mut path = Path::new();
        find_and_stack(slab, &self.cmp, root, node, &mut path);

        let parent = path.top();
        let dir = if self.cmp.compares_lt(&slab[node], &slab[parent]) {
            Dir::Left
        } else {
            Dir::Right
        };
        debug_assert!(slab.child(parent, dir).is_none());
        slab.set_child(parent, dir, Some(node));
        slab.set_color(node, Color::Red);
        path.push(node);

        let depth = path.len();
        fix_extra_red(slab, &mut path);

        if depth > self.max_depth {
            debug!("max_depth {} -> {}", self.max_depth, depth);
            self.max_depth = depth;
        }

        // rotations may have moved a new node into the root
        let root = path[0];
        slab.set_color(root, Color::Black);
        self.root = Some(root);
        self.validate(slab, "insert");
    }
}

/// Repairs a red node with a red parent at the top of `path`.
///
/// Each pass either pushes the problem two levels up by recoloring (red
/// aunt), or ends it with one or two rotations (black or missing aunt). The
/// caller blackens the root afterwards.
fn fix_extra_red<T>(slab: &mut NodeSlab<T>, path: &mut Path) {
    while path.len() > 1 {
        let n = path.len();
        let node = path[n - 1];
        let parent = path[n - 2];

        debug_assert!(!slab.is_red_child(slab.child(node, Dir::Left)));
        debug_assert!(!slab.is_red_child(slab.child(node, Dir::Right)));

        if slab.is_black(parent) {
            return;
        }

        // a red parent is never the root, so there is a grandparent
        let grandparent = path[n - 3];
        let side = side_of(slab, grandparent, parent);
        let aunt = slab.child(grandparent, side.turnaround());

        if let Some(aunt) = aunt.filter(|&a| slab.is_red(a)) {
            trace!("red aunt {aunt:?}: recolor under {grandparent:?}");
            slab.set_color(grandparent, Color::Red);
            slab.set_color(parent, Color::Black);
            slab.set_color(aunt, Color::Black);
            // the grandparent may now be red under a red parent
            path.truncate(n - 2);
            continue;
        }

        // straighten a zig-zag so node, parent and grandparent line up
        if side_of(slab, parent, node) != side {
            trace!("zig-zag at {node:?}");
            rotate(slab, path);
        }

        // rotate the middle node above the grandparent and swap their colors
        path.pop();
        rotate(slab, path);
        let n = path.len();
        slab.set_color(path[n - 2], Color::Black);
        slab.set_color(path[n - 1], Color::Red);
        return;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{build, init_logging, keys};

    fn colors(slab: &NodeSlab<i32>, ids: &[NodeId]) -> Vec<Color> {
        ids.iter().map(|&id| slab.color(id)).collect()
    }

    #[test]
    fn test_first_insert_is_black_root() {
        init_logging();
        let (slab, tree, ids) = build(&[7]);
        assert_eq!(tree.root(), Some(ids[0]));
        assert!(slab.is_black(ids[0]));
        assert_eq!(tree.max_depth(), 1);
    }

    #[test]
    fn test_straight_line_rotates_once() {
        let (slab, tree, ids) = build(&[10, 20, 30]);
        assert_eq!(tree.root(), Some(ids[1]));
        assert_eq!(slab.child(ids[1], Dir::Left), Some(ids[0]));
        assert_eq!(slab.child(ids[1], Dir::Right), Some(ids[2]));
        assert_eq!(colors(&slab, &ids), [Color::Red, Color::Black, Color::Red]);
        assert_eq!(tree.max_depth(), 3);
    }

    #[test]
    fn test_zig_zag_rotates_twice() {
        let (slab, tree, ids) = build(&[30, 10, 20]);
        assert_eq!(tree.root(), Some(ids[2]));
        assert_eq!(slab.child(ids[2], Dir::Left), Some(ids[1]));
        assert_eq!(slab.child(ids[2], Dir::Right), Some(ids[0]));
        assert_eq!(colors(&slab, &ids), [Color::Red, Color::Red, Color::Black]);
    }

    #[test]
    fn test_red_aunt_recolors() {
        let (slab, tree, ids) = build(&[20, 10, 30, 5]);
        // no rotation: 10 and 30 turn black, 20 stays the (black) root
        assert_eq!(tree.root(), Some(ids[0]));
        assert_eq!(
            colors(&slab, &ids),
            [Color::Black, Color::Black, Color::Black, Color::Red]
        );
        assert_eq!(keys(&tree, &slab), vec![5, 10, 20, 30]);
    }

    #[test]
    fn test_ascending_run_stays_balanced() {
        let input: Vec<i32> = (0..1000).collect();
        let (slab, tree, _) = build(&input);
        let summary = tree.check(&slab).unwrap();
        assert_eq!(summary.nodes, 1000);
        assert!(summary.height <= 2 * 10);
        assert!(tree.max_depth() >= summary.height);
        assert_eq!(keys(&tree, &slab), input);
    }

    #[test]
    fn test_reinsert_after_remove() {
        let (mut slab, mut tree, ids) = build(&[1, 2, 3, 4]);
        tree.remove(&mut slab, ids[1]);
        assert!(slab.links(ids[1]).is_empty());
        tree.insert(&mut slab, ids[1]);
        assert!(tree.contains(&slab, ids[1]));
        assert_eq!(keys(&tree, &slab), vec![1, 2, 3, 4]);
    }
}
