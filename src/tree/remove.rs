use compare::Compare;

use super::{rotate, side_of, RbTree};
use crate::node::{Color, Dir, Links, NodeId, NodeSlab};
use crate::path::{find_and_stack, Path};

impl<C> RbTree<C> {
    /// Unlinks `node` from the tree. Does nothing if it is not linked here.
    ///
    /// On return the node's links are empty again, so it may be inserted
    /// into this or another tree, or removed from the slab.
    pub fn remove<T>(&mut self, slab: &mut NodeSlab<T>, node: NodeId)
    where
        C: Compare<T>,
    {
        let Some(root) = self.root else { return };
        if !slab.contains_id(node) {
            return;
        }

        let mut path = Path::new();
        find_and_stack(slab, &self.cmp, root, node, &mut path);
        if path.top() != node {
            trace!("{node:?} is not linked, nothing to remove");
            return;
        }

        // We can only unlink a node with at most one child. With two, trade
        // places with the in-order predecessor (the rightmost node of the
        // left subtree), which has no right child. Positions and colors move;
        // the records do not, since callers hold on to their handles.
        if let (Some(left), Some(right)) = (slab.child(node, Dir::Left), slab.child(node, Dir::Right)) {
            let n0 = path.len();
            let hiparent = if n0 > 1 { Some(path[n0 - 2]) } else { None };

            let mut pred = left;
            path.push(pred);
            while let Some(r) = slab.child(pred, Dir::Right) {
                pred = r;
                path.push(pred);
            }
            let n = path.len();
            let loparent = path[n - 2];
            trace!("swap {node:?} with predecessor {pred:?}");

            match hiparent {
                Some(hp) => {
                    let side = side_of(slab, hp, node);
                    slab.set_child(hp, side, Some(pred));
                }
                None => self.root = Some(pred),
            }

            let pred_left = slab.child(pred, Dir::Left);
            if loparent == node {
                // pred is node's own left child
                slab.set_child(node, Dir::Left, pred_left);
                slab.set_child(pred, Dir::Left, Some(node));
            } else {
                slab.set_child(loparent, Dir::Right, Some(node));
                slab.set_child(node, Dir::Left, pred_left);
                slab.set_child(pred, Dir::Left, Some(left));
            }
            slab.set_child(pred, Dir::Right, Some(right));
            slab.set_child(node, Dir::Right, None);

            path.swap(n0 - 1, n - 1);

            let color = slab.color(node);
            slab.set_color(node, slab.color(pred));
            slab.set_color(pred, color);
        }

        let child = slab.child(node, Dir::Left).or(slab.child(node, Dir::Right));

        if path.len() < 2 {
            self.root = child;
            match child {
                Some(c) => slab.set_color(c, Color::Black),
                None => {
                    debug!("tree emptied, max_depth reset");
                    self.max_depth = 0;
                }
            }
            *slab.links_mut(node) = Links::EMPTY;
            self.validate(slab, "remove");
            return;
        }

        let parent = path[path.len() - 2];
        match child {
            // A childless black node leaves its subtree one black short. It
            // stays linked as a placeholder while the fixup rotates around
            // it, and the fixup cuts it loose once it is isolated.
            None if slab.is_black(node) => fix_missing_black(slab, &mut path, node),
            None => {
                let side = side_of(slab, parent, node);
                slab.set_child(parent, side, None);
            }
            Some(c) => {
                let side = side_of(slab, parent, node);
                slab.set_child(parent, side, Some(c));
                // A single child is always red under a black node, so
                // blackening it restores the black height.
                debug_assert!(slab.is_black(node) || slab.is_black(c), "red node with red child");
                if slab.is_red(node) || slab.is_red(c) {
                    slab.set_color(c, Color::Black);
                }
            }
        }

        // rotations may have reached the root
        self.root = Some(path[0]);
        *slab.links_mut(node) = Links::EMPTY;
        self.validate(slab, "remove");
    }
}

fn sibling<T>(slab: &NodeSlab<T>, parent: NodeId, side: Dir) -> NodeId {
    match slab.child(parent, side.turnaround()) {
        Some(sib) => sib,
        // a black node's sibling subtree holds at least one black node
        None => panic!("black node {parent:?}/{side:?} without a sibling"),
    }
}

/// Restores black height when the subtree at the top of `path` is one black
/// short, walking upward until a rotation or recoloring absorbs the
/// deficit or the root is reached (the root absorbs it by definition).
///
/// `null_node` is a childless node being removed that is still linked as a
/// stand-in; it is unlinked from its parent once the fixup is done with it.
fn fix_missing_black<T>(slab: &mut NodeSlab<T>, path: &mut Path, null_node: NodeId) {
    while path.len() > 1 {
        let n = path.len();
        let node = path[n - 1];
        let parent = path[n - 2];
        let side = side_of(slab, parent, node);
        let mut sib = sibling(slab, parent, side);

        debug_assert!(slab.is_black(node));

        // Make sure the sibling is black. Rotating a red sibling above the
        // parent pushes `node` one level down, under the same parent.
        if slab.is_red(sib) {
            trace!("red sibling {sib:?} of {node:?}");
            path[n - 1] = sib;
            rotate(slab, path);
            slab.set_color(parent, Color::Red);
            slab.set_color(sib, Color::Black);
            path.push(node);
            sib = sibling(slab, parent, side);
        }

        let c0 = slab.child(sib, Dir::Left);
        let c1 = slab.child(sib, Dir::Right);
        if !slab.is_red_child(c0) && !slab.is_red_child(c1) {
            if node == null_node {
                slab.set_child(parent, side, None);
            }
            slab.set_color(sib, Color::Red);
            if slab.is_black(parent) {
                // the whole parent subtree is now short; go up a level
                path.pop();
                continue;
            }
            slab.set_color(parent, Color::Black);
            return;
        }

        // The sibling has a red child. Make sure one sits on the far side.
        let mut outer = slab.child(sib, side.turnaround());
        if !slab.is_red_child(outer) {
            let Some(inner) = slab.child(sib, side) else {
                panic!("sibling {sib:?} lost its red child");
            };
            trace!("red inner nephew {inner:?}");
            let n = path.len();
            path[n - 1] = sib;
            path.push(inner);
            rotate(slab, path);
            slab.set_color(sib, Color::Red);
            slab.set_color(inner, Color::Black);

            // path is [.., parent, inner, sib]; put node back on top
            let n = path.len();
            sib = path[n - 2];
            outer = slab.child(sib, side.turnaround());
            path[n - 2] = node;
            path.pop();
        }

        let Some(outer) = outer else {
            panic!("sibling {sib:?} without a far child");
        };
        debug_assert!(slab.is_red(outer));
        slab.set_color(sib, slab.color(parent));
        slab.set_color(parent, Color::Black);
        slab.set_color(outer, Color::Black);
        let n = path.len();
        path[n - 1] = sib;
        rotate(slab, path);
        if node == null_node {
            slab.set_child(parent, side, None);
        }
        return;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{build, init_logging, keys};

    #[test]
    fn test_remove_two_child_root() {
        init_logging();
        let (mut slab, mut tree, ids) = build(&[50, 30, 70, 20, 40, 60, 80]);
        tree.remove(&mut slab, ids[0]);

        // 40 takes over the root position, 50's record is untouched
        assert_eq!(tree.root(), Some(ids[4]));
        assert!(slab.is_black(ids[4]));
        assert_eq!(slab[ids[0]], 50);
        assert!(slab.links(ids[0]).is_empty());
        assert_eq!(keys(&tree, &slab), vec![20, 30, 40, 60, 70, 80]);
    }

    #[test]
    fn test_remove_adjacent_predecessor() {
        // 20 -> left child 10 has no right child, so 10 is the predecessor
        let (mut slab, mut tree, ids) = build(&[20, 10, 30, 5]);
        tree.remove(&mut slab, ids[0]);
        assert_eq!(tree.root(), Some(ids[1]));
        assert_eq!(slab.child(ids[1], Dir::Left), Some(ids[3]));
        assert_eq!(slab.child(ids[1], Dir::Right), Some(ids[2]));
        assert_eq!(keys(&tree, &slab), vec![5, 10, 30]);
    }

    #[test]
    fn test_remove_red_leaf() {
        let (mut slab, mut tree, ids) = build(&[10, 20, 30]);
        tree.remove(&mut slab, ids[2]);
        assert_eq!(tree.root(), Some(ids[1]));
        assert_eq!(slab.child(ids[1], Dir::Right), None);
        assert_eq!(keys(&tree, &slab), vec![10, 20]);
    }

    #[test]
    fn test_remove_black_with_red_child() {
        let (mut slab, mut tree, ids) = build(&[20, 10, 30, 5]);
        tree.remove(&mut slab, ids[1]);
        assert_eq!(slab.child(ids[0], Dir::Left), Some(ids[3]));
        assert!(slab.is_black(ids[3]));
    }

    #[test]
    fn test_remove_black_leaf_red_sibling() {
        // 20B(10B, 40R(30B, 50B)): removing 10 needs the red-sibling rotation
        let (mut slab, mut tree, ids) = build(&[20, 10, 30, 40, 50, 60]);
        tree.remove(&mut slab, ids[5]);
        assert!(slab.is_red(ids[3]));
        assert!(slab.is_black(ids[1]));
        tree.remove(&mut slab, ids[1]);
        assert_eq!(keys(&tree, &slab), vec![20, 30, 40, 50]);
        assert_eq!(tree.root(), Some(ids[3]));
    }

    #[test]
    fn test_remove_black_leaf_inner_nephew() {
        // 20B(10B, 30B(25R)): the only red nephew is on the near side
        let (mut slab, mut tree, ids) = build(&[20, 10, 30, 5, 25]);
        tree.remove(&mut slab, ids[3]);
        assert!(slab.is_black(ids[1]));
        tree.remove(&mut slab, ids[1]);
        assert_eq!(tree.root(), Some(ids[4]));
        assert_eq!(keys(&tree, &slab), vec![20, 25, 30]);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let (mut slab, mut tree, ids) = build(&[1, 2, 3]);
        let loose = slab.insert(2).unwrap();
        tree.remove(&mut slab, loose);
        let stale = slab.insert(9).unwrap();
        slab.remove(stale);
        tree.remove(&mut slab, stale);
        assert_eq!(keys(&tree, &slab), vec![1, 2, 3]);
        assert!(ids.iter().all(|&id| tree.contains(&slab, id)));
    }

    #[test]
    fn test_remove_last_resets_depth() {
        let (mut slab, mut tree, ids) = build(&[1]);
        tree.remove(&mut slab, ids[0]);
        assert!(tree.is_empty());
        assert_eq!(tree.max_depth(), 0);
        tree.remove(&mut slab, ids[0]);
        assert!(tree.is_empty());
    }
}
