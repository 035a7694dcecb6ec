use compare::Natural;
use simplelog::{Config, LevelFilter, TestLogger};

use crate::node::{NodeId, NodeSlab};
use crate::tree::RbTree;

pub(crate) fn init_logging() {
    // every test calls this; only the first init wins
    let _ = TestLogger::init(LevelFilter::Debug, Config::default());
}

/// Inserts `keys` in order into a fresh slab and tree.
pub(crate) fn build(keys: &[i32]) -> (NodeSlab<i32>, RbTree<Natural<i32>>, Vec<NodeId>) {
    let mut slab = NodeSlab::with_capacity(keys.len());
    let mut tree = RbTree::new(compare::natural());
    let mut ids = Vec::with_capacity(keys.len());
    for &k in keys {
        let id = slab.insert(k).unwrap();
        tree.insert(&mut slab, id);
        ids.push(id);
    }
    (slab, tree, ids)
}

pub(crate) fn keys<C>(tree: &RbTree<C>, slab: &NodeSlab<i32>) -> Vec<i32> {
    tree.iter(slab).map(|(_, &k)| k).collect()
}
