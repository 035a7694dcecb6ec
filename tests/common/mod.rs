#![allow(dead_code)]

use simplelog::{Config, LevelFilter, TestLogger};
use slab_rbtree::{Compare, NodeId, NodeSlab, RbTree, Summary};

pub fn init_logging() {
    let _ = TestLogger::init(LevelFilter::Info, Config::default());
}

pub fn insert_all<C>(tree: &mut RbTree<C>, slab: &mut NodeSlab<u32>, keys: &[u32]) -> Vec<NodeId>
where
    C: Compare<u32>,
{
    keys.iter()
        .map(|&k| {
            let id = slab.insert(k).unwrap();
            tree.insert(slab, id);
            id
        })
        .collect()
}

pub fn keys<C>(tree: &RbTree<C>, slab: &NodeSlab<u32>) -> Vec<u32> {
    tree.iter(slab).map(|(_, &k)| k).collect()
}

/// Runs the checker, printing the tree on failure.
pub fn assert_valid<C>(tree: &RbTree<C>, slab: &NodeSlab<u32>) -> Summary
where
    C: Compare<u32>,
{
    match tree.check(slab) {
        Ok(summary) => summary,
        Err(violation) => panic!("{violation}\n{:?}", tree.debug(slab)),
    }
}
