//! An intrusive, allocation-free red-black tree.
//!
//! Nodes live in a caller-owned [`NodeSlab`]; the tree itself is nothing but a
//! root handle, a comparator and a high-water mark of its height. Nodes store
//! no parent links: every mutation rebuilds the root-to-node path on a fixed
//! stack buffer and repairs the tree with bounded, non-recursive fixup loops,
//! so insertion and removal never allocate and never recurse.
//!
//! ```
//! use slab_rbtree::{natural, NodeSlab, RbTree};
//!
//! let mut slab = NodeSlab::new();
//! let mut tree = RbTree::new(natural::<u32>());
//!
//! let ids: Vec<_> = [30u32, 10, 20].iter().map(|&k| slab.insert(k).unwrap()).collect();
//! for &id in &ids {
//!     tree.insert(&mut slab, id);
//! }
//!
//! let keys: Vec<u32> = tree.iter(&slab).map(|(_, &k)| k).collect();
//! assert_eq!(keys, [10, 20, 30]);
//!
//! tree.remove(&mut slab, ids[2]);
//! assert!(!tree.contains(&slab, ids[2]));
//! ```

#[macro_use]
extern crate log;

pub use compare::{natural, Compare};

pub use check::{Summary, Violation};
pub use error::Error;
pub use node::{Color, Dir, Links, NodeId, NodeSlab};
pub use path::PATH_CAPACITY;
pub use tree::RbTree;
pub use walk::{ForeachCursor, Iter, TreeDebug};

#[cfg(feature = "walk")]
pub use walk::walk;

#[cfg(feature = "priq")]
pub use priq::{Ready, ReadyQueue};

mod check;
mod error;
mod node;
mod path;
mod tree;
mod walk;

#[cfg(feature = "priq")]
pub mod priq;

#[cfg(test)]
mod test_util;
