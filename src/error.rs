//! Error types for the fallible edges around the tree.
//!
//! Tree mutation itself never fails; these cover slab growth and the
//! ready queue's handle checks.

use std::fmt;

use crate::node::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The slab already holds as many records as a `NodeId` can address
    SlabFull { capacity: usize },
    /// The handle does not name a node linked into the queue
    NotLinked(NodeId),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SlabFull { capacity } => write!(f, "node slab full ({capacity} records)"),
            Self::NotLinked(id) => write!(f, "node {id:?} is not linked"),
        }
    }
}

impl std::error::Error for Error {}
