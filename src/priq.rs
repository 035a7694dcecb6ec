//! A scheduler-style ready queue on top of [`RbTree`].
//!
//! Entries are served lowest priority value first, and first-in first-out
//! within a priority. FIFO order comes from a per-queue order key stamped on
//! every entry as it is queued; the key is part of the tree ordering, so no
//! two entries ever compare equal.

use std::cmp::Ordering;

use crate::error::Error;
use crate::node::{NodeId, NodeSlab};
use crate::tree::RbTree;
use crate::walk::ForeachCursor;

/// A queued item with its scheduling key.
#[derive(Debug)]
pub struct Ready<T> {
    prio: i32,
    order_key: u32,
    item: T,
}

impl<T> Ready<T> {
    #[inline]
    pub fn prio(&self) -> i32 {
        self.prio
    }

    #[inline]
    pub fn item(&self) -> &T {
        &self.item
    }
}

type ServiceOrder<T> = fn(&Ready<T>, &Ready<T>) -> Ordering;

fn service_order<T>(a: &Ready<T>, b: &Ready<T>) -> Ordering {
    a.prio.cmp(&b.prio).then(a.order_key.cmp(&b.order_key))
}

pub struct ReadyQueue<T> {
    slab: NodeSlab<Ready<T>>,
    tree: RbTree<ServiceOrder<T>>,
    next_order_key: u32,
}

impl<T> ReadyQueue<T> {
    pub fn new() -> ReadyQueue<T> {
        ReadyQueue {
            slab: NodeSlab::new(),
            tree: RbTree::new(service_order::<T> as ServiceOrder<T>),
            next_order_key: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slab.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Queues `item` behind every entry of equal or more urgent priority.
    pub fn push(&mut self, prio: i32, item: T) -> Result<NodeId, Error> {
        let order_key = self.take_order_key();
        let id = self.slab.insert(Ready { prio, order_key, item })?;
        self.tree.insert(&mut self.slab, id);
        Ok(id)
    }

    /// The entry that would be served next.
    #[inline]
    pub fn best(&self) -> Option<NodeId> {
        self.tree.min(&self.slab)
    }

    pub fn pop(&mut self) -> Option<(i32, T)> {
        let id = self.best()?;
        self.tree.remove(&mut self.slab, id);
        let ready = self.slab.remove(id);
        Some((ready.prio, ready.item))
    }

    pub fn remove(&mut self, id: NodeId) -> Result<T, Error> {
        if !self.tree.contains(&self.slab, id) {
            return Err(Error::NotLinked(id));
        }
        self.tree.remove(&mut self.slab, id);
        Ok(self.slab.remove(id).item)
    }

    /// Moves an entry to the back of its priority class.
    pub fn requeue(&mut self, id: NodeId) -> Result<(), Error> {
        if !self.tree.contains(&self.slab, id) {
            return Err(Error::NotLinked(id));
        }
        self.tree.remove(&mut self.slab, id);
        let order_key = self.take_order_key();
        self.slab[id].order_key = order_key;
        self.tree.insert(&mut self.slab, id);
        Ok(())
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Ready<T>> {
        self.slab.get(id)
    }

    /// Entries in service order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Ready<T>)> + '_ {
        self.tree.iter(&self.slab)
    }

    fn take_order_key(&mut self) -> u32 {
        if self.next_order_key == u32::MAX {
            self.renumber();
        }
        let key = self.next_order_key;
        self.next_order_key += 1;
        key
    }

    // Out of keys. Queued entries get fresh keys 0.. in their current order,
    // which keeps the tree ordering intact, and new keys resume after them.
    // An entry being queued is never in the tree at this point.
    fn renumber(&mut self) {
        warn!("order key wrapped, renumbering {} queued entries", self.len());
        self.next_order_key = 0;
        let mut cursor = ForeachCursor::new();
        while let Some(id) = self.tree.foreach_next(&self.slab, &mut cursor) {
            self.slab[id].order_key = self.next_order_key;
            self.next_order_key += 1;
        }
    }

    #[cfg(test)]
    fn check(&self) {
        self.tree.check(&self.slab).unwrap();
    }
}

impl<T> Default for ReadyQueue<T> {
    fn default() -> ReadyQueue<T> {
        ReadyQueue::new()
    }
}
