use std::fmt;
use std::num::NonZeroU32;
use std::ops::{Index, IndexMut};

use slab::Slab;

use crate::error::Error;

/// Handle to a record in a [`NodeSlab`].
///
/// Internally this is the slot index plus one, so `Option<NodeId>` costs no
/// more than a `u32`. Indices are limited to 31 bits: the left-child slot of
/// [`Links`] shifts the handle up by one to make room for the color tag.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(NonZeroU32);

impl NodeId {
    /// Largest slot index a `NodeId` can name.
    pub const MAX_INDEX: usize = (u32::MAX >> 1) as usize - 1;

    // Fills unused path slots; never handed out by a slab.
    pub(crate) const DANGLING: NodeId = NodeId(NonZeroU32::MAX);

    fn from_index(index: usize) -> Option<NodeId> {
        if index > Self::MAX_INDEX {
            return None;
        }
        NonZeroU32::new(index as u32 + 1).map(NodeId)
    }

    fn from_raw(raw: u32) -> Option<NodeId> {
        NonZeroU32::new(raw).map(NodeId)
    }

    /// The slot this handle names in its slab.
    #[inline]
    pub fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index())
    }
}

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum Dir {
    Left,
    Right,
}

impl Dir {
    pub fn turnaround(self) -> Dir {
        if self == Dir::Left {
            Dir::Right
        } else {
            Dir::Left
        }
    }
}

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum Color {
    Red,
    Black,
}

const BLACK_BIT: u32 = 1;

/// The structural half of a node: two child slots and a color.
///
/// The color rides in bit 0 of the left slot, which otherwise holds the raw
/// handle shifted up by one. Reading the left child shifts the tag away and
/// writing it keeps the tag; only [`Links::set_color`] touches the bit. A
/// zeroed `Links` is an unlinked node: no children, colored red.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Links {
    tagged_left: u32,
    right: Option<NodeId>,
}

impl Links {
    pub const EMPTY: Links = Links { tagged_left: 0, right: None };

    #[inline]
    pub fn child(&self, dir: Dir) -> Option<NodeId> {
        match dir {
            Dir::Left => NodeId::from_raw(self.tagged_left >> 1),
            Dir::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, dir: Dir, child: Option<NodeId>) {
        match dir {
            Dir::Left => {
                let raw = child.map_or(0, |c| c.0.get());
                self.tagged_left = (raw << 1) | (self.tagged_left & BLACK_BIT);
            }
            Dir::Right => self.right = child,
        }
    }

    #[inline]
    pub fn color(&self) -> Color {
        if self.tagged_left & BLACK_BIT != 0 {
            Color::Black
        } else {
            Color::Red
        }
    }

    #[inline]
    pub(crate) fn set_color(&mut self, color: Color) {
        match color {
            Color::Black => self.tagged_left |= BLACK_BIT,
            Color::Red => self.tagged_left &= !BLACK_BIT,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.child(Dir::Left).is_none() && self.child(Dir::Right).is_none()
    }
}

impl fmt::Debug for Links {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Links")
            .field("left", &self.child(Dir::Left))
            .field("right", &self.child(Dir::Right))
            .field("color", &self.color())
            .finish()
    }
}

struct Node<T> {
    links: Links,
    value: T,
}

/// Caller-owned storage for tree nodes.
///
/// Each record sits next to its own [`Links`], which is what makes the tree
/// intrusive: trees borrow the slab for the duration of a call and only ever
/// rewrite links. A record is linked into at most one tree at a time, but
/// one slab may back several trees.
///
/// Removing a record that is still linked into a tree corrupts that tree.
pub struct NodeSlab<T> {
    slab: Slab<Node<T>>,
}

impl<T> NodeSlab<T> {
    pub fn new() -> NodeSlab<T> {
        NodeSlab { slab: Slab::new() }
    }

    pub fn with_capacity(capacity: usize) -> NodeSlab<T> {
        NodeSlab { slab: Slab::with_capacity(capacity) }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slab.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slab.is_empty()
    }

    /// Stores `value` as a fresh, unlinked node.
    pub fn insert(&mut self, value: T) -> Result<NodeId, Error> {
        let id = NodeId::from_index(self.slab.vacant_key()).ok_or(Error::SlabFull {
            capacity: NodeId::MAX_INDEX + 1,
        })?;
        let key = self.slab.insert(Node { links: Links::EMPTY, value });
        debug_assert_eq!(key, id.index());
        Ok(id)
    }

    /// Takes the record out of the slab, freeing its slot for reuse.
    ///
    /// # Panics
    ///
    /// Panics if `id` names a vacant slot.
    pub fn remove(&mut self, id: NodeId) -> T {
        self.slab.remove(id.index()).value
    }

    #[inline]
    pub fn contains_id(&self, id: NodeId) -> bool {
        self.slab.contains(id.index())
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.slab.get(id.index()).map(|n| &n.value)
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.slab.get_mut(id.index()).map(|n| &mut n.value)
    }

    /// A copy of the node's structural fields.
    #[inline]
    pub fn links(&self, id: NodeId) -> Links {
        self.slab[id.index()].links
    }

    #[inline]
    pub(crate) fn links_mut(&mut self, id: NodeId) -> &mut Links {
        &mut self.slab[id.index()].links
    }

    #[inline]
    pub fn child(&self, id: NodeId, dir: Dir) -> Option<NodeId> {
        self.slab[id.index()].links.child(dir)
    }

    #[inline]
    pub(crate) fn set_child(&mut self, id: NodeId, dir: Dir, child: Option<NodeId>) {
        self.links_mut(id).set_child(dir, child)
    }

    #[inline]
    pub fn color(&self, id: NodeId) -> Color {
        self.slab[id.index()].links.color()
    }

    #[inline]
    pub(crate) fn set_color(&mut self, id: NodeId, color: Color) {
        self.links_mut(id).set_color(color)
    }

    #[inline]
    pub fn is_black(&self, id: NodeId) -> bool {
        self.color(id) == Color::Black
    }

    #[inline]
    pub(crate) fn is_red(&self, id: NodeId) -> bool {
        self.color(id) == Color::Red
    }

    // absent children count as black
    #[inline]
    pub(crate) fn is_red_child(&self, child: Option<NodeId>) -> bool {
        child.map_or(false, |c| self.is_red(c))
    }
}

impl<T> Default for NodeSlab<T> {
    fn default() -> NodeSlab<T> {
        NodeSlab::new()
    }
}

impl<T> Index<NodeId> for NodeSlab<T> {
    type Output = T;

    fn index(&self, id: NodeId) -> &T {
        &self.slab[id.index()].value
    }
}

impl<T> IndexMut<NodeId> for NodeSlab<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut T {
        &mut self.slab[id.index()].value
    }
}
