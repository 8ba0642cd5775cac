//! Node model for the trie.
//!
//! A node is either a terminal [`Node::Leaf`], a bitmap-compressed
//! [`Node::Internal`] branch, or a [`Node::Collision`] bucket holding keys
//! whose full 32-bit hashes are identical. The sum type makes the invalid
//! states of the original flag-based layout (a leaf with children, an
//! internal node with a key) unrepresentable.

use smallvec::SmallVec;

use crate::index::{chunk_bit, compact_position};

/// Inline storage for collision buckets; buckets almost always hold exactly
/// two entries.
pub(crate) type BucketEntries<V> = SmallVec<[(String, V); 2]>;

// =============================================================================
// Node Definition
// =============================================================================

/// A trie element.
#[derive(Debug, Clone)]
pub(crate) enum Node<V> {
    /// Terminal key/value pair. Never has children.
    Leaf {
        /// The stored key.
        key: String,
        /// The stored value.
        value: V,
    },
    /// Branch node with a bitmap-compressed child array.
    Internal(InternalNode<V>),
    /// Two or more entries whose full hashes are identical. Holds at least
    /// two entries; a removal leaving one demotes the bucket to a leaf.
    Collision {
        /// The shared 32-bit hash of every entry in the bucket.
        hash: u32,
        /// The colliding entries, in insertion order.
        entries: BucketEntries<V>,
    },
}

/// A branch node: bit `b` of `bitmap` is set iff a child exists for chunk
/// value `b`, and `children` holds exactly the occupied slots in ascending
/// chunk order.
#[derive(Debug, Clone)]
pub(crate) struct InternalNode<V> {
    pub(crate) bitmap: u32,
    pub(crate) children: Vec<Node<V>>,
}

impl<V> InternalNode<V> {
    /// An internal node with no children.
    pub(crate) const fn new() -> Self {
        Self {
            bitmap: 0,
            children: Vec::new(),
        }
    }

    /// Whether this node has no children at all.
    pub(crate) const fn is_empty(&self) -> bool {
        self.bitmap == 0
    }

    /// Whether a child exists for `chunk_index`.
    pub(crate) const fn has_child(&self, chunk_index: u32) -> bool {
        self.bitmap & chunk_bit(chunk_index) != 0
    }

    /// The child stored for `chunk_index`. The bit must be set.
    pub(crate) fn child(&self, chunk_index: u32) -> &Node<V> {
        debug_assert!(self.has_child(chunk_index));
        &self.children[compact_position(self.bitmap, chunk_index)]
    }

    /// Mutable access to the child stored for `chunk_index`. The bit must be
    /// set.
    pub(crate) fn child_mut(&mut self, chunk_index: u32) -> &mut Node<V> {
        debug_assert!(self.has_child(chunk_index));
        &mut self.children[compact_position(self.bitmap, chunk_index)]
    }

    /// Inserts a child into an unoccupied slot, shifting later entries right
    /// and setting the bitmap bit.
    pub(crate) fn splice_child(&mut self, chunk_index: u32, child: Node<V>) {
        debug_assert!(!self.has_child(chunk_index));
        let position = compact_position(self.bitmap, chunk_index);
        self.children.insert(position, child);
        self.bitmap |= chunk_bit(chunk_index);
        debug_assert_eq!(self.children.len(), self.bitmap.count_ones() as usize);
    }

    /// Removes the child for an occupied slot, shifting later entries left
    /// and clearing the bitmap bit.
    pub(crate) fn remove_child(&mut self, chunk_index: u32) -> Node<V> {
        debug_assert!(self.has_child(chunk_index));
        let position = compact_position(self.bitmap, chunk_index);
        self.bitmap &= !chunk_bit(chunk_index);
        let removed = self.children.remove(position);
        debug_assert_eq!(self.children.len(), self.bitmap.count_ones() as usize);
        removed
    }
}

// =============================================================================
// Tests
// =============================================================================
