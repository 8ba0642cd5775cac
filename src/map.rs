//! The trie engine: a mutable string-keyed HAMT map.

use std::fmt;
use std::iter::FromIterator;
use std::mem;

use crate::hash::{Fnv1a, KeyHasher};
use crate::index::{chunk_at, compact_position};
use crate::node::{BucketEntries, InternalNode, Node};

// =============================================================================
// HamtMap Definition
// =============================================================================

/// A mutable hash array mapped trie from `String` keys to values of type `V`.
///
/// The map is a 32-way trie over successive 5-bit chunks of a 32-bit key
/// hash (most significant chunk first). Each branch node stores only its
/// occupied children, in a compacted array indexed through a bitmap, so a
/// sparsely populated node costs no more than its population. Keys whose
/// hashes share a prefix nest one branch level per shared chunk; keys whose
/// full hashes are identical share a collision bucket.
///
/// Hashing is delegated to a [`KeyHasher`] fixed at construction;
/// [`Fnv1a`] is the default.
///
/// # Time Complexity
///
/// | Operation      | Complexity        |
/// |----------------|-------------------|
/// | `new`          | O(1)              |
/// | `get`          | O(log32 N)        |
/// | `insert`       | O(log32 N)        |
/// | `remove`       | O(log32 N)        |
/// | `len`          | O(1)              |
///
/// # Concurrency
///
/// The map performs no internal synchronization; mutation is in-place.
/// `&mut self` on every mutating operation makes the borrow checker enforce
/// the single-writer discipline. Shared-state use requires an external lock.
///
/// # Examples
///
/// ```rust
/// use hamtrie::HamtMap;
///
/// let mut map = HamtMap::new();
/// map.insert("one".to_string(), 1);
/// map.insert("two".to_string(), 2);
///
/// assert_eq!(map.get("one"), Some(&1));
/// assert_eq!(map.get("three"), None);
/// assert!(map.remove("one"));
/// assert_eq!(map.len(), 1);
/// ```
pub struct HamtMap<V, H = Fnv1a> {
    /// Root branch node. Always internal, never destroyed, only emptied.
    root: InternalNode<V>,
    /// The hash function, fixed for the lifetime of the map.
    hasher: H,
    /// Number of entries.
    length: usize,
}

impl<V> HamtMap<V> {
    /// Creates an empty map using the default [`Fnv1a`] hasher.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hamtrie::HamtMap;
    ///
    /// let map: HamtMap<i32> = HamtMap::new();
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::with_hasher(Fnv1a)
    }
}

impl<V, H> HamtMap<V, H> {
    /// Creates an empty map using the given hasher.
    ///
    /// The hasher must stay deterministic for the lifetime of the map; see
    /// [`KeyHasher`].
    #[inline]
    #[must_use]
    pub const fn with_hasher(hasher: H) -> Self {
        Self {
            root: InternalNode::new(),
            hasher,
            length: 0,
        }
    }

    /// Returns the number of entries in the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hamtrie::HamtMap;
    ///
    /// let mut map = HamtMap::new();
    /// map.insert("a".to_string(), 1);
    /// map.insert("b".to_string(), 2);
    /// assert_eq!(map.len(), 2);
    /// ```
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the map contains no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Removes every entry, resetting the root to an empty branch node.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hamtrie::HamtMap;
    ///
    /// let mut map = HamtMap::new();
    /// map.insert("a".to_string(), 1);
    /// map.clear();
    /// assert!(map.is_empty());
    /// assert_eq!(map.root_bitmap(), 0);
    /// ```
    pub fn clear(&mut self) {
        self.root = InternalNode::new();
        self.length = 0;
    }

    /// Returns a reference to the map's hasher.
    #[inline]
    #[must_use]
    pub const fn hasher(&self) -> &H {
        &self.hasher
    }

    /// The occupancy bitmap of the root node.
    ///
    /// Structural diagnostic: bit `b` is set iff some stored key's hash has
    /// chunk value `b` in its top 5 bits. Exposed for regression tests that
    /// pin the trie's layout against a fixed hasher.
    #[inline]
    #[must_use]
    pub const fn root_bitmap(&self) -> u32 {
        self.root.bitmap
    }
}

// =============================================================================
// Core Operations
// =============================================================================

impl<V, H: KeyHasher> HamtMap<V, H> {
    /// Inserts a key-value pair, returning the previous value if the key was
    /// already present.
    ///
    /// Insertion always succeeds. Overwriting an existing key touches only
    /// the matched leaf; no branch structure changes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hamtrie::HamtMap;
    ///
    /// let mut map = HamtMap::new();
    /// assert_eq!(map.insert("key".to_string(), 1), None);
    /// assert_eq!(map.insert("key".to_string(), 2), Some(1));
    /// assert_eq!(map.get("key"), Some(&2));
    /// ```
    pub fn insert(&mut self, key: String, value: V) -> Option<V> {
        let hash = self.hasher.hash_key(&key);
        let previous = Self::insert_into(&mut self.root, key, value, hash, 0, &self.hasher);
        if previous.is_none() {
            self.length += 1;
        }
        previous
    }

    /// Returns a reference to the value stored for `key`, or `None`.
    ///
    /// `None` is the distinguished not-found result; it is never conflated
    /// with a stored value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hamtrie::HamtMap;
    ///
    /// let mut map = HamtMap::new();
    /// map.insert("hello".to_string(), 42);
    /// assert_eq!(map.get("hello"), Some(&42));
    /// assert_eq!(map.get("world"), None);
    /// ```
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        let hash = self.hasher.hash_key(key);
        Self::get_in(&self.root, key, hash, 0)
    }

    /// Returns a mutable reference to the value stored for `key`, or `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hamtrie::HamtMap;
    ///
    /// let mut map = HamtMap::new();
    /// map.insert("count".to_string(), 10);
    /// if let Some(count) = map.get_mut("count") {
    ///     *count += 1;
    /// }
    /// assert_eq!(map.get("count"), Some(&11));
    /// ```
    #[must_use]
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let hash = self.hasher.hash_key(key);
        Self::get_mut_in(&mut self.root, key, hash, 0)
    }

    /// Returns `true` if the map contains `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Removes `key`, returning `true` iff it was present.
    ///
    /// Branch nodes emptied by the removal are pruned from their parents all
    /// the way up; removing the last key restores the root to its initial
    /// empty state. A miss leaves the structure untouched.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hamtrie::HamtMap;
    ///
    /// let mut map = HamtMap::new();
    /// map.insert("a".to_string(), 1);
    /// assert!(map.remove("a"));
    /// assert!(!map.remove("a"));
    /// assert_eq!(map.get("a"), None);
    /// ```
    pub fn remove(&mut self, key: &str) -> bool {
        let hash = self.hasher.hash_key(key);
        let removed = Self::remove_in(&mut self.root, key, hash, 0);
        if removed {
            self.length -= 1;
        }
        removed
    }

    // -------------------------------------------------------------------------
    // Recursive descent helpers
    // -------------------------------------------------------------------------

    /// Recursive helper for insert. Returns the replaced value on overwrite.
    fn insert_into(
        node: &mut InternalNode<V>,
        key: String,
        value: V,
        hash: u32,
        level: usize,
        hasher: &H,
    ) -> Option<V> {
        let chunk_index = chunk_at(hash, level);

        if !node.has_child(chunk_index) {
            node.splice_child(chunk_index, Node::Leaf { key, value });
            return None;
        }

        let position = compact_position(node.bitmap, chunk_index);
        let occupant = mem::replace(
            &mut node.children[position],
            Node::Internal(InternalNode::new()),
        );
        let (replacement, previous) =
            Self::insert_into_occupied(occupant, key, value, hash, level, hasher);
        node.children[position] = replacement;
        previous
    }

    /// Resolves an insert landing on an occupied slot, consuming the
    /// occupant and producing its replacement.
    fn insert_into_occupied(
        occupant: Node<V>,
        key: String,
        value: V,
        hash: u32,
        level: usize,
        hasher: &H,
    ) -> (Node<V>, Option<V>) {
        match occupant {
            Node::Leaf {
                key: existing_key,
                value: existing_value,
            } => {
                if existing_key == key {
                    // Same key: overwrite the leaf's value in place.
                    return (Node::Leaf { key, value }, Some(existing_value));
                }
                let existing_hash = hasher.hash_key(&existing_key);
                if existing_hash == hash {
                    // Hashes agree on all 32 bits: no deeper chunk can ever
                    // disambiguate, so the two entries share a bucket.
                    let mut entries = BucketEntries::new();
                    entries.push((existing_key, existing_value));
                    entries.push((key, value));
                    (Node::Collision { hash, entries }, None)
                } else {
                    // Collision promotion: displace the leaf into a fresh
                    // branch and push both entries one level deeper. Cascades
                    // while the two hashes keep sharing chunks.
                    let mut subnode = InternalNode::new();
                    Self::insert_into(
                        &mut subnode,
                        existing_key,
                        existing_value,
                        existing_hash,
                        level + 1,
                        hasher,
                    );
                    let previous = Self::insert_into(&mut subnode, key, value, hash, level + 1, hasher);
                    (Node::Internal(subnode), previous)
                }
            }
            Node::Collision {
                hash: bucket_hash,
                mut entries,
            } => {
                if bucket_hash == hash {
                    let previous = match entries
                        .iter_mut()
                        .find(|(stored, _)| stored.as_str() == key)
                    {
                        Some((_, slot)) => Some(mem::replace(slot, value)),
                        None => {
                            entries.push((key, value));
                            None
                        }
                    };
                    (
                        Node::Collision {
                            hash: bucket_hash,
                            entries,
                        },
                        previous,
                    )
                } else {
                    // The new key shares this slot's chunk but not the full
                    // hash: sink the bucket one level and descend beside it.
                    let mut subnode = InternalNode::new();
                    subnode.splice_child(
                        chunk_at(bucket_hash, level + 1),
                        Node::Collision {
                            hash: bucket_hash,
                            entries,
                        },
                    );
                    let previous = Self::insert_into(&mut subnode, key, value, hash, level + 1, hasher);
                    (Node::Internal(subnode), previous)
                }
            }
            Node::Internal(mut subnode) => {
                let previous = Self::insert_into(&mut subnode, key, value, hash, level + 1, hasher);
                (Node::Internal(subnode), previous)
            }
        }
    }

    /// Recursive helper for get.
    fn get_in<'a>(node: &'a InternalNode<V>, key: &str, hash: u32, level: usize) -> Option<&'a V> {
        let chunk_index = chunk_at(hash, level);
        if !node.has_child(chunk_index) {
            return None;
        }
        match node.child(chunk_index) {
            Node::Leaf {
                key: existing_key,
                value,
            } => (existing_key.as_str() == key).then_some(value),
            Node::Collision {
                hash: bucket_hash,
                entries,
            } => {
                if *bucket_hash != hash {
                    return None;
                }
                entries
                    .iter()
                    .find(|(stored, _)| stored.as_str() == key)
                    .map(|(_, value)| value)
            }
            Node::Internal(subnode) => Self::get_in(subnode, key, hash, level + 1),
        }
    }

    /// Recursive helper for `get_mut`.
    fn get_mut_in<'a>(
        node: &'a mut InternalNode<V>,
        key: &str,
        hash: u32,
        level: usize,
    ) -> Option<&'a mut V> {
        let chunk_index = chunk_at(hash, level);
        if !node.has_child(chunk_index) {
            return None;
        }
        match node.child_mut(chunk_index) {
            Node::Leaf {
                key: existing_key,
                value,
            } => (existing_key.as_str() == key).then_some(value),
            Node::Collision {
                hash: bucket_hash,
                entries,
            } => {
                if *bucket_hash != hash {
                    return None;
                }
                entries
                    .iter_mut()
                    .find(|(stored, _)| stored.as_str() == key)
                    .map(|(_, value)| value)
            }
            Node::Internal(subnode) => Self::get_mut_in(subnode, key, hash, level + 1),
        }
    }

    /// Recursive helper for remove. Returns `true` iff an entry was removed.
    fn remove_in(node: &mut InternalNode<V>, key: &str, hash: u32, level: usize) -> bool {
        let chunk_index = chunk_at(hash, level);
        if !node.has_child(chunk_index) {
            return false;
        }

        let child = node.child_mut(chunk_index);
        let slot_emptied = match child {
            Node::Leaf {
                key: existing_key, ..
            } => {
                if existing_key.as_str() != key {
                    return false;
                }
                true
            }
            Node::Collision {
                hash: bucket_hash,
                entries,
            } => {
                if *bucket_hash != hash {
                    return false;
                }
                let Some(found) = entries
                    .iter()
                    .position(|(stored, _)| stored.as_str() == key)
                else {
                    return false;
                };
                entries.remove(found);
                if entries.len() == 1 {
                    // A one-entry bucket is just a leaf.
                    let (last_key, last_value) = entries.remove(0);
                    *child = Node::Leaf {
                        key: last_key,
                        value: last_value,
                    };
                }
                false
            }
            Node::Internal(subnode) => {
                if !Self::remove_in(subnode, key, hash, level + 1) {
                    return false;
                }
                // Prune the child once the recursive delete emptied it.
                subnode.is_empty()
            }
        };

        if slot_emptied {
            node.remove_child(chunk_index);
        }
        true
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<V> Default for HamtMap<V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<V, H: KeyHasher + Default> FromIterator<(String, V)> for HamtMap<V, H> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        let mut map = Self::with_hasher(H::default());
        map.extend(iter);
        map
    }
}

impl<V, H: KeyHasher> Extend<(String, V)> for HamtMap<V, H> {
    fn extend<I: IntoIterator<Item = (String, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<V, H> fmt::Debug for HamtMap<V, H> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("HamtMap")
            .field("length", &self.length)
            .field("root_bitmap", &format_args!("{:#034b}", self.root.bitmap))
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================
