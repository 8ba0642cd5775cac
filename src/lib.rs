//! # hamtrie
//!
//! A mutable hash array mapped trie (HAMT) mapping string keys to arbitrary
//! values.
//!
//! ## Overview
//!
//! [`HamtMap`] is a 32-way trie over the bits of a key's hash. Each branch
//! node keeps a `u32` occupancy bitmap and a compacted array holding only
//! its occupied children, so lookup at every level is a bitmap test plus a
//! population count rather than a walk over a 32-slot table.
//!
//! - O(log32 N) insert, get, and remove (effectively constant in practice)
//! - O(1) len and `is_empty`
//! - Hashing behind an injectable [`KeyHasher`] seam; [`Fnv1a`] by default
//!
//! ## Example
//!
//! ```rust
//! use hamtrie::HamtMap;
//!
//! let mut map = HamtMap::new();
//! map.insert("one".to_string(), 1);
//! map.insert("two".to_string(), 2);
//!
//! assert_eq!(map.get("one"), Some(&1));
//! assert_eq!(map.insert("one".to_string(), 100), Some(1));
//! assert!(map.remove("two"));
//! assert_eq!(map.len(), 1);
//! ```
//!
//! ## Internal Structure
//!
//! - 32-way branching: 5 hash bits per level, most significant chunk first,
//!   with a 2-bit tail level once the 32-bit hash is exhausted
//! - Bitmap-compressed sparse child arrays (`children.len()` equals the
//!   bitmap's population count)
//! - Leaves promoted to branches on partial hash collisions; collision
//!   buckets for keys whose full hashes are identical
//! - In-place mutation with `&mut self`; see [`HamtMap`] for the
//!   single-writer discipline this implies

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod hash;
mod index;
mod map;
mod node;

pub use hash::Fnv1a;
pub use hash::KeyHasher;
pub use map::HamtMap;
