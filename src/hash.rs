//! Key hashing seam for the trie.
//!
//! The trie never hashes keys itself; it consumes a [`KeyHasher`] as a black
//! box producing a 32-bit hash from a string key. [`Fnv1a`] is the shipped
//! reference implementation.

// =============================================================================
// KeyHasher Trait
// =============================================================================

/// A deterministic `&str -> u32` hash function consumed by the trie.
///
/// # Contract
///
/// The hash must be deterministic and **fixed for the lifetime of any map
/// using it**: feeding the same map hashes from two different functions
/// corrupts its structure. Hashes are assumed approximately uniform over
/// `u32`; a poor distribution degrades the trie to deep chains but does not
/// break correctness.
///
/// # Examples
///
/// ```rust
/// use hamtrie::{HamtMap, KeyHasher};
///
/// /// Buckets every key by its length. Terrible distribution, valid contract.
/// #[derive(Default)]
/// struct LengthHasher;
///
/// impl KeyHasher for LengthHasher {
///     fn hash_key(&self, key: &str) -> u32 {
///         key.len() as u32
///     }
/// }
///
/// let mut map = HamtMap::with_hasher(LengthHasher);
/// map.insert("one".to_string(), 1);
/// map.insert("two".to_string(), 2);
/// assert_eq!(map.get("one"), Some(&1));
/// assert_eq!(map.get("two"), Some(&2));
/// ```
pub trait KeyHasher {
    /// Hashes a key to a 32-bit value.
    fn hash_key(&self, key: &str) -> u32;
}

// =============================================================================
// FNV-1a Reference Hasher
// =============================================================================

const FNV_OFFSET_BASIS: u32 = 0x811C_9DC5;
const FNV_PRIME: u32 = 16_777_619;

/// 32-bit FNV-1a, the default [`KeyHasher`].
///
/// # Examples
///
/// ```rust
/// use hamtrie::{Fnv1a, KeyHasher};
///
/// assert_eq!(Fnv1a.hash_key("hello"), 0x4F9F_2CAB);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fnv1a;

impl KeyHasher for Fnv1a {
    fn hash_key(&self, key: &str) -> u32 {
        key.bytes().fold(FNV_OFFSET_BASIS, |state, byte| {
            (state ^ u32::from(byte)).wrapping_mul(FNV_PRIME)
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("hello", 0x4F9F_2CAB)]
    #[case("new", 0x2899_9611)]
    #[case("", FNV_OFFSET_BASIS)]
    #[case("a", 0xE40C_292C)]
    fn test_fnv1a_known_vectors(#[case] key: &str, #[case] expected: u32) {
        assert_eq!(Fnv1a.hash_key(key), expected);
    }

    #[rstest]
    fn test_fnv1a_is_deterministic() {
        let first = Fnv1a.hash_key("determinism");
        let second = Fnv1a.hash_key("determinism");
        assert_eq!(first, second);
    }

    // "glbvs" and "yacxa" are a genuine 32-bit FNV-1a collision; the trie's
    // collision buckets depend on such pairs existing.
    #[rstest]
    fn test_fnv1a_collision_pair() {
        assert_eq!(Fnv1a.hash_key("glbvs"), Fnv1a.hash_key("yacxa"));
        assert_eq!(Fnv1a.hash_key("glbvs"), 2_713_492_047);
    }
}
