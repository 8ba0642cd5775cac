//! Bitmap index math.
//!
//! Pure functions mapping a `(hash, level)` pair to a chunk index and a
//! chunk index to a position within a node's compacted child array. The
//! conventions here are load-bearing for the whole trie:
//!
//! - level 0 is the **most significant** 5-bit chunk of the hash;
//! - bit `b` of a node's bitmap corresponds to chunk value `b`;
//! - the compacted position of chunk `b` is the number of set bits of the
//!   bitmap **strictly below** bit `b` (ascending order).

use static_assertions::const_assert;

// =============================================================================
// Chunk Geometry
// =============================================================================

/// Hash bits consumed per trie level.
pub(crate) const BITS_PER_LEVEL: usize = 5;

/// Fan-out of an internal node (2^5 = 32).
pub(crate) const BRANCHING_FACTOR: usize = 1 << BITS_PER_LEVEL;

/// Total bits in a key hash.
pub(crate) const HASH_BITS: usize = u32::BITS as usize;

/// Maximum trie depth: six full 5-bit chunks plus one 2-bit remainder chunk.
///
/// Descent never goes past level `MAX_LEVELS - 1`: the chunks at levels
/// 0..MAX_LEVELS together cover all 32 hash bits, so two keys whose chunks
/// agree at every level have equal hashes and are stored in a collision
/// bucket instead of recursing further.
pub(crate) const MAX_LEVELS: usize = HASH_BITS.div_ceil(BITS_PER_LEVEL);

// The bitmap is a u32: one bit per possible chunk value.
const_assert!(BRANCHING_FACTOR <= u32::BITS as usize);
// The last full level must still have BITS_PER_LEVEL bits available.
const_assert!((MAX_LEVELS - 1) * BITS_PER_LEVEL < HASH_BITS);
// All levels together must exhaust the hash.
const_assert!(MAX_LEVELS * BITS_PER_LEVEL >= HASH_BITS);

// =============================================================================
// Index Functions
// =============================================================================

/// Extracts the chunk of `hash` examined at `level`.
///
/// Levels `0..=5` yield full 5-bit chunks in `0..32`; level 6 yields the two
/// leftover low bits, in `0..4`.
pub(crate) const fn chunk_at(hash: u32, level: usize) -> u32 {
    debug_assert!(level < MAX_LEVELS);
    let remaining = HASH_BITS - level * BITS_PER_LEVEL;
    if remaining >= BITS_PER_LEVEL {
        (hash >> (remaining - BITS_PER_LEVEL)) & (BRANCHING_FACTOR as u32 - 1)
    } else {
        hash & ((1 << remaining) - 1)
    }
}

/// The bitmap bit marking occupancy of `chunk_index`.
pub(crate) const fn chunk_bit(chunk_index: u32) -> u32 {
    debug_assert!(chunk_index < BRANCHING_FACTOR as u32);
    1 << chunk_index
}

/// Position of `chunk_index`'s entry within a compacted child array:
/// the population count of `bitmap` strictly below that bit.
pub(crate) const fn compact_position(bitmap: u32, chunk_index: u32) -> usize {
    (bitmap & (chunk_bit(chunk_index) - 1)).count_ones() as usize
}

// =============================================================================
// Tests
// =============================================================================
