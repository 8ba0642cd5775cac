//! Scenario tests for `HamtMap`.
//!
//! Exercises trie structure end to end against the fixed FNV-1a reference
//! hasher, including the golden root-bitmap regression values.

use hamtrie::{Fnv1a, HamtMap, KeyHasher};
use rstest::rstest;

// =============================================================================
// Fixtures
// =============================================================================

/// The historical 18-insert sequence (16 distinct keys; "asdfasdf" and
/// "woah" are written twice).
const INSERT_SEQUENCE: [(&str, &str); 18] = [
    ("hello", "world"),
    ("new", "wow!"),
    ("again", "test!"),
    ("woah", "random entry"),
    ("key", "Saturday!"),
    ("sup", "6"),
    ("final", "the!"),
    ("6", "wow!"),
    ("asdfasdf", "add 10"),
    ("asdfasdf", "123123"),
    ("asd", "queue!"),
    ("fasdf", "interesting"),
    ("yup", "random again!"),
    ("asdf", "hello"),
    ("asdffasd", "uh oh!"),
    ("fasdfasdfasdfasdf", "error message"),
    ("fasdfasdf", "info!"),
    ("woah", "done"),
];

const DELETE_SEQUENCE: [&str; 6] = ["hello", "yup", "asdf", "asdfasdf", "new", "6"];

/// Root bitmap pinned after the full insert sequence.
const ROOT_BITMAP_AFTER_INSERTS: u32 = 1_119_911_534;

/// Root bitmap pinned after the six deletes.
const ROOT_BITMAP_AFTER_DELETES: u32 = 1_119_909_900;

fn populated_map() -> HamtMap<String> {
    let mut map = HamtMap::new();
    for (key, value) in INSERT_SEQUENCE {
        map.insert(key.to_string(), value.to_string());
    }
    map
}

// =============================================================================
// Golden Regression
// =============================================================================

#[rstest]
fn test_golden_root_bitmap_after_inserts() {
    let map = populated_map();
    assert_eq!(map.root_bitmap(), ROOT_BITMAP_AFTER_INSERTS);
    assert_eq!(map.len(), 16);
}

#[rstest]
fn test_golden_retrievals() {
    let map = populated_map();
    assert_eq!(map.get("hello").map(String::as_str), Some("world"));
    assert_eq!(map.get("new").map(String::as_str), Some("wow!"));
    assert_eq!(map.get("asdf").map(String::as_str), Some("hello"));
    // Last write wins: "asdfasdf" was inserted twice.
    assert_eq!(map.get("asdfasdf").map(String::as_str), Some("123123"));
    assert_eq!(map.get("woah").map(String::as_str), Some("done"));
    assert_eq!(map.get("never inserted"), None);
}

#[rstest]
fn test_golden_root_bitmap_after_deletes() {
    let mut map = populated_map();
    for key in DELETE_SEQUENCE {
        assert!(map.remove(key), "expected {key} to be present");
    }

    assert_eq!(map.root_bitmap(), ROOT_BITMAP_AFTER_DELETES);
    assert_eq!(map.len(), 10);

    for key in DELETE_SEQUENCE {
        assert_eq!(map.get(key), None);
    }
    // Survivors are untouched.
    assert_eq!(map.get("again").map(String::as_str), Some("test!"));
    assert_eq!(map.get("key").map(String::as_str), Some("Saturday!"));
    assert_eq!(
        map.get("fasdfasdfasdfasdf").map(String::as_str),
        Some("error message")
    );
}

// =============================================================================
// Collision Chains
// =============================================================================

// "abj" and "csm" hash to values sharing their first three 5-bit chunks
// (2, 5, 3) under FNV-1a, diverging at level 3. Inserting both forces a
// chain of nested branch nodes before the keys split.
#[rstest]
fn test_collision_chain_keeps_both_keys_retrievable() {
    let fnv = Fnv1a;
    let prefix_mask = 0xFFFE_0000; // top three 5-bit chunks
    assert_eq!(
        fnv.hash_key("abj") & prefix_mask,
        fnv.hash_key("csm") & prefix_mask
    );
    assert_ne!(fnv.hash_key("abj"), fnv.hash_key("csm"));

    let mut map = HamtMap::new();
    map.insert("abj".to_string(), 1);
    map.insert("csm".to_string(), 2);

    assert_eq!(map.get("abj"), Some(&1));
    assert_eq!(map.get("csm"), Some(&2));
    assert_eq!(map.len(), 2);
}

#[rstest]
fn test_collision_chain_prunes_bottom_up() {
    let mut map = HamtMap::new();
    map.insert("abj".to_string(), 1);
    map.insert("csm".to_string(), 2);
    let chain_bit_set = map.root_bitmap();
    assert_eq!(chain_bit_set.count_ones(), 1);

    // Removing one key leaves the chain in place for the survivor.
    assert!(map.remove("csm"));
    assert_eq!(map.get("abj"), Some(&1));
    assert_eq!(map.root_bitmap(), chain_bit_set);

    // Removing the last key under the chain prunes it from the root.
    assert!(map.remove("abj"));
    assert_eq!(map.root_bitmap(), 0);
    assert!(map.is_empty());
}

// "glbvs" and "yacxa" are a genuine full 32-bit FNV-1a collision.
#[rstest]
fn test_full_hash_collision_bucket_round_trip() {
    assert_eq!(Fnv1a.hash_key("glbvs"), Fnv1a.hash_key("yacxa"));

    let mut map = HamtMap::new();
    map.insert("glbvs".to_string(), 1);
    map.insert("yacxa".to_string(), 2);

    assert_eq!(map.get("glbvs"), Some(&1));
    assert_eq!(map.get("yacxa"), Some(&2));
    assert_eq!(map.len(), 2);

    // Overwrite one bucket entry without disturbing the other.
    assert_eq!(map.insert("glbvs".to_string(), 10), Some(1));
    assert_eq!(map.get("yacxa"), Some(&2));

    // Lookup of a key that merely shares the slot misses cleanly.
    assert_eq!(map.get("glbvt"), None);

    assert!(map.remove("glbvs"));
    assert_eq!(map.get("yacxa"), Some(&2));
    assert!(map.remove("yacxa"));
    assert_eq!(map.root_bitmap(), 0);
}

// =============================================================================
// Structural Properties
// =============================================================================

#[rstest]
fn test_overwrite_leaves_every_ancestor_bitmap_unchanged() {
    let mut map = populated_map();
    let bitmap_before = map.root_bitmap();

    assert_eq!(
        map.insert("fasdfasdf".to_string(), "rewritten".to_string()),
        Some("info!".to_string())
    );
    assert_eq!(map.root_bitmap(), bitmap_before);
    assert_eq!(map.len(), 16);
}

#[rstest]
fn test_absent_delete_leaves_structure_unchanged() {
    let mut map = populated_map();
    let bitmap_before = map.root_bitmap();
    let length_before = map.len();

    // Misses on an unset bit, a mismatched leaf, and a deep path.
    for absent in ["zzz", "hell", "asdfasdfasdf"] {
        assert!(!map.remove(absent));
    }
    assert_eq!(map.root_bitmap(), bitmap_before);
    assert_eq!(map.len(), length_before);
}

#[rstest]
fn test_full_drain_restores_initial_state() {
    let mut map = populated_map();
    let distinct: Vec<&str> = {
        let mut keys: Vec<&str> = INSERT_SEQUENCE.iter().map(|(key, _)| *key).collect();
        keys.sort_unstable();
        keys.dedup();
        keys
    };

    for key in &distinct {
        assert!(map.remove(key));
    }
    assert!(map.is_empty());
    assert_eq!(map.root_bitmap(), 0);

    // The emptied map is fully reusable.
    map.insert("fresh".to_string(), "start".to_string());
    assert_eq!(map.get("fresh").map(String::as_str), Some("start"));
}

#[rstest]
fn test_reinsert_after_delete_round_trips() {
    let mut map = populated_map();
    assert!(map.remove("hello"));
    assert_eq!(map.get("hello"), None);

    map.insert("hello".to_string(), "back".to_string());
    assert_eq!(map.get("hello").map(String::as_str), Some("back"));
    assert_eq!(map.root_bitmap(), ROOT_BITMAP_AFTER_INSERTS);
}

#[rstest]
fn test_empty_string_key_is_a_valid_key() {
    let mut map = HamtMap::new();
    map.insert(String::new(), 0);
    assert_eq!(map.get(""), Some(&0));
    assert!(map.remove(""));
    assert_eq!(map.root_bitmap(), 0);
}
