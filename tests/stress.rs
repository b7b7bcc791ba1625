//! Randomized operation-sequence stress tests.
//!
//! Grounded on `derive-c`'s `tests/try_alloc.rs`, which drives its
//! allocate/fail toggle with `rand::thread_rng()` rather than a fixed
//! sequence. These tests do the same thing one layer up: generate a long
//! random sequence of container operations and check that this crate's
//! container agrees with the matching std container after every step.

use rand::Rng;

use vessel::alloc::StdAlloc;
use vessel::collections::map::{AnkerlMap, DecomposedMap};
use vessel::collections::Deque;

const OPS: usize = 20_000;
const KEY_SPACE: i32 = 500;

/// `AnkerlMap::insert`/`DecomposedMap::insert` abort on a duplicate key
/// (spec.md §7); `std::collections::HashMap::insert` always overwrites.
/// These mirror the latter on top of the former so a random insert/remove
/// sequence can still be checked against `HashMap` step by step.
fn ankerl_upsert(map: &mut AnkerlMap<i32, i32, StdAlloc>, key: i32, value: i32) -> Option<i32> {
    if let Some(slot) = map.try_write(&key) {
        Some(core::mem::replace(slot, value))
    } else {
        map.insert(key, value);
        None
    }
}

fn decomposed_upsert(map: &mut DecomposedMap<i32, i32, StdAlloc>, key: i32, value: i32) -> Option<i32> {
    if let Some(slot) = map.try_write(&key) {
        Some(core::mem::replace(slot, value))
    } else {
        map.insert(key, value);
        None
    }
}

#[test]
fn deque_matches_std_vec_deque_under_random_push_pop() {
    let mut rng = rand::thread_rng();
    let mut mine = Deque::new(StdAlloc::new());
    let mut theirs = std::collections::VecDeque::new();

    for _ in 0..OPS {
        match rng.gen_range(0..4) {
            0 => {
                let v: i32 = rng.gen();
                mine.push_front(v);
                theirs.push_front(v);
            }
            1 => {
                let v: i32 = rng.gen();
                mine.push_back(v);
                theirs.push_back(v);
            }
            2 => {
                assert_eq!(mine.pop_front(), theirs.pop_front());
            }
            _ => {
                assert_eq!(mine.pop_back(), theirs.pop_back());
            }
        }
        assert_eq!(mine.len(), theirs.len());
        assert_eq!(
            mine.iter().copied().collect::<std::vec::Vec<_>>(),
            theirs.iter().copied().collect::<std::vec::Vec<_>>()
        );
    }
}

#[test]
fn ankerl_map_matches_std_hash_map_under_random_insert_and_remove() {
    let mut rng = rand::thread_rng();
    let mut mine = AnkerlMap::new(StdAlloc::new());
    let mut theirs = std::collections::HashMap::new();

    for _ in 0..OPS {
        let key = rng.gen_range(0..KEY_SPACE);
        if rng.gen_bool(0.7) {
            let value = rng.gen::<i32>();
            assert_eq!(ankerl_upsert(&mut mine, key, value), theirs.insert(key, value));
        } else {
            assert_eq!(mine.try_remove(&key), theirs.remove(&key));
        }
    }

    assert_eq!(mine.len(), theirs.len());
    for (k, v) in &theirs {
        assert_eq!(mine.try_read(k), Some(v));
    }
}

#[test]
fn decomposed_map_matches_std_hash_map_under_random_insert_and_remove() {
    let mut rng = rand::thread_rng();
    let mut mine = DecomposedMap::new(StdAlloc::new());
    let mut theirs = std::collections::HashMap::new();

    for _ in 0..OPS {
        let key = rng.gen_range(0..KEY_SPACE);
        if rng.gen_bool(0.7) {
            let value = rng.gen::<i32>();
            assert_eq!(decomposed_upsert(&mut mine, key, value), theirs.insert(key, value));
        } else {
            assert_eq!(mine.try_remove(&key), theirs.remove(&key));
        }
    }

    assert_eq!(mine.len(), theirs.len());
    for (k, v) in &theirs {
        assert_eq!(mine.try_read(k), Some(v));
    }
}
