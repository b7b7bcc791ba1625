//! Property tests comparing this crate's containers against their std
//! equivalents under randomly generated operation sequences.
//!
//! Grounded on `derive-c`'s `tests/all/quickchecks.rs`: generate arbitrary
//! inputs, drive both implementations through the same operations, and
//! assert their observable state agrees. Uses `quickcheck::quickcheck!`
//! directly rather than reimplementing the teacher's local macro wrapper
//! (which exists mainly to plumb a `QUICKCHECK_TESTS` env var through miri
//! runs, not relevant here).

use quickcheck::quickcheck;
use vessel::alloc::StdAlloc;
use vessel::collections::{Arena, CircularQueue, Vec as VesselVec};
use vessel::collections::map::SwissMap;

/// `SwissMap::insert` aborts on a duplicate key (spec.md §7's soft-miss
/// contract); `std::collections::HashMap::insert` always overwrites. This
/// mirrors the latter on top of the former so the two can still be compared
/// head-to-head under arbitrary, possibly-repeating input.
fn swiss_upsert(map: &mut SwissMap<u16, i32, StdAlloc>, key: u16, value: i32) -> Option<i32> {
    if let Some(slot) = map.try_write(&key) {
        Some(core::mem::replace(slot, value))
    } else {
        map.insert(key, value);
        None
    }
}

quickcheck! {
    fn vec_push_matches_std(values: std::vec::Vec<i32>) -> bool {
        let mut v = VesselVec::new(StdAlloc::new());
        for &x in &values {
            v.push(x);
        }
        v.as_slice() == values.as_slice()
    }

    fn vec_push_then_pop_reverses_the_input(values: std::vec::Vec<i32>) -> bool {
        let mut v = VesselVec::new(StdAlloc::new());
        for &x in &values {
            v.push(x);
        }
        let mut popped = std::vec::Vec::new();
        while let Some(x) = v.pop() {
            popped.push(x);
        }
        popped == values.into_iter().rev().collect::<std::vec::Vec<_>>()
    }

    fn vec_insert_at_front_then_remove_at_front_is_identity(values: std::vec::Vec<i32>, extra: i32) -> bool {
        let mut v = VesselVec::new(StdAlloc::new());
        for &x in &values {
            v.push(x);
        }
        v.insert_at(0, extra);
        let removed = v.remove_at(0);
        removed == extra && v.as_slice() == values.as_slice()
    }

    fn swiss_map_agrees_with_std_hash_map(entries: std::vec::Vec<(u16, i32)>) -> bool {
        let mut mine = SwissMap::new(StdAlloc::new());
        let mut theirs = std::collections::HashMap::new();
        for &(k, v) in &entries {
            let mine_prev = swiss_upsert(&mut mine, k, v);
            let their_prev = theirs.insert(k, v);
            if mine_prev != their_prev {
                return false;
            }
        }
        if mine.len() != theirs.len() {
            return false;
        }
        theirs.iter().all(|(k, v)| mine.try_read(k) == Some(v))
    }

    fn swiss_map_remove_agrees_with_std_hash_map(
        entries: std::vec::Vec<(u16, i32)>,
        removals: std::vec::Vec<u16>,
    ) -> bool {
        let mut mine = SwissMap::new(StdAlloc::new());
        let mut theirs = std::collections::HashMap::new();
        for &(k, v) in &entries {
            swiss_upsert(&mut mine, k, v);
            theirs.insert(k, v);
        }
        for k in removals {
            let mine_removed = mine.try_remove(&k);
            let their_removed = theirs.remove(&k);
            if mine_removed != their_removed {
                return false;
            }
        }
        mine.len() == theirs.len()
    }

    fn arena_insert_then_remove_frees_the_slot_for_reuse(count: u8) -> bool {
        let mut a: Arena<u32, StdAlloc, u32> = Arena::new(StdAlloc::new());
        let count = (count % 64) as u32;
        let mut indices = std::vec::Vec::new();
        for i in 0..count {
            indices.push(a.insert(i));
        }
        for (i, &ix) in indices.iter().enumerate() {
            if *a.read(ix) != i as u32 {
                return false;
            }
        }
        for &ix in &indices {
            a.remove(ix);
        }
        a.is_empty()
    }

    fn circular_queue_push_back_matches_std_vec_deque(values: std::vec::Vec<i32>) -> bool {
        let mut q = CircularQueue::new(StdAlloc::new());
        let mut d = std::collections::VecDeque::new();
        for &x in &values {
            q.push_back(x);
            d.push_back(x);
        }
        q.iter().copied().collect::<std::vec::Vec<_>>() == d.into_iter().collect::<std::vec::Vec<_>>()
    }
}
