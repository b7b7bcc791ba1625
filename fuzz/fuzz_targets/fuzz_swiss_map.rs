#![no_main]

use std::collections::HashMap;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use vessel::alloc::StdAlloc;
use vessel::collections::map::SwissMap;

#[derive(Arbitrary, Debug)]
enum Op {
    Insert(i16, i32),
    Remove(i16),
    Get(i16),
}

fuzz_target!(|ops: std::vec::Vec<Op>| {
    let mut map = SwissMap::new(StdAlloc::new());
    let mut model: HashMap<i16, i32> = HashMap::new();

    for op in ops {
        match op {
            Op::Insert(key, value) => {
                // `SwissMap::insert` aborts on a duplicate key; upsert
                // through `try_write` first to mirror `HashMap::insert`'s
                // always-overwrite behavior.
                let mine_prev = if let Some(slot) = map.try_write(&key) {
                    Some(core::mem::replace(slot, value))
                } else {
                    map.insert(key, value);
                    None
                };
                assert_eq!(mine_prev, model.insert(key, value));
            }
            Op::Remove(key) => {
                assert_eq!(map.try_remove(&key), model.remove(&key));
            }
            Op::Get(key) => {
                assert_eq!(map.try_read(&key), model.get(&key));
            }
        }
        assert_eq!(map.len(), model.len());
    }

    for (key, value) in &model {
        assert_eq!(map.try_read(key), Some(value));
    }
});
