#![no_main]

use std::collections::HashMap;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use vessel::alloc::StdAlloc;
use vessel::collections::Arena;

#[derive(Arbitrary, Debug)]
enum Op {
    Insert(i32),
    RemoveAt(u8),
    Clear,
}

fuzz_target!(|ops: std::vec::Vec<Op>| {
    let mut arena: Arena<i32, StdAlloc, u32> = Arena::new(StdAlloc::new());
    let mut model: HashMap<u32, i32> = HashMap::new();
    let mut live: std::vec::Vec<u32> = std::vec::Vec::new();

    for op in ops {
        match op {
            Op::Insert(value) => {
                let index = arena.insert(value);
                model.insert(index, value);
                live.push(index);
            }
            Op::RemoveAt(selector) => {
                if live.is_empty() {
                    continue;
                }
                let pos = selector as usize % live.len();
                let index = live.remove(pos);
                assert_eq!(arena.try_remove(index), model.remove(&index));
            }
            Op::Clear => {
                arena.clear();
                model.clear();
                live.clear();
            }
        }
        assert_eq!(arena.len(), model.len());
        for (&index, &expected) in &model {
            assert_eq!(arena.try_read(index), Some(&expected));
        }
    }
});
