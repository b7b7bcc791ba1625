#![no_main]

use std::collections::HashMap;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use vessel::alloc::StdAlloc;
use vessel::collections::ChunkedArena;

#[derive(Arbitrary, Debug)]
enum Op {
    Insert(i32),
    RemoveAt(u8),
}

/// Unlike [`fuzz_arena`], this never clears mid-run: `ChunkedArena` keeps
/// every block it has ever grown to, and the point of this target is to
/// check that live references stay valid across growth, not to check
/// bulk-reset behavior (which `Arena::clear` already covers).
fuzz_target!(|ops: std::vec::Vec<Op>| {
    let mut arena: ChunkedArena<i32, StdAlloc, u32, 6> = ChunkedArena::new(StdAlloc::new());
    let mut model: HashMap<u32, i32> = HashMap::new();
    let mut live: std::vec::Vec<u32> = std::vec::Vec::new();

    for op in ops {
        match op {
            Op::Insert(value) => {
                let index = arena.insert(value);
                let borrowed = arena.try_read(index).copied();
                assert_eq!(borrowed, Some(value));
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
        }
        assert_eq!(arena.len(), model.len());
        for (&index, &expected) in &model {
            assert_eq!(arena.try_read(index), Some(&expected));
        }
    }
});
