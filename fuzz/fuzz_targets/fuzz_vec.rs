#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use vessel::alloc::StdAlloc;
use vessel::collections::Vec as VesselVec;

#[derive(Arbitrary, Debug)]
enum Op {
    Push(u32),
    Pop,
    InsertAt(u8, u32),
    RemoveAt(u8),
    Clear,
}

fuzz_target!(|ops: std::vec::Vec<Op>| {
    let mut v = VesselVec::new(StdAlloc::new());
    let mut model: std::vec::Vec<u32> = std::vec::Vec::new();

    for op in ops {
        match op {
            Op::Push(value) => {
                v.push(value);
                model.push(value);
            }
            Op::Pop => {
                assert_eq!(v.pop(), model.pop());
            }
            Op::InsertAt(index, value) => {
                let index = index as usize % (model.len() + 1);
                v.insert_at(index, value);
                model.insert(index, value);
            }
            Op::RemoveAt(index) => {
                if model.is_empty() {
                    continue;
                }
                let index = index as usize % model.len();
                assert_eq!(v.remove_at(index), model.remove(index));
            }
            Op::Clear => {
                v.clear();
                model.clear();
            }
        }
        assert_eq!(v.as_slice(), model.as_slice());
    }
});
