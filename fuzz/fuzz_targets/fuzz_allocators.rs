#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use vessel::alloc::{ChunkedBump, HybridStatic, Slab, StdAlloc};
use vessel::collections::Vec as VesselVec;

#[derive(Arbitrary, Debug)]
enum Op {
    Push(u64),
    Pop,
    Clear,
}

/// Replays the same command sequence against a `Vec` backed by each of the
/// four allocators side by side, checked against a plain `std::vec::Vec`
/// model. This exercises every allocator's growth/shrink path (not just
/// its allocate/deallocate pair in isolation) the way a real caller would.
fn replay<A: vessel::RawAlloc>(ops: &[Op], alloc: A) {
    let mut v = VesselVec::new(alloc);
    let mut model: std::vec::Vec<u64> = std::vec::Vec::new();

    for op in ops {
        match op {
            Op::Push(value) => {
                v.push(*value);
                model.push(*value);
            }
            Op::Pop => {
                let got = v.pop();
                let want = model.pop();
                assert_eq!(got, want);
            }
            Op::Clear => {
                v.clear();
                model.clear();
            }
        }
        assert_eq!(v.len(), model.len());
        assert_eq!(v.as_slice(), model.as_slice());
    }
}

fuzz_target!(|ops: std::vec::Vec<Op>| {
    replay(&ops, StdAlloc::new());
    replay(&ops, HybridStatic::<4096, StdAlloc>::new(StdAlloc::new()));
    replay(&ops, ChunkedBump::new(StdAlloc::new()));
    replay(&ops, Slab::new(StdAlloc::new()));
});
