#![no_main]

use std::collections::VecDeque;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use vessel::alloc::StdAlloc;
use vessel::collections::Deque;

#[derive(Arbitrary, Debug)]
enum Op {
    PushFront(i32),
    PushBack(i32),
    PopFront,
    PopBack,
    Clear,
}

fuzz_target!(|ops: std::vec::Vec<Op>| {
    let mut d = Deque::new(StdAlloc::new());
    let mut model: VecDeque<i32> = VecDeque::new();

    for op in ops {
        match op {
            Op::PushFront(value) => {
                d.push_front(value);
                model.push_front(value);
            }
            Op::PushBack(value) => {
                d.push_back(value);
                model.push_back(value);
            }
            Op::PopFront => {
                assert_eq!(d.pop_front(), model.pop_front());
            }
            Op::PopBack => {
                assert_eq!(d.pop_back(), model.pop_back());
            }
            Op::Clear => {
                d.clear();
                model.clear();
            }
        }
        assert_eq!(d.len(), model.len());
        let got: std::vec::Vec<i32> = d.iter().copied().collect();
        let want: std::vec::Vec<i32> = model.iter().copied().collect();
        assert_eq!(got, want);
    }
});
