//! Generic, monomorphized containers.
//!
//! Every container here is parameterized by the [`RawAlloc`](crate::alloc::RawAlloc)
//! it draws memory from, and relies on ordinary trait bounds — `Clone`,
//! `PartialEq`, `Hash`, `Debug` — for element-specific behavior rather than
//! a bespoke hook-table, the idiomatic Rust rendering of `derive-c`'s
//! `ITEM_CLONE`/`ITEM_DELETE`/`ITEM_DEBUG` template parameters.

mod arena;
mod bitset;
mod chunked_arena;
mod circular;
mod deque;
mod static_vec;
mod vec;

pub mod map;
pub mod set;

pub use arena::{Arena, ArenaIndex};
pub use bitset::StaticBitset;
pub use chunked_arena::{ChunkedArena, ChunkedArenaIndex};
pub use circular::CircularQueue;
pub use deque::Deque;
pub use static_vec::StaticVec;
pub use vec::Vec;
