/*!

**Monomorphized containers and allocators for high-performance systems code.**

`vessel` is a `no_std` library (the `alloc` crate is its only mandatory
dependency) built around two ideas:

1. **Allocators are values, not globals.** A [`RawAlloc`](alloc::RawAlloc)
   implementation is handed explicitly to every container that needs one, so
   a program can run several allocation strategies side by side — a
   process-wide allocator for long-lived state, a bump arena for a single
   request, a slab allocator for a fixed-size hot object.
2. **Containers are specialized, not erased.** There is no `dyn Container`
   and no runtime dispatch inside a container's hot path: every container is
   a plain generic type, monomorphized per element/key/value type and per
   allocator type, the same way the standard library's own collections are.

## Allocators

Four allocators implement [`RawAlloc`](alloc::RawAlloc):

- [`StdAlloc`](alloc::StdAlloc) — a thin wrapper over the process allocator.
- [`HybridStatic`](alloc::HybridStatic) — a bump allocator over a
  caller-supplied inline buffer, falling back to a backing allocator once the
  buffer is exhausted.
- [`ChunkedBump`](alloc::ChunkedBump) — a bump allocator over a growing
  sequence of large blocks, with bulk `reset`.
- [`Slab`](alloc::Slab) — a fixed-block-size allocator with an intrusive
  freelist, for workloads dominated by same-size allocations.

## Collections

Vectors ([`Vec`](collections::Vec), [`StaticVec`](collections::StaticVec)),
queues ([`CircularQueue`](collections::CircularQueue),
[`Deque`](collections::Deque)), arenas
([`Arena`](collections::Arena), [`ChunkedArena`](collections::ChunkedArena)),
and hash containers
([`SwissMap`](collections::map::SwissMap),
[`AnkerlMap`](collections::map::AnkerlMap),
[`DecomposedMap`](collections::map::DecomposedMap),
[`StaticLinearMap`](collections::map::StaticLinearMap),
[`SwissSet`](collections::set::SwissSet)) are all parameterized by the
allocator that backs them, and draw on ordinary trait bounds (`Clone`,
`PartialEq`, `Hash`, `Debug`) rather than a bespoke vtable for
element-specific behavior.

## `#![no_std]` support

`vessel` depends only on `core` and `alloc`. It never performs I/O, never
spawns threads, and never serializes anything — those concerns live outside
this crate's scope.

## Optional features

- `allocator_api2` implements [`allocator_api2::alloc::Allocator`] for every
  allocator in this crate, so they can back `alloc`-crate collections too.
- `zerocopy` adds a typed zero-filled allocation entry point
  ([`zerocopy_integration::ZeroCopyAlloc`]) for any `T: FromZeroes`.

 */

#![deny(missing_debug_implementations)]
#![no_std]

extern crate alloc as core_alloc;
#[cfg(test)]
extern crate std;

pub mod alloc;
pub mod collections;
pub mod hash;

#[cfg(feature = "allocator_api2")]
pub mod allocator_api2_integration;
#[cfg(feature = "zerocopy")]
pub mod zerocopy_integration;

mod mutation;
mod sanitizer;

pub use crate::alloc::RawAlloc;
