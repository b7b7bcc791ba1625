//! A bump allocator over a caller-supplied inline buffer, falling back to a
//! backing allocator once the buffer is exhausted.

use core::alloc::Layout;
use core::cell::Cell;
use core::fmt;
use core::mem::MaybeUninit;
use core::ptr::NonNull;

use super::RawAlloc;
use crate::sanitizer::{self, Capability};

/// A bump allocator backed by an inline `[u8; CAP]` buffer, with `BACKING`
/// taking over once the buffer fills up.
///
/// Grounded on `derive-c`'s `hybridstatic` allocator: allocation bumps a
/// `head` pointer forward through the static buffer; deallocating or
/// reallocating the single most recent allocation rewinds/extends `head` in
/// place (the same "last allocation" optimization `ChunkedBump` and `Slab`
/// also use); anything that doesn't fit in the buffer, or isn't the most
/// recent allocation, is served by `BACKING`.
///
/// `CAP` should be chosen generously enough that the common case never
/// touches `BACKING` — the backing allocator exists to make overflow safe,
/// not fast.
pub struct HybridStatic<const CAP: usize, BACKING: RawAlloc> {
    buffer: MaybeUninit<[u8; CAP]>,
    head: Cell<usize>,
    last_alloc: Cell<Option<(NonNull<u8>, usize)>>,
    backing: BACKING,
}

impl<const CAP: usize, BACKING: RawAlloc> fmt::Debug for HybridStatic<CAP, BACKING> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HybridStatic")
            .field("capacity", &CAP)
            .field("used", &self.head.get())
            .finish()
    }
}

impl<const CAP: usize, BACKING: RawAlloc> HybridStatic<CAP, BACKING> {
    /// Creates a new hybrid allocator with an empty static buffer, falling
    /// back to `backing` once the buffer is exhausted.
    pub fn new(backing: BACKING) -> Self {
        HybridStatic {
            buffer: MaybeUninit::uninit(),
            head: Cell::new(0),
            last_alloc: Cell::new(None),
            backing,
        }
    }

    #[inline]
    fn buffer_start(&self) -> *mut u8 {
        self.buffer.as_ptr() as *mut u8
    }

    #[inline]
    fn contains_ptr(&self, ptr: NonNull<u8>) -> bool {
        let start = self.buffer_start() as usize;
        let addr = ptr.as_ptr() as usize;
        addr >= start && addr < start + CAP
    }

    fn bump(&self, layout: Layout) -> Option<NonNull<u8>> {
        let start = self.buffer_start() as usize;
        let cur = start + self.head.get();
        let aligned = (cur + layout.align() - 1) & !(layout.align() - 1);
        let padding = aligned - cur;
        let needed = padding + layout.size();
        if self.head.get() + needed > CAP {
            return None;
        }
        self.head.set(self.head.get() + needed);
        let ptr = unsafe { NonNull::new_unchecked(aligned as *mut u8) };
        self.last_alloc.set(Some((ptr, layout.size())));
        unsafe { sanitizer::mark(ptr.as_ptr(), layout.size(), Capability::Write) };
        Some(ptr)
    }
}

unsafe impl<const CAP: usize, BACKING: RawAlloc> RawAlloc for HybridStatic<CAP, BACKING> {
    fn allocate_uninit(&self, layout: Layout) -> NonNull<u8> {
        debug_assert!(layout.size() > 0, "cannot allocate a zero-sized layout");
        self.bump(layout)
            .unwrap_or_else(|| self.backing.allocate_uninit(layout))
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        debug_assert!(layout.size() > 0, "cannot deallocate a zero-sized layout");

        if !self.contains_ptr(ptr) {
            unsafe { self.backing.deallocate(ptr, layout) };
            return;
        }

        if self.last_alloc.get() == Some((ptr, layout.size())) {
            let start = self.buffer_start() as usize;
            self.head.set(ptr.as_ptr() as usize - start);
            self.last_alloc.set(None);
        }
        unsafe { sanitizer::mark(ptr.as_ptr(), layout.size(), Capability::None) };
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> NonNull<u8> {
        debug_assert!(old_layout.size() > 0, "cannot reallocate a zero-sized layout");
        debug_assert!(new_layout.size() > 0, "cannot reallocate to zero size");

        if !self.contains_ptr(ptr) {
            return unsafe { self.backing.reallocate(ptr, old_layout, new_layout) };
        }

        if self.last_alloc.get() == Some((ptr, old_layout.size())) {
            let start = self.buffer_start() as usize;
            let base = ptr.as_ptr() as usize - start;

            if new_layout.size() <= old_layout.size() {
                self.head.set(base + new_layout.size());
                self.last_alloc.set(Some((ptr, new_layout.size())));
                return ptr;
            }

            let extension = new_layout.size() - old_layout.size();
            if base + old_layout.size() + extension <= CAP {
                self.head.set(base + new_layout.size());
                self.last_alloc.set(Some((ptr, new_layout.size())));
                unsafe {
                    sanitizer::mark(
                        ptr.as_ptr().add(old_layout.size()),
                        extension,
                        Capability::Write,
                    )
                };
                return ptr;
            }
        }

        // Shrinking a non-last inline allocation: nothing downstream of it
        // can move, but the freed tail is still this allocation's own
        // memory, so it stays in place rather than copying to a new region.
        if new_layout.size() <= old_layout.size() {
            unsafe {
                sanitizer::mark(
                    ptr.as_ptr().add(new_layout.size()),
                    old_layout.size() - new_layout.size(),
                    Capability::None,
                )
            };
            return ptr;
        }

        let new_ptr = self.allocate_uninit(new_layout);
        let copy_size = old_layout.size().min(new_layout.size());
        unsafe {
            core::ptr::copy_nonoverlapping(ptr.as_ptr(), new_ptr.as_ptr(), copy_size);
            self.deallocate(ptr, old_layout);
        }
        new_ptr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alloc::stdalloc::StdAlloc;

    #[test]
    fn overflow_falls_back_to_backing() {
        // spec.md §8 scenario 5: CAP=30, a 20-byte inline allocation leaves
        // only 10 bytes, so a 15-byte request must overflow to `backing`,
        // and deallocating the inline block then lets the same address
        // come back out on the next 20-byte allocation.
        let h = HybridStatic::<30, StdAlloc>::new(StdAlloc::new());
        let layout20 = Layout::from_size_align(20, 1).unwrap();
        let layout15 = Layout::from_size_align(15, 1).unwrap();

        let first = h.allocate_uninit(layout20);
        assert!(h.contains_ptr(first));

        let overflow = h.allocate_uninit(layout15);
        assert!(!h.contains_ptr(overflow));

        unsafe {
            h.deallocate(first, layout20);
            let second = h.allocate_uninit(layout20);
            assert_eq!(second, first, "freeing the last inline allocation must rewind head");
            h.deallocate(second, layout20);
            h.deallocate(overflow, layout15);
        }
    }

    #[test]
    fn dealloc_non_last_inline_does_not_rewind() {
        let h = HybridStatic::<64, StdAlloc>::new(StdAlloc::new());
        let layout = Layout::from_size_align(8, 1).unwrap();
        let a = h.allocate_uninit(layout);
        let b = h.allocate_uninit(layout);
        let head_before = h.head.get();
        unsafe { h.deallocate(a, layout) };
        assert_eq!(h.head.get(), head_before, "freeing a non-last allocation must not move head");

        let c = h.allocate_uninit(layout);
        assert_ne!(c, a, "head did not rewind, so the freed slot isn't reused");
        unsafe {
            h.deallocate(b, layout);
            h.deallocate(c, layout);
        }
    }

    #[test]
    fn reallocate_grows_last_allocation_in_place() {
        let h = HybridStatic::<64, StdAlloc>::new(StdAlloc::new());
        let small = Layout::from_size_align(8, 1).unwrap();
        let big = Layout::from_size_align(16, 1).unwrap();
        let p = h.allocate_uninit(small);
        unsafe {
            let grown = h.reallocate(p, small, big);
            assert_eq!(grown, p, "growing the last allocation in place keeps its address");
            h.deallocate(grown, big);
        }
    }

    #[test]
    fn reallocate_shrinks_last_allocation_in_place() {
        let h = HybridStatic::<64, StdAlloc>::new(StdAlloc::new());
        let big = Layout::from_size_align(16, 1).unwrap();
        let small = Layout::from_size_align(8, 1).unwrap();
        let p = h.allocate_uninit(big);
        unsafe {
            let shrunk = h.reallocate(p, big, small);
            assert_eq!(shrunk, p);
            // The freed tail is reusable again: the next 8-byte request
            // bumps right back into it.
            let next = h.allocate_uninit(small);
            assert_eq!(next.as_ptr() as usize, p.as_ptr() as usize + 8);
            h.deallocate(shrunk, small);
            h.deallocate(next, small);
        }
    }

    #[test]
    fn reallocate_shrinks_non_last_inline_allocation_in_place() {
        // spec.md §4.2: shrinking a non-last allocation must stay at the
        // same address, unlike growing one (which has to move).
        let h = HybridStatic::<64, StdAlloc>::new(StdAlloc::new());
        let big = Layout::from_size_align(16, 1).unwrap();
        let small = Layout::from_size_align(8, 1).unwrap();
        let a = h.allocate_uninit(big);
        let b = h.allocate_uninit(big);
        unsafe {
            let shrunk = h.reallocate(a, big, small);
            assert_eq!(shrunk, a, "shrinking a non-last allocation must not move it");
            h.deallocate(shrunk, small);
            h.deallocate(b, big);
        }
    }
}
