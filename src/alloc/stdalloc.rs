//! The process-wide allocator, wrapped in [`RawAlloc`].

use core::alloc::Layout;
use core::ptr::NonNull;

use core_alloc::alloc::{alloc, alloc_zeroed, dealloc, realloc};

use super::{handle_alloc_error, RawAlloc};

/// Allocates directly from the process's global allocator
/// (`alloc`/`dealloc`/`realloc`), the same allocator `Box`/`Vec` use.
///
/// This is the allocator to reach for when there is no particular
/// allocation pattern to exploit — every other allocator in this crate
/// trades away something (arbitrary-size deallocation, true per-object
/// freeing, pointer stability across growth) in exchange for being faster
/// than this one in its own niche.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdAlloc;

impl StdAlloc {
    /// Creates a new handle to the process allocator. `StdAlloc` carries no
    /// state, so every instance is interchangeable.
    pub const fn new() -> Self {
        StdAlloc
    }
}

unsafe impl RawAlloc for StdAlloc {
    fn allocate_uninit(&self, layout: Layout) -> NonNull<u8> {
        debug_assert!(layout.size() > 0, "cannot allocate a zero-sized layout");
        let ptr = unsafe { alloc(layout) };
        NonNull::new(ptr).unwrap_or_else(|| handle_alloc_error(layout))
    }

    fn allocate_zeroed(&self, layout: Layout) -> NonNull<u8> {
        debug_assert!(layout.size() > 0, "cannot allocate a zero-sized layout");
        let ptr = unsafe { alloc_zeroed(layout) };
        NonNull::new(ptr).unwrap_or_else(|| handle_alloc_error(layout))
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        debug_assert!(layout.size() > 0, "cannot deallocate a zero-sized layout");
        unsafe { dealloc(ptr.as_ptr(), layout) };
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> NonNull<u8> {
        debug_assert!(old_layout.size() > 0, "cannot reallocate a zero-sized layout");
        debug_assert!(new_layout.size() > 0, "cannot reallocate to zero size");

        if old_layout.align() == new_layout.align() {
            let raw = unsafe { realloc(ptr.as_ptr(), old_layout, new_layout.size()) };
            return NonNull::new(raw).unwrap_or_else(|| handle_alloc_error(new_layout));
        }

        // `GlobalAlloc::realloc` can't change alignment; fall back to
        // allocate-copy-free.
        let new_ptr = self.allocate_uninit(new_layout);
        let copy_size = old_layout.size().min(new_layout.size());
        unsafe {
            core::ptr::copy_nonoverlapping(ptr.as_ptr(), new_ptr.as_ptr(), copy_size);
            self.deallocate(ptr, old_layout);
        }
        new_ptr
    }
}
