//! A fixed-block-size allocator with an intrusive freelist.

use core::alloc::Layout;
use core::cell::{Cell, RefCell};
use core::fmt;
use core::ptr::NonNull;

use crate::collections::Vec as VesselVec;
use crate::sanitizer::{self, Capability};

use super::{stdalloc::StdAlloc, RawAlloc};

const DEFAULT_BLOCK_SIZE: usize = 64;
const DEFAULT_SLAB_SIZE: usize = 4096;

#[derive(Clone, Copy)]
struct SlabInfo {
    ptr: NonNull<u8>,
}

/// An allocator specialized for many same-size allocations.
///
/// Grounded on `derive-c`'s `slab` allocator: memory is carved out of
/// `SLAB_SIZE`-byte slabs in `BLOCK_SIZE`-byte blocks; every free block is
/// threaded into an intrusive freelist (its first pointer-sized bytes hold
/// the address of the next free block), so freeing and reallocating a block
/// costs a single pointer write with no separate bookkeeping structure.
/// Requests larger than `BLOCK_SIZE` are forwarded directly to `BACKING`.
pub struct Slab<BACKING: RawAlloc = StdAlloc> {
    slabs: RefCell<VesselVec<SlabInfo, StdAlloc>>,
    block_size: usize,
    slab_size: usize,
    free_list_head: Cell<Option<NonNull<u8>>>,
    backing: BACKING,
}

impl<BACKING: RawAlloc> fmt::Debug for Slab<BACKING> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slab")
            .field("block_size", &self.block_size)
            .field("slab_size", &self.slab_size)
            .field("num_slabs", &self.slabs.borrow().len())
            .finish()
    }
}

impl<BACKING: RawAlloc> Slab<BACKING> {
    /// Creates a slab allocator with the default block size (64 bytes,
    /// large enough to hold a freelist pointer on any platform) and the
    /// default slab size (4 KiB), drawing slabs from `backing`.
    pub fn new(backing: BACKING) -> Self {
        Self::with_sizes(DEFAULT_BLOCK_SIZE, DEFAULT_SLAB_SIZE, backing)
    }

    /// Creates a slab allocator with an explicit block size and slab size.
    ///
    /// # Panics
    ///
    /// Panics if `block_size` is zero, smaller than a pointer, or larger
    /// than `slab_size`.
    pub fn with_sizes(block_size: usize, slab_size: usize, backing: BACKING) -> Self {
        assert!(block_size > 0, "block size must be larger than zero");
        assert!(slab_size >= block_size, "slab size must be at least block size");
        assert!(
            block_size >= core::mem::size_of::<*mut u8>(),
            "block size must be at least pointer size for the freelist"
        );
        Slab {
            slabs: RefCell::new(VesselVec::new(StdAlloc::new())),
            block_size,
            slab_size,
            free_list_head: Cell::new(None),
            backing,
        }
    }

    fn allocate_new_slab(&self) {
        let blocks_per_slab = self.slab_size / self.block_size;
        let layout = Layout::from_size_align(self.slab_size, 1).expect("slab layout overflow");
        let slab_ptr = self.backing.allocate_uninit(layout);

        self.slabs.borrow_mut().push(SlabInfo { ptr: slab_ptr });

        for i in 0..blocks_per_slab {
            let block_ptr = unsafe { slab_ptr.as_ptr().add(i * self.block_size) };
            unsafe {
                sanitizer::mark(block_ptr, core::mem::size_of::<*mut u8>(), Capability::ReadWrite);
                (block_ptr as *mut *mut u8).write(
                    self.free_list_head
                        .get()
                        .map_or(core::ptr::null_mut(), |p| p.as_ptr()),
                );
            }
            self.free_list_head.set(NonNull::new(block_ptr));
            unsafe { sanitizer::mark(block_ptr, self.block_size, Capability::None) };
        }
    }

    /// Gives every slab back to the backing allocator and clears the
    /// freelist. Does not run destructors on anything allocated out of
    /// this arena.
    pub fn reset(&self) {
        let mut slabs = self.slabs.borrow_mut();
        let layout = Layout::from_size_align(self.slab_size, 1).expect("slab layout overflow");
        for info in slabs.iter() {
            unsafe {
                sanitizer::mark(info.ptr.as_ptr(), self.slab_size, Capability::Write);
                self.backing.deallocate(info.ptr, layout);
            }
        }
        slabs.clear();
        self.free_list_head.set(None);
    }
}

impl<BACKING: RawAlloc> Drop for Slab<BACKING> {
    fn drop(&mut self) {
        self.reset();
    }
}

unsafe impl<BACKING: RawAlloc> RawAlloc for Slab<BACKING> {
    fn allocate_uninit(&self, layout: Layout) -> NonNull<u8> {
        debug_assert!(layout.size() > 0, "cannot allocate a zero-sized layout");

        if layout.size() > self.block_size {
            return self.backing.allocate_uninit(layout);
        }

        if self.free_list_head.get().is_none() {
            self.allocate_new_slab();
        }

        let block = self.free_list_head.get().expect("freelist just populated");
        unsafe {
            sanitizer::mark(block.as_ptr(), core::mem::size_of::<*mut u8>(), Capability::ReadWrite);
        }
        let next = unsafe { (block.as_ptr() as *const *mut u8).read() };
        self.free_list_head.set(NonNull::new(next));

        unsafe { sanitizer::mark(block.as_ptr(), layout.size(), Capability::Write) };
        if layout.size() < self.block_size {
            unsafe {
                sanitizer::mark(
                    block.as_ptr().add(layout.size()),
                    self.block_size - layout.size(),
                    Capability::None,
                )
            };
        }

        block
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        debug_assert!(layout.size() > 0, "cannot deallocate a zero-sized layout");

        if layout.size() > self.block_size {
            unsafe { self.backing.deallocate(ptr, layout) };
            return;
        }

        unsafe {
            sanitizer::mark(ptr.as_ptr(), core::mem::size_of::<*mut u8>(), Capability::ReadWrite);
            (ptr.as_ptr() as *mut *mut u8).write(
                self.free_list_head
                    .get()
                    .map_or(core::ptr::null_mut(), |p| p.as_ptr()),
            );
        }
        self.free_list_head.set(Some(ptr));
        unsafe { sanitizer::mark(ptr.as_ptr(), self.block_size, Capability::None) };
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> NonNull<u8> {
        debug_assert!(old_layout.size() > 0, "cannot reallocate a zero-sized layout");
        debug_assert!(new_layout.size() > 0, "cannot reallocate to zero size");

        if old_layout.size() > self.block_size && new_layout.size() > self.block_size {
            return unsafe { self.backing.reallocate(ptr, old_layout, new_layout) };
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
