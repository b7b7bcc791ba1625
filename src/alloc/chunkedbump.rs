//! A bump allocator over a growing sequence of fixed-size blocks.

use core::alloc::Layout;
use core::cell::{Cell, RefCell};
use core::fmt;
use core::ptr::NonNull;

use crate::collections::Vec as VesselVec;
use crate::sanitizer::{self, Capability};

use super::{stdalloc::StdAlloc, RawAlloc};

const DEFAULT_BLOCK_SIZE: usize = 65536;

#[derive(Clone, Copy)]
struct BlockInfo {
    ptr: NonNull<u8>,
    /// Number of `BLOCK_SIZE` blocks this run occupies, stored on the first
    /// block of a contiguous multi-block allocation. Sibling blocks of the
    /// same run store `0`, so `reset` frees one region per run instead of
    /// one region per block.
    num_blocks: usize,
}

/// A bump allocator that carves memory out of `BLOCK_SIZE`-sized blocks,
/// requesting a new (possibly multi-block) run from the backing allocator
/// whenever the current block can't satisfy a request.
///
/// Grounded on `derive-c`'s `chunkedbump` allocator. Unlike [`HybridStatic`],
/// there is no inline buffer — every block comes from `BACKING` — but like
/// `HybridStatic` the most recent allocation can be extended in place if
/// there is room left in its block, and [`ChunkedBump::reset`] gives back
/// every block to `BACKING` in one pass.
///
/// [`HybridStatic`]: super::HybridStatic
pub struct ChunkedBump<BACKING: RawAlloc = StdAlloc> {
    blocks: RefCell<VesselVec<BlockInfo, StdAlloc>>,
    block_size: usize,
    current_block: Cell<usize>,
    current_offset: Cell<usize>,
    backing: BACKING,
}

impl<BACKING: RawAlloc> fmt::Debug for ChunkedBump<BACKING> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkedBump")
            .field("block_size", &self.block_size)
            .field("num_blocks", &self.blocks.borrow().len())
            .field("current_block", &self.current_block.get())
            .field("current_offset", &self.current_offset.get())
            .finish()
    }
}

impl<BACKING: RawAlloc> ChunkedBump<BACKING> {
    /// Creates a new chunked bump allocator with the default block size
    /// (64 KiB), drawing blocks from `backing`.
    pub fn new(backing: BACKING) -> Self {
        Self::with_block_size(DEFAULT_BLOCK_SIZE, backing)
    }

    /// Creates a new chunked bump allocator with an explicit block size.
    pub fn with_block_size(block_size: usize, backing: BACKING) -> Self {
        assert!(block_size > 0, "block size must be larger than zero");
        ChunkedBump {
            blocks: RefCell::new(VesselVec::new(StdAlloc::new())),
            block_size,
            current_block: Cell::new(0),
            current_offset: Cell::new(0),
            backing,
        }
    }

    fn allocate_new_blocks(&self, size: usize) -> NonNull<u8> {
        let num_blocks = (size + self.block_size - 1) / self.block_size;
        let total_size = num_blocks * self.block_size;
        let layout = Layout::from_size_align(total_size, 1).expect("chunked bump block layout overflow");
        let base = self.backing.allocate_uninit(layout);

        let mut blocks = self.blocks.borrow_mut();
        for i in 0..num_blocks {
            let block_ptr = unsafe { NonNull::new_unchecked(base.as_ptr().add(i * self.block_size)) };
            let count = if i == 0 { num_blocks } else { 0 };
            blocks.push(BlockInfo {
                ptr: block_ptr,
                num_blocks: count,
            });
        }
        self.current_block.set(blocks.len() - 1);
        drop(blocks);

        let mut offset = size % self.block_size;
        if offset == 0 {
            offset = self.block_size;
        }
        self.current_offset.set(offset);

        unsafe { sanitizer::mark(base.as_ptr(), size, Capability::Write) };
        base
    }

    /// Gives every block back to the backing allocator and empties the
    /// block list. Does not run destructors on anything allocated out of
    /// this arena.
    pub fn reset(&self) {
        let mut blocks = self.blocks.borrow_mut();
        for info in blocks.iter() {
            if info.num_blocks > 0 {
                let total_size = info.num_blocks * self.block_size;
                let layout = Layout::from_size_align(total_size, 1).expect("chunked bump block layout overflow");
                unsafe {
                    sanitizer::mark(info.ptr.as_ptr(), total_size, Capability::Write);
                    self.backing.deallocate(info.ptr, layout);
                }
            }
        }
        blocks.clear();
        self.current_block.set(0);
        self.current_offset.set(0);
    }
}

impl<BACKING: RawAlloc> Drop for ChunkedBump<BACKING> {
    fn drop(&mut self) {
        self.reset();
    }
}

unsafe impl<BACKING: RawAlloc> RawAlloc for ChunkedBump<BACKING> {
    fn allocate_uninit(&self, layout: Layout) -> NonNull<u8> {
        debug_assert!(layout.size() > 0, "cannot allocate a zero-sized layout");

        let blocks = self.blocks.borrow();
        let have_blocks = !blocks.is_empty();
        let remaining = if have_blocks {
            self.block_size - self.current_offset.get()
        } else {
            0
        };

        if have_blocks && remaining >= layout.size() {
            let info = *blocks.read(self.current_block.get());
            drop(blocks);
            let ptr = unsafe { NonNull::new_unchecked(info.ptr.as_ptr().add(self.current_offset.get())) };
            self.current_offset.set(self.current_offset.get() + layout.size());
            unsafe { sanitizer::mark(ptr.as_ptr(), layout.size(), Capability::Write) };
            return ptr;
        }
        drop(blocks);

        self.allocate_new_blocks(layout.size())
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        debug_assert!(layout.size() > 0, "cannot deallocate a zero-sized layout");
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

        if new_layout.size() > old_layout.size() {
            let blocks = self.blocks.borrow();
            if !blocks.is_empty() {
                let info = *blocks.read(self.current_block.get());
                drop(blocks);
                let expected_last = unsafe {
                    info.ptr
                        .as_ptr()
                        .add(self.current_offset.get())
                        .sub(old_layout.size())
                };
                if ptr.as_ptr() == expected_last {
                    let extension = new_layout.size() - old_layout.size();
                    let remaining = self.block_size - self.current_offset.get();
                    if extension <= remaining {
                        unsafe {
                            sanitizer::mark(
                                ptr.as_ptr().add(old_layout.size()),
                                extension,
                                Capability::Write,
                            )
                        };
                        self.current_offset.set(self.current_offset.get() + extension);
                        return ptr;
                    }
                }
            }
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
