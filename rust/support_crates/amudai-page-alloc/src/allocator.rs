//! The raw allocation service consumed by Amudai containers.
//!
//! An [`Allocator`] hands out untyped, aligned blocks of memory and can resize them
//! in place or by moving. Containers never touch the global allocator directly;
//! they go through this trait so that large buffers can be backed by page mappings
//! and tests can inject allocation failures.

use std::{alloc::Layout, ptr::NonNull};

use amudai_common::{Error, Result};

use crate::mmap;

/// Allocations of at least this many bytes are served by anonymous page mappings
/// rather than the heap.
pub const MMAP_THRESHOLD: usize = 64 * 1024 * 1024;

/// Allocator used by containers when none is specified.
pub type DefaultAllocator = PageAllocator;

/// A service providing aligned allocate / reallocate / free.
///
/// All sizes passed to an allocator are non-zero, and all alignments are powers
/// of two.
///
/// # Safety
///
/// Implementors must guarantee that:
/// - A block returned by `allocate(size, alignment)` is valid for reads and writes
///   of `size` bytes and its address is a multiple of `alignment`.
/// - `reallocate` returns a block satisfying the same rules for `new_size`, whose
///   first `min(old_size, new_size)` bytes equal those of the old block.
/// - When `reallocate` fails, the old block is left untouched and remains owned
///   by the caller.
/// - A block stays valid until it is passed to `free` or successfully to
///   `reallocate`.
pub unsafe trait Allocator {
    /// Allocates a block of `size` bytes aligned to `alignment`.
    ///
    /// The contents of the block are unspecified.
    fn allocate(&self, size: usize, alignment: usize) -> Result<NonNull<u8>>;

    /// Resizes the block at `ptr` from `old_size` to `new_size` bytes, possibly moving it.
    ///
    /// # Safety
    ///
    /// `ptr` must denote a live block obtained from this allocator with the given
    /// `old_size` and `alignment`.
    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_size: usize,
        new_size: usize,
        alignment: usize,
    ) -> Result<NonNull<u8>>;

    /// Releases the block at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must denote a live block obtained from this allocator with the given
    /// `size` and `alignment`. The block must not be used afterwards.
    unsafe fn free(&self, ptr: NonNull<u8>, size: usize, alignment: usize);
}

unsafe impl<A> Allocator for &A
where
    A: Allocator + ?Sized,
{
    #[inline]
    fn allocate(&self, size: usize, alignment: usize) -> Result<NonNull<u8>> {
        (**self).allocate(size, alignment)
    }

    #[inline]
    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_size: usize,
        new_size: usize,
        alignment: usize,
    ) -> Result<NonNull<u8>> {
        unsafe { (**self).reallocate(ptr, old_size, new_size, alignment) }
    }

    #[inline]
    unsafe fn free(&self, ptr: NonNull<u8>, size: usize, alignment: usize) {
        unsafe { (**self).free(ptr, size, alignment) }
    }
}

/// Allocator backed by the Rust global allocator.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeapAllocator;

unsafe impl Allocator for HeapAllocator {
    fn allocate(&self, size: usize, alignment: usize) -> Result<NonNull<u8>> {
        debug_assert_ne!(size, 0);
        let layout = make_layout(size, alignment)?;
        let ptr = unsafe { std::alloc::alloc(layout) };
        NonNull::new(ptr).ok_or_else(|| Error::out_of_memory(size, alignment))
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_size: usize,
        new_size: usize,
        alignment: usize,
    ) -> Result<NonNull<u8>> {
        debug_assert_ne!(new_size, 0);
        // The target layout must be valid as well, `realloc` does not check it.
        make_layout(new_size, alignment)?;
        let layout = make_layout(old_size, alignment)?;
        let new_ptr = unsafe { std::alloc::realloc(ptr.as_ptr(), layout, new_size) };
        NonNull::new(new_ptr).ok_or_else(|| Error::out_of_memory(new_size, alignment))
    }

    unsafe fn free(&self, ptr: NonNull<u8>, size: usize, alignment: usize) {
        unsafe {
            let layout = Layout::from_size_align_unchecked(size, alignment);
            std::alloc::dealloc(ptr.as_ptr(), layout);
        }
    }
}

/// Allocator that serves small blocks from the heap and large blocks
/// (at least [`MMAP_THRESHOLD`] bytes) from anonymous page mappings.
///
/// Large blocks are resized with `mremap` where the platform supports it, so
/// growing a huge buffer does not copy its contents. Blocks that cross the
/// threshold on reallocation are moved between the two backends.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageAllocator;

impl PageAllocator {
    #[inline]
    fn uses_pages(size: usize, alignment: usize) -> bool {
        size >= MMAP_THRESHOLD && alignment <= mmap::get_page_size()
    }

    fn map(size: usize, alignment: usize) -> Result<NonNull<u8>> {
        let (ptr, capacity) = mmap::allocate(size).map_err(|e| {
            log::debug!("mmap of {size} bytes failed: {e}");
            Error::out_of_memory(size, alignment)
        })?;
        log::debug!("mapped {capacity} bytes at {ptr:?}");
        NonNull::new(ptr.cast()).ok_or_else(|| Error::out_of_memory(size, alignment))
    }

    unsafe fn remap(
        ptr: NonNull<u8>,
        old_size: usize,
        new_size: usize,
        alignment: usize,
    ) -> Result<NonNull<u8>> {
        let capacity =
            mmap::page_capacity(old_size).map_err(|_| Error::capacity_overflow("page mapping"))?;
        let (new_ptr, new_capacity) =
            unsafe { mmap::reallocate(ptr.as_ptr().cast(), capacity, new_size) }.map_err(|e| {
                log::debug!("remap of {capacity} -> {new_size} bytes failed: {e}");
                Error::out_of_memory(new_size, alignment)
            })?;
        log::debug!("remapped {capacity} -> {new_capacity} bytes at {new_ptr:?}");
        NonNull::new(new_ptr.cast()).ok_or_else(|| Error::out_of_memory(new_size, alignment))
    }

    unsafe fn unmap(ptr: NonNull<u8>, size: usize) {
        let capacity = mmap::page_capacity(size).unwrap_or(size);
        if let Err(e) = unsafe { mmap::free(ptr.as_ptr().cast(), capacity) } {
            log::warn!("failed to unmap {capacity} bytes at {ptr:?}: {e}");
        } else {
            log::debug!("unmapped {capacity} bytes at {ptr:?}");
        }
    }
}

unsafe impl Allocator for PageAllocator {
    fn allocate(&self, size: usize, alignment: usize) -> Result<NonNull<u8>> {
        if Self::uses_pages(size, alignment) {
            Self::map(size, alignment)
        } else {
            HeapAllocator.allocate(size, alignment)
        }
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_size: usize,
        new_size: usize,
        alignment: usize,
    ) -> Result<NonNull<u8>> {
        match (
            Self::uses_pages(old_size, alignment),
            Self::uses_pages(new_size, alignment),
        ) {
            (false, false) => unsafe { HeapAllocator.reallocate(ptr, old_size, new_size, alignment) },
            (true, true) => unsafe { Self::remap(ptr, old_size, new_size, alignment) },
            _ => {
                let new_ptr = self.allocate(new_size, alignment)?;
                unsafe {
                    std::ptr::copy_nonoverlapping(
                        ptr.as_ptr(),
                        new_ptr.as_ptr(),
                        old_size.min(new_size),
                    );
                    self.free(ptr, old_size, alignment);
                }
                Ok(new_ptr)
            }
        }
    }

    unsafe fn free(&self, ptr: NonNull<u8>, size: usize, alignment: usize) {
        if Self::uses_pages(size, alignment) {
            unsafe { Self::unmap(ptr, size) }
        } else {
            unsafe { HeapAllocator.free(ptr, size, alignment) }
        }
    }
}

fn make_layout(size: usize, alignment: usize) -> Result<Layout> {
    Layout::from_size_align(size, alignment).map_err(|_| {
        Error::invalid_arg(
            "alignment",
            format!("invalid layout: size {size}, alignment {alignment}"),
        )
    })
}
