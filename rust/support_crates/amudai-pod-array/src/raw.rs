//! The untyped core of [`PodArray`](crate::PodArray).
//!
//! [`RawPodBuffer`] owns a single allocation and tracks the live region and the
//! usable capacity in bytes. It knows nothing about element types beyond the
//! stride passed to [`RawPodBuffer::try_reserve_for_next`]; all typed operations
//! are expressed on top of the byte-level primitives here.
//!
//! Physical layout of an allocated buffer:
//!
//! ```text
//! base                 start                       start + capacity
//! |<---- pad left ---->|<-- len -->|<-- spare -->|<---- pad right ---->|
//! |<------------------------- allocated (physical) ------------------->|
//! ```

use std::ptr::NonNull;

use amudai_common::{Error, Result};
use amudai_page_alloc::{Allocator, DefaultAllocator};

use crate::{growth, padding::ResolvedPadding};

/// Size of the shared block that empty buffers point into.
pub const EMPTY_BLOCK_SIZE: usize = 1024;

/// Alignment of the shared empty block.
pub const EMPTY_BLOCK_ALIGNMENT: usize = 128;

#[repr(C, align(128))]
struct EmptyBlock([u8; EMPTY_BLOCK_SIZE]);

/// Read-only, zeroed memory that buffers without an allocation point into, so that
/// over-reads around an empty padded buffer stay inside valid memory.
static EMPTY_BLOCK: EmptyBlock = EmptyBlock([0; EMPTY_BLOCK_SIZE]);

/// A growable byte buffer with a padding reserve around its data region.
pub struct RawPodBuffer<A: Allocator = DefaultAllocator> {
    /// First byte of the data region. Points `padding.left()` bytes into the
    /// allocation, or into [`EMPTY_BLOCK`] when nothing is allocated.
    start: NonNull<u8>,
    /// Length of the live region, in bytes.
    len: usize,
    /// Physical size of the allocation, zero when nothing is allocated.
    allocated: usize,
    padding: ResolvedPadding,
    alignment: usize,
    allocator: A,
}

impl<A: Allocator> RawPodBuffer<A> {
    /// Creates an empty buffer. Nothing is allocated until the first growth.
    ///
    /// # Panics
    ///
    /// Panics if `alignment` is not a power of two no greater than
    /// [`EMPTY_BLOCK_ALIGNMENT`], or if the padding does not fit the shared empty
    /// block.
    pub fn new_in(padding: ResolvedPadding, alignment: usize, allocator: A) -> Self {
        assert!(alignment.is_power_of_two() && alignment <= EMPTY_BLOCK_ALIGNMENT);
        assert!(padding.total() <= EMPTY_BLOCK_SIZE);
        assert_eq!(padding.left() % alignment, 0);
        RawPodBuffer {
            start: Self::empty_start(padding),
            len: 0,
            allocated: 0,
            padding,
            alignment,
            allocator,
        }
    }

    /// Length of the live region, in bytes.
    #[inline]
    pub fn len_bytes(&self) -> usize {
        self.len
    }

    /// Usable capacity, in bytes. Excludes the padding reserve.
    #[inline]
    pub fn capacity_bytes(&self) -> usize {
        growth::usable_bytes(self.allocated, self.padding)
    }

    /// Bytes that can be appended without reallocating.
    #[inline]
    pub fn spare_bytes(&self) -> usize {
        self.capacity_bytes() - self.len
    }

    /// Physical size of the allocation, including the padding reserve.
    #[inline]
    pub fn allocated_bytes(&self) -> usize {
        self.allocated
    }

    #[inline]
    pub fn is_allocated(&self) -> bool {
        self.allocated != 0
    }

    #[inline]
    pub fn padding(&self) -> ResolvedPadding {
        self.padding
    }

    #[inline]
    pub fn alignment(&self) -> usize {
        self.alignment
    }

    #[inline]
    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.start.as_ptr()
    }

    /// Mutable pointer to the data region.
    ///
    /// While nothing is allocated the pointer refers to shared read-only memory;
    /// writes are only valid within `[0, capacity_bytes())`, which is empty then.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.start.as_ptr()
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        unsafe { std::slice::from_raw_parts(self.as_ptr(), self.len) }
    }

    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        unsafe { std::slice::from_raw_parts_mut(self.as_mut_ptr(), self.len) }
    }

    /// Grows the buffer ahead of a single-element append of `stride` bytes.
    ///
    /// Allocates [`growth::INITIAL_BYTES`] on first use and doubles the physical
    /// size afterwards.
    pub fn try_reserve_for_next(&mut self, stride: usize) -> Result<()> {
        let physical = growth::next_physical_size(self.allocated, stride, self.padding)?;
        let required = growth::minimum_physical(self.len_plus(stride)?, self.padding)?;
        self.reallocate(physical.max(required))
    }

    /// Makes room for `total` bytes of live data, rounding the physical size up to
    /// a power of two. Does nothing if the capacity already suffices.
    #[inline]
    pub fn try_reserve_total(&mut self, total: usize) -> Result<()> {
        if total <= self.capacity_bytes() {
            return Ok(());
        }
        let physical = growth::physical_for_total(total, self.padding)?;
        self.reallocate(physical)
    }

    /// Makes room for exactly `total` bytes of live data.
    pub fn try_reserve_exact_total(&mut self, total: usize) -> Result<()> {
        if total <= self.capacity_bytes() {
            return Ok(());
        }
        let physical = growth::physical_for_total_exact(total, self.padding)?;
        self.reallocate(physical)
    }

    /// Empties the buffer and makes room for `total` bytes, rounding the physical
    /// size up to a power of two.
    ///
    /// When the buffer has to grow, a fresh block replaces the old one and the old
    /// contents are not copied. On failure nothing changes.
    pub fn try_clear_and_reserve_total(&mut self, total: usize) -> Result<()> {
        if total > self.capacity_bytes() {
            let physical = growth::physical_for_total(total, self.padding)?;
            let base = self.allocator.allocate(physical, self.alignment)?;
            log::trace!(
                "pod buffer: replaced {} -> {physical} bytes (padding {}+{})",
                self.allocated,
                self.padding.left(),
                self.padding.right(),
            );
            self.release();
            self.start = unsafe { base.add(self.padding.left()) };
            self.allocated = physical;
        }
        self.len = 0;
        Ok(())
    }

    /// Releases unused capacity.
    ///
    /// An empty buffer gives its allocation back entirely. If the allocator fails to
    /// shrink the block, the buffer keeps its current allocation.
    pub fn shrink_to_fit(&mut self) {
        if !self.is_allocated() {
            return;
        }
        if self.len == 0 {
            self.release();
            return;
        }
        let Ok(physical) = growth::physical_for_total_exact(self.len, self.padding) else {
            return;
        };
        if physical < self.allocated {
            if let Err(e) = self.reallocate(physical) {
                log::debug!("shrink_to_fit: keeping {} bytes: {e}", self.allocated);
            }
        }
    }

    /// Sets the length of the live region.
    ///
    /// # Safety
    ///
    /// `len` must not exceed [`capacity_bytes`](Self::capacity_bytes), and every
    /// byte in `[0, len)` must have been written.
    #[inline]
    pub unsafe fn set_len(&mut self, len: usize) {
        debug_assert!(len <= self.capacity_bytes());
        self.len = len;
    }

    /// Shortens the live region to `len` bytes. Has no effect if `len` is greater
    /// than the current length. Capacity is unchanged.
    #[inline]
    pub fn truncate(&mut self, len: usize) {
        if len < self.len {
            self.len = len;
        }
    }

    /// Appends `count` bytes read from `src`, growing the buffer if needed.
    ///
    /// # Safety
    ///
    /// `src` must be valid for reads of `count` bytes and must not point into this
    /// buffer.
    #[inline]
    pub unsafe fn try_append_raw(&mut self, src: *const u8, count: usize) -> Result<()> {
        if count > self.spare_bytes() {
            let total = self.len_plus(count)?;
            self.try_reserve_total(total)?;
        }
        unsafe {
            std::ptr::copy_nonoverlapping(src, self.as_mut_ptr().add(self.len), count);
        }
        self.len += count;
        Ok(())
    }

    /// Moves the bytes `[pos, len)` to `[pos + count, len + count)`.
    ///
    /// The length is not changed: the caller fills the gap `[pos, pos + count)` and
    /// then calls [`set_len`](Self::set_len).
    ///
    /// # Safety
    ///
    /// `pos <= len_bytes()` and `len_bytes() + count <= capacity_bytes()`.
    #[inline]
    pub unsafe fn open_gap(&mut self, pos: usize, count: usize) {
        debug_assert!(pos <= self.len);
        debug_assert!(self.len + count <= self.capacity_bytes());
        let tail = self.len - pos;
        if tail != 0 && count != 0 {
            unsafe {
                let at = self.as_mut_ptr().add(pos);
                std::ptr::copy(at, at.add(count), tail);
            }
        }
    }

    /// Removes the bytes `[pos, pos + count)`, moving the tail down.
    ///
    /// # Panics
    ///
    /// Panics if the range is not within the live region.
    pub fn close_gap(&mut self, pos: usize, count: usize) {
        let end = pos.checked_add(count).expect("range overflow");
        assert!(end <= self.len, "range end out of bounds: {end} <= {}", self.len);
        let tail = self.len - end;
        if tail != 0 && count != 0 {
            unsafe {
                let at = self.as_mut_ptr().add(pos);
                std::ptr::copy(at.add(count), at, tail);
            }
        }
        self.len -= count;
    }

    /// Current length plus `count`, checked.
    #[inline]
    pub fn len_plus(&self, count: usize) -> Result<usize> {
        self.len
            .checked_add(count)
            .ok_or_else(|| Error::capacity_overflow(format!("{} + {count} bytes", self.len)))
    }
}

impl<A: Allocator> RawPodBuffer<A> {
    fn empty_start(padding: ResolvedPadding) -> NonNull<u8> {
        let block = std::ptr::addr_of!(EMPTY_BLOCK.0) as *mut u8;
        // SAFETY: `padding.left()` is within the block (checked by the constructor).
        unsafe { NonNull::new_unchecked(block.add(padding.left())) }
    }

    /// Start of the physical allocation.
    #[inline]
    fn base(&self) -> NonNull<u8> {
        debug_assert!(self.is_allocated());
        unsafe { self.start.sub(self.padding.left()) }
    }

    /// Moves the buffer into a physical allocation of `physical` bytes.
    ///
    /// The live region keeps its offset from the start of the allocation. On
    /// failure nothing changes.
    #[cold]
    fn reallocate(&mut self, physical: usize) -> Result<()> {
        debug_assert!(physical >= self.padding.total() + self.len);
        let base = if self.is_allocated() {
            unsafe {
                self.allocator
                    .reallocate(self.base(), self.allocated, physical, self.alignment)?
            }
        } else {
            self.allocator.allocate(physical, self.alignment)?
        };
        log::trace!(
            "pod buffer: reallocated {} -> {physical} bytes (len {}, padding {}+{})",
            self.allocated,
            self.len,
            self.padding.left(),
            self.padding.right(),
        );
        self.start = unsafe { base.add(self.padding.left()) };
        self.allocated = physical;
        Ok(())
    }

    /// Frees the allocation and returns to the unallocated state.
    fn release(&mut self) {
        if self.is_allocated() {
            unsafe {
                self.allocator
                    .free(self.base(), self.allocated, self.alignment)
            };
            self.start = Self::empty_start(self.padding);
            self.allocated = 0;
            self.len = 0;
        }
    }
}

impl<A: Allocator> Drop for RawPodBuffer<A> {
    fn drop(&mut self) {
        self.release();
    }
}

// SAFETY: the buffer exclusively owns its allocation; mutation requires `&mut self`.
unsafe impl<A: Allocator + Send> Send for RawPodBuffer<A> {}

// SAFETY: shared references only permit reads.
unsafe impl<A: Allocator + Sync> Sync for RawPodBuffer<A> {}

impl<A: Allocator> std::fmt::Debug for RawPodBuffer<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawPodBuffer")
            .field("len", &self.len)
            .field("cap", &self.capacity_bytes())
            .field("allocated", &self.allocated)
            .field("padding", &self.padding)
            .field("alignment", &self.alignment)
            .finish_non_exhaustive()
    }
}
