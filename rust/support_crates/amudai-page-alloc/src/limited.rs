//! An allocator wrapper that enforces a byte budget.

use std::{
    ptr::NonNull,
    sync::atomic::{AtomicUsize, Ordering},
};

use amudai_common::{Error, Result};

use crate::allocator::{Allocator, HeapAllocator};

/// Wraps another allocator and fails any request that would push the total number
/// of live bytes over `limit`.
///
/// Failures are reported as `OutOfMemory`, exactly like a real allocation failure,
/// which makes this wrapper useful for exercising the error paths of containers.
#[derive(Debug)]
pub struct LimitedAllocator<A = HeapAllocator> {
    inner: A,
    limit: usize,
    used: AtomicUsize,
}

impl LimitedAllocator<HeapAllocator> {
    /// Creates a heap-backed allocator with the given budget in bytes.
    pub fn new(limit: usize) -> Self {
        Self::with_allocator(HeapAllocator, limit)
    }
}

impl<A> LimitedAllocator<A> {
    /// Creates a wrapper around `inner` with the given budget in bytes.
    pub fn with_allocator(inner: A, limit: usize) -> Self {
        LimitedAllocator {
            inner,
            limit,
            used: AtomicUsize::new(0),
        }
    }

    /// The budget, in bytes.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Number of bytes currently handed out.
    pub fn used(&self) -> usize {
        self.used.load(Ordering::Relaxed)
    }

    /// Number of bytes that can still be allocated.
    pub fn remaining(&self) -> usize {
        self.limit.saturating_sub(self.used())
    }

    fn charge(&self, amount: usize) -> bool {
        self.used
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |used| {
                used.checked_add(amount).filter(|&total| total <= self.limit)
            })
            .is_ok()
    }

    fn refund(&self, amount: usize) {
        self.used.fetch_sub(amount, Ordering::Relaxed);
    }
}

unsafe impl<A: Allocator> Allocator for LimitedAllocator<A> {
    fn allocate(&self, size: usize, alignment: usize) -> Result<NonNull<u8>> {
        if !self.charge(size) {
            return Err(Error::out_of_memory(size, alignment));
        }
        self.inner.allocate(size, alignment).inspect_err(|_| {
            self.refund(size);
        })
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_size: usize,
        new_size: usize,
        alignment: usize,
    ) -> Result<NonNull<u8>> {
        let growth = new_size.saturating_sub(old_size);
        if !self.charge(growth) {
            return Err(Error::out_of_memory(new_size, alignment));
        }
        match unsafe { self.inner.reallocate(ptr, old_size, new_size, alignment) } {
            Ok(new_ptr) => {
                self.refund(old_size.saturating_sub(new_size));
                Ok(new_ptr)
            }
            Err(e) => {
                self.refund(growth);
                Err(e)
            }
        }
    }

    unsafe fn free(&self, ptr: NonNull<u8>, size: usize, alignment: usize) {
        unsafe { self.inner.free(ptr, size, alignment) };
        self.refund(size);
    }
}
