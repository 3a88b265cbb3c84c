//! Raw memory allocation services for Amudai containers: a heap allocator, a page
//! allocator that maps large blocks directly from the OS, and a budget-limited
//! wrapper.

pub mod allocator;
pub mod limited;

#[cfg_attr(target_os = "linux", path = "mmap_linux.rs")]
#[cfg_attr(not(target_os = "linux"), path = "mmap_fallback.rs")]
pub mod mmap;

pub use allocator::{Allocator, DefaultAllocator, HeapAllocator, MMAP_THRESHOLD, PageAllocator};
pub use limited::LimitedAllocator;

#[cfg(test)]
mod tests;
