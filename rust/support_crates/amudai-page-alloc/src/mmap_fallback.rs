use std::alloc::{Layout, alloc_zeroed, dealloc};

/// Allocates page-aligned, zeroed memory (emulated with the global allocator).
pub fn allocate(size: usize) -> std::io::Result<(*mut std::ffi::c_void, usize)> {
    let page_size = get_page_size();
    let capacity = page_capacity(size)?;

    let layout = Layout::from_size_align(capacity, page_size)
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::InvalidInput, "Invalid layout"))?;

    let ptr = unsafe { alloc_zeroed(layout) };
    if ptr.is_null() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::OutOfMemory,
            "Failed to allocate memory",
        ));
    }

    Ok((ptr as *mut std::ffi::c_void, capacity))
}

/// Resizes a region returned by [`allocate`] by allocating a new region, copying
/// the common prefix and releasing the old one.
///
/// On failure the original region is left intact.
pub unsafe fn reallocate(
    ptr: *mut std::ffi::c_void,
    capacity: usize,
    new_size: usize,
) -> std::io::Result<(*mut std::ffi::c_void, usize)> {
    let new_capacity = page_capacity(new_size)?;
    if new_capacity == capacity {
        return Ok((ptr, capacity));
    }
    let (new_ptr, new_capacity) = allocate(new_capacity)?;
    unsafe {
        std::ptr::copy_nonoverlapping(
            ptr as *const u8,
            new_ptr as *mut u8,
            capacity.min(new_capacity),
        );
        free(ptr, capacity)?;
    }
    Ok((new_ptr, new_capacity))
}

/// Frees memory that was allocated using [`allocate`].
pub unsafe fn free(ptr: *mut std::ffi::c_void, size: usize) -> std::io::Result<()> {
    let page_size = get_page_size();
    assert!(size.is_multiple_of(page_size));

    let layout = Layout::from_size_align(size, page_size)
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::InvalidInput, "Invalid layout"))?;

    unsafe {
        dealloc(ptr as *mut u8, layout);
    }
    Ok(())
}

/// Returns the "standard page" size in bytes.
pub fn get_page_size() -> usize {
    4 * 1024
}

/// Rounds `size` up to a whole number of pages (at least one page).
pub fn page_capacity(size: usize) -> std::io::Result<usize> {
    size.max(1)
        .checked_next_multiple_of(get_page_size())
        .ok_or_else(|| std::io::Error::from(std::io::ErrorKind::OutOfMemory))
}
