use std::sync::OnceLock;

/// Maps `size` bytes of anonymous, readable and writable memory.
///
/// The mapping is rounded up to a whole number of pages and is zero-filled by
/// the kernel.
///
/// # Returns
///
/// `(ptr, capacity)` where `capacity` is the page-rounded size of the mapping.
/// The same `capacity` must later be passed to [`free`] or [`reallocate`].
pub fn allocate(size: usize) -> std::io::Result<(*mut std::ffi::c_void, usize)> {
    let capacity = page_capacity(size)?;
    let ptr = unsafe {
        libc::mmap(
            std::ptr::null_mut(),
            capacity,
            libc::PROT_READ | libc::PROT_WRITE,
            libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
            -1,
            0,
        )
    };
    if ptr.is_null() || ptr == libc::MAP_FAILED {
        return Err(std::io::Error::last_os_error());
    }
    Ok((ptr, capacity))
}

/// Resizes a mapping created by [`allocate`], letting the kernel move the pages
/// instead of copying them.
///
/// On failure the original mapping is left intact.
///
/// # Safety
///
/// `ptr` and `capacity` must describe a live mapping returned by [`allocate`] or
/// a previous [`reallocate`].
pub unsafe fn reallocate(
    ptr: *mut std::ffi::c_void,
    capacity: usize,
    new_size: usize,
) -> std::io::Result<(*mut std::ffi::c_void, usize)> {
    let new_capacity = page_capacity(new_size)?;
    if new_capacity == capacity {
        return Ok((ptr, capacity));
    }
    let new_ptr = unsafe { libc::mremap(ptr, capacity, new_capacity, libc::MREMAP_MAYMOVE) };
    if new_ptr.is_null() || new_ptr == libc::MAP_FAILED {
        return Err(std::io::Error::last_os_error());
    }
    Ok((new_ptr, new_capacity))
}

/// Unmaps memory returned by [`allocate`] or [`reallocate`].
///
/// # Safety
///
/// `ptr` and `size` must describe a live mapping, and no references into it may
/// outlive this call.
pub unsafe fn free(ptr: *mut std::ffi::c_void, size: usize) -> std::io::Result<()> {
    let res = unsafe { libc::munmap(ptr, size) };
    if res < 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(())
}

/// Gets the system's standard page size in bytes.
///
/// The value is cached after the first call. Falls back to 4KB if
/// `sysconf(_SC_PAGESIZE)` fails.
pub fn get_page_size() -> usize {
    static SIZE: OnceLock<usize> = OnceLock::new();
    *SIZE.get_or_init(|| read_page_size().unwrap_or(4 * 1024))
}

/// Rounds `size` up to a whole number of pages (at least one page).
pub fn page_capacity(size: usize) -> std::io::Result<usize> {
    let page_size = get_page_size();
    assert!(page_size.is_power_of_two());
    size.max(1)
        .checked_next_multiple_of(page_size)
        .ok_or_else(|| std::io::Error::from(std::io::ErrorKind::OutOfMemory))
}

fn read_page_size() -> std::io::Result<usize> {
    let res = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if res < 0 {
        return Err(std::io::Error::last_os_error());
    }
    assert!(res < i32::MAX as _);
    Ok(res as usize)
}
