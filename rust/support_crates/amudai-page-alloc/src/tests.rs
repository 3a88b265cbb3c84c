use crate::mmap;

#[test]
fn test_normal_allocations() {
    let p = Pages::allocate(1).unwrap();
    assert!(!p.ptr.is_null());
    assert!(p.size >= mmap::get_page_size());
    assert!(p.is_aligned(mmap::get_page_size()));

    let p = Pages::allocate(0).unwrap();
    assert!(!p.ptr.is_null());
    assert!(p.size >= mmap::get_page_size());
    assert!(p.is_aligned(mmap::get_page_size()));
}

#[test]
fn test_allocate_zero_size() {
    let pages = Pages::allocate(0).expect("allocate");
    assert_eq!(
        pages.size,
        mmap::get_page_size(),
        "Zero size should allocate one page"
    );
}

#[test]
fn test_allocate_exact_page_size() {
    let page_size = mmap::get_page_size();
    let pages = Pages::allocate(page_size).expect("allocate");
    assert_eq!(pages.size, page_size);
}

#[test]
fn test_allocate_multiple_pages() {
    let page_size = mmap::get_page_size();
    let size = page_size * 3 + 100; // Should round up to 4 pages
    let result = Pages::allocate(size).expect("allocate");
    assert_eq!(result.size, page_size * 4);
}

#[test]
fn test_allocated_pages_are_zeroed() {
    let pages = Pages::allocate(10000).expect("allocate");
    assert!(pages.as_bytes().iter().all(|&b| b == 0));
}

#[test]
fn test_reallocate_grow_preserves_contents() {
    let page_size = mmap::get_page_size();
    let mut pages = Pages::allocate(page_size * 2).expect("allocate");
    pages.as_bytes_mut().fill(0x5A);

    pages.reallocate(page_size * 64).expect("reallocate");
    assert_eq!(pages.size, page_size * 64);
    assert!(pages.is_aligned(page_size));
    assert!(
        pages.as_bytes()[..page_size * 2]
            .iter()
            .all(|&b| b == 0x5A)
    );
    let last = pages.size - 1;
    pages.as_bytes_mut()[last] = 1;
}

#[test]
fn test_reallocate_shrink_and_same_size() {
    let page_size = mmap::get_page_size();
    let mut pages = Pages::allocate(page_size * 8).expect("allocate");
    pages.as_bytes_mut()[..page_size].fill(7);

    let ptr = pages.ptr;
    pages.reallocate(page_size * 8 - 10).expect("reallocate");
    assert_eq!(pages.ptr, ptr, "same page count must not move the mapping");

    pages.reallocate(page_size).expect("reallocate");
    assert_eq!(pages.size, page_size);
    assert!(pages.as_bytes().iter().all(|&b| b == 7));
}

#[test]
fn test_page_capacity() {
    let page_size = mmap::get_page_size();
    assert!(page_size.is_power_of_two());
    assert_eq!(mmap::page_capacity(0).unwrap(), page_size);
    assert_eq!(mmap::page_capacity(page_size + 1).unwrap(), page_size * 2);
    assert!(mmap::page_capacity(usize::MAX).is_err());
}

struct Pages {
    ptr: *mut std::ffi::c_void,
    size: usize,
}

impl Pages {
    fn allocate(size: usize) -> std::io::Result<Pages> {
        let (ptr, size) = mmap::allocate(size)?;
        Ok(Pages { ptr, size })
    }

    fn reallocate(&mut self, new_size: usize) -> std::io::Result<()> {
        let (ptr, size) = unsafe { mmap::reallocate(self.ptr, self.size, new_size)? };
        self.ptr = ptr;
        self.size = size;
        Ok(())
    }

    fn is_aligned(&self, alignment: usize) -> bool {
        (self.ptr as usize).is_multiple_of(alignment)
    }

    fn as_bytes(&self) -> &[u8] {
        unsafe { std::slice::from_raw_parts(self.ptr as *const u8, self.size) }
    }

    fn as_bytes_mut(&mut self) -> &mut [u8] {
        unsafe { std::slice::from_raw_parts_mut(self.ptr as *mut u8, self.size) }
    }
}

impl Drop for Pages {
    fn drop(&mut self) {
        if !self.ptr.is_null() {
            unsafe {
                mmap::free(self.ptr, self.size).expect("free");
            }
        }
    }
}
