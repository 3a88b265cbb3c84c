use std::{
    marker::PhantomData,
    ops::{Range, RangeBounds},
};

use amudai_common::{Error, Result, verify_arg};
use amudai_page_alloc::{Allocator, DefaultAllocator};
use bytemuck::{Pod, Zeroable};
use num_traits::AsPrimitive;

use crate::{
    padding::{LEFT_PAD_ALIGNMENT, NoPadding, PaddingPolicy, ResolvedPadding},
    raw::{EMPTY_BLOCK_ALIGNMENT, EMPTY_BLOCK_SIZE, RawPodBuffer},
};

/// A growable array of plain-old-data elements.
///
/// `PodArray` stores its elements in a single allocation obtained from `A`, and
/// surrounds the data region with the padding requested by `P` (none by default).
/// Elements are moved around with plain byte copies; no per-element code runs on
/// growth, insertion or removal.
///
/// Growth is geometric. A single-element append into a full array doubles the
/// physical allocation (starting at [`INITIAL_BYTES`](crate::growth::INITIAL_BYTES));
/// bulk operations round the required size, padding included, up to a power of two.
///
/// All growing operations reserve before they touch the contents: when the allocator
/// fails, the array is left exactly as it was. The infallible forms panic in that
/// case, the `try_` forms return the error.
///
/// ```
/// use amudai_pod_array::PaddedPodArray;
///
/// let mut a = PaddedPodArray::<u16>::new();
/// a.extend_from_slice(&[1, 2, 3, 4, 5]);
/// a.insert_from(3, [11u32, 12]);
/// assert_eq!(a, [1, 2, 3, 11, 12, 4, 5]);
/// ```
pub struct PodArray<T, P = NoPadding, A = DefaultAllocator>
where
    T: Pod,
    P: PaddingPolicy,
    A: Allocator,
{
    raw: RawPodBuffer<A>,
    _p: PhantomData<(T, fn() -> P)>,
}

impl<T: Pod, P: PaddingPolicy> PodArray<T, P> {
    /// Creates an empty array. Does not allocate.
    #[inline]
    pub fn new() -> Self {
        Self::new_in(DefaultAllocator::default())
    }

    /// Creates an empty array with room for exactly `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut a = Self::new();
        a.reserve_exact(capacity);
        a
    }

    /// Creates an array of `len` zeroed elements.
    pub fn zeroed(len: usize) -> Self {
        let mut a = Self::with_capacity(len);
        a.resize(len);
        a
    }

    /// Same as [`zeroed`](Self::zeroed).
    #[inline]
    pub fn with_len(len: usize) -> Self {
        Self::zeroed(len)
    }

    /// Creates an array of `len` copies of `value`.
    pub fn from_elem(len: usize, value: T) -> Self {
        let mut a = Self::with_capacity(len);
        a.resize_fill(len, value);
        a
    }
}

impl<T: Pod, P: PaddingPolicy, A: Allocator> PodArray<T, P, A> {
    /// Element size in bytes.
    const STRIDE: usize = {
        assert!(size_of::<T>() != 0, "zero-sized elements are not supported");
        size_of::<T>()
    };

    /// Alignment of the allocation.
    const ALIGNMENT: usize = if align_of::<T>() > LEFT_PAD_ALIGNMENT {
        align_of::<T>()
    } else {
        LEFT_PAD_ALIGNMENT
    };

    const PADDING: ResolvedPadding = {
        let padding = ResolvedPadding::for_element::<P>(Self::STRIDE, align_of::<T>());
        assert!(
            padding.total() <= EMPTY_BLOCK_SIZE,
            "padding does not fit the empty block"
        );
        assert!(
            Self::ALIGNMENT <= EMPTY_BLOCK_ALIGNMENT,
            "element alignment is too large"
        );
        padding
    };

    /// Creates an empty array that allocates from `allocator`.
    #[inline]
    pub fn new_in(allocator: A) -> Self {
        PodArray {
            raw: RawPodBuffer::new_in(Self::PADDING, Self::ALIGNMENT, allocator),
            _p: PhantomData,
        }
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.raw.len_bytes() / Self::STRIDE
    }

    /// Same as [`len`](Self::len).
    #[inline]
    pub fn size(&self) -> usize {
        self.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.raw.len_bytes() == 0
    }

    /// Number of elements the array can hold without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.raw.capacity_bytes() / Self::STRIDE
    }

    /// Length of the live region in bytes.
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.raw.len_bytes()
    }

    /// Physical size of the allocation, padding included.
    #[inline]
    pub fn allocated_bytes(&self) -> usize {
        self.raw.allocated_bytes()
    }

    /// Padding reserved around the data region, in bytes.
    ///
    /// Up to `padding().left()` bytes before [`as_ptr`](Self::as_ptr) and up to
    /// `padding().right()` bytes past the end of the capacity may be read and written
    /// (once the array has allocated) without leaving the allocation. For an empty
    /// array the padding refers to shared zeroed memory and is read-only.
    #[inline]
    pub fn padding(&self) -> ResolvedPadding {
        self.raw.padding()
    }

    #[inline]
    pub fn allocator(&self) -> &A {
        self.raw.allocator()
    }

    /// Pointer to the first element. Never null, also for an empty array.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.raw.as_ptr().cast()
    }

    /// Mutable pointer to the first element.
    ///
    /// Invalidated by any reallocation.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.raw.as_mut_ptr().cast()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        unsafe { std::slice::from_raw_parts(self.as_ptr(), self.len()) }
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        let len = self.len();
        unsafe { std::slice::from_raw_parts_mut(self.as_mut_ptr(), len) }
    }

    /// The live region as bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.raw.as_bytes()
    }

    /// First element.
    ///
    /// # Panics
    ///
    /// Panics if the array is empty.
    #[inline]
    pub fn front(&self) -> &T {
        assert!(!self.is_empty(), "front() called on an empty array");
        unsafe { self.front_unchecked() }
    }

    /// Last element.
    ///
    /// # Panics
    ///
    /// Panics if the array is empty.
    #[inline]
    pub fn back(&self) -> &T {
        assert!(!self.is_empty(), "back() called on an empty array");
        unsafe { self.back_unchecked() }
    }

    /// First element, without checking for emptiness.
    ///
    /// # Safety
    ///
    /// The array must not be empty.
    #[inline]
    pub unsafe fn front_unchecked(&self) -> &T {
        debug_assert!(!self.is_empty());
        unsafe { &*self.as_ptr() }
    }

    /// Last element, without checking for emptiness.
    ///
    /// # Safety
    ///
    /// The array must not be empty.
    #[inline]
    pub unsafe fn back_unchecked(&self) -> &T {
        debug_assert!(!self.is_empty());
        unsafe { &*self.as_ptr().add(self.len() - 1) }
    }

    /// Appends an element.
    #[inline]
    pub fn push(&mut self, value: T) {
        if let Err(e) = self.try_push(value) {
            alloc_failed(e)
        }
    }

    /// Same as [`push`](Self::push).
    #[inline]
    pub fn push_back(&mut self, value: T) {
        self.push(value)
    }

    #[inline]
    pub fn try_push(&mut self, value: T) -> Result<()> {
        if self.raw.spare_bytes() < Self::STRIDE {
            self.raw.try_reserve_for_next(Self::STRIDE)?;
        }
        unsafe { self.push_unchecked(value) };
        Ok(())
    }

    /// Appends a zeroed element and returns a reference to it.
    pub fn emplace_back(&mut self) -> &mut T {
        self.push(<T as Zeroable>::zeroed());
        let last = self.len() - 1;
        &mut self.as_mut_slice()[last]
    }

    /// Removes the last element and returns it, or `None` if the array is empty.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        let len = self.len();
        if len == 0 {
            return None;
        }
        let value = unsafe { *self.back_unchecked() };
        self.raw.truncate((len - 1) * Self::STRIDE);
        Some(value)
    }

    /// Appends a copy of `values`.
    #[inline]
    pub fn extend_from_slice(&mut self, values: &[T]) {
        if let Err(e) = self.try_extend_from_slice(values) {
            alloc_failed(e)
        }
    }

    #[inline]
    pub fn try_extend_from_slice(&mut self, values: &[T]) -> Result<()> {
        unsafe {
            self.raw
                .try_append_raw(values.as_ptr().cast(), size_of_val(values))
        }
    }

    /// Appends the values produced by `values`, converting each one with `as`.
    ///
    /// ```
    /// use amudai_pod_array::PodArray;
    ///
    /// let mut a = PodArray::<u64>::new();
    /// a.extend_from([1u8, 2, 255]);
    /// a.extend_from([-1i32]);
    /// assert_eq!(a, [1, 2, 255, u64::MAX]);
    /// ```
    pub fn extend_from<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: AsPrimitive<T>,
    {
        self.extend_with(values.into_iter().map(AsPrimitive::as_));
    }

    /// Inserts `value` at `index`, shifting the following elements up.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, value: T) {
        self.check_insert_index(index);
        if self.raw.spare_bytes() < Self::STRIDE {
            if let Err(e) = self.raw.try_reserve_for_next(Self::STRIDE) {
                alloc_failed(e)
            }
        }
        let pos = index * Self::STRIDE;
        unsafe {
            self.raw.open_gap(pos, Self::STRIDE);
            self.raw.as_mut_ptr().add(pos).cast::<T>().write(value);
            self.raw.set_len(self.raw.len_bytes() + Self::STRIDE);
        }
    }

    /// Inserts a copy of `values` at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert_slice(&mut self, index: usize, values: &[T]) {
        if let Err(e) = self.try_insert_slice(index, values) {
            alloc_failed(e)
        }
    }

    pub fn try_insert_slice(&mut self, index: usize, values: &[T]) -> Result<()> {
        self.check_insert_index(index);
        if values.is_empty() {
            return Ok(());
        }
        let count = size_of_val(values);
        let total = self.raw.len_plus(count)?;
        self.raw.try_reserve_total(total)?;
        let pos = index * Self::STRIDE;
        unsafe {
            self.raw.open_gap(pos, count);
            std::ptr::copy_nonoverlapping(
                values.as_ptr().cast::<u8>(),
                self.raw.as_mut_ptr().add(pos),
                count,
            );
            self.raw.set_len(total);
        }
        Ok(())
    }

    /// Inserts the values produced by `values` at `index`, converting each one with
    /// `as`.
    ///
    /// Room for `values.len()` elements is reserved up front. Items beyond the
    /// reported length are ignored; if the iterator ends early, the gap is closed.
    /// If the iterator panics, the array is left truncated at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert_from<I, S>(&mut self, index: usize, values: I)
    where
        I: IntoIterator<Item = S>,
        I::IntoIter: ExactSizeIterator,
        S: AsPrimitive<T>,
    {
        self.check_insert_index(index);
        let iter = values.into_iter();
        let count = iter.len();
        if count == 0 {
            return;
        }
        self.reserve(count);

        let pos = index * Self::STRIDE;
        let gap = count * Self::STRIDE;
        let len_bytes = self.raw.len_bytes();
        unsafe {
            self.raw.open_gap(pos, gap);
            // Only the prefix is live while the gap is being filled.
            self.raw.set_len(pos);
        }

        let dst = unsafe { self.raw.as_mut_ptr().add(pos).cast::<T>() };
        let mut written = 0;
        for value in iter.take(count) {
            unsafe { dst.add(written).write(value.as_()) };
            written += 1;
        }

        unsafe { self.raw.set_len(len_bytes + gap) };
        if written < count {
            self.raw
                .close_gap(pos + written * Self::STRIDE, (count - written) * Self::STRIDE);
        }
    }

    /// Inserts a copy of the array's own elements `range` at `index`.
    ///
    /// The result is the same as copying the range out and inserting the copy.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds or `index > len`.
    pub fn insert_from_self(&mut self, index: usize, range: impl RangeBounds<usize>) {
        let src = self.verify_range(range);
        self.check_insert_index(index);
        let count = src.len();
        if count == 0 {
            return;
        }
        self.reserve(count);

        let stride = Self::STRIDE;
        let gap = count * stride;
        // Source elements in front of `index` stay in place, the rest move up by
        // `count` once the gap is open.
        let before = src.end.min(index).saturating_sub(src.start);
        let after = count - before;
        unsafe {
            self.raw.open_gap(index * stride, gap);
            let base = self.raw.as_mut_ptr();
            let dst = base.add(index * stride);
            if before != 0 {
                std::ptr::copy_nonoverlapping(base.add(src.start * stride), dst, before * stride);
            }
            if after != 0 {
                let from = src.start.max(index) + count;
                std::ptr::copy_nonoverlapping(
                    base.add(from * stride),
                    dst.add(before * stride),
                    after * stride,
                );
            }
            self.raw.set_len(self.raw.len_bytes() + gap);
        }
    }

    /// Replaces the contents with a copy of `values`.
    pub fn assign_slice(&mut self, values: &[T]) {
        if let Err(e) = self.try_assign_slice(values) {
            alloc_failed(e)
        }
    }

    pub fn try_assign_slice(&mut self, values: &[T]) -> Result<()> {
        let bytes = size_of_val(values);
        self.raw.try_clear_and_reserve_total(bytes)?;
        unsafe {
            std::ptr::copy_nonoverlapping(values.as_ptr().cast::<u8>(), self.raw.as_mut_ptr(), bytes);
            self.raw.set_len(bytes);
        }
        Ok(())
    }

    /// Replaces the contents with the values produced by `values`, converting each
    /// one with `as`.
    ///
    /// Items beyond the reported length are ignored.
    pub fn assign_from<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        I::IntoIter: ExactSizeIterator,
        S: AsPrimitive<T>,
    {
        let iter = values.into_iter();
        let count = iter.len();
        let cleared =
            Self::byte_size(count).and_then(|bytes| self.raw.try_clear_and_reserve_total(bytes));
        if let Err(e) = cleared {
            alloc_failed(e)
        }

        let dst = self.raw.as_mut_ptr().cast::<T>();
        let mut written = 0;
        for value in iter.take(count) {
            unsafe { dst.add(written).write(value.as_()) };
            written += 1;
        }
        unsafe { self.raw.set_len(written * Self::STRIDE) };
    }

    /// Appends `bytes` raw bytes read from `src`.
    ///
    /// The bytes are copied as a block without looking at individual elements; the
    /// length grows by `bytes / size_of::<T>()`.
    ///
    /// # Safety
    ///
    /// - `src` must be valid for reads of `bytes` bytes and must not point into
    ///   this array.
    /// - `bytes` must be a multiple of `size_of::<T>()`.
    pub unsafe fn push_back_raw_many(&mut self, bytes: usize, src: *const u8) {
        debug_assert_eq!(bytes % Self::STRIDE, 0);
        if let Err(e) = unsafe { self.raw.try_append_raw(src, bytes) } {
            alloc_failed(e)
        }
    }

    /// Appends the elements encoded in `bytes`.
    ///
    /// # Panics
    ///
    /// Panics if `bytes.len()` is not a multiple of `size_of::<T>()`.
    pub fn extend_from_raw_bytes(&mut self, bytes: &[u8]) {
        if let Err(e) = self.try_extend_from_raw_bytes(bytes) {
            alloc_failed(e)
        }
    }

    pub fn try_extend_from_raw_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        verify_arg!(bytes, bytes.len() % Self::STRIDE == 0);
        unsafe { self.raw.try_append_raw(bytes.as_ptr(), bytes.len()) }
    }

    /// Appends one element read from the raw bytes at `src`.
    ///
    /// # Safety
    ///
    /// `src` must be valid for reads of `size_of::<T>()` bytes. No alignment is
    /// required.
    #[inline]
    pub unsafe fn push_back_raw(&mut self, src: *const u8) {
        let value = unsafe { src.cast::<T>().read_unaligned() };
        self.push(value);
    }

    /// Removes the elements in `range`, shifting the following elements down.
    /// The capacity is unchanged.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds.
    pub fn erase(&mut self, range: impl RangeBounds<usize>) {
        let range = self.verify_range(range);
        self.raw
            .close_gap(range.start * Self::STRIDE, range.len() * Self::STRIDE);
    }

    /// Shortens the array to `len` elements. Has no effect if `len` is not less than
    /// the current length.
    #[inline]
    pub fn truncate(&mut self, len: usize) {
        if len < self.len() {
            self.raw.truncate(len * Self::STRIDE);
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.raw.truncate(0);
    }

    /// Resizes the array to `len` elements, zero-filling any new ones.
    pub fn resize(&mut self, len: usize) {
        let old = self.len();
        if len <= old {
            self.truncate(len);
            return;
        }
        self.reserve(len - old);
        unsafe {
            self.raw
                .as_mut_ptr()
                .add(old * Self::STRIDE)
                .write_bytes(0, (len - old) * Self::STRIDE);
            self.raw.set_len(len * Self::STRIDE);
        }
    }

    /// Resizes the array to `len` elements, filling any new ones with `value`.
    pub fn resize_fill(&mut self, len: usize, value: T) {
        let old = self.len();
        if len <= old {
            self.truncate(len);
            return;
        }
        self.reserve(len - old);
        let dst = self.as_mut_ptr();
        for i in old..len {
            unsafe { dst.add(i).write(value) };
        }
        unsafe { self.raw.set_len(len * Self::STRIDE) };
    }

    /// Reserves room for at least `additional` more elements. The physical size is
    /// rounded up to a power of two.
    #[inline]
    pub fn reserve(&mut self, additional: usize) {
        if let Err(e) = self.try_reserve(additional) {
            alloc_failed(e)
        }
    }

    /// Reserves room for exactly `additional` more elements.
    pub fn reserve_exact(&mut self, additional: usize) {
        if let Err(e) = self.try_reserve_exact(additional) {
            alloc_failed(e)
        }
    }

    #[inline]
    pub fn try_reserve(&mut self, additional: usize) -> Result<()> {
        self.try_reserve_total(self.len().saturating_add(additional), false)
    }

    pub fn try_reserve_exact(&mut self, additional: usize) -> Result<()> {
        self.try_reserve_total(self.len().saturating_add(additional), true)
    }

    /// Releases unused capacity. An empty array gives back its allocation.
    pub fn shrink_to_fit(&mut self) {
        self.raw.shrink_to_fit();
    }
}

impl<T: Pod, P: PaddingPolicy, A: Allocator> PodArray<T, P, A> {
    #[inline]
    unsafe fn push_unchecked(&mut self, value: T) {
        let len = self.raw.len_bytes();
        debug_assert!(len + Self::STRIDE <= self.raw.capacity_bytes());
        unsafe {
            self.raw.as_mut_ptr().add(len).cast::<T>().write(value);
            self.raw.set_len(len + Self::STRIDE);
        }
    }

    fn extend_with(&mut self, iter: impl Iterator<Item = T>) {
        self.reserve(iter.size_hint().0);
        for value in iter {
            self.push(value);
        }
    }

    /// Makes room for `count` elements in total.
    fn try_reserve_total(&mut self, count: usize, exact: bool) -> Result<()> {
        let bytes = Self::byte_size(count)?;
        if exact {
            self.raw.try_reserve_exact_total(bytes)
        } else {
            self.raw.try_reserve_total(bytes)
        }
    }

    #[inline]
    fn byte_size(count: usize) -> Result<usize> {
        count
            .checked_mul(Self::STRIDE)
            .ok_or_else(|| Error::capacity_overflow(format!("{count} elements")))
    }

    #[inline]
    fn check_insert_index(&self, index: usize) {
        let len = self.len();
        assert!(
            index <= len,
            "insertion index (is {index}) should be <= len (is {len})"
        );
    }

    /// Resolves `range` against the current length.
    ///
    /// # Panics
    ///
    /// Panics if the start is greater than the end, the end is greater than the
    /// length, or a bound overflows.
    fn verify_range(&self, range: impl RangeBounds<usize>) -> Range<usize> {
        use std::ops::Bound;

        let len = self.len();

        let start = match range.start_bound() {
            Bound::Included(&n) => n,
            Bound::Excluded(&n) => n.checked_add(1).expect("out of range"),
            Bound::Unbounded => 0,
        };

        let end = match range.end_bound() {
            Bound::Included(&n) => n.checked_add(1).expect("out of range"),
            Bound::Excluded(&n) => n,
            Bound::Unbounded => len,
        };

        assert!(
            start <= end,
            "range start must not be greater than end: {start:?} <= {end:?}",
        );
        assert!(end <= len, "range end out of bounds: {end:?} <= {len:?}");

        start..end
    }
}

#[cold]
#[track_caller]
fn alloc_failed(e: Error) -> ! {
    panic!("PodArray: {e}")
}

impl<T, P, A> Default for PodArray<T, P, A>
where
    T: Pod,
    P: PaddingPolicy,
    A: Allocator + Default,
{
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T: Pod, P: PaddingPolicy, A: Allocator> std::ops::Deref for PodArray<T, P, A> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: Pod, P: PaddingPolicy, A: Allocator> std::ops::DerefMut for PodArray<T, P, A> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, P, A> Clone for PodArray<T, P, A>
where
    T: Pod,
    P: PaddingPolicy,
    A: Allocator + Clone,
{
    fn clone(&self) -> Self {
        let mut a = Self::new_in(self.allocator().clone());
        a.reserve_exact(self.len());
        a.extend_from_slice(self.as_slice());
        a
    }
}

impl<T, P, A> std::fmt::Debug for PodArray<T, P, A>
where
    T: Pod + std::fmt::Debug,
    P: PaddingPolicy,
    A: Allocator,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PodArray")
            .field("values", &self.as_slice())
            .field("len", &self.len())
            .field("cap", &self.capacity())
            .field("padding", &self.padding())
            .finish_non_exhaustive()
    }
}

impl<T, P, A, P2, A2> PartialEq<PodArray<T, P2, A2>> for PodArray<T, P, A>
where
    T: Pod + PartialEq,
    P: PaddingPolicy,
    A: Allocator,
    P2: PaddingPolicy,
    A2: Allocator,
{
    #[inline]
    fn eq(&self, other: &PodArray<T, P2, A2>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Pod + Eq, P: PaddingPolicy, A: Allocator> Eq for PodArray<T, P, A> {}

impl<T: Pod + PartialEq, P: PaddingPolicy, A: Allocator> PartialEq<[T]> for PodArray<T, P, A> {
    #[inline]
    fn eq(&self, other: &[T]) -> bool {
        self.as_slice() == other
    }
}

impl<T: Pod + PartialEq, P: PaddingPolicy, A: Allocator> PartialEq<&[T]> for PodArray<T, P, A> {
    #[inline]
    fn eq(&self, other: &&[T]) -> bool {
        self.as_slice() == *other
    }
}

impl<T, P, A, const N: usize> PartialEq<[T; N]> for PodArray<T, P, A>
where
    T: Pod + PartialEq,
    P: PaddingPolicy,
    A: Allocator,
{
    #[inline]
    fn eq(&self, other: &[T; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Pod + PartialEq, P: PaddingPolicy, A: Allocator> PartialEq<Vec<T>> for PodArray<T, P, A> {
    #[inline]
    fn eq(&self, other: &Vec<T>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T, P, A> From<&[T]> for PodArray<T, P, A>
where
    T: Pod,
    P: PaddingPolicy,
    A: Allocator + Default,
{
    fn from(values: &[T]) -> Self {
        let mut a = Self::default();
        a.reserve_exact(values.len());
        a.extend_from_slice(values);
        a
    }
}

impl<T, P, A, const N: usize> From<[T; N]> for PodArray<T, P, A>
where
    T: Pod,
    P: PaddingPolicy,
    A: Allocator + Default,
{
    fn from(values: [T; N]) -> Self {
        Self::from(values.as_slice())
    }
}

impl<T, P, A> From<Vec<T>> for PodArray<T, P, A>
where
    T: Pod,
    P: PaddingPolicy,
    A: Allocator + Default,
{
    fn from(values: Vec<T>) -> Self {
        Self::from(values.as_slice())
    }
}

impl<T, P, A> FromIterator<T> for PodArray<T, P, A>
where
    T: Pod,
    P: PaddingPolicy,
    A: Allocator + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut a = Self::default();
        a.extend_with(iter.into_iter());
        a
    }
}

impl<T: Pod, P: PaddingPolicy, A: Allocator> Extend<T> for PodArray<T, P, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.extend_with(iter.into_iter());
    }
}

impl<'a, T: Pod, P: PaddingPolicy, A: Allocator> Extend<&'a T> for PodArray<T, P, A> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend_with(iter.into_iter().copied());
    }
}

impl<'a, T: Pod, P: PaddingPolicy, A: Allocator> IntoIterator for &'a PodArray<T, P, A> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T: Pod, P: PaddingPolicy, A: Allocator> IntoIterator for &'a mut PodArray<T, P, A> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}

impl<P: PaddingPolicy, A: Allocator> std::io::Write for PodArray<u8, P, A> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.try_extend_from_slice(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
