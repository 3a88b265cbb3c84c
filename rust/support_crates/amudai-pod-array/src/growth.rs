//! Capacity growth policy.
//!
//! All functions here compute *physical* allocation sizes, i.e. the number of bytes
//! requested from the allocator, including the padding reserve. The usable capacity
//! reported to callers is always the physical size minus
//! [`ResolvedPadding::total`].
//!
//! Two growth paths exist:
//!
//! - **Next size** (single-element append into a full buffer): the first allocation
//!   is [`INITIAL_BYTES`] (or one element plus padding, if larger); every later one
//!   doubles the physical size.
//! - **Total size** (range insert, assign, raw append, reserve): the required byte
//!   length plus padding, rounded up to a power of two.
//!
//! Because the padding is counted inside the power-of-two physical size, a padded
//! buffer's capacity is slightly less than a power of two, and the allocation
//! itself never spills into the next size class.

use amudai_common::{Error, Result};

use crate::padding::ResolvedPadding;

/// Physical size of the first allocation made by a single-element append.
pub const INITIAL_BYTES: usize = 4096;

/// Rounds `n` up to the next power of two; zero stays zero.
///
/// Returns `None` on overflow.
#[inline]
pub fn round_up_to_power_of_two_or_zero(n: usize) -> Option<usize> {
    if n == 0 {
        Some(0)
    } else {
        n.checked_next_power_of_two()
    }
}

/// Aligns `n` up to the next multiple of `alignment`, which must be a power of two.
///
/// ```
/// use amudai_pod_array::growth::align_up;
///
/// assert_eq!(align_up(0, 16), 0);
/// assert_eq!(align_up(1, 16), 16);
/// assert_eq!(align_up(16, 16), 16);
/// assert_eq!(align_up(17, 16), 32);
/// ```
#[inline]
pub const fn align_up(n: usize, alignment: usize) -> usize {
    debug_assert!(alignment.is_power_of_two());
    (n + alignment - 1) & !(alignment - 1)
}

/// Smallest physical size able to hold `bytes` of data plus the padding reserve.
#[inline]
pub fn minimum_physical(bytes: usize, padding: ResolvedPadding) -> Result<usize> {
    bytes
        .checked_add(padding.total())
        .ok_or_else(|| overflow(bytes, padding))
}

/// Physical size for a single-element append into a full buffer.
///
/// `allocated` is the current physical size (zero when nothing is allocated yet).
#[inline]
pub fn next_physical_size(
    allocated: usize,
    stride: usize,
    padding: ResolvedPadding,
) -> Result<usize> {
    if allocated == 0 {
        Ok(minimum_physical(stride, padding)?.max(INITIAL_BYTES))
    } else {
        allocated
            .checked_mul(2)
            .ok_or_else(|| Error::capacity_overflow(format!("2 * {allocated} bytes")))
    }
}

/// Physical size for holding `bytes` of data in total, rounded up to a power of two.
#[inline]
pub fn physical_for_total(bytes: usize, padding: ResolvedPadding) -> Result<usize> {
    round_up_to_power_of_two_or_zero(minimum_physical(bytes, padding)?)
        .ok_or_else(|| overflow(bytes, padding))
}

/// Physical size for holding exactly `bytes` of data in total.
#[inline]
pub fn physical_for_total_exact(bytes: usize, padding: ResolvedPadding) -> Result<usize> {
    minimum_physical(bytes, padding)
}

/// Usable capacity, in bytes, of a physical allocation of the given size.
#[inline]
pub fn usable_bytes(physical: usize, padding: ResolvedPadding) -> usize {
    physical.saturating_sub(padding.total())
}

#[cold]
fn overflow(bytes: usize, padding: ResolvedPadding) -> Error {
    Error::capacity_overflow(format!(
        "{bytes} bytes with {} bytes of padding",
        padding.total()
    ))
}
