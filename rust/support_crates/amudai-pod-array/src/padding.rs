//! Padding policies.
//!
//! A padding policy reserves allocated but logically invisible bytes before and
//! after the data region of a buffer. Vectorized code may then read (or write) up
//! to [`ResolvedPadding::left`] bytes before the first element and up to
//! [`ResolvedPadding::right`] bytes after the end of the usable capacity without
//! leaving the allocation.
//!
//! The policy only states the requested widths. [`ResolvedPadding::for_element`]
//! turns them into the actual reserve for a given element type; the growth policy
//! (see [`crate::growth`]) then works on the padded total.

use crate::growth::align_up;

/// Width of the widest register the padded arrays are meant to serve.
pub const PADDING_FOR_SIMD: usize = 16;

/// The left pad is a multiple of this value, so the data region keeps the
/// alignment of the allocation.
pub const LEFT_PAD_ALIGNMENT: usize = 16;

/// Requested padding widths, in bytes.
pub trait PaddingPolicy {
    /// Bytes reserved before the first element.
    const LEFT: usize;
    /// Bytes reserved after the end of the usable capacity.
    const RIGHT: usize;
}

/// No padding: capacity equals the physical allocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoPadding;

impl PaddingPolicy for NoPadding {
    const LEFT: usize = 0;
    const RIGHT: usize = 0;
}

/// Padding for 16-byte wide loads and stores: a full register before the data and
/// one byte short of a register after it.
///
/// With one-byte elements the total reserve is 31 bytes, so a buffer whose physical
/// size is 4096 bytes reports a capacity of 4065 elements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimdPadding;

impl PaddingPolicy for SimdPadding {
    const LEFT: usize = PADDING_FOR_SIMD;
    const RIGHT: usize = PADDING_FOR_SIMD - 1;
}

/// Padding widths resolved for a concrete element type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ResolvedPadding {
    left: usize,
    right: usize,
}

impl ResolvedPadding {
    pub const NONE: ResolvedPadding = ResolvedPadding { left: 0, right: 0 };

    pub const fn new(left: usize, right: usize) -> ResolvedPadding {
        ResolvedPadding { left, right }
    }

    /// Resolves the policy `P` for elements of the given size and alignment.
    ///
    /// - The right pad is rounded up to a whole number of elements.
    /// - The left pad holds at least one element and is rounded up to
    ///   [`LEFT_PAD_ALIGNMENT`] (or the element alignment, if larger).
    /// - A zero request stays zero.
    pub const fn for_element<P: PaddingPolicy>(stride: usize, alignment: usize) -> ResolvedPadding {
        let right = if P::RIGHT == 0 {
            0
        } else {
            P::RIGHT.next_multiple_of(stride)
        };
        let left = if P::LEFT == 0 {
            0
        } else {
            let at_least = if P::LEFT > stride { P::LEFT } else { stride };
            let align = if alignment > LEFT_PAD_ALIGNMENT {
                alignment
            } else {
                LEFT_PAD_ALIGNMENT
            };
            align_up(at_least, align)
        };
        ResolvedPadding { left, right }
    }

    #[inline]
    pub const fn left(&self) -> usize {
        self.left
    }

    #[inline]
    pub const fn right(&self) -> usize {
        self.right
    }

    /// Total reserve, subtracted from every physical allocation.
    #[inline]
    pub const fn total(&self) -> usize {
        self.left + self.right
    }

    #[inline]
    pub const fn is_none(&self) -> bool {
        self.total() == 0
    }
}
