//! Growable arrays of plain-old-data elements with a padding reserve around the
//! data, for use as the storage primitive of Amudai column builders.
//!
//! - [`PodArray`] is the typed container. Elements are any [`bytemuck::Pod`] type
//!   and are only ever moved with byte copies.
//! - [`padding`] defines the padding policies. [`PaddedPodArray`] reserves enough
//!   room around its data for 16-byte wide loads and stores that run past either
//!   end of the array.
//! - [`growth`] holds the capacity growth rules shared by all arrays.
//! - [`raw::RawPodBuffer`] is the untyped core that owns the allocation.
//!
//! Memory comes from an [`amudai_page_alloc::Allocator`], the page allocator by
//! default.

pub mod growth;
pub mod padding;
pub mod raw;

mod array;

pub use amudai_page_alloc::{Allocator, DefaultAllocator};
pub use array::PodArray;
pub use padding::{NoPadding, PaddingPolicy, ResolvedPadding, SimdPadding};

/// A [`PodArray`] padded for 16-byte wide loads and stores.
pub type PaddedPodArray<T, A = DefaultAllocator> = PodArray<T, SimdPadding, A>;
