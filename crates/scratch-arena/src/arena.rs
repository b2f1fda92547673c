// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Fixed-capacity bump allocator.
//!
//! The [`ScratchArena`] is the only working memory an inference engine gets.
//! It:
//!
//! 1. Reserves its whole buffer once, at construction, and never grows.
//! 2. Hands out 16-byte aligned [`Region`]s by bumping an offset. There is
//!    no per-region free; the arena lives as long as its engine.
//! 3. Fails a request that does not fit with `Err(OutOfMemory)`, which the
//!    engine reports as a hard initialisation failure.
//!
//! # Alignment
//! Alignment is computed against the real address of the buffer, not just
//! the offset, so a region's bytes can always be viewed as `&[f32]`.

use crate::{ArenaCapacity, ArenaStats, MemoryError};

/// Alignment of every region handed out by the arena.
pub const ARENA_ALIGNMENT: usize = 16;

/// A handle to a byte range inside a [`ScratchArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    offset: usize,
    len: usize,
}

impl Region {
    /// Byte offset from the start of the arena.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the region is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// One past the last byte.
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    fn overlaps(&self, other: &Region) -> bool {
        self.offset < other.end() && other.offset < self.end()
    }
}

/// A fixed-capacity scratch arena.
///
/// # Example
/// ```
/// use scratch_arena::{ArenaCapacity, ScratchArena};
///
/// let mut arena = ScratchArena::new(ArenaCapacity::from_bytes(256));
/// let a = arena.alloc(16).unwrap();
/// arena.slice_mut(a).unwrap().fill(7);
/// assert_eq!(arena.slice(a).unwrap(), &[7u8; 16]);
/// ```
pub struct ScratchArena {
    buf: Box<[u8]>,
    offset: usize,
    stats: ArenaStats,
}

impl ScratchArena {
    /// Reserves a zeroed arena of the given capacity.
    ///
    /// This is the arena's only heap allocation.
    ///
    /// # Panics
    /// If the buffer cannot be allocated. Use [`try_new`](Self::try_new) for
    /// capacities that come from configuration.
    pub fn new(capacity: ArenaCapacity) -> Self {
        let bytes = capacity.as_bytes();
        Self::from_buffer(vec![0u8; bytes])
    }

    /// Reserves a zeroed arena, reporting allocation failure instead of
    /// panicking or aborting.
    ///
    /// # Errors
    /// [`MemoryError::ReservationFailed`] if the allocator cannot provide
    /// `capacity` bytes.
    pub fn try_new(capacity: ArenaCapacity) -> Result<Self, MemoryError> {
        let bytes = capacity.as_bytes();
        let mut buf = Vec::new();
        buf.try_reserve_exact(bytes)
            .map_err(|_| MemoryError::ReservationFailed {
                capacity_bytes: bytes,
            })?;
        buf.resize(bytes, 0);
        Ok(Self::from_buffer(buf))
    }

    fn from_buffer(buf: Vec<u8>) -> Self {
        let bytes = buf.len();
        Self {
            buf: buf.into_boxed_slice(),
            offset: 0,
            stats: ArenaStats::new(bytes),
        }
    }

    /// Carves a zeroed, aligned region of `len` bytes.
    ///
    /// # Errors
    /// - [`MemoryError::ZeroSizedAllocation`] if `len == 0`.
    /// - [`MemoryError::OutOfMemory`] if the region does not fit.
    pub fn alloc(&mut self, len: usize) -> Result<Region, MemoryError> {
        if len == 0 {
            return Err(MemoryError::ZeroSizedAllocation);
        }

        let capacity = self.buf.len();
        let base = self.buf.as_ptr() as usize;
        let misalignment = (base + self.offset) % ARENA_ALIGNMENT;
        let padding = if misalignment == 0 {
            0
        } else {
            ARENA_ALIGNMENT - misalignment
        };

        let start = self.offset + padding;
        let end = match start.checked_add(len) {
            Some(end) if end <= capacity => end,
            _ => {
                self.stats.record_failure(len);
                return Err(MemoryError::OutOfMemory {
                    requested_bytes: len,
                    available_bytes: capacity.saturating_sub(start),
                    capacity_bytes: capacity,
                });
            }
        };

        self.offset = end;
        self.stats.record_allocation(padding, len);
        Ok(Region { offset: start, len })
    }

    /// Returns a read-only view of `region`.
    pub fn slice(&self, region: Region) -> Result<&[u8], MemoryError> {
        let capacity = self.buf.len();
        self.buf
            .get(region.offset..region.end())
            .ok_or(MemoryError::InvalidRegion {
                offset: region.offset,
                end: region.end(),
                capacity_bytes: capacity,
            })
    }

    /// Returns a mutable view of `region`.
    pub fn slice_mut(&mut self, region: Region) -> Result<&mut [u8], MemoryError> {
        let capacity = self.buf.len();
        self.buf
            .get_mut(region.offset..region.end())
            .ok_or(MemoryError::InvalidRegion {
                offset: region.offset,
                end: region.end(),
                capacity_bytes: capacity,
            })
    }

    /// Returns a read-only view of `src` and a mutable view of `dst` at once.
    ///
    /// This is how a kernel reads its input and writes its output when both
    /// live in the arena.
    ///
    /// # Errors
    /// [`MemoryError::OverlappingRegions`] if the regions share any byte,
    /// [`MemoryError::InvalidRegion`] if either lies outside the arena.
    pub fn pair_mut(&mut self, src: Region, dst: Region) -> Result<(&[u8], &mut [u8]), MemoryError> {
        if src.overlaps(&dst) {
            return Err(MemoryError::OverlappingRegions {
                a_offset: src.offset,
                a_end: src.end(),
                b_offset: dst.offset,
                b_end: dst.end(),
            });
        }
        // Validate both before splitting.
        self.slice(src)?;
        self.slice(dst)?;

        if src.offset < dst.offset {
            let (head, tail) = self.buf.split_at_mut(dst.offset);
            Ok((&head[src.offset..src.end()], &mut tail[..dst.len]))
        } else {
            let (head, tail) = self.buf.split_at_mut(src.offset);
            Ok((&tail[..src.len], &mut head[dst.offset..dst.end()]))
        }
    }

    /// Total capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Bytes handed out so far, including alignment padding.
    pub fn used_bytes(&self) -> usize {
        self.offset
    }

    /// Bytes still available (before alignment of the next request).
    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.offset)
    }

    /// Returns a snapshot of usage statistics.
    pub fn stats(&self) -> ArenaStats {
        self.stats.clone()
    }
}

impl std::fmt::Debug for ScratchArena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScratchArena")
            .field("capacity", &self.capacity())
            .field("used_bytes", &self.used_bytes())
            .field("remaining", &self.remaining())
            .finish()
    }
}

/// Views arena bytes as `f32` elements.
pub fn as_f32(bytes: &[u8]) -> Result<&[f32], MemoryError> {
    bytemuck::try_cast_slice(bytes).map_err(|_| MemoryError::Misaligned {
        ty: "f32",
        len: bytes.len(),
    })
}

/// Views arena bytes as mutable `f32` elements.
pub fn as_f32_mut(bytes: &mut [u8]) -> Result<&mut [f32], MemoryError> {
    let len = bytes.len();
    bytemuck::try_cast_slice_mut(bytes).map_err(|_| MemoryError::Misaligned { ty: "f32", len })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena(bytes: usize) -> ScratchArena {
        ScratchArena::new(ArenaCapacity::from_bytes(bytes))
    }

    #[test]
    fn test_alloc_is_zeroed_and_aligned() {
        let mut a = arena(1024);
        let r1 = a.alloc(3).unwrap();
        let r2 = a.alloc(8).unwrap();

        let base = a.slice(r1).unwrap().as_ptr() as usize;
        assert_eq!(base % ARENA_ALIGNMENT, 0);
        let second = a.slice(r2).unwrap().as_ptr() as usize;
        assert_eq!(second % ARENA_ALIGNMENT, 0);
        assert!(r2.offset() >= r1.end());
        assert!(a.slice(r2).unwrap().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_try_new() {
        let a = ScratchArena::try_new(ArenaCapacity::from_kib(4)).unwrap();
        assert_eq!(a.capacity(), 4096);
        assert_eq!(a.used_bytes(), 0);
    }

    #[test]
    fn test_try_new_unreservable_capacity() {
        let err = ScratchArena::try_new(ArenaCapacity::from_bytes(usize::MAX)).unwrap_err();
        assert_eq!(
            err,
            MemoryError::ReservationFailed {
                capacity_bytes: usize::MAX
            }
        );
    }

    #[test]
    fn test_out_of_memory() {
        let mut a = arena(64);
        let _r = a.alloc(32).unwrap();
        let err = a.alloc(64).unwrap_err();
        assert!(matches!(err, MemoryError::OutOfMemory { requested_bytes: 64, .. }));

        let stats = a.stats();
        assert_eq!(stats.failed_allocations, 1);
        assert_eq!(stats.largest_failed_request, 64);
    }

    #[test]
    fn test_failed_alloc_does_not_consume_space() {
        let mut a = arena(256);
        let before = a.used_bytes();
        assert!(a.alloc(1024).is_err());
        assert_eq!(a.used_bytes(), before);
    }

    #[test]
    fn test_zero_allocation() {
        let mut a = arena(64);
        assert!(matches!(a.alloc(0), Err(MemoryError::ZeroSizedAllocation)));
    }

    #[test]
    fn test_capacity_never_exceeded() {
        let mut a = arena(100);
        while a.alloc(7).is_ok() {}
        assert!(a.used_bytes() <= a.capacity());
    }

    #[test]
    fn test_slice_rejects_foreign_region() {
        let mut big = arena(1024);
        big.alloc(64).unwrap();
        let far = big.alloc(512).unwrap();
        let small = arena(64);
        assert!(matches!(small.slice(far), Err(MemoryError::InvalidRegion { .. })));
    }

    #[test]
    fn test_pair_mut_both_orders() {
        let mut a = arena(256);
        let r1 = a.alloc(16).unwrap();
        let r2 = a.alloc(16).unwrap();
        a.slice_mut(r1).unwrap().fill(1);

        {
            let (src, dst) = a.pair_mut(r1, r2).unwrap();
            dst.copy_from_slice(src);
        }
        assert_eq!(a.slice(r2).unwrap(), &[1u8; 16]);

        a.slice_mut(r2).unwrap().fill(9);
        {
            let (src, dst) = a.pair_mut(r2, r1).unwrap();
            dst.copy_from_slice(src);
        }
        assert_eq!(a.slice(r1).unwrap(), &[9u8; 16]);
    }

    #[test]
    fn test_pair_mut_rejects_overlap() {
        let mut a = arena(256);
        let r = a.alloc(32).unwrap();
        assert!(matches!(
            a.pair_mut(r, r),
            Err(MemoryError::OverlappingRegions { .. })
        ));
    }

    #[test]
    fn test_f32_views() {
        let mut a = arena(256);
        let r = a.alloc(16).unwrap();
        {
            let floats = as_f32_mut(a.slice_mut(r).unwrap()).unwrap();
            assert_eq!(floats.len(), 4);
            floats[0] = 1.5;
            floats[3] = -2.0;
        }
        let floats = as_f32(a.slice(r).unwrap()).unwrap();
        assert_eq!(floats, &[1.5, 0.0, 0.0, -2.0]);
    }

    #[test]
    fn test_f32_view_rejects_partial_element() {
        let mut a = arena(64);
        let r = a.alloc(6).unwrap();
        assert!(matches!(
            as_f32(a.slice(r).unwrap()),
            Err(MemoryError::Misaligned { ty: "f32", len: 6 })
        ));
    }

    #[test]
    fn test_stats_track_usage() {
        let mut a = arena(1024);
        a.alloc(10).unwrap();
        a.alloc(10).unwrap();
        let stats = a.stats();
        assert_eq!(stats.allocations, 2);
        assert_eq!(stats.used_bytes, a.used_bytes());
        assert_eq!(stats.capacity_bytes, 1024);
    }

    #[test]
    fn test_debug_format() {
        let a = arena(64);
        let debug = format!("{a:?}");
        assert!(debug.contains("ScratchArena"));
        assert!(debug.contains("capacity"));
    }
}
