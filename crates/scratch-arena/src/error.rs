// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the scratch arena.

/// Errors that can occur when carving or viewing arena memory.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MemoryError {
    /// The request does not fit in the remaining arena space.
    #[error("arena exhausted: requested {requested_bytes} bytes, but only {available_bytes} available (capacity: {capacity_bytes})")]
    OutOfMemory {
        requested_bytes: usize,
        available_bytes: usize,
        capacity_bytes: usize,
    },

    /// Attempted to allocate a zero-sized region.
    #[error("cannot allocate zero-sized region")]
    ZeroSizedAllocation,

    /// A region does not lie inside this arena.
    #[error("region {offset}..{end} is outside the arena (capacity: {capacity_bytes})")]
    InvalidRegion {
        offset: usize,
        end: usize,
        capacity_bytes: usize,
    },

    /// Two regions that must be disjoint overlap.
    #[error("regions overlap: {a_offset}..{a_end} and {b_offset}..{b_end}")]
    OverlappingRegions {
        a_offset: usize,
        a_end: usize,
        b_offset: usize,
        b_end: usize,
    },

    /// A byte view cannot be reinterpreted as the requested element type.
    #[error("cannot view {len} bytes as {ty}: misaligned or partial element")]
    Misaligned { ty: &'static str, len: usize },

    /// The backing buffer could not be reserved.
    #[error("cannot reserve a {capacity_bytes}-byte arena")]
    ReservationFailed { capacity_bytes: usize },

    /// A capacity string could not be parsed.
    #[error("invalid arena capacity '{0}': expected a number followed by an optional suffix (K, M, B)")]
    InvalidCapacity(String),
}
