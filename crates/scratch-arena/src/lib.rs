// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # scratch-arena
//!
//! A fixed-capacity bump arena that holds every tensor and intermediate
//! buffer an inference engine needs.
//!
//! # Key Components
//!
//! - [`ArenaCapacity`] — the arena size, with human-readable parsing
//!   (`"200K"`, `"1M"`, etc.).
//! - [`ScratchArena`] — the allocator: one zeroed buffer reserved up front,
//!   carved into 16-byte aligned [`Region`]s, never resized.
//! - [`ArenaStats`] — usage counters (bytes used, alignment padding,
//!   failed requests).
//!
//! # Ownership Model
//!
//! ```text
//! ScratchArena::new(capacity)      one heap allocation, at startup
//!       │
//!       │  alloc(len) -> Region    offset + length, no borrow held
//!       ▼
//!   engine stores Regions, later asks the arena for
//!   slice / slice_mut / pair_mut views when it runs
//! ```
//!
//! Regions are plain handles rather than borrowed slices, so an engine can
//! own the arena and its regions side by side. Every view request is bounds
//! checked and fails with a [`MemoryError`] instead of panicking.
//!
//! # Example
//! ```
//! use scratch_arena::{ArenaCapacity, ScratchArena};
//!
//! let mut arena = ScratchArena::new(ArenaCapacity::from_kib(4));
//! let input = arena.alloc(2048).unwrap();
//! let output = arena.alloc(4).unwrap();
//! assert!(arena.used_bytes() >= 2052);
//!
//! // 4 KiB cannot hold another 4 KiB request.
//! assert!(arena.alloc(4096).is_err());
//! # let _ = (input, output);
//! ```

mod arena;
mod capacity;
mod error;
mod stats;

pub use arena::{as_f32, as_f32_mut, Region, ScratchArena, ARENA_ALIGNMENT};
pub use capacity::ArenaCapacity;
pub use error::MemoryError;
pub use stats::ArenaStats;
