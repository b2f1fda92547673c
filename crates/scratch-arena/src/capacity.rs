// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Arena capacity configuration and parsing.
//!
//! An [`ArenaCapacity`] is the fixed size of the scratch arena. It is chosen
//! once, at build or configuration time, and never changes afterwards.

use crate::MemoryError;
use std::fmt;

/// The fixed size of a scratch arena in bytes.
///
/// # Parsing
/// Supports human-readable strings with binary suffixes:
/// - `"200K"` or `"200KB"` → 200 × 1024 bytes
/// - `"1M"` or `"1MB"` → 1024² bytes
/// - `"4096B"` or `"4096"` → raw byte count
///
/// # Examples
/// ```
/// use scratch_arena::ArenaCapacity;
///
/// let c = ArenaCapacity::parse("200K").unwrap();
/// assert_eq!(c.as_bytes(), 200 * 1024);
/// assert_eq!(c, ArenaCapacity::DEFAULT);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ArenaCapacity {
    bytes: usize,
}

impl ArenaCapacity {
    /// 200 KiB: enough for a 2048-input dense regressor with a few hidden
    /// layers, small enough for an ESP32-class part.
    pub const DEFAULT: ArenaCapacity = ArenaCapacity { bytes: 200 * 1024 };

    /// Creates a capacity from a byte count.
    pub const fn from_bytes(bytes: usize) -> Self {
        Self { bytes }
    }

    /// Creates a capacity from kibibytes.
    pub const fn from_kib(kib: usize) -> Self {
        Self { bytes: kib * 1024 }
    }

    /// Returns the capacity in bytes.
    pub fn as_bytes(&self) -> usize {
        self.bytes
    }

    /// Returns the capacity in kibibytes (truncated).
    pub fn as_kib(&self) -> usize {
        self.bytes / 1024
    }

    /// Parses a human-readable capacity string.
    ///
    /// Accepted formats: `"200K"`, `"200KB"`, `"1M"`, `"1MB"`, `"512B"`, or a
    /// plain byte count like `"204800"`. Case-insensitive. Zero is rejected.
    pub fn parse(s: &str) -> Result<Self, MemoryError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(MemoryError::InvalidCapacity(s.to_string()));
        }

        let upper = trimmed.to_uppercase();

        let (num_str, multiplier) = if upper.ends_with("MB") {
            (&trimmed[..trimmed.len() - 2], 1024 * 1024)
        } else if upper.ends_with('M') {
            (&trimmed[..trimmed.len() - 1], 1024 * 1024)
        } else if upper.ends_with("KB") {
            (&trimmed[..trimmed.len() - 2], 1024)
        } else if upper.ends_with('K') {
            (&trimmed[..trimmed.len() - 1], 1024)
        } else if upper.ends_with('B') {
            (&trimmed[..trimmed.len() - 1], 1)
        } else {
            (trimmed, 1)
        };

        let value: usize = num_str
            .trim()
            .parse()
            .map_err(|_| MemoryError::InvalidCapacity(s.to_string()))?;

        let bytes = value
            .checked_mul(multiplier)
            .ok_or_else(|| MemoryError::InvalidCapacity(s.to_string()))?;

        if bytes == 0 {
            return Err(MemoryError::ZeroSizedAllocation);
        }

        Ok(Self { bytes })
    }
}

impl Default for ArenaCapacity {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for ArenaCapacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bytes >= 1024 * 1024 && self.bytes % (1024 * 1024) == 0 {
            write!(f, "{} MiB", self.bytes / (1024 * 1024))
        } else if self.bytes >= 1024 && self.bytes % 1024 == 0 {
            write!(f, "{} KiB", self.bytes / 1024)
        } else {
            write!(f, "{} B", self.bytes)
        }
    }
}
