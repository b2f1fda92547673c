// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Arena usage statistics.
//!
//! [`ArenaStats`] answers the question every embedded deployment asks after
//! the first successful allocation: how much of the arena did the model take,
//! and how close is it to the edge?

/// Counters describing how an arena has been used.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ArenaStats {
    /// Total arena capacity in bytes.
    pub capacity_bytes: usize,
    /// Bytes handed out, including alignment padding.
    pub used_bytes: usize,
    /// Bytes lost to alignment padding.
    pub padding_bytes: usize,
    /// Number of successful allocations.
    pub allocations: u64,
    /// Number of requests that did not fit.
    pub failed_allocations: u64,
    /// Size of the largest request that did not fit.
    pub largest_failed_request: usize,
}

impl ArenaStats {
    pub(crate) fn new(capacity_bytes: usize) -> Self {
        Self {
            capacity_bytes,
            ..Default::default()
        }
    }

    pub(crate) fn record_allocation(&mut self, padding: usize, len: usize) {
        self.allocations += 1;
        self.padding_bytes += padding;
        self.used_bytes += padding + len;
    }

    pub(crate) fn record_failure(&mut self, requested: usize) {
        self.failed_allocations += 1;
        self.largest_failed_request = self.largest_failed_request.max(requested);
    }

    /// Returns used bytes as a fraction of capacity in `[0.0, 1.0]`.
    pub fn utilisation(&self) -> f64 {
        if self.capacity_bytes == 0 {
            return 0.0;
        }
        self.used_bytes as f64 / self.capacity_bytes as f64
    }

    /// Returns a human-readable summary.
    pub fn summary(&self) -> String {
        format!(
            "Arena: {} / {} bytes used ({:.1}%), {} allocations, {} padding bytes, {} failed",
            self.used_bytes,
            self.capacity_bytes,
            self.utilisation() * 100.0,
            self.allocations,
            self.padding_bytes,
            self.failed_allocations,
        )
    }
}
