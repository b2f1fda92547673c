// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Per-session inference metrics.
//!
//! [`SessionMetrics`] counts calls and times the engine's forward pass. The
//! host loop prints its summary; timings are only recorded when profiling
//! is enabled.

use std::time::Duration;

/// Counters and timings for one session.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct SessionMetrics {
    /// Calls that returned a value.
    pub successful_calls: u64,
    /// Calls that returned an error.
    pub failed_calls: u64,
    /// Duration of the most recent successful `invoke`.
    pub last_invoke_duration: Option<Duration>,
    /// Sum of all recorded `invoke` durations.
    pub total_invoke_duration: Duration,
    /// Number of `invoke` durations recorded.
    pub timed_calls: u64,
}

impl SessionMetrics {
    /// Creates an empty metrics container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a successful call, with its invoke time if profiled.
    pub fn record_success(&mut self, invoke: Option<Duration>) {
        self.successful_calls += 1;
        if let Some(d) = invoke {
            self.last_invoke_duration = Some(d);
            self.total_invoke_duration += d;
            self.timed_calls += 1;
        }
    }

    /// Records a failed call.
    pub fn record_failure(&mut self) {
        self.failed_calls += 1;
    }

    /// Total calls, successful or not.
    pub fn total_calls(&self) -> u64 {
        self.successful_calls + self.failed_calls
    }

    /// Mean invoke time over the profiled calls.
    pub fn mean_invoke_duration(&self) -> Option<Duration> {
        if self.timed_calls == 0 {
            return None;
        }
        u32::try_from(self.timed_calls)
            .ok()
            .map(|n| self.total_invoke_duration / n)
    }

    /// Returns a human-readable summary suitable for CLI output.
    pub fn summary(&self) -> String {
        let ms = |d: Option<Duration>| d.map_or(0.0, |d| d.as_secs_f64() * 1000.0);
        format!(
            "Inference: {} calls ({} ok, {} failed), last invoke {:.3}ms, mean {:.3}ms",
            self.total_calls(),
            self.successful_calls,
            self.failed_calls,
            ms(self.last_invoke_duration),
            ms(self.mean_invoke_duration()),
        )
    }
}
