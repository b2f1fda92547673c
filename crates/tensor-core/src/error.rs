// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for tensor kernels.

/// Errors that can occur while running a float kernel.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TensorError {
    /// A buffer length does not match the dimensions the kernel was given.
    #[error("length mismatch in {op} ({what}): expected {expected} elements, got {actual}")]
    LengthMismatch {
        op: &'static str,
        what: &'static str,
        expected: usize,
        actual: usize,
    },
}
