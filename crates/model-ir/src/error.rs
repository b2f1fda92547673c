// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for blob parsing and graph validation.

/// Errors that can occur when decoding or validating a model blob.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// The blob ended before a field could be read.
    #[error("model blob truncated: needed {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },

    /// The blob does not start with the `MIRM` magic.
    #[error("bad magic {found:02x?}, expected \"MIRM\"")]
    BadMagic { found: [u8; 4] },

    /// The blob was compiled against a different schema.
    #[error("model schema version {found} does not match supported version {expected}")]
    SchemaMismatch { found: u32, expected: u32 },

    /// A tensor spec carries an element kind code this build does not know.
    #[error("unknown element type code {0}")]
    UnknownDType(u8),

    /// An operator carries an unknown opcode.
    #[error("operator {index}: unknown opcode {code}")]
    UnknownOpCode { index: usize, code: u8 },

    /// An operator carries an unknown fused-activation code.
    #[error("operator {index}: unknown activation code {code}")]
    UnknownActivation { index: usize, code: u8 },

    /// An operator definition is inconsistent on its own.
    #[error("operator {index}: {detail}")]
    InvalidOperator { index: usize, detail: String },

    /// The operator chain does not connect the input spec to the output spec.
    #[error("invalid model graph: {0}")]
    InvalidGraph(String),

    /// Bytes left over after the last operator.
    #[error("{count} trailing bytes after operator table")]
    TrailingBytes { count: usize },

    /// A count or width does not fit the format's `u32` field.
    #[error("{field} = {value} does not fit in a u32 field")]
    FieldOverflow { field: &'static str, value: usize },
}
