// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Tensor element kinds.

use std::fmt;

/// Enumerates the element kinds an inference engine can declare for a tensor.
///
/// Only [`DType::F32`] and [`DType::I8`] are understood by the tensor adapter;
/// the remaining kinds exist so that an engine can report them faithfully and
/// the adapter can reject them with a typed error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    /// 32-bit IEEE 754 floating point.
    F32,
    /// 8-bit signed integer, affine-quantized.
    I8,
    /// 8-bit unsigned integer.
    U8,
    /// 16-bit signed integer.
    I16,
    /// 32-bit signed integer.
    I32,
    /// 16-bit IEEE 754 floating point.
    F16,
}

impl DType {
    /// Returns the size of a single element in bytes.
    pub fn size_bytes(self) -> usize {
        match self {
            DType::F32 | DType::I32 => 4,
            DType::I16 | DType::F16 => 2,
            DType::I8 | DType::U8 => 1,
        }
    }

    /// Returns a human-readable label for this data type.
    pub fn as_str(self) -> &'static str {
        match self {
            DType::F32 => "f32",
            DType::I8 => "i8",
            DType::U8 => "u8",
            DType::I16 => "i16",
            DType::I32 => "i32",
            DType::F16 => "f16",
        }
    }

    /// Returns the wire code used by the model blob format.
    pub fn code(self) -> u8 {
        match self {
            DType::F32 => 1,
            DType::I8 => 2,
            DType::U8 => 3,
            DType::I16 => 4,
            DType::I32 => 5,
            DType::F16 => 6,
        }
    }

    /// Decodes a wire code, returning `None` for unknown codes.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(DType::F32),
            2 => Some(DType::I8),
            3 => Some(DType::U8),
            4 => Some(DType::I16),
            5 => Some(DType::I32),
            6 => Some(DType::F16),
            _ => None,
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
