// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Tensor metadata as reported by an inference engine.

use crate::{DType, QuantParams};

/// Read-only metadata for one engine tensor.
///
/// Produced by the engine after tensor allocation. `byte_len` is what the
/// engine actually reserved, which is what the adapter checks against.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TensorDescriptor {
    /// Declared element kind.
    pub dtype: DType,
    /// Size of the tensor's backing memory in bytes.
    pub byte_len: usize,
    /// Quantization parameters. Meaningful only for [`DType::I8`].
    pub quant: QuantParams,
}

/// The representation a tensor uses, as far as the adapter is concerned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TensorEncoding {
    /// Native `f32` elements.
    Float32,
    /// Affine int8 elements with the tensor's own parameters.
    AffineInt8(QuantParams),
    /// Anything else. Carries the declared kind for error reporting.
    Unsupported(DType),
}

impl TensorDescriptor {
    /// Creates a descriptor for an `f32` tensor of `elements` elements.
    pub fn float32(elements: usize) -> Self {
        Self {
            dtype: DType::F32,
            byte_len: elements * DType::F32.size_bytes(),
            quant: QuantParams::default(),
        }
    }

    /// Creates a descriptor for an int8 tensor of `elements` elements.
    pub fn int8(elements: usize, quant: QuantParams) -> Self {
        Self {
            dtype: DType::I8,
            byte_len: elements * DType::I8.size_bytes(),
            quant,
        }
    }

    /// Classifies the descriptor into the encoding the adapter dispatches on.
    pub fn encoding(&self) -> TensorEncoding {
        match self.dtype {
            DType::F32 => TensorEncoding::Float32,
            DType::I8 => TensorEncoding::AffineInt8(self.quant),
            other => TensorEncoding::Unsupported(other),
        }
    }

    /// Number of whole elements that fit in `byte_len`.
    pub fn num_elements(&self) -> usize {
        self.byte_len / self.dtype.size_bytes()
    }
}
