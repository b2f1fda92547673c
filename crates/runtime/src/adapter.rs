// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Tensor adapter.
//!
//! Bridges a feature vector to whatever the engine declares for input 0,
//! and output 0 back to a scalar. The descriptor is read on every call and
//! dispatched on its [`TensorEncoding`]:
//!
//! | encoding        | input                              | output                    |
//! |-----------------|------------------------------------|---------------------------|
//! | `Float32`       | copy `L` values                    | element 0                 |
//! | `AffineInt8(p)` | `quantize(v, p)` into `L` bytes    | `dequantize(element 0, p)` |
//! | `Unsupported`   | `UnsupportedType`                  | `UnsupportedType`         |
//!
//! All checks happen before the first byte of engine memory is written.

use crate::{InferenceBackend, InferenceError};
use std::fmt;
use tensor_core::{DType, TensorEncoding};

/// Which side of the engine a tensor is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TensorRole {
    Input,
    Output,
}

impl fmt::Display for TensorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TensorRole::Input => "input",
            TensorRole::Output => "output",
        })
    }
}

/// Writes `input` into the engine's input tensor 0.
///
/// # Errors
/// - [`InferenceError::LengthMismatch`] if `input.len() != expected_len`.
/// - [`InferenceError::SizeMismatch`] if the tensor's byte size is not
///   `expected_len` elements of its declared kind.
/// - [`InferenceError::UnsupportedType`] for kinds other than `f32` and int8.
/// - [`InferenceError::MissingTensor`] if the engine has no input 0.
pub fn write_input<B>(backend: &mut B, expected_len: usize, input: &[f32]) -> Result<(), InferenceError>
where
    B: InferenceBackend + ?Sized,
{
    if input.len() != expected_len {
        return Err(InferenceError::LengthMismatch {
            expected: expected_len,
            actual: input.len(),
        });
    }

    let descriptor = backend
        .input_descriptor(0)
        .ok_or(InferenceError::MissingTensor {
            role: TensorRole::Input,
            index: 0,
        })?;

    let encoding = descriptor.encoding();
    let dtype = match encoding {
        TensorEncoding::Float32 => DType::F32,
        TensorEncoding::AffineInt8(_) => DType::I8,
        TensorEncoding::Unsupported(dtype) => {
            return Err(InferenceError::UnsupportedType {
                role: TensorRole::Input,
                dtype,
            })
        }
    };

    let expected_bytes = expected_len * dtype.size_bytes();
    if descriptor.byte_len != expected_bytes {
        return Err(InferenceError::SizeMismatch {
            role: TensorRole::Input,
            dtype,
            expected: expected_bytes,
            actual: descriptor.byte_len,
        });
    }

    let data = backend
        .input_data_mut(0)
        .ok_or(InferenceError::MissingTensor {
            role: TensorRole::Input,
            index: 0,
        })?;
    if data.len() != expected_bytes {
        return Err(InferenceError::SizeMismatch {
            role: TensorRole::Input,
            dtype,
            expected: expected_bytes,
            actual: data.len(),
        });
    }

    match encoding {
        TensorEncoding::Float32 => {
            for (dst, v) in data.chunks_exact_mut(4).zip(input) {
                dst.copy_from_slice(&v.to_ne_bytes());
            }
        }
        TensorEncoding::AffineInt8(params) => {
            for (dst, &v) in data.iter_mut().zip(input) {
                *dst = params.quantize(v) as u8;
            }
        }
        TensorEncoding::Unsupported(_) => {}
    }

    tracing::debug!(elements = expected_len, %dtype, "input adapted");
    Ok(())
}

/// Reads element 0 of the engine's output tensor 0 as a real value.
///
/// Only the first element is consumed; the adapter serves scalar-output
/// regression models.
pub fn read_output<B>(backend: &B) -> Result<f32, InferenceError>
where
    B: InferenceBackend + ?Sized,
{
    let missing = InferenceError::MissingTensor {
        role: TensorRole::Output,
        index: 0,
    };
    let descriptor = backend.output_descriptor(0).ok_or(missing.clone())?;
    let data = backend.output_data(0).ok_or(missing)?;

    let value = match descriptor.encoding() {
        TensorEncoding::Float32 => match *data {
            [a, b, c, d, ..] => f32::from_ne_bytes([a, b, c, d]),
            _ => {
                return Err(InferenceError::SizeMismatch {
                    role: TensorRole::Output,
                    dtype: DType::F32,
                    expected: DType::F32.size_bytes(),
                    actual: data.len(),
                })
            }
        },
        TensorEncoding::AffineInt8(params) => match data.first() {
            Some(&q) => params.dequantize(q as i8),
            None => {
                return Err(InferenceError::SizeMismatch {
                    role: TensorRole::Output,
                    dtype: DType::I8,
                    expected: DType::I8.size_bytes(),
                    actual: 0,
                })
            }
        },
        TensorEncoding::Unsupported(dtype) => {
            return Err(InferenceError::UnsupportedType {
                role: TensorRole::Output,
                dtype,
            })
        }
    };

    tracing::debug!(value, "output adapted");
    Ok(value)
}
