// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Fully connected (dense) layer.

use crate::{Activation, PackedF32, TensorError};

/// Computes `output = activation(weights · input + bias)`.
///
/// `weights` is stored row-major as `[out][in]`, so each output element is a
/// dot product over one contiguous row. `bias` may be empty, in which case
/// no bias is added.
///
/// # Errors
/// Returns [`TensorError::LengthMismatch`] if `weights` is not
/// `output.len() * input.len()` elements long, or if a non-empty `bias` is
/// not `output.len()` elements long.
pub fn fully_connected(
    input: &[f32],
    weights: PackedF32<'_>,
    bias: PackedF32<'_>,
    activation: Activation,
    output: &mut [f32],
) -> Result<(), TensorError> {
    let in_features = input.len();
    let out_features = output.len();

    if weights.len() != in_features * out_features {
        return Err(TensorError::LengthMismatch {
            op: "fully_connected",
            what: "weights",
            expected: in_features * out_features,
            actual: weights.len(),
        });
    }
    if !bias.is_empty() && bias.len() != out_features {
        return Err(TensorError::LengthMismatch {
            op: "fully_connected",
            what: "bias",
            expected: out_features,
            actual: bias.len(),
        });
    }

    for (j, out) in output.iter_mut().enumerate() {
        let mut acc = bias.get(j).unwrap_or(0.0);
        if let Some(row) = weights.slice(j * in_features, in_features) {
            for (w, &x) in row.iter().zip(input) {
                acc += w * x;
            }
        }
        *out = activation.apply(acc);
    }

    Ok(())
}
