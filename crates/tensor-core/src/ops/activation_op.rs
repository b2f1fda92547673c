// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Element-wise activations.

use crate::TensorError;

/// Activation fused into the tail of another kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    /// Identity.
    #[default]
    None,
    /// `max(x, 0)`.
    Relu,
}

impl Activation {
    /// Applies the activation to a single value.
    #[inline(always)]
    pub fn apply(self, x: f32) -> f32 {
        match self {
            Activation::None => x,
            Activation::Relu => x.max(0.0),
        }
    }

    /// Returns the wire code used by the model blob format.
    pub fn code(self) -> u8 {
        match self {
            Activation::None => 0,
            Activation::Relu => 1,
        }
    }

    /// Decodes a wire code, returning `None` for unknown codes.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Activation::None),
            1 => Some(Activation::Relu),
            _ => None,
        }
    }
}

/// Applies `max(x, 0)` element-wise.
pub fn relu(input: &[f32], output: &mut [f32]) -> Result<(), TensorError> {
    map("relu", input, output, |x| x.max(0.0))
}

/// Applies the hyperbolic tangent element-wise.
pub fn tanh(input: &[f32], output: &mut [f32]) -> Result<(), TensorError> {
    map("tanh", input, output, f32::tanh)
}

/// Applies the logistic sigmoid `1 / (1 + e^-x)` element-wise.
pub fn logistic(input: &[f32], output: &mut [f32]) -> Result<(), TensorError> {
    map("logistic", input, output, |x| 1.0 / (1.0 + (-x).exp()))
}

#[inline(always)]
fn map(
    op: &'static str,
    input: &[f32],
    output: &mut [f32],
    f: impl Fn(f32) -> f32,
) -> Result<(), TensorError> {
    if input.len() != output.len() {
        return Err(TensorError::LengthMismatch {
            op,
            what: "output",
            expected: input.len(),
            actual: output.len(),
        });
    }
    for (d, &x) in output.iter_mut().zip(input) {
        *d = f(x);
    }
    Ok(())
}
