// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Operator definitions.
//!
//! An [`OperatorDef`] describes one node of the model's linear chain. Weight
//! and bias data are **not** copied: they are [`PackedF32`] views borrowed
//! straight from the blob, so a model's parameters never occupy the arena.

use tensor_core::{Activation, PackedF32};

/// The kind of computation an operator performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OpKind {
    /// Dense layer with optional fused activation.
    FullyConnected,
    /// Element-wise `max(x, 0)`.
    Relu,
    /// Element-wise hyperbolic tangent.
    Tanh,
    /// Element-wise logistic sigmoid.
    Logistic,
}

impl OpKind {
    /// Every operator kind this build understands.
    pub const ALL: [OpKind; 4] = [
        OpKind::FullyConnected,
        OpKind::Relu,
        OpKind::Tanh,
        OpKind::Logistic,
    ];

    /// Returns the opcode stored in the blob.
    pub fn code(self) -> u8 {
        match self {
            OpKind::FullyConnected => 1,
            OpKind::Relu => 2,
            OpKind::Tanh => 3,
            OpKind::Logistic => 4,
        }
    }

    /// Decodes an opcode.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(OpKind::FullyConnected),
            2 => Some(OpKind::Relu),
            3 => Some(OpKind::Tanh),
            4 => Some(OpKind::Logistic),
            _ => None,
        }
    }

    /// Returns the canonical operator name.
    pub fn as_str(self) -> &'static str {
        match self {
            OpKind::FullyConnected => "FULLY_CONNECTED",
            OpKind::Relu => "RELU",
            OpKind::Tanh => "TANH",
            OpKind::Logistic => "LOGISTIC",
        }
    }

    /// Returns `true` for operators that map each element independently and
    /// therefore keep their width.
    pub fn is_elementwise(self) -> bool {
        !matches!(self, OpKind::FullyConnected)
    }
}

impl std::fmt::Display for OpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single operator in execution order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperatorDef<'m> {
    /// Position in the operator table (0-based).
    pub index: usize,
    /// The computation this operator performs.
    pub kind: OpKind,
    /// Activation fused onto the output. Only meaningful for
    /// [`OpKind::FullyConnected`].
    pub activation: Activation,
    /// Input width in elements.
    pub in_features: usize,
    /// Output width in elements.
    pub out_features: usize,
    /// Row-major `[out][in]` weights. Empty for element-wise operators.
    pub weights: PackedF32<'m>,
    /// One bias per output. Empty for element-wise operators.
    pub bias: PackedF32<'m>,
}

impl OperatorDef<'_> {
    /// Bytes of parameters this operator reads from the blob.
    pub fn weight_bytes(&self) -> usize {
        self.weights.as_bytes().len() + self.bias.as_bytes().len()
    }

    /// Bytes of `f32` activations this operator writes.
    pub fn activation_bytes(&self) -> usize {
        self.out_features * std::mem::size_of::<f32>()
    }

    /// Returns a concise summary string for display.
    pub fn summary(&self) -> String {
        let fused = match self.activation {
            Activation::None => String::new(),
            Activation::Relu => " + relu".to_string(),
        };
        format!(
            "[{}] {}{} {} -> {}, weights: {:.1} KB",
            self.index,
            self.kind,
            fused,
            self.in_features,
            self.out_features,
            self.weight_bytes() as f64 / 1024.0,
        )
    }
}
