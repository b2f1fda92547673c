// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Model graph: the compiled network as a linear chain of operators.
//!
//! # Type-State Pattern
//!
//! The graph transitions through states enforced at compile time:
//!
//! ```text
//! ModelGraph<Loaded>     — operator table decoded, not yet checked.
//!       │  .validate()
//!       ▼
//! ModelGraph<Validated>  — widths verified end to end, ready for an engine.
//! ```
//!
//! An engine only accepts a `ModelGraph<Validated>`, so it never sizes an
//! arena for a chain whose widths do not connect. The marker types are
//! zero-sized; the transition costs nothing at runtime.

use crate::{ModelError, OperatorDef, TensorSpec};
use std::fmt;

// ── Type-state markers ─────────────────────────────────────────────

/// Marker: graph has been decoded but not validated.
#[derive(Debug, Clone)]
pub struct Loaded;

/// Marker: graph has been validated and is ready for an engine.
#[derive(Debug, Clone)]
pub struct Validated;

/// Sealed trait for graph states.
pub trait GraphState: fmt::Debug + Clone {}
impl GraphState for Loaded {}
impl GraphState for Validated {}

// ── ModelGraph ─────────────────────────────────────────────────────

/// The model's operators in execution order, plus its input and output specs.
#[derive(Debug, Clone)]
pub struct ModelGraph<'m, S: GraphState = Loaded> {
    input: TensorSpec,
    output: TensorSpec,
    operators: Vec<OperatorDef<'m>>,
    trailing_bytes: usize,
    _state: std::marker::PhantomData<S>,
}

// ── Loaded state ───────────────────────────────────────────────────

impl<'m> ModelGraph<'m, Loaded> {
    /// Creates a new graph in the `Loaded` state.
    pub fn new(
        input: TensorSpec,
        output: TensorSpec,
        operators: Vec<OperatorDef<'m>>,
        trailing_bytes: usize,
    ) -> Self {
        Self {
            input,
            output,
            operators,
            trailing_bytes,
            _state: std::marker::PhantomData,
        }
    }

    /// Validates the graph and transitions to the `Validated` state.
    ///
    /// # Checks
    /// - The blob has no bytes after the last operator.
    /// - The graph is non-empty and no operator has a zero width.
    /// - The first operator consumes exactly the input spec's elements.
    /// - Each operator's output width equals the next operator's input width.
    /// - Element-wise operators keep their width.
    /// - The last operator produces exactly the output spec's elements.
    pub fn validate(self) -> Result<ModelGraph<'m, Validated>, ModelError> {
        if self.trailing_bytes != 0 {
            return Err(ModelError::TrailingBytes {
                count: self.trailing_bytes,
            });
        }

        let (first, last) = match (self.operators.first(), self.operators.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                return Err(ModelError::InvalidGraph(
                    "model graph contains no operators".into(),
                ))
            }
        };

        for op in &self.operators {
            if op.in_features == 0 || op.out_features == 0 {
                return Err(ModelError::InvalidOperator {
                    index: op.index,
                    detail: "zero-width tensor".into(),
                });
            }
            if op.kind.is_elementwise() && op.in_features != op.out_features {
                return Err(ModelError::InvalidOperator {
                    index: op.index,
                    detail: format!(
                        "{} must keep its width, got {} -> {}",
                        op.kind, op.in_features, op.out_features
                    ),
                });
            }
        }

        if first.in_features != self.input.elements {
            return Err(ModelError::InvalidGraph(format!(
                "first operator consumes {} elements but the input declares {}",
                first.in_features, self.input.elements
            )));
        }

        for pair in self.operators.windows(2) {
            if pair[0].out_features != pair[1].in_features {
                return Err(ModelError::InvalidGraph(format!(
                    "operator {} produces {} elements but operator {} consumes {}",
                    pair[0].index, pair[0].out_features, pair[1].index, pair[1].in_features
                )));
            }
        }

        if last.out_features != self.output.elements {
            return Err(ModelError::InvalidGraph(format!(
                "last operator produces {} elements but the output declares {}",
                last.out_features, self.output.elements
            )));
        }

        tracing::debug!(operators = self.operators.len(), "model graph validated");

        Ok(ModelGraph {
            input: self.input,
            output: self.output,
            operators: self.operators,
            trailing_bytes: 0,
            _state: std::marker::PhantomData,
        })
    }
}

// ── Validated state ────────────────────────────────────────────────

impl<'m> ModelGraph<'m, Validated> {
    /// Returns the total number of operators.
    pub fn num_operators(&self) -> usize {
        self.operators.len()
    }

    /// Returns the total parameter bytes borrowed from the blob.
    pub fn total_weight_bytes(&self) -> usize {
        self.operators.iter().map(|op| op.weight_bytes()).sum()
    }

    /// Returns the bytes of `f32` activations the whole chain writes.
    pub fn total_activation_bytes(&self) -> usize {
        self.operators.iter().map(|op| op.activation_bytes()).sum()
    }

    /// Returns an iterator over the operators in execution order.
    pub fn iter_operators(&self) -> impl Iterator<Item = &OperatorDef<'m>> {
        self.operators.iter()
    }

    /// Consumes the graph and returns its operators.
    pub fn into_operators(self) -> Vec<OperatorDef<'m>> {
        self.operators
    }

    /// Returns a summary string describing the model.
    pub fn summary(&self) -> String {
        format!(
            "Model: {} operators, {} -> {} elements, {:.1} KB weights, {:.1} KB activations",
            self.num_operators(),
            self.input.elements,
            self.output.elements,
            self.total_weight_bytes() as f64 / 1024.0,
            self.total_activation_bytes() as f64 / 1024.0,
        )
    }
}

// ── Shared implementations ─────────────────────────────────────────

impl<'m, S: GraphState> ModelGraph<'m, S> {
    /// Declared graph input.
    pub fn input(&self) -> TensorSpec {
        self.input
    }

    /// Declared graph output.
    pub fn output(&self) -> TensorSpec {
        self.output
    }

    /// Operators in execution order.
    pub fn operators(&self) -> &[OperatorDef<'m>] {
        &self.operators
    }
}

impl<S: GraphState> fmt::Display for ModelGraph<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "ModelGraph ({} operators, input {} x {}, output {} x {}):",
            self.operators.len(),
            self.input.elements,
            self.input.dtype,
            self.output.elements,
            self.output.dtype,
        )?;
        for op in &self.operators {
            writeln!(f, "  {}", op.summary())?;
        }
        Ok(())
    }
}
