// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Operator resolution.
//!
//! A resolver maps each [`OpKind`] a model references to the kernel that
//! executes it. Engines resolve every operator once, at construction; an
//! operator with no kernel fails construction instead of failing later
//! inside `invoke`.
//!
//! - [`AllOpsResolver`] registers every built-in operator. It is what the
//!   session and the CLI use.
//! - [`MutableOpResolver`] starts empty and registers an explicit subset,
//!   trading coverage for a smaller kernel table.

use model_ir::{OpKind, OperatorDef};
use tensor_core::TensorError;

/// A kernel: reads `input`, writes `output`, using the operator's parameters.
pub type Kernel = fn(&OperatorDef<'_>, &[f32], &mut [f32]) -> Result<(), TensorError>;

/// Looks up the kernel for an operator kind.
pub trait OpResolver {
    /// Returns the kernel registered for `op`, if any.
    fn find(&self, op: OpKind) -> Option<Kernel>;
}

/// Returns the built-in kernel for `op`.
pub fn builtin_kernel(op: OpKind) -> Kernel {
    match op {
        OpKind::FullyConnected => fully_connected_kernel,
        OpKind::Relu => relu_kernel,
        OpKind::Tanh => tanh_kernel,
        OpKind::Logistic => logistic_kernel,
    }
}

fn fully_connected_kernel(
    op: &OperatorDef<'_>,
    input: &[f32],
    output: &mut [f32],
) -> Result<(), TensorError> {
    tensor_core::fully_connected(input, op.weights, op.bias, op.activation, output)
}

fn relu_kernel(_op: &OperatorDef<'_>, input: &[f32], output: &mut [f32]) -> Result<(), TensorError> {
    tensor_core::relu(input, output)
}

fn tanh_kernel(_op: &OperatorDef<'_>, input: &[f32], output: &mut [f32]) -> Result<(), TensorError> {
    tensor_core::tanh(input, output)
}

fn logistic_kernel(
    _op: &OperatorDef<'_>,
    input: &[f32],
    output: &mut [f32],
) -> Result<(), TensorError> {
    tensor_core::logistic(input, output)
}

// ── MutableOpResolver ──────────────────────────────────────────────

/// A resolver with an explicit set of registered operators.
///
/// # Example
/// ```
/// use model_ir::OpKind;
/// use runtime::{MutableOpResolver, OpResolver};
///
/// let mut resolver = MutableOpResolver::new();
/// resolver.add_builtin(OpKind::FullyConnected).add_builtin(OpKind::Relu);
/// assert!(resolver.find(OpKind::Relu).is_some());
/// assert!(resolver.find(OpKind::Tanh).is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MutableOpResolver {
    kernels: Vec<(OpKind, Kernel)>,
}

impl MutableOpResolver {
    /// Creates an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the built-in kernel for `op`.
    pub fn add_builtin(&mut self, op: OpKind) -> &mut Self {
        self.add(op, builtin_kernel(op))
    }

    /// Registers `kernel` for `op`, replacing any earlier registration.
    pub fn add(&mut self, op: OpKind, kernel: Kernel) -> &mut Self {
        match self.kernels.iter_mut().find(|(kind, _)| *kind == op) {
            Some(slot) => slot.1 = kernel,
            None => self.kernels.push((op, kernel)),
        }
        self
    }

    /// Operators with a registered kernel, in registration order.
    pub fn registered(&self) -> impl Iterator<Item = OpKind> + '_ {
        self.kernels.iter().map(|(kind, _)| *kind)
    }
}

impl OpResolver for MutableOpResolver {
    fn find(&self, op: OpKind) -> Option<Kernel> {
        self.kernels
            .iter()
            .find(|(kind, _)| *kind == op)
            .map(|(_, kernel)| *kernel)
    }
}

// ── AllOpsResolver ─────────────────────────────────────────────────

/// A resolver that knows every built-in operator.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllOpsResolver;

impl AllOpsResolver {
    /// Creates the resolver.
    pub fn new() -> Self {
        Self
    }
}

impl OpResolver for AllOpsResolver {
    fn find(&self, op: OpKind) -> Option<Kernel> {
        Some(builtin_kernel(op))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tensor_core::{Activation, PackedF32};

    fn elementwise(kind: OpKind) -> OperatorDef<'static> {
        OperatorDef {
            index: 0,
            kind,
            activation: Activation::None,
            in_features: 2,
            out_features: 2,
            weights: PackedF32::empty(),
            bias: PackedF32::empty(),
        }
    }

    #[test]
    fn test_all_ops_resolves_everything() {
        let resolver = AllOpsResolver::new();
        for kind in OpKind::ALL {
            assert!(resolver.find(kind).is_some(), "{kind} unresolved");
        }
    }

    #[test]
    fn test_mutable_resolver_subset() {
        let mut resolver = MutableOpResolver::new();
        assert!(resolver.find(OpKind::FullyConnected).is_none());

        resolver.add_builtin(OpKind::FullyConnected);
        assert!(resolver.find(OpKind::FullyConnected).is_some());
        assert!(resolver.find(OpKind::Logistic).is_none());
        assert_eq!(resolver.registered().collect::<Vec<_>>(), vec![OpKind::FullyConnected]);
    }

    #[test]
    fn test_add_replaces_kernel() {
        fn zero(_: &OperatorDef<'_>, _: &[f32], out: &mut [f32]) -> Result<(), TensorError> {
            out.fill(0.0);
            Ok(())
        }

        let mut resolver = MutableOpResolver::new();
        resolver.add_builtin(OpKind::Relu).add(OpKind::Relu, zero);
        assert_eq!(resolver.registered().count(), 1);

        let kernel = resolver.find(OpKind::Relu).unwrap();
        let mut out = [9.0f32; 2];
        kernel(&elementwise(OpKind::Relu), &[3.0, 4.0], &mut out).unwrap();
        assert_eq!(out, [0.0, 0.0]);
    }

    #[test]
    fn test_builtin_kernels_run() {
        let mut out = [0.0f32; 2];
        builtin_kernel(OpKind::Relu)(&elementwise(OpKind::Relu), &[-1.0, 1.0], &mut out).unwrap();
        assert_eq!(out, [0.0, 1.0]);

        builtin_kernel(OpKind::Logistic)(&elementwise(OpKind::Logistic), &[0.0, 0.0], &mut out)
            .unwrap();
        assert_eq!(out, [0.5, 0.5]);
    }

    #[test]
    fn test_fully_connected_kernel_uses_operator_params() {
        let w: Vec<u8> = [1.0f32, 1.0].iter().flat_map(|v| v.to_le_bytes()).collect();
        let b: Vec<u8> = 0.5f32.to_le_bytes().to_vec();
        let op = OperatorDef {
            index: 0,
            kind: OpKind::FullyConnected,
            activation: Activation::None,
            in_features: 2,
            out_features: 1,
            weights: PackedF32::new(&w).unwrap(),
            bias: PackedF32::new(&b).unwrap(),
        };
        let mut out = [0.0f32; 1];
        builtin_kernel(OpKind::FullyConnected)(&op, &[2.0, 3.0], &mut out).unwrap();
        assert_eq!(out, [5.5]);
    }
}
