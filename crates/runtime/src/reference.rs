// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Host reference backend.
//!
//! [`ReferenceEngine`] runs dense regression graphs on the host so the
//! session lifecycle can be exercised without a device. Every tensor lives
//! in its [`ScratchArena`]:
//!
//! ```text
//! ┌────────┬──────────────┬───────┬───────┬─────┬────────┐
//! │ input  │ f32 staging  │ act 0 │ act 1 │ ... │ output │
//! │ (spec) │ (int8 input) │  f32  │  f32  │     │ (spec) │
//! └────────┴──────────────┴───────┴───────┴─────┴────────┘
//! ```
//!
//! Weights are never copied: kernels read them from the blob. `invoke`
//! performs no heap allocation.

use crate::{BackendError, InferenceBackend, Kernel, OpResolver};
use model_ir::{graph::Validated, CompiledModel, ModelGraph, OperatorDef, TensorSpec};
use scratch_arena::{as_f32, as_f32_mut, ArenaStats, Region, ScratchArena, ARENA_ALIGNMENT};
use tensor_core::{dequantize_slice, quantize_slice, TensorDescriptor, TensorEncoding};

/// An operator with its resolved kernel.
#[derive(Clone, Copy)]
struct Step<'m> {
    op: OperatorDef<'m>,
    kernel: Kernel,
}

/// Where each tensor lives in the arena.
#[derive(Debug)]
struct Layout {
    input: Region,
    staging: Option<Region>,
    activations: Vec<Region>,
    output: Region,
}

/// A host engine for chains of dense and element-wise operators.
pub struct ReferenceEngine<'m> {
    model: CompiledModel<'m>,
    steps: Vec<Step<'m>>,
    arena: ScratchArena,
    layout: Option<Layout>,
}

impl<'m> ReferenceEngine<'m> {
    /// Validates the model's graph and resolves a kernel for every operator.
    ///
    /// Tensors are not laid out until [`allocate_tensors`].
    ///
    /// # Errors
    /// - [`BackendError::Model`] if the operator table is malformed.
    /// - [`BackendError::UnresolvedOperator`] if `resolver` lacks a kernel.
    ///
    /// [`allocate_tensors`]: InferenceBackend::allocate_tensors
    pub fn new(
        model: CompiledModel<'m>,
        resolver: &dyn OpResolver,
        arena: ScratchArena,
    ) -> Result<Self, BackendError> {
        let graph = model.graph()?.validate()?;
        tracing::debug!("{}", graph.summary());

        let steps = graph
            .into_operators()
            .into_iter()
            .map(|op| {
                resolver
                    .find(op.kind)
                    .map(|kernel| Step { op, kernel })
                    .ok_or(BackendError::UnresolvedOperator { op: op.kind })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            model,
            steps,
            arena,
            layout: None,
        })
    }

    /// Upper bound on the arena bytes [`allocate_tensors`] needs for `graph`,
    /// including worst-case alignment padding.
    ///
    /// [`allocate_tensors`]: InferenceBackend::allocate_tensors
    pub fn arena_requirement(graph: &ModelGraph<'_, Validated>) -> usize {
        let aligned = |len: usize| len.div_ceil(ARENA_ALIGNMENT) * ARENA_ALIGNMENT;
        let input = graph.input();
        let staging = if needs_staging(&input) {
            aligned(input.elements * 4)
        } else {
            0
        };
        let activations: usize = graph
            .iter_operators()
            .map(|op| aligned(op.activation_bytes()))
            .sum();

        aligned(input.byte_len()) + staging + activations + aligned(graph.output().byte_len())
            + (ARENA_ALIGNMENT - 1)
    }

    /// The model this engine runs.
    pub fn model(&self) -> &CompiledModel<'m> {
        &self.model
    }

    /// Number of operators.
    pub fn num_operators(&self) -> usize {
        self.steps.len()
    }

    /// Read-only view of input tensor 0, once allocated.
    pub fn input_data(&self, index: usize) -> Option<&[u8]> {
        let layout = self.layout.as_ref().filter(|_| index == 0)?;
        self.arena.slice(layout.input).ok()
    }

    /// Arena usage statistics.
    pub fn arena_stats(&self) -> ArenaStats {
        self.arena.stats()
    }

    fn forward(&mut self) -> Result<(), BackendError> {
        let layout = self.layout.as_ref().ok_or(BackendError::NotAllocated)?;
        let input = self.model.input();
        let output = self.model.output();

        // Graph input as f32.
        let first = match (input.descriptor().encoding(), layout.staging) {
            (TensorEncoding::Float32, _) => layout.input,
            (TensorEncoding::AffineInt8(params), Some(staging)) => {
                let (src, dst) = self.arena.pair_mut(layout.input, staging)?;
                dequantize_slice(bytemuck::cast_slice(src), params, as_f32_mut(dst)?);
                staging
            }
            (TensorEncoding::AffineInt8(_), None) => return Err(BackendError::NotAllocated),
            (TensorEncoding::Unsupported(dtype), _) => {
                return Err(BackendError::UnsupportedTensorType { dtype })
            }
        };

        let mut src_region = first;
        for (step, &dst_region) in self.steps.iter().zip(&layout.activations) {
            let (src, dst) = self.arena.pair_mut(src_region, dst_region)?;
            (step.kernel)(&step.op, as_f32(src)?, as_f32_mut(dst)?).map_err(|source| {
                BackendError::Kernel {
                    index: step.op.index,
                    op: step.op.kind,
                    source,
                }
            })?;
            src_region = dst_region;
        }

        // Last activation into the output tensor.
        let (src, dst) = self.arena.pair_mut(src_region, layout.output)?;
        let last = as_f32(src)?;
        match output.descriptor().encoding() {
            TensorEncoding::Float32 => {
                for (d, s) in as_f32_mut(dst)?.iter_mut().zip(last) {
                    *d = *s;
                }
            }
            TensorEncoding::AffineInt8(params) => {
                quantize_slice(last, params, bytemuck::cast_slice_mut(dst));
            }
            TensorEncoding::Unsupported(dtype) => {
                return Err(BackendError::UnsupportedTensorType { dtype })
            }
        }

        Ok(())
    }
}

fn needs_staging(spec: &TensorSpec) -> bool {
    matches!(spec.descriptor().encoding(), TensorEncoding::AffineInt8(_))
}

impl InferenceBackend for ReferenceEngine<'_> {
    fn allocate_tensors(&mut self) -> Result<(), BackendError> {
        if self.layout.is_some() {
            return Ok(());
        }

        let input = self.model.input();
        let input_region = self.arena.alloc(input.byte_len())?;
        let staging = if needs_staging(&input) {
            Some(self.arena.alloc(input.elements * 4)?)
        } else {
            None
        };

        let mut activations = Vec::with_capacity(self.steps.len());
        for step in &self.steps {
            activations.push(self.arena.alloc(step.op.activation_bytes())?);
        }

        let output = self.arena.alloc(self.model.output().byte_len())?;

        tracing::debug!(
            operators = self.steps.len(),
            used_bytes = self.arena.used_bytes(),
            capacity = self.arena.capacity(),
            "reference engine tensors allocated"
        );

        self.layout = Some(Layout {
            input: input_region,
            staging,
            activations,
            output,
        });
        Ok(())
    }

    fn input_descriptor(&self, index: usize) -> Option<TensorDescriptor> {
        self.layout.as_ref().filter(|_| index == 0)?;
        Some(self.model.input().descriptor())
    }

    fn output_descriptor(&self, index: usize) -> Option<TensorDescriptor> {
        self.layout.as_ref().filter(|_| index == 0)?;
        Some(self.model.output().descriptor())
    }

    fn input_data_mut(&mut self, index: usize) -> Option<&mut [u8]> {
        let region = self.layout.as_ref().filter(|_| index == 0)?.input;
        self.arena.slice_mut(region).ok()
    }

    fn output_data(&self, index: usize) -> Option<&[u8]> {
        let region = self.layout.as_ref().filter(|_| index == 0)?.output;
        self.arena.slice(region).ok()
    }

    fn invoke(&mut self) -> Result<(), BackendError> {
        self.forward()
    }

    fn arena_used_bytes(&self) -> Option<usize> {
        Some(self.arena.used_bytes())
    }
}

impl std::fmt::Debug for ReferenceEngine<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceEngine")
            .field("operators", &self.steps.len())
            .field("allocated", &self.layout.is_some())
            .field("arena", &self.arena)
            .finish()
    }
}
