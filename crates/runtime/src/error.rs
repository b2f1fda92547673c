// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the inference runtime.
//!
//! [`BackendError`] is what an engine reports about itself. [`InferenceError`]
//! is what the session reports to its caller: the engine's errors are wrapped
//! into the variant that says *which step* failed.

use crate::TensorRole;
use model_ir::{ModelError, OpKind};
use scratch_arena::MemoryError;
use tensor_core::{DType, TensorError};

/// Errors reported by an [`InferenceBackend`](crate::InferenceBackend).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BackendError {
    /// The scratch arena could not satisfy a request.
    #[error("scratch arena: {0}")]
    Arena(#[from] MemoryError),

    /// The resolver has no kernel for an operator the model uses.
    #[error("no kernel registered for operator {op}")]
    UnresolvedOperator { op: OpKind },

    /// A tensor is declared with an element type the backend cannot run.
    #[error("tensor element type {dtype} is not supported by this backend")]
    UnsupportedTensorType { dtype: DType },

    /// `invoke` or a tensor accessor was used before `allocate_tensors`.
    #[error("tensors have not been allocated")]
    NotAllocated,

    /// A kernel rejected its operands.
    #[error("operator {index} ({op}) failed: {source}")]
    Kernel {
        index: usize,
        op: OpKind,
        #[source]
        source: TensorError,
    },

    /// The model blob was rejected while building the engine.
    #[error("model rejected: {0}")]
    Model(#[from] ModelError),

    /// Any other backend-specific failure.
    #[error("{0}")]
    Failed(String),
}

/// Errors returned by [`InferenceSession`](crate::InferenceSession).
///
/// The first seven variants are the session's core contract. The remaining
/// ones cover malformed blobs, engine construction and configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InferenceError {
    /// The blob was compiled for another schema. Fatal to initialization.
    #[error("model schema version {found} does not match supported version {expected}")]
    SchemaMismatch { found: u32, expected: u32 },

    /// The arena could not hold the model's tensors. Fatal to initialization.
    #[error("tensor allocation failed: {source}")]
    ArenaAllocationFailed {
        #[source]
        source: BackendError,
    },

    /// Inference was requested before the session reached `Ready`.
    #[error("inference session is not initialized")]
    NotInitialized,

    /// The feature vector does not have the expected number of elements.
    #[error("feature vector has {actual} elements, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    /// A tensor's declared byte size disagrees with its element count.
    #[error("{role} tensor declares {actual} bytes, expected {expected} for {dtype}")]
    SizeMismatch {
        role: TensorRole,
        dtype: DType,
        expected: usize,
        actual: usize,
    },

    /// A tensor is neither `f32` nor affine int8.
    #[error("{role} tensor element type {dtype} is not supported")]
    UnsupportedType { role: TensorRole, dtype: DType },

    /// The engine's forward pass failed. No output was read.
    #[error("inference invoke failed: {0}")]
    InvokeFailed(#[source] BackendError),

    /// The blob is malformed in a way other than its schema version.
    #[error("invalid model: {0}")]
    InvalidModel(#[source] ModelError),

    /// The engine could not be constructed over the model.
    #[error("engine construction failed: {0}")]
    EngineConstruction(#[source] BackendError),

    /// The engine exposes no tensor at the requested index.
    #[error("engine exposes no {role} tensor at index {index}")]
    MissingTensor { role: TensorRole, index: usize },

    /// Configuration could not be read or is inconsistent.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<ModelError> for InferenceError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::SchemaMismatch { found, expected } => {
                InferenceError::SchemaMismatch { found, expected }
            }
            other => InferenceError::InvalidModel(other),
        }
    }
}
