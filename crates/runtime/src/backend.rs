// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The seam between the session and an inference engine.
//!
//! The session never executes a graph itself. It drives an engine through
//! the fixed set of calls in [`InferenceBackend`]:
//!
//! ```text
//! factory(model, resolver, arena)   once
//!     │
//!     ▼
//! allocate_tensors()                once
//!     │
//!     ▼
//! input_data_mut(0) → invoke() → output_data(0)   per call
//! ```
//!
//! An engine is built by a factory closure with the signature
//! `FnOnce(CompiledModel<'m>, &dyn OpResolver, ScratchArena) -> Result<B, BackendError>`.
//! The factory takes the arena by value: from then on the engine owns it
//! exclusively.

use crate::BackendError;
use tensor_core::TensorDescriptor;

/// An inference engine the session can drive.
///
/// Tensor indices are per direction: `input_descriptor(0)` is the first
/// graph input. Accessors return `None` for indices the engine does not
/// expose, or before tensors are allocated.
pub trait InferenceBackend {
    /// Lays out every tensor inside the arena. Called exactly once.
    fn allocate_tensors(&mut self) -> Result<(), BackendError>;

    /// Metadata of an input tensor.
    fn input_descriptor(&self, index: usize) -> Option<TensorDescriptor>;

    /// Metadata of an output tensor.
    fn output_descriptor(&self, index: usize) -> Option<TensorDescriptor>;

    /// Writable backing memory of an input tensor.
    fn input_data_mut(&mut self, index: usize) -> Option<&mut [u8]>;

    /// Backing memory of an output tensor.
    fn output_data(&self, index: usize) -> Option<&[u8]>;

    /// Runs one forward pass.
    fn invoke(&mut self) -> Result<(), BackendError>;

    /// Arena bytes in use, if the engine reports it.
    fn arena_used_bytes(&self) -> Option<usize> {
        None
    }
}
