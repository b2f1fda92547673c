// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # runtime
//!
//! The boundary between a feature vector and a compiled model.
//!
//! The runtime takes:
//! - A model blob, parsed by `model-ir`.
//! - A fixed-capacity `ScratchArena` from `scratch-arena`.
//! - An [`OpResolver`] and an engine factory.
//!
//! and drives one engine through a one-shot initialization followed by any
//! number of single-input, single-output inference calls.
//!
//! # Lifecycle
//! ```text
//! Uninitialized → ModelLoaded → EngineAllocated → Ready
//!        └──────────────┴──────────────┴─────────→ Failed
//! ```
//! Only a `Ready` session runs inference; everything else yields
//! [`InferenceError::NotInitialized`].
//!
//! # Tensor adaptation
//! Input 0 and output 0 are adapted on every call according to the
//! engine's [`TensorDescriptor`](tensor_core::TensorDescriptor): `f32`
//! tensors are copied, affine int8 tensors go through the quantization
//! codec with the tensor's own parameters.

pub mod adapter;
mod backend;
mod config;
mod error;
mod lifecycle;
mod metrics;
mod reference;
mod resolver;
mod session;

pub use adapter::TensorRole;
pub use backend::InferenceBackend;
pub use config::RuntimeConfig;
pub use error::{BackendError, InferenceError};
pub use lifecycle::LifecycleState;
pub use metrics::SessionMetrics;
pub use reference::ReferenceEngine;
pub use resolver::{builtin_kernel, AllOpsResolver, Kernel, MutableOpResolver, OpResolver};
pub use session::InferenceSession;

/// A session over the host reference backend.
pub type ReferenceSession<'m> = InferenceSession<ReferenceEngine<'m>>;
