// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # tensor-core
//!
//! Numeric building blocks shared by every layer of the micro-infer stack.
//!
//! This crate provides:
//! - [`DType`] — the element kinds an engine may declare for a tensor.
//! - [`QuantParams`] with [`quantize`] / [`dequantize`] — the per-tensor
//!   affine int8 codec.
//! - [`TensorDescriptor`] and [`TensorEncoding`] — read-only tensor metadata
//!   as reported by an inference engine, plus the tagged view the adapter
//!   dispatches on.
//! - [`PackedF32`] — a zero-copy reader over little-endian `f32` data that
//!   lives inside a model blob.
//! - Float kernels ([`fully_connected`], [`relu`], [`tanh`], [`logistic`])
//!   used by the host reference backend.
//!
//! # Design Goals
//! - No heap allocation: every function works on caller-owned slices.
//! - The codec never fails; saturation replaces error signalling.
//! - Clean error types via `thiserror` for the kernels that can fail.

mod descriptor;
mod dtype;
mod error;
mod ops;
mod packed;
mod quant;

pub use descriptor::{TensorDescriptor, TensorEncoding};
pub use dtype::DType;
pub use error::TensorError;
pub use ops::{fully_connected, logistic, relu, tanh, Activation};
pub use packed::PackedF32;
pub use quant::{dequantize, dequantize_slice, quantize, quantize_slice, QuantParams};
