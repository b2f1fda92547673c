// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Float kernels for the host reference backend.
//!
//! Each kernel writes into a caller-provided output slice so that an engine
//! can run them directly over scratch-arena memory without allocating.

mod activation_op;
mod fully_connected_op;

pub use activation_op::{logistic, relu, tanh, Activation};
pub use fully_connected_op::fully_connected;
