// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # model-ir
//!
//! The versioned model blob format and its in-memory representation.
//!
//! A compiled model is a single byte blob, normally a constant in the
//! firmware image. This crate reads it without copying:
//!
//! - [`CompiledModel`] — the parsed, schema-checked header over a borrowed blob.
//! - [`TensorSpec`] — declared kind, width and quantization of the graph input/output.
//! - [`OperatorDef`] / [`OpKind`] — one operator of the chain, weights borrowed.
//! - [`ModelGraph`] — the decoded chain, with a **type-state pattern**
//!   (`Loaded` → `Validated`).
//! - [`ModelBuilder`] — writes blobs (demo models, tests, benches).
//!
//! # Example
//! ```
//! use model_ir::{CompiledModel, ModelBuilder, TensorSpec};
//! use tensor_core::Activation;
//!
//! let blob = ModelBuilder::new(TensorSpec::float32(4), TensorSpec::float32(1))
//!     .fully_connected(4, 1, &[0.25; 4], &[0.0], Activation::None)
//!     .logistic(1)
//!     .build()
//!     .unwrap();
//!
//! let model = CompiledModel::parse(&blob).unwrap();
//! let graph = model.graph().unwrap().validate().unwrap();
//! println!("{}", graph.summary());
//! for op in graph.iter_operators() {
//!     println!("  {}", op.summary());
//! }
//! ```

mod blob;
mod builder;
mod error;
pub mod graph;
mod operator;

pub use blob::{CompiledModel, ModelHeader, TensorSpec, HEADER_LEN, MAGIC, SCHEMA_VERSION};
pub use builder::ModelBuilder;
pub use error::ModelError;
pub use graph::ModelGraph;
pub use operator::{OpKind, OperatorDef};
