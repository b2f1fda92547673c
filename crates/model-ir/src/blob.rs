// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Compiled model blobs.
//!
//! A blob is a little-endian byte array, normally embedded in the firmware
//! image as a constant:
//!
//! ```text
//! offset  size  field
//!      0     4  magic "MIRM"
//!      4     4  schema_version (u32)
//!      8    16  input spec:  dtype u8, 3 reserved, elements u32, scale f32, zero_point i32
//!     24    16  output spec: same layout
//!     40     4  operator count (u32)
//!     44     …  operators: op u8, activation u8, 2 reserved, in u32, out u32,
//!               then for FULLY_CONNECTED: out*in f32 weights ([out][in]), out f32 bias
//! ```
//!
//! [`CompiledModel::parse`] reads only the fixed header. The schema version
//! is checked before any other field is decoded, so a blob built for another
//! schema is rejected without interpreting a single tensor or operator.

use crate::graph::{Loaded, ModelGraph};
use crate::{ModelError, OpKind, OperatorDef};
use tensor_core::{Activation, DType, PackedF32, QuantParams, TensorDescriptor};

/// File magic.
pub const MAGIC: [u8; 4] = *b"MIRM";

/// The only schema version this build accepts.
pub const SCHEMA_VERSION: u32 = 3;

/// Size of the fixed header, in bytes.
pub const HEADER_LEN: usize = 44;

pub(crate) const TENSOR_SPEC_LEN: usize = 16;
pub(crate) const OP_HEADER_LEN: usize = 12;

// ── TensorSpec ─────────────────────────────────────────────────────

/// Declared element kind, width and quantization of a graph input or output.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TensorSpec {
    /// Element kind.
    pub dtype: DType,
    /// Number of elements.
    pub elements: usize,
    /// Quantization parameters. Meaningful only for [`DType::I8`].
    pub quant: QuantParams,
}

impl TensorSpec {
    /// An `f32` tensor of `elements` elements.
    pub fn float32(elements: usize) -> Self {
        Self {
            dtype: DType::F32,
            elements,
            quant: QuantParams::default(),
        }
    }

    /// An affine int8 tensor of `elements` elements.
    pub fn int8(elements: usize, quant: QuantParams) -> Self {
        Self {
            dtype: DType::I8,
            elements,
            quant,
        }
    }

    /// Byte size of the tensor's backing memory.
    pub fn byte_len(&self) -> usize {
        self.elements * self.dtype.size_bytes()
    }

    /// The descriptor an engine reports for this tensor once allocated.
    pub fn descriptor(&self) -> TensorDescriptor {
        TensorDescriptor {
            dtype: self.dtype,
            byte_len: self.byte_len(),
            quant: self.quant,
        }
    }
}

// ── CompiledModel ──────────────────────────────────────────────────

/// A parsed, schema-checked view over a model blob.
///
/// The handle borrows the blob for `'m`; on a device this is `'static`.
#[derive(Debug, Clone, Copy)]
pub struct CompiledModel<'m> {
    bytes: &'m [u8],
    schema_version: u32,
    input: TensorSpec,
    output: TensorSpec,
    operator_count: usize,
}

/// Serializable summary of a blob's fixed header.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ModelHeader {
    pub schema_version: u32,
    pub input: TensorSpec,
    pub output: TensorSpec,
    pub operator_count: usize,
    pub blob_bytes: usize,
}

impl<'m> CompiledModel<'m> {
    /// Parses and checks the fixed header.
    ///
    /// # Errors
    /// - [`ModelError::Truncated`] if the blob is shorter than the header.
    /// - [`ModelError::BadMagic`] if the blob is not a model.
    /// - [`ModelError::SchemaMismatch`] if the version differs from
    ///   [`SCHEMA_VERSION`]. Checked before anything else is decoded.
    /// - [`ModelError::UnknownDType`] if a tensor spec's kind code is unknown.
    pub fn parse(bytes: &'m [u8]) -> Result<Self, ModelError> {
        let mut cur = Cursor::new(bytes);

        let magic = cur.array::<4>()?;
        if magic != MAGIC {
            return Err(ModelError::BadMagic { found: magic });
        }

        let schema_version = cur.u32()?;
        if schema_version != SCHEMA_VERSION {
            return Err(ModelError::SchemaMismatch {
                found: schema_version,
                expected: SCHEMA_VERSION,
            });
        }

        let input = read_tensor_spec(&mut cur)?;
        let output = read_tensor_spec(&mut cur)?;
        let operator_count = cur.u32()? as usize;

        tracing::debug!(
            schema_version,
            operator_count,
            input_elements = input.elements,
            output_elements = output.elements,
            "parsed model header"
        );

        Ok(Self {
            bytes,
            schema_version,
            input,
            output,
            operator_count,
        })
    }

    /// Schema version the blob was compiled for.
    pub fn schema_version(&self) -> u32 {
        self.schema_version
    }

    /// Declared graph input.
    pub fn input(&self) -> TensorSpec {
        self.input
    }

    /// Declared graph output.
    pub fn output(&self) -> TensorSpec {
        self.output
    }

    /// Number of operators in the table.
    pub fn operator_count(&self) -> usize {
        self.operator_count
    }

    /// The raw blob.
    pub fn as_bytes(&self) -> &'m [u8] {
        self.bytes
    }

    /// Returns a serializable header summary.
    pub fn header(&self) -> ModelHeader {
        ModelHeader {
            schema_version: self.schema_version,
            input: self.input,
            output: self.output,
            operator_count: self.operator_count,
            blob_bytes: self.bytes.len(),
        }
    }

    /// Decodes the operator table into an unvalidated graph.
    ///
    /// Weights are borrowed from the blob, not copied.
    pub fn graph(&self) -> Result<ModelGraph<'m, Loaded>, ModelError> {
        let mut cur = Cursor::new(self.bytes);
        cur.skip(HEADER_LEN)?;

        let mut operators = Vec::with_capacity(self.operator_count.min(1024));
        for index in 0..self.operator_count {
            operators.push(read_operator(&mut cur, index)?);
        }

        Ok(ModelGraph::new(
            self.input,
            self.output,
            operators,
            cur.remaining(),
        ))
    }
}

fn read_tensor_spec(cur: &mut Cursor<'_>) -> Result<TensorSpec, ModelError> {
    let code = cur.u8()?;
    let dtype = DType::from_code(code).ok_or(ModelError::UnknownDType(code))?;
    cur.skip(3)?;
    let elements = cur.u32()? as usize;
    let scale = cur.f32()?;
    let zero_point = cur.i32()?;
    Ok(TensorSpec {
        dtype,
        elements,
        quant: QuantParams::new(scale, zero_point),
    })
}

fn read_operator<'m>(cur: &mut Cursor<'m>, index: usize) -> Result<OperatorDef<'m>, ModelError> {
    let code = cur.u8()?;
    let kind = OpKind::from_code(code).ok_or(ModelError::UnknownOpCode { index, code })?;
    let act = cur.u8()?;
    let activation =
        Activation::from_code(act).ok_or(ModelError::UnknownActivation { index, code: act })?;
    cur.skip(2)?;
    let in_features = cur.u32()? as usize;
    let out_features = cur.u32()? as usize;

    if kind.is_elementwise() && activation != Activation::None {
        return Err(ModelError::InvalidOperator {
            index,
            detail: format!("{kind} cannot carry a fused activation"),
        });
    }

    let (weights, bias) = match kind {
        OpKind::FullyConnected => {
            let weight_count = in_features
                .checked_mul(out_features)
                .ok_or_else(|| ModelError::InvalidOperator {
                    index,
                    detail: format!("{out_features}x{in_features} weight matrix overflows"),
                })?;
            (cur.packed_f32(weight_count)?, cur.packed_f32(out_features)?)
        }
        _ => (PackedF32::empty(), PackedF32::empty()),
    };

    Ok(OperatorDef {
        index,
        kind,
        activation,
        in_features,
        out_features,
        weights,
        bias,
    })
}

// ── Cursor ─────────────────────────────────────────────────────────

/// Bounds-checked little-endian reader.
struct Cursor<'m> {
    bytes: &'m [u8],
    pos: usize,
}

impl<'m> Cursor<'m> {
    fn new(bytes: &'m [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn take(&mut self, len: usize) -> Result<&'m [u8], ModelError> {
        let truncated = ModelError::Truncated {
            needed: self.pos.saturating_add(len),
            available: self.bytes.len(),
        };
        let end = self.pos.checked_add(len).ok_or(truncated.clone())?;
        let out = self.bytes.get(self.pos..end).ok_or(truncated)?;
        self.pos = end;
        Ok(out)
    }

    fn skip(&mut self, len: usize) -> Result<(), ModelError> {
        self.take(len).map(|_| ())
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], ModelError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn u8(&mut self) -> Result<u8, ModelError> {
        Ok(self.array::<1>()?[0])
    }

    fn u32(&mut self) -> Result<u32, ModelError> {
        self.array().map(u32::from_le_bytes)
    }

    fn i32(&mut self) -> Result<i32, ModelError> {
        self.array().map(i32::from_le_bytes)
    }

    fn f32(&mut self) -> Result<f32, ModelError> {
        self.array().map(f32::from_le_bytes)
    }

    fn packed_f32(&mut self, count: usize) -> Result<PackedF32<'m>, ModelError> {
        let len = count.checked_mul(4).ok_or(ModelError::Truncated {
            needed: usize::MAX,
            available: self.bytes.len(),
        })?;
        let bytes = self.take(len)?;
        Ok(PackedF32::new(bytes).unwrap_or_default())
    }
}
