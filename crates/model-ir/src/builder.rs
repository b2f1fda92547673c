// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Blob serialization.
//!
//! [`ModelBuilder`] writes the format [`CompiledModel::parse`] reads. It does
//! not validate the chain, so tests can produce deliberately broken blobs.
//!
//! [`CompiledModel::parse`]: crate::CompiledModel::parse

use crate::{ModelError, OpKind, TensorSpec, MAGIC, SCHEMA_VERSION};
use tensor_core::Activation;

#[derive(Debug, Clone)]
struct OpEntry {
    kind: OpKind,
    activation: Activation,
    in_features: usize,
    out_features: usize,
    weights: Vec<f32>,
    bias: Vec<f32>,
}

/// Builds a model blob operator by operator.
///
/// # Example
/// ```
/// use model_ir::{CompiledModel, ModelBuilder, TensorSpec};
/// use tensor_core::Activation;
///
/// let blob = ModelBuilder::new(TensorSpec::float32(2), TensorSpec::float32(1))
///     .fully_connected(2, 1, &[0.5, -0.5], &[1.0], Activation::None)
///     .build()
///     .unwrap();
///
/// let model = CompiledModel::parse(&blob).unwrap();
/// let graph = model.graph().unwrap().validate().unwrap();
/// assert_eq!(graph.num_operators(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    schema_version: u32,
    input: TensorSpec,
    output: TensorSpec,
    ops: Vec<OpEntry>,
}

impl ModelBuilder {
    /// Starts a blob with the given graph input and output.
    pub fn new(input: TensorSpec, output: TensorSpec) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            input,
            output,
            ops: Vec::new(),
        }
    }

    /// Overrides the schema version written to the header.
    pub fn schema_version(mut self, version: u32) -> Self {
        self.schema_version = version;
        self
    }

    /// Appends a dense layer.
    ///
    /// `weights` is row-major `[out][in]`. Missing weights or biases are
    /// written as zero; extra values are dropped.
    pub fn fully_connected(
        mut self,
        in_features: usize,
        out_features: usize,
        weights: &[f32],
        bias: &[f32],
        activation: Activation,
    ) -> Self {
        let mut weights = weights.to_vec();
        weights.resize(in_features * out_features, 0.0);
        let mut bias = bias.to_vec();
        bias.resize(out_features, 0.0);

        self.ops.push(OpEntry {
            kind: OpKind::FullyConnected,
            activation,
            in_features,
            out_features,
            weights,
            bias,
        });
        self
    }

    /// Appends an element-wise ReLU.
    pub fn relu(self, width: usize) -> Self {
        self.elementwise(OpKind::Relu, width)
    }

    /// Appends an element-wise tanh.
    pub fn tanh(self, width: usize) -> Self {
        self.elementwise(OpKind::Tanh, width)
    }

    /// Appends an element-wise logistic sigmoid.
    pub fn logistic(self, width: usize) -> Self {
        self.elementwise(OpKind::Logistic, width)
    }

    fn elementwise(mut self, kind: OpKind, width: usize) -> Self {
        self.ops.push(OpEntry {
            kind,
            activation: Activation::None,
            in_features: width,
            out_features: width,
            weights: Vec::new(),
            bias: Vec::new(),
        });
        self
    }

    /// Serializes the blob.
    ///
    /// # Errors
    /// [`ModelError::FieldOverflow`] if a tensor width, operator width or the
    /// operator count does not fit the format's `u32` fields.
    pub fn build(&self) -> Result<Vec<u8>, ModelError> {
        let params: usize = self
            .ops
            .iter()
            .map(|op| op.weights.len() + op.bias.len())
            .sum();
        let mut out = Vec::with_capacity(crate::HEADER_LEN + self.ops.len() * 12 + params * 4);

        out.extend_from_slice(&MAGIC);
        out.extend_from_slice(&self.schema_version.to_le_bytes());
        write_tensor_spec(&mut out, "input elements", &self.input)?;
        write_tensor_spec(&mut out, "output elements", &self.output)?;
        out.extend_from_slice(&field_u32("operator count", self.ops.len())?.to_le_bytes());

        for op in &self.ops {
            out.push(op.kind.code());
            out.push(op.activation.code());
            out.extend_from_slice(&[0, 0]);
            out.extend_from_slice(&field_u32("in_features", op.in_features)?.to_le_bytes());
            out.extend_from_slice(&field_u32("out_features", op.out_features)?.to_le_bytes());
            for v in op.weights.iter().chain(&op.bias) {
                out.extend_from_slice(&v.to_le_bytes());
            }
        }

        Ok(out)
    }
}

fn field_u32(field: &'static str, value: usize) -> Result<u32, ModelError> {
    u32::try_from(value).map_err(|_| ModelError::FieldOverflow { field, value })
}

fn write_tensor_spec(
    out: &mut Vec<u8>,
    field: &'static str,
    spec: &TensorSpec,
) -> Result<(), ModelError> {
    out.push(spec.dtype.code());
    out.extend_from_slice(&[0, 0, 0]);
    out.extend_from_slice(&field_u32(field, spec.elements)?.to_le_bytes());
    out.extend_from_slice(&spec.quant.scale.to_le_bytes());
    out.extend_from_slice(&spec.quant.zero_point.to_le_bytes());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CompiledModel, ModelError, HEADER_LEN};
    use tensor_core::QuantParams;

    #[test]
    fn test_header_layout() {
        let blob = ModelBuilder::new(
            TensorSpec::int8(2048, QuantParams::new(0.01, -3)),
            TensorSpec::float32(1),
        )
        .build()
        .unwrap();

        assert_eq!(blob.len(), HEADER_LEN);
        assert_eq!(&blob[0..4], b"MIRM");
        assert_eq!(u32::from_le_bytes(blob[4..8].try_into().unwrap()), 3);
        assert_eq!(blob[8], tensor_core::DType::I8.code());
        assert_eq!(u32::from_le_bytes(blob[12..16].try_into().unwrap()), 2048);
        assert_eq!(f32::from_le_bytes(blob[16..20].try_into().unwrap()), 0.01);
        assert_eq!(i32::from_le_bytes(blob[20..24].try_into().unwrap()), -3);
        assert_eq!(u32::from_le_bytes(blob[40..44].try_into().unwrap()), 0);
    }

    #[test]
    fn test_operator_sizes() {
        let blob = ModelBuilder::new(TensorSpec::float32(3), TensorSpec::float32(2))
            .fully_connected(3, 2, &[1.0; 6], &[0.0; 2], Activation::Relu)
            .relu(2)
            .build()
            .unwrap();
        // header + (12 + 6*4 + 2*4) + 12
        assert_eq!(blob.len(), HEADER_LEN + 44 + 12);
    }

    #[test]
    fn test_missing_params_zero_filled() {
        let blob = ModelBuilder::new(TensorSpec::float32(2), TensorSpec::float32(2))
            .fully_connected(2, 2, &[1.0], &[], Activation::None)
            .build()
            .unwrap();
        let model = CompiledModel::parse(&blob).unwrap();
        let graph = model.graph().unwrap().validate().unwrap();
        let op = graph.operators()[0];
        assert_eq!(op.weights.iter().collect::<Vec<_>>(), vec![1.0, 0.0, 0.0, 0.0]);
        assert_eq!(op.bias.len(), 2);
    }

    #[test]
    fn test_schema_override() {
        let blob = ModelBuilder::new(TensorSpec::float32(1), TensorSpec::float32(1))
            .relu(1)
            .schema_version(99)
            .build()
            .unwrap();
        assert_eq!(
            CompiledModel::parse(&blob).unwrap_err(),
            ModelError::SchemaMismatch {
                found: 99,
                expected: SCHEMA_VERSION
            }
        );
    }

    #[test]
    fn test_builder_does_not_validate() {
        let blob = ModelBuilder::new(TensorSpec::float32(4), TensorSpec::float32(1))
            .relu(3)
            .build()
            .unwrap();
        let model = CompiledModel::parse(&blob).unwrap();
        assert!(model.graph().unwrap().validate().is_err());
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_width_beyond_u32_is_rejected() {
        let too_wide = u32::MAX as usize + 1;

        let err = ModelBuilder::new(TensorSpec::float32(1), TensorSpec::float32(1))
            .relu(too_wide)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::FieldOverflow {
                field: "in_features",
                value: too_wide
            }
        );

        let err = ModelBuilder::new(TensorSpec::float32(too_wide), TensorSpec::float32(1))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::FieldOverflow {
                field: "input elements",
                value: too_wide
            }
        );
    }
}
