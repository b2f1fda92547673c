// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Built-in demo regressor.
//!
//! `L → FC(16, relu) → FC(1)` with fixed, deterministic weights, so the
//! host loop and the inspector have something to run without a blob on disk.

use model_ir::{ModelBuilder, ModelError, TensorSpec};
use tensor_core::{Activation, QuantParams};

const HIDDEN: usize = 16;

/// Quantization of the int8 variant's input: bit-vector features in `[0, 1]`.
pub const DEMO_INPUT_QUANT: QuantParams = QuantParams {
    scale: 0.01,
    zero_point: 0,
};

/// Serializes the demo model for `input_len` features.
///
/// # Errors
/// [`ModelError::InvalidGraph`] if `input_len` is zero, or
/// [`ModelError::FieldOverflow`] if it does not fit the blob format.
pub fn demo_model(input_len: usize, int8_input: bool) -> Result<Vec<u8>, ModelError> {
    if input_len == 0 {
        return Err(ModelError::InvalidGraph(
            "demo model needs a positive input length".into(),
        ));
    }

    let input = if int8_input {
        TensorSpec::int8(input_len, DEMO_INPUT_QUANT)
    } else {
        TensorSpec::float32(input_len)
    };

    let hidden_weights: Vec<f32> = (0..HIDDEN * input_len)
        .map(|k| {
            let (j, i) = (k / input_len, k % input_len);
            (((i * 7 + j * 13) % 17) as f32 - 8.0) * 0.001
        })
        .collect();
    let hidden_bias: Vec<f32> = (0..HIDDEN).map(|j| 0.01 * j as f32).collect();
    let head: Vec<f32> = (0..HIDDEN)
        .map(|j| if j % 2 == 0 { 0.25 } else { -0.125 })
        .collect();

    ModelBuilder::new(input, TensorSpec::float32(1))
        .fully_connected(input_len, HIDDEN, &hidden_weights, &hidden_bias, Activation::Relu)
        .fully_connected(HIDDEN, 1, &head, &[-0.5], Activation::None)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use model_ir::CompiledModel;
    use tensor_core::DType;

    #[test]
    fn test_demo_model_validates() {
        let blob = demo_model(2048, false).unwrap();
        let model = CompiledModel::parse(&blob).unwrap();
        let graph = model.graph().unwrap().validate().unwrap();
        assert_eq!(graph.num_operators(), 2);
        assert_eq!(model.input().elements, 2048);
        assert_eq!(model.output().elements, 1);
    }

    #[test]
    fn test_int8_variant() {
        let blob = demo_model(64, true).unwrap();
        let model = CompiledModel::parse(&blob).unwrap();
        assert_eq!(model.input().dtype, DType::I8);
        assert_eq!(model.input().quant, DEMO_INPUT_QUANT);
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(demo_model(128, false).unwrap(), demo_model(128, false).unwrap());
    }

    #[test]
    fn test_zero_input_len_rejected() {
        assert!(matches!(
            demo_model(0, false),
            Err(ModelError::InvalidGraph(_))
        ));
    }
}
