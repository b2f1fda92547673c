// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Per-tensor affine int8 quantization.
//!
//! A quantized tensor stores `q` such that `real ≈ (q - zero_point) * scale`.
//! The forward mapping is
//!
//! ```text
//! q = clamp(round(real / scale) + zero_point, -128, 127)
//! ```
//!
//! where `round` is round-half-away-from-zero (`f32::round`). Out-of-range
//! values saturate instead of failing, so the codec has no error path.
//!
//! # Degenerate parameters
//! A `scale` that is not strictly positive (zero, negative, or NaN) means the
//! engine never initialised the parameters. [`quantize`] then returns the
//! zero point itself, clamped to the int8 domain, without dividing.

/// Affine quantization parameters attached to one tensor.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct QuantParams {
    /// Real-valued step between adjacent quantized levels.
    pub scale: f32,
    /// Quantized value that represents real zero.
    pub zero_point: i32,
}

impl QuantParams {
    /// Creates a parameter pair.
    pub fn new(scale: f32, zero_point: i32) -> Self {
        Self { scale, zero_point }
    }

    /// Returns `true` if `scale` is usable as a divisor.
    pub fn is_valid(&self) -> bool {
        self.scale > 0.0
    }

    /// Quantizes a single value with these parameters.
    #[inline]
    pub fn quantize(&self, value: f32) -> i8 {
        quantize(value, self.scale, self.zero_point)
    }

    /// Dequantizes a single value with these parameters.
    #[inline]
    pub fn dequantize(&self, value: i8) -> f32 {
        dequantize(value, self.scale, self.zero_point)
    }
}

/// Converts a real value to its saturated int8 representation.
///
/// # Examples
/// ```
/// use tensor_core::quantize;
///
/// assert_eq!(quantize(0.5, 0.01, 0), 50);
/// assert_eq!(quantize(2.5, 1.0, 0), 3); // half rounds away from zero
/// assert_eq!(quantize(1000.0, 0.01, 0), 127);
/// assert_eq!(quantize(1.0, 0.0, 7), 7); // degenerate scale
/// ```
#[inline]
pub fn quantize(value: f32, scale: f32, zero_point: i32) -> i8 {
    if scale.is_nan() || scale <= 0.0 {
        return saturate_i8(i64::from(zero_point));
    }
    // Float-to-int `as` casts saturate and map NaN to 0.
    let scaled = (value / scale).round() as i32;
    saturate_i8(i64::from(scaled) + i64::from(zero_point))
}

/// Converts an int8 value back to the real domain.
///
/// # Examples
/// ```
/// use tensor_core::dequantize;
///
/// assert_eq!(dequantize(50, 0.5, 0), 25.0);
/// assert_eq!(dequantize(-128, 1.0, -128), 0.0);
/// ```
#[inline]
pub fn dequantize(value: i8, scale: f32, zero_point: i32) -> f32 {
    (i64::from(value) - i64::from(zero_point)) as f32 * scale
}

/// Quantizes `src` element-wise into `dst`.
///
/// Only `min(src.len(), dst.len())` elements are written.
pub fn quantize_slice(src: &[f32], params: QuantParams, dst: &mut [i8]) {
    for (out, &v) in dst.iter_mut().zip(src) {
        *out = params.quantize(v);
    }
}

/// Dequantizes `src` element-wise into `dst`.
///
/// Only `min(src.len(), dst.len())` elements are written.
pub fn dequantize_slice(src: &[i8], params: QuantParams, dst: &mut [f32]) {
    for (out, &q) in dst.iter_mut().zip(src) {
        *out = params.dequantize(q);
    }
}

#[inline]
fn saturate_i8(v: i64) -> i8 {
    v.clamp(i64::from(i8::MIN), i64::from(i8::MAX)) as i8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize_basic() {
        assert_eq!(quantize(0.5, 0.01, 0), 50);
        assert_eq!(quantize(-0.5, 0.01, 0), -50);
        assert_eq!(quantize(0.0, 0.1, 5), 5);
        assert_eq!(quantize(1.0, 0.5, -10), -8);
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(quantize(0.5, 1.0, 0), 1);
        assert_eq!(quantize(-0.5, 1.0, 0), -1);
        assert_eq!(quantize(1.5, 1.0, 0), 2);
        assert_eq!(quantize(2.5, 1.0, 0), 3);
        assert_eq!(quantize(-2.5, 1.0, 0), -3);
        assert_eq!(quantize(0.49, 1.0, 0), 0);
    }

    #[test]
    fn test_clamp_bounds() {
        assert_eq!(quantize(1.0e6, 0.01, 0), 127);
        assert_eq!(quantize(-1.0e6, 0.01, 0), -128);
        assert_eq!(quantize(127.0, 1.0, 0), 127);
        assert_eq!(quantize(128.0, 1.0, 0), 127);
        assert_eq!(quantize(-128.0, 1.0, 0), -128);
        assert_eq!(quantize(-129.0, 1.0, 0), -128);
        // The zero point can push an in-range value out of range.
        assert_eq!(quantize(100.0, 1.0, 100), 127);
        assert_eq!(quantize(-100.0, 1.0, -100), -128);
    }

    #[test]
    fn test_extreme_inputs_saturate() {
        assert_eq!(quantize(f32::INFINITY, 1.0, 0), 127);
        assert_eq!(quantize(f32::NEG_INFINITY, 1.0, 0), -128);
        assert_eq!(quantize(f32::MAX, f32::MIN_POSITIVE, i32::MAX), 127);
        assert_eq!(quantize(f32::MIN, f32::MIN_POSITIVE, i32::MIN), -128);
    }

    #[test]
    fn test_nan_input_maps_to_zero_point() {
        assert_eq!(quantize(f32::NAN, 0.1, 3), 3);
    }

    #[test]
    fn test_degenerate_scale() {
        assert_eq!(quantize(42.0, 0.0, 0), 0);
        assert_eq!(quantize(42.0, 0.0, 12), 12);
        assert_eq!(quantize(42.0, -1.0, -7), -7);
        assert_eq!(quantize(42.0, f32::NAN, 9), 9);
        // Out-of-domain zero points are clamped.
        assert_eq!(quantize(1.0, 0.0, 300), 127);
        assert_eq!(quantize(1.0, 0.0, -300), -128);
    }

    #[test]
    fn test_dequantize() {
        assert_eq!(dequantize(0, 0.1, 0), 0.0);
        assert_eq!(dequantize(10, 0.5, 0), 5.0);
        assert_eq!(dequantize(10, 0.5, 10), 0.0);
        assert_eq!(dequantize(-128, 1.0, 127), -255.0);
        assert_eq!(dequantize(127, 0.25, -128), 63.75);
    }

    #[test]
    fn test_params_helpers() {
        let p = QuantParams::new(0.01, 0);
        assert!(p.is_valid());
        assert_eq!(p.quantize(0.5), 50);
        assert!((p.dequantize(50) - 0.5).abs() < 1e-6);
        assert!(!QuantParams::default().is_valid());
    }

    #[test]
    fn test_slice_helpers() {
        let p = QuantParams::new(0.5, 1);
        let mut q = [0i8; 3];
        quantize_slice(&[0.0, 1.0, -1.0], p, &mut q);
        assert_eq!(q, [1, 3, -1]);

        let mut back = [0.0f32; 3];
        dequantize_slice(&q, p, &mut back);
        assert_eq!(back, [0.0, 1.0, -1.0]);
    }

    #[test]
    fn test_slice_helpers_shorter_destination() {
        let p = QuantParams::new(1.0, 0);
        let mut q = [0i8; 2];
        quantize_slice(&[1.0, 2.0, 3.0], p, &mut q);
        assert_eq!(q, [1, 2]);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(512))]

        #[test]
        fn prop_roundtrip_within_one_step(
            scale in 0.001f32..1.0,
            zero_point in -128i32..=127,
            level in -128i32..=127,
            offset in -0.49f32..0.49,
        ) {
            // Pick a value whose exact quantized level lies inside [-128, 127].
            let value = (level - zero_point) as f32 * scale + offset * scale;
            let q = quantize(value, scale, zero_point);
            let back = dequantize(q, scale, zero_point);
            prop_assert!(
                (back - value).abs() <= scale * 1.0001,
                "value {value} -> {q} -> {back} (scale {scale})"
            );
        }

        #[test]
        fn prop_monotonic(
            a in -1.0e6f32..1.0e6,
            b in -1.0e6f32..1.0e6,
            scale in 1.0e-4f32..10.0,
            zero_point in -1000i32..1000,
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(quantize(lo, scale, zero_point) <= quantize(hi, scale, zero_point));
        }

        #[test]
        fn prop_clamps_low(
            scale in 0.001f32..1.0,
            zero_point in -128i32..=127,
            excess in 1.0f32..1.0e4,
        ) {
            let value = (-129 - zero_point) as f32 * scale - excess * scale;
            prop_assert_eq!(quantize(value, scale, zero_point), -128);
        }

        #[test]
        fn prop_clamps_high(
            scale in 0.001f32..1.0,
            zero_point in -128i32..=127,
            excess in 1.0f32..1.0e4,
        ) {
            let value = (128 - zero_point) as f32 * scale + excess * scale;
            prop_assert_eq!(quantize(value, scale, zero_point), 127);
        }

        #[test]
        fn prop_degenerate_scale_returns_zero_point(
            value in proptest::num::f32::ANY,
            zero_point in -1000i32..1000,
        ) {
            let expected = zero_point.clamp(-128, 127) as i8;
            prop_assert_eq!(quantize(value, 0.0, zero_point), expected);
        }
    }
}
