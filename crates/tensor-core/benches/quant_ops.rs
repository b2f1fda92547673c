// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Benchmarks for the int8 codec and the dense kernel.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tensor_core::{
    dequantize_slice, fully_connected, quantize_slice, Activation, PackedF32, QuantParams,
};

const FEATURES: usize = 2048;

fn bench_quantize(c: &mut Criterion) {
    let input: Vec<f32> = (0..FEATURES).map(|i| (i % 2) as f32).collect();
    let params = QuantParams::new(0.01, -128);
    let mut out = vec![0i8; FEATURES];

    c.bench_function("quantize_2048", |b| {
        b.iter(|| quantize_slice(black_box(&input), params, &mut out))
    });
}

fn bench_dequantize(c: &mut Criterion) {
    let input: Vec<i8> = (0..FEATURES).map(|i| (i % 256) as u8 as i8).collect();
    let params = QuantParams::new(0.01, -128);
    let mut out = vec![0.0f32; FEATURES];

    c.bench_function("dequantize_2048", |b| {
        b.iter(|| dequantize_slice(black_box(&input), params, &mut out))
    });
}

fn bench_fully_connected(c: &mut Criterion) {
    let hidden = 64;
    let input = vec![1.0f32; FEATURES];
    let weights: Vec<u8> = (0..FEATURES * hidden)
        .flat_map(|i| ((i % 7) as f32 * 0.01).to_le_bytes())
        .collect();
    let bias: Vec<u8> = (0..hidden).flat_map(|_| 0.1f32.to_le_bytes()).collect();
    let mut out = vec![0.0f32; hidden];

    c.bench_function("fully_connected_2048x64", |b| {
        b.iter(|| {
            fully_connected(
                black_box(&input),
                PackedF32::new(&weights).unwrap(),
                PackedF32::new(&bias).unwrap(),
                Activation::Relu,
                &mut out,
            )
            .unwrap()
        })
    });
}

criterion_group!(benches, bench_quantize, bench_dequantize, bench_fully_connected);
criterion_main!(benches);
