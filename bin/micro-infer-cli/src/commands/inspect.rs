// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `micro-infer inspect`: display a blob's header, operator table and the
//! arena bytes the reference backend needs for it.

use clap::Args;
use model_ir::{CompiledModel, TensorSpec};
use runtime::{ReferenceEngine, RuntimeConfig};
use std::path::PathBuf;

#[derive(Args)]
pub struct InspectArgs {
    /// Path to a model blob. Defaults to the built-in demo model.
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Emit a JSON document instead of the table.
    #[arg(long)]
    json: bool,
}

pub fn execute(mut config: RuntimeConfig, args: InspectArgs) -> anyhow::Result<()> {
    if let Some(model) = args.model {
        config.model_path = Some(model);
    }
    let blob = super::load_blob(config.model_path.as_deref(), config.input_len)?;

    let model = CompiledModel::parse(&blob)?;
    let graph = model.graph()?.validate()?;
    let required = ReferenceEngine::arena_requirement(&graph);
    let capacity = config.parse_arena_capacity()?;

    if args.json {
        let operators: Vec<_> = graph
            .iter_operators()
            .map(|op| {
                serde_json::json!({
                    "index": op.index,
                    "kind": op.kind,
                    "activation": op.activation,
                    "in_features": op.in_features,
                    "out_features": op.out_features,
                    "weight_bytes": op.weight_bytes(),
                })
            })
            .collect();
        let doc = serde_json::json!({
            "header": model.header(),
            "operators": operators,
            "arena_required_bytes": required,
            "arena_capacity_bytes": capacity.as_bytes(),
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    // ── Header ─────────────────────────────────────────────────
    println!("  Schema version: {}", model.schema_version());
    println!("  Blob size:      {} bytes", blob.len());
    println!("  Input:          {}", describe(&model.input()));
    println!("  Output:         {}", describe(&model.output()));
    println!();

    // ── Operators ──────────────────────────────────────────────
    println!("  {}", graph.summary());
    for op in graph.iter_operators() {
        println!("   {}", op.summary());
    }
    println!();

    // ── Arena ──────────────────────────────────────────────────
    let verdict = if required <= capacity.as_bytes() {
        "fits"
    } else {
        "DOES NOT FIT"
    };
    println!("  Arena required: {required} bytes (capacity {capacity}, {verdict})");
    Ok(())
}

fn describe(spec: &TensorSpec) -> String {
    match spec.dtype {
        tensor_core::DType::I8 => format!(
            "{} x {} (scale {}, zero point {})",
            spec.elements, spec.dtype, spec.quant.scale, spec.quant.zero_point
        ),
        _ => format!("{} x {}", spec.elements, spec.dtype),
    }
}
