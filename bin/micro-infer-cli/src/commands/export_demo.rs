// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `micro-infer export-demo`: write the built-in demo model to disk.

use clap::Args;
use runtime::RuntimeConfig;
use std::path::PathBuf;

#[derive(Args)]
pub struct ExportArgs {
    /// Destination file.
    #[arg(short, long)]
    out: PathBuf,

    /// Declare the input as affine int8 instead of f32.
    #[arg(long)]
    int8: bool,

    /// Feature-vector length of the exported model.
    #[arg(long)]
    input_len: Option<usize>,
}

pub fn execute(config: RuntimeConfig, args: ExportArgs) -> anyhow::Result<()> {
    let input_len = args.input_len.unwrap_or(config.input_len);
    if input_len == 0 {
        anyhow::bail!("input_len must be positive");
    }
    let blob = crate::demo::demo_model(input_len, args.int8)?;

    std::fs::write(&args.out, &blob)
        .map_err(|e| anyhow::anyhow!("cannot write '{}': {e}", args.out.display()))?;

    let kind = if args.int8 { "int8" } else { "f32" };
    println!(
        "Wrote {} ({} bytes, {input_len} {kind} inputs)",
        args.out.display(),
        blob.len()
    );
    Ok(())
}
