// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `micro-infer run`: one-shot setup, then the inference loop.
//!
//! ```text
//! Uninitialized → ModelLoaded → EngineAllocated → Ready → run_inference × N
//! ```
//!
//! A failed setup is reported once; every later iteration then reports
//! `Inference failed` instead of aborting the loop.

use clap::Args;
use runtime::{AllOpsResolver, InferenceSession, ReferenceEngine, ReferenceSession, RuntimeConfig};
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct RunArgs {
    /// Path to a model blob. Defaults to the built-in demo model.
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Text file of feature values separated by whitespace or commas.
    /// Defaults to an all-zero vector.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Number of loop iterations; 0 runs forever.
    #[arg(short = 'n', long, default_value_t = 1)]
    iterations: u64,

    /// Idle time between iterations, in milliseconds.
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Scratch arena capacity (e.g., "200K", "1M").
    #[arg(short, long)]
    arena_size: Option<String>,

    /// Expected feature-vector length.
    #[arg(long)]
    input_len: Option<usize>,
}

impl RunArgs {
    /// Applies the flags that were given on top of `config`.
    fn apply(&self, config: &mut RuntimeConfig) {
        if let Some(model) = &self.model {
            config.model_path = Some(model.clone());
        }
        if let Some(ms) = self.interval_ms {
            config.loop_interval_ms = ms;
        }
        if let Some(size) = &self.arena_size {
            config.arena_size = size.clone();
        }
        if let Some(len) = self.input_len {
            config.input_len = len;
        }
    }
}

pub fn execute(mut config: RuntimeConfig, args: RunArgs) -> anyhow::Result<()> {
    args.apply(&mut config);

    let blob = super::load_blob(config.model_path.as_deref(), config.input_len)?;
    let features = match &args.input {
        Some(path) => read_features(path)?,
        None => vec![0.0; config.input_len],
    };

    // ── Setup ──────────────────────────────────────────────────
    let mut session: ReferenceSession<'_> = match InferenceSession::from_config(&config) {
        Ok(session) => session,
        Err(e) => {
            println!("Model init failed");
            return Err(e.into());
        }
    };
    match session.initialize(&blob, &AllOpsResolver, ReferenceEngine::new) {
        Ok(()) => println!("Model init OK"),
        Err(e) => {
            tracing::error!("setup failed: {e}");
            println!("Model init failed");
        }
    }

    // ── Loop ───────────────────────────────────────────────────
    let mut iteration = 0u64;
    loop {
        match session.run_inference(&features) {
            Ok(value) => println!("{}: {value:.6}", config.output_label),
            Err(_) => println!("Inference failed"),
        }

        iteration += 1;
        if args.iterations != 0 && iteration >= args.iterations {
            break;
        }
        std::thread::sleep(config.loop_interval());
    }

    report(&session, config.enable_profiling);
    Ok(())
}

fn report(session: &ReferenceSession<'_>, profiling: bool) {
    if profiling {
        println!("{}", session.metrics().summary());
    }
    if let Some(engine) = session.backend() {
        println!("{}", engine.arena_stats().summary());
    }
}

fn read_features(path: &Path) -> anyhow::Result<Vec<f32>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("cannot read input '{}': {e}", path.display()))?;
    parse_features(&text)
}

/// Parses floats separated by whitespace and/or commas.
fn parse_features(text: &str) -> anyhow::Result<Vec<f32>> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|tok| !tok.is_empty())
        .map(|tok| {
            tok.parse::<f32>()
                .map_err(|e| anyhow::anyhow!("invalid feature value '{tok}': {e}"))
        })
        .collect()
}
