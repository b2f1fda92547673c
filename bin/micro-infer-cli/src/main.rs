// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # micro-infer
//!
//! Command-line host for the micro-infer runtime.
//!
//! ## Usage
//! ```bash
//! # One-shot inference with the built-in demo model
//! micro-infer run
//!
//! # Repeating loop over a model blob, every 2 s, forever
//! micro-infer run --model ./models/logp.mirm --input features.txt --iterations 0
//!
//! # Inspect a blob
//! micro-infer inspect --model ./models/logp.mirm --json
//!
//! # Write the demo model to disk
//! micro-infer export-demo --out demo.mirm --int8
//! ```

mod commands;
mod demo;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "micro-infer",
    about = "Fixed-arena inference runtime for scalar regression models",
    version,
    author
)]
struct Cli {
    /// Path to a TOML configuration file (CLI flags override its values).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a session once, then run inference in a loop.
    Run(commands::run::RunArgs),

    /// Print a model's header, operators and arena requirement.
    Inspect(commands::inspect::InspectArgs),

    /// Write the built-in demo model to a file.
    ExportDemo(commands::export_demo::ExportArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    commands::init_tracing(cli.verbose);

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Run(args) => commands::run::execute(config, args),
        Commands::Inspect(args) => commands::inspect::execute(config, args),
        Commands::ExportDemo(args) => commands::export_demo::execute(config, args),
    }
}
