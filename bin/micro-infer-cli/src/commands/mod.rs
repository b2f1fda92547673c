// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

pub mod export_demo;
pub mod inspect;
pub mod run;

use runtime::RuntimeConfig;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. `RUST_LOG` wins over `-v`.
pub fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the TOML file if one was given, otherwise the defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<RuntimeConfig> {
    match path {
        Some(path) => {
            let config = RuntimeConfig::from_file(path)?;
            tracing::info!("loaded config from {}", path.display());
            Ok(config)
        }
        None => Ok(RuntimeConfig::default()),
    }
}

/// Reads the model blob at `path`, or builds the float demo model for
/// `input_len` features.
pub fn load_blob(path: Option<&Path>, input_len: usize) -> anyhow::Result<Vec<u8>> {
    match path {
        Some(path) => std::fs::read(path)
            .map_err(|e| anyhow::anyhow!("cannot read model '{}': {e}", path.display())),
        None => {
            tracing::info!("no model path given, using the built-in demo model");
            Ok(crate::demo::demo_model(input_len, false)?)
        }
    }
}
