// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Runtime configuration loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! model_path = "./models/logp.mirm"
//! input_len = 2048
//! arena_size = "200K"
//! loop_interval_ms = 2000
//! output_label = "logP"
//! enable_profiling = true
//! ```
//!
//! Every field is optional; missing fields take their default.

use crate::InferenceError;
use scratch_arena::ArenaCapacity;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for an inference session and the host loop around it.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Model blob to load. `None` selects the built-in demo model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_path: Option<PathBuf>,
    /// Expected feature-vector length.
    pub input_len: usize,
    /// Scratch arena capacity (human-readable, e.g., `"200K"`).
    pub arena_size: String,
    /// Idle time between host loop iterations, in milliseconds.
    pub loop_interval_ms: u64,
    /// Label printed in front of each result.
    pub output_label: String,
    /// Whether to record per-call timing metrics.
    pub enable_profiling: bool,
}

impl RuntimeConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, InferenceError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            InferenceError::Config(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, InferenceError> {
        toml::from_str(toml_str)
            .map_err(|e| InferenceError::Config(format!("TOML parse error: {e}")))
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, InferenceError> {
        toml::to_string_pretty(self)
            .map_err(|e| InferenceError::Config(format!("TOML serialise error: {e}")))
    }

    /// Parses the arena size string into an [`ArenaCapacity`].
    pub fn parse_arena_capacity(&self) -> Result<ArenaCapacity, InferenceError> {
        ArenaCapacity::parse(&self.arena_size)
            .map_err(|e| InferenceError::Config(format!("invalid arena size: {e}")))
    }

    /// Host loop interval as a [`Duration`].
    pub fn loop_interval(&self) -> Duration {
        Duration::from_millis(self.loop_interval_ms)
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            input_len: 2048,
            arena_size: "200K".to_string(),
            loop_interval_ms: 2000,
            output_label: "logP".to_string(),
            enable_profiling: true,
        }
    }
}
