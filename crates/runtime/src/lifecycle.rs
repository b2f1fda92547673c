// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Session lifecycle.
//!
//! ```text
//! Uninitialized ──parse──▶ ModelLoaded ──construct──▶ EngineAllocated ──allocate──▶ Ready
//!       │                      │                            │
//!       └──────────────────────┴────────────────────────────┴──────▶ Failed(error)
//! ```
//!
//! Initialization runs once. There is no edge back to `Uninitialized`, and
//! `Ready` and `Failed` are terminal.

use crate::InferenceError;
use std::fmt;

/// Where a session is in its one-shot initialization.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LifecycleState {
    /// Nothing has been attempted yet.
    #[default]
    Uninitialized,
    /// The blob parsed and its schema version matched.
    ModelLoaded,
    /// The engine was constructed over the model, resolver and arena.
    EngineAllocated,
    /// Tensors are allocated; inference may run.
    Ready,
    /// Initialization failed. Holds the failure.
    Failed(InferenceError),
}

impl LifecycleState {
    /// Returns `true` only in the `Ready` state.
    pub fn is_ready(&self) -> bool {
        matches!(self, LifecycleState::Ready)
    }

    /// Returns `true` once initialization has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, LifecycleState::Ready | LifecycleState::Failed(_))
    }

    /// The failure, if initialization failed.
    pub fn failure(&self) -> Option<&InferenceError> {
        match self {
            LifecycleState::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Short state name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            LifecycleState::Uninitialized => "uninitialized",
            LifecycleState::ModelLoaded => "model-loaded",
            LifecycleState::EngineAllocated => "engine-allocated",
            LifecycleState::Ready => "ready",
            LifecycleState::Failed(_) => "failed",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleState::Failed(err) => write!(f, "failed ({err})"),
            other => f.write_str(other.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_uninitialized() {
        let s = LifecycleState::default();
        assert_eq!(s, LifecycleState::Uninitialized);
        assert!(!s.is_ready());
        assert!(!s.is_terminal());
    }

    #[test]
    fn test_terminal_states() {
        assert!(LifecycleState::Ready.is_terminal());
        assert!(LifecycleState::Failed(InferenceError::NotInitialized).is_terminal());
        assert!(!LifecycleState::EngineAllocated.is_terminal());
    }

    #[test]
    fn test_failure_accessor() {
        let s = LifecycleState::Failed(InferenceError::SchemaMismatch { found: 1, expected: 3 });
        assert!(matches!(
            s.failure(),
            Some(InferenceError::SchemaMismatch { found: 1, .. })
        ));
        assert!(LifecycleState::Ready.failure().is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(LifecycleState::ModelLoaded.to_string(), "model-loaded");
        let failed = LifecycleState::Failed(InferenceError::NotInitialized);
        assert_eq!(failed.to_string(), "failed (inference session is not initialized)");
    }
}
