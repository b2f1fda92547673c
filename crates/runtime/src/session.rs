// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The inference session: one model, one engine, one arena.
//!
//! ```text
//! InferenceSession::new(L, arena)
//!     │  .initialize(blob, resolver, factory)     once
//!     ▼
//! Ready ──▶ .run_inference(&[f32; L]) ──▶ Result<f32, InferenceError>
//! ```
//!
//! The session is the explicit owner of everything a device would keep in
//! globals. It is single-threaded and synchronous: `run_inference` takes
//! `&mut self` and returns when the forward pass has finished.

use crate::{
    adapter, BackendError, InferenceBackend, InferenceError, LifecycleState, OpResolver,
    RuntimeConfig, SessionMetrics,
};
use model_ir::CompiledModel;
use scratch_arena::ScratchArena;
use std::time::{Duration, Instant};

/// Owns the arena, the engine built over it, and the lifecycle state.
///
/// `B` is the engine type. The arena is handed to the engine factory during
/// [`initialize`](Self::initialize) and is owned by the engine afterwards.
///
/// # Example
/// ```
/// use model_ir::{ModelBuilder, TensorSpec};
/// use runtime::{AllOpsResolver, InferenceSession, ReferenceEngine};
/// use scratch_arena::{ArenaCapacity, ScratchArena};
/// use tensor_core::Activation;
///
/// let blob = ModelBuilder::new(TensorSpec::float32(4), TensorSpec::float32(1))
///     .fully_connected(4, 1, &[1.0; 4], &[0.5], Activation::None)
///     .build()
///     .unwrap();
///
/// let arena = ScratchArena::new(ArenaCapacity::from_kib(4));
/// let mut session = InferenceSession::new(4, arena);
/// session
///     .initialize(&blob, &AllOpsResolver, ReferenceEngine::new)
///     .unwrap();
///
/// let y = session.run_inference(&[1.0, 2.0, 3.0, 4.0]).unwrap();
/// assert_eq!(y, 10.5);
/// ```
pub struct InferenceSession<B: InferenceBackend> {
    input_len: usize,
    arena: Option<ScratchArena>,
    backend: Option<B>,
    state: LifecycleState,
    profiling: bool,
    metrics: SessionMetrics,
}

impl<B: InferenceBackend> InferenceSession<B> {
    /// Creates an uninitialized session expecting feature vectors of
    /// `input_len` elements.
    pub fn new(input_len: usize, arena: ScratchArena) -> Self {
        Self {
            input_len,
            arena: Some(arena),
            backend: None,
            state: LifecycleState::Uninitialized,
            profiling: true,
            metrics: SessionMetrics::new(),
        }
    }

    /// Creates a session with the configured input length, arena capacity
    /// and profiling setting.
    pub fn from_config(config: &RuntimeConfig) -> Result<Self, InferenceError> {
        if config.input_len == 0 {
            return Err(InferenceError::Config("input_len must be positive".into()));
        }
        let capacity = config.parse_arena_capacity()?;
        let arena = ScratchArena::try_new(capacity)
            .map_err(|e| InferenceError::Config(format!("invalid arena size: {e}")))?;
        tracing::info!("scratch arena: {capacity}");
        Ok(Self::new(config.input_len, arena).with_profiling(config.enable_profiling))
    }

    /// Enables or disables per-call timing.
    pub fn with_profiling(mut self, enabled: bool) -> Self {
        self.profiling = enabled;
        self
    }

    /// Runs the initialization lifecycle.
    ///
    /// 1. Parse `blob` and check its schema version (`ModelLoaded`).
    /// 2. Build the engine with `factory` over the model, `resolver` and
    ///    the arena (`EngineAllocated`).
    /// 3. Allocate the engine's tensors inside the arena (`Ready`).
    ///
    /// Any failure moves the session to `Failed` and drops the engine.
    /// Once `Ready` or `Failed`, further calls return the stored outcome
    /// without side effects.
    pub fn initialize<'m, F>(
        &mut self,
        blob: &'m [u8],
        resolver: &dyn OpResolver,
        factory: F,
    ) -> Result<(), InferenceError>
    where
        F: FnOnce(CompiledModel<'m>, &dyn OpResolver, ScratchArena) -> Result<B, BackendError>,
    {
        match &self.state {
            LifecycleState::Ready => return Ok(()),
            LifecycleState::Failed(err) => return Err(err.clone()),
            _ => {}
        }

        match self.run_lifecycle(blob, resolver, factory) {
            Ok(()) => Ok(()),
            Err(err) => {
                tracing::error!("initialization failed: {err}");
                self.backend = None;
                self.arena = None;
                self.transition(LifecycleState::Failed(err.clone()));
                Err(err)
            }
        }
    }

    fn run_lifecycle<'m, F>(
        &mut self,
        blob: &'m [u8],
        resolver: &dyn OpResolver,
        factory: F,
    ) -> Result<(), InferenceError>
    where
        F: FnOnce(CompiledModel<'m>, &dyn OpResolver, ScratchArena) -> Result<B, BackendError>,
    {
        let model = CompiledModel::parse(blob)?;
        self.transition(LifecycleState::ModelLoaded);

        let arena = self.arena.take().ok_or_else(|| {
            InferenceError::EngineConstruction(BackendError::Failed(
                "scratch arena already handed to an engine".into(),
            ))
        })?;
        let mut backend = factory(model, resolver, arena).map_err(|err| match err {
            BackendError::Model(model_err) => InferenceError::from(model_err),
            other => InferenceError::EngineConstruction(other),
        })?;
        self.transition(LifecycleState::EngineAllocated);

        backend
            .allocate_tensors()
            .map_err(|source| InferenceError::ArenaAllocationFailed { source })?;
        if let Some(used) = backend.arena_used_bytes() {
            tracing::info!("arena used after allocation: {used} bytes");
        }

        self.backend = Some(backend);
        self.transition(LifecycleState::Ready);
        Ok(())
    }

    fn transition(&mut self, next: LifecycleState) {
        tracing::info!("session: {} -> {}", self.state.name(), next.name());
        self.state = next;
    }

    /// Runs one inference on `input` and returns the scalar result.
    ///
    /// # Errors
    /// - [`InferenceError::NotInitialized`] unless the session is `Ready`.
    ///   Nothing is written in that case.
    /// - Adapter errors ([`LengthMismatch`], [`SizeMismatch`],
    ///   [`UnsupportedType`]) before the engine runs.
    /// - [`InferenceError::InvokeFailed`] if the forward pass fails. The
    ///   output is not read.
    ///
    /// [`LengthMismatch`]: InferenceError::LengthMismatch
    /// [`SizeMismatch`]: InferenceError::SizeMismatch
    /// [`UnsupportedType`]: InferenceError::UnsupportedType
    pub fn run_inference(&mut self, input: &[f32]) -> Result<f32, InferenceError> {
        let backend = match (&self.state, self.backend.as_mut()) {
            (LifecycleState::Ready, Some(backend)) => backend,
            _ => return Err(InferenceError::NotInitialized),
        };

        match infer(backend, self.input_len, input, self.profiling) {
            Ok((value, elapsed)) => {
                self.metrics.record_success(elapsed);
                Ok(value)
            }
            Err(err) => {
                tracing::warn!("inference failed: {err}");
                self.metrics.record_failure();
                Err(err)
            }
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> &LifecycleState {
        &self.state
    }

    /// Returns `true` if inference may run.
    pub fn is_ready(&self) -> bool {
        self.state.is_ready()
    }

    /// Expected feature-vector length.
    pub fn input_len(&self) -> usize {
        self.input_len
    }

    /// The engine, once `Ready`.
    pub fn backend(&self) -> Option<&B> {
        self.backend.as_ref()
    }

    /// Call counters and timings.
    pub fn metrics(&self) -> &SessionMetrics {
        &self.metrics
    }
}

/// Adapt → invoke → adapt. Returns the value and, if profiling, the invoke time.
fn infer<B: InferenceBackend>(
    backend: &mut B,
    input_len: usize,
    input: &[f32],
    profiling: bool,
) -> Result<(f32, Option<Duration>), InferenceError> {
    adapter::write_input(backend, input_len, input)?;

    let started = profiling.then(Instant::now);
    backend.invoke().map_err(InferenceError::InvokeFailed)?;
    let elapsed = started.map(|t| t.elapsed());

    let value = adapter::read_output(backend)?;
    Ok((value, elapsed))
}

impl<B: InferenceBackend> std::fmt::Debug for InferenceSession<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceSession")
            .field("state", &self.state.name())
            .field("input_len", &self.input_len)
            .field("has_backend", &self.backend.is_some())
            .field("profiling", &self.profiling)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AllOpsResolver, ReferenceEngine};
    use model_ir::{ModelBuilder, TensorSpec};
    use scratch_arena::ArenaCapacity;
    use std::cell::Cell;
    use tensor_core::{Activation, TensorDescriptor};

    /// Counts calls; optionally fails `invoke`.
    struct Recorder {
        fail_invoke: bool,
        invokes: Cell<usize>,
        output_reads: Cell<usize>,
        input: Vec<u8>,
        output: Vec<u8>,
    }

    impl Recorder {
        fn new(fail_invoke: bool) -> Self {
            Self {
                fail_invoke,
                invokes: Cell::new(0),
                output_reads: Cell::new(0),
                input: vec![0; 8],
                output: 7.0f32.to_ne_bytes().to_vec(),
            }
        }
    }

    impl InferenceBackend for Recorder {
        fn allocate_tensors(&mut self) -> Result<(), BackendError> {
            Ok(())
        }
        fn input_descriptor(&self, _: usize) -> Option<TensorDescriptor> {
            Some(TensorDescriptor::float32(2))
        }
        fn output_descriptor(&self, _: usize) -> Option<TensorDescriptor> {
            Some(TensorDescriptor::float32(1))
        }
        fn input_data_mut(&mut self, _: usize) -> Option<&mut [u8]> {
            Some(self.input.as_mut_slice())
        }
        fn output_data(&self, _: usize) -> Option<&[u8]> {
            self.output_reads.set(self.output_reads.get() + 1);
            Some(self.output.as_slice())
        }
        fn invoke(&mut self) -> Result<(), BackendError> {
            self.invokes.set(self.invokes.get() + 1);
            if self.fail_invoke {
                Err(BackendError::Failed("forward pass aborted".into()))
            } else {
                Ok(())
            }
        }
    }

    fn blob() -> Vec<u8> {
        ModelBuilder::new(TensorSpec::float32(2), TensorSpec::float32(1))
            .fully_connected(2, 1, &[1.0, 1.0], &[0.0], Activation::None)
            .build()
            .unwrap()
    }

    fn session<B: InferenceBackend>() -> InferenceSession<B> {
        InferenceSession::new(2, ScratchArena::new(ArenaCapacity::from_kib(1)))
    }

    #[test]
    fn test_not_initialized() {
        let mut s = session::<Recorder>();
        assert_eq!(s.run_inference(&[0.0, 0.0]), Err(InferenceError::NotInitialized));
        assert_eq!(s.metrics().total_calls(), 0);
    }

    #[test]
    fn test_recorded_lifecycle() {
        let blob = blob();
        let mut s = session::<Recorder>();
        s.initialize(&blob, &AllOpsResolver, |_, _, _| Ok(Recorder::new(false)))
            .unwrap();
        assert!(s.is_ready());

        assert_eq!(s.run_inference(&[1.0, 2.0]).unwrap(), 7.0);
        let recorder = s.backend().unwrap();
        assert_eq!(recorder.invokes.get(), 1);
        assert_eq!(recorder.output_reads.get(), 1);
    }

    #[test]
    fn test_invoke_failure_skips_output() {
        let blob = blob();
        let mut s = session::<Recorder>();
        s.initialize(&blob, &AllOpsResolver, |_, _, _| Ok(Recorder::new(true)))
            .unwrap();

        let err = s.run_inference(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, InferenceError::InvokeFailed(BackendError::Failed(_))));
        assert_eq!(s.backend().unwrap().output_reads.get(), 0);
        assert_eq!(s.metrics().failed_calls, 1);
        // Per-call failures leave the session usable.
        assert!(s.is_ready());
    }

    #[test]
    fn test_initialize_twice_is_noop() {
        let blob = blob();
        let mut s = session::<ReferenceEngine<'_>>();
        s.initialize(&blob, &AllOpsResolver, ReferenceEngine::new).unwrap();
        let used = s.backend().and_then(|b| b.arena_used_bytes());

        let mut called = false;
        s.initialize(&blob, &AllOpsResolver, |_, _, _| {
            called = true;
            Err(BackendError::Failed("must not run".into()))
        })
        .unwrap();
        assert!(!called);
        assert_eq!(s.backend().and_then(|b| b.arena_used_bytes()), used);
    }

    #[test]
    fn test_failed_state_is_sticky() {
        let bad = ModelBuilder::new(TensorSpec::float32(2), TensorSpec::float32(1))
            .relu(2)
            .schema_version(1)
            .build()
            .unwrap();
        let good = blob();

        let mut s = session::<ReferenceEngine<'_>>();
        let first = s.initialize(&bad, &AllOpsResolver, ReferenceEngine::new).unwrap_err();
        assert_eq!(first, InferenceError::SchemaMismatch { found: 1, expected: 3 });

        let second = s.initialize(&good, &AllOpsResolver, ReferenceEngine::new).unwrap_err();
        assert_eq!(second, first);
        assert_eq!(s.state(), &LifecycleState::Failed(first));
        assert_eq!(s.run_inference(&[0.0, 0.0]), Err(InferenceError::NotInitialized));
    }

    #[test]
    fn test_factory_error_is_engine_construction() {
        let blob = blob();
        let mut s = session::<Recorder>();
        let err = s
            .initialize(&blob, &AllOpsResolver, |_, _, _| {
                Err(BackendError::Failed("no device".into()))
            })
            .unwrap_err();
        assert!(matches!(err, InferenceError::EngineConstruction(_)));
        assert!(s.backend().is_none());
    }

    #[test]
    fn test_profiling_disabled_records_no_timings() {
        let blob = blob();
        let mut s = session::<ReferenceEngine<'_>>().with_profiling(false);
        s.initialize(&blob, &AllOpsResolver, ReferenceEngine::new).unwrap();
        s.run_inference(&[1.0, 1.0]).unwrap();

        assert_eq!(s.metrics().successful_calls, 1);
        assert!(s.metrics().last_invoke_duration.is_none());
    }

    #[test]
    fn test_from_config() {
        let config = RuntimeConfig {
            input_len: 2,
            arena_size: "1K".into(),
            ..Default::default()
        };
        let s = InferenceSession::<Recorder>::from_config(&config).unwrap();
        assert_eq!(s.input_len(), 2);
        assert_eq!(s.state(), &LifecycleState::Uninitialized);

        let zero = RuntimeConfig {
            input_len: 0,
            ..Default::default()
        };
        assert!(matches!(
            InferenceSession::<Recorder>::from_config(&zero),
            Err(InferenceError::Config(_))
        ));
    }

    #[test]
    fn test_from_config_unreservable_arena() {
        let config = RuntimeConfig {
            arena_size: usize::MAX.to_string(),
            ..Default::default()
        };
        match InferenceSession::<Recorder>::from_config(&config) {
            Err(InferenceError::Config(msg)) => assert!(msg.contains("cannot reserve")),
            other => panic!("expected a config error, got ok = {}", other.is_ok()),
        }
    }

    #[test]
    fn test_debug_format() {
        let s = session::<Recorder>();
        let debug = format!("{s:?}");
        assert!(debug.contains("InferenceSession"));
        assert!(debug.contains("uninitialized"));
    }
}
