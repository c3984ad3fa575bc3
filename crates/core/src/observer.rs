// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Observability sink for runs
//!
//! The engine reports through this narrow interface instead of a global
//! logger. [`TracingObserver`] is the default sink.

use crate::id::RunId;
use crate::options::Options;
use crate::state::PipelineState;

/// Receives the structured signals a run emits
pub trait TransitionObserver: Send + Sync {
    /// Called once per successful state transition
    fn on_transition(&self, pipeline: &str, run_id: &RunId, from: PipelineState, to: PipelineState);

    /// Called at the start of every `process` call with the bound options
    fn on_process(&self, pipeline: &str, run_id: &RunId, options: &Options, state: PipelineState) {
        let _ = (pipeline, run_id, options, state);
    }
}

/// Emits `tracing` events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl TransitionObserver for TracingObserver {
    fn on_transition(&self, pipeline: &str, run_id: &RunId, from: PipelineState, to: PipelineState) {
        tracing::info!(
            pipeline,
            run = %run_id,
            from = %from,
            to = %to,
            "advanced from {} to {}",
            from,
            to
        );
    }

    fn on_process(&self, pipeline: &str, run_id: &RunId, options: &Options, state: PipelineState) {
        // The message is a replayable invocation line
        tracing::info!(pipeline, run = %run_id, state = %state, "{}.process({})", pipeline, options);
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl TransitionObserver for NoopObserver {
    fn on_transition(&self, _: &str, _: &RunId, _: PipelineState, _: PipelineState) {}
}

#[cfg(any(test, feature = "test-support"))]
pub use recording::{ObservedEvent, RecordingObserver};

#[cfg(any(test, feature = "test-support"))]
mod recording {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// A recorded observer call
    #[derive(Debug, Clone, PartialEq)]
    pub enum ObservedEvent {
        Process {
            pipeline: String,
            options: Options,
            state: PipelineState,
        },
        Transition {
            pipeline: String,
            from: PipelineState,
            to: PipelineState,
        },
    }

    /// Records every call for assertions in tests
    #[derive(Debug, Clone, Default)]
    pub struct RecordingObserver {
        events: Arc<Mutex<Vec<ObservedEvent>>>,
    }

    impl RecordingObserver {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn events(&self) -> Vec<ObservedEvent> {
            self.events
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .clone()
        }

        /// Recorded transitions as `(from, to)` pairs
        pub fn transitions(&self) -> Vec<(PipelineState, PipelineState)> {
            self.events()
                .into_iter()
                .filter_map(|event| match event {
                    ObservedEvent::Transition { from, to, .. } => Some((from, to)),
                    ObservedEvent::Process { .. } => None,
                })
                .collect()
        }

        pub fn clear(&self) {
            self.events
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .clear();
        }

        fn push(&self, event: ObservedEvent) {
            self.events
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(event);
        }
    }

    impl TransitionObserver for RecordingObserver {
        fn on_transition(
            &self,
            pipeline: &str,
            _run_id: &RunId,
            from: PipelineState,
            to: PipelineState,
        ) {
            self.push(ObservedEvent::Transition {
                pipeline: pipeline.to_string(),
                from,
                to,
            });
        }

        fn on_process(
            &self,
            pipeline: &str,
            _run_id: &RunId,
            options: &Options,
            state: PipelineState,
        ) {
            self.push(ObservedEvent::Process {
                pipeline: pipeline.to_string(),
                options: options.clone(),
                state,
            });
        }
    }
}

#[cfg(test)]
#[path = "observer_tests.rs"]
mod tests;
