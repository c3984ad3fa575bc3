// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! etl-core: resumable staged pipeline engine
//!
//! This crate provides:
//! - The fixed ten-state pipeline state machine
//! - A per-type callback registry for the six hook points
//! - The `process` driver that sequences hooks and stage bodies
//! - Rewind support for re-driving a failed run
//! - An observability sink and logging setup

pub mod id;
pub mod logging;
pub mod observer;
pub mod options;

// State machine (order matters for dependencies)
pub mod error;
pub mod state;
pub mod stage;
pub mod hooks;
pub mod run;

// Re-exports
pub use error::{RunError, StateError};
pub use hooks::{HookContext, HookFn, HookRegistry};
pub use id::RunId;
pub use logging::{init_logging, LogConfig, LogError, LogFormat};
pub use observer::{NoopObserver, TracingObserver, TransitionObserver};
pub use options::Options;
pub use run::{Run, RunConfig};
pub use stage::{Block, Pipeline, StageContext};
pub use state::{advance, HookPoint, Phase, PipelineState};

#[cfg(any(test, feature = "test-support"))]
pub use observer::{ObservedEvent, RecordingObserver};
