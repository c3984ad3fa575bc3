// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the pipeline engine

use crate::state::{HookPoint, Phase, PipelineState};
use thiserror::Error;

/// Errors from state parsing and rewinding. None of these mutate a run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("invalid state: {name}")]
    InvalidState { name: String },
    #[error("cannot reverse to {target}: run has only reached {current}")]
    UnreachableState {
        target: PipelineState,
        current: PipelineState,
    },
    #[error("{state} is not a hook point")]
    NotAHookPoint { state: PipelineState },
}

/// A failure raised while processing a run.
///
/// Wraps the pipeline's own error type with the place it was raised. The
/// run's state stays at the last transition that completed.
#[derive(Debug, Error)]
pub enum RunError<E>
where
    E: std::error::Error + 'static,
{
    #[error("{phase} failed: {source}")]
    Stage {
        phase: Phase,
        #[source]
        source: E,
    },
    #[error("{point} hook failed: {source}")]
    Hook {
        point: HookPoint,
        #[source]
        source: E,
    },
}

impl<E> RunError<E>
where
    E: std::error::Error + 'static,
{
    /// The state the run was left in when this error was raised
    pub fn state(&self) -> PipelineState {
        match self {
            RunError::Stage { phase, .. } => phase.state(),
            RunError::Hook { point, .. } => point.state(),
        }
    }

    pub fn is_hook(&self) -> bool {
        matches!(self, RunError::Hook { .. })
    }

    /// The pipeline error, unchanged
    pub fn inner(&self) -> &E {
        match self {
            RunError::Stage { source, .. } | RunError::Hook { source, .. } => source,
        }
    }

    pub fn into_source(self) -> E {
        match self {
            RunError::Stage { source, .. } | RunError::Hook { source, .. } => source,
        }
    }
}
