// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline state machine
//!
//! A run moves through a fixed, linear sequence of ten states. Each phase
//! (extract, transform, load) is surrounded by a before and an after hook
//! point, and `Complete` is absorbing.

use crate::error::StateError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The current state of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    BeforeExtract,
    Extract,
    AfterExtract,
    BeforeTransform,
    Transform,
    AfterTransform,
    BeforeLoad,
    Load,
    AfterLoad,
    Complete,
}

impl PipelineState {
    /// Every state, in sequence order
    pub const ALL: [PipelineState; 10] = [
        PipelineState::BeforeExtract,
        PipelineState::Extract,
        PipelineState::AfterExtract,
        PipelineState::BeforeTransform,
        PipelineState::Transform,
        PipelineState::AfterTransform,
        PipelineState::BeforeLoad,
        PipelineState::Load,
        PipelineState::AfterLoad,
        PipelineState::Complete,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PipelineState::BeforeExtract => "before_extract",
            PipelineState::Extract => "extract",
            PipelineState::AfterExtract => "after_extract",
            PipelineState::BeforeTransform => "before_transform",
            PipelineState::Transform => "transform",
            PipelineState::AfterTransform => "after_transform",
            PipelineState::BeforeLoad => "before_load",
            PipelineState::Load => "load",
            PipelineState::AfterLoad => "after_load",
            PipelineState::Complete => "complete",
        }
    }

    /// Position in the sequence (0 for `BeforeExtract`)
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// The successor of this state. `Complete` maps to itself.
    pub fn next(&self) -> PipelineState {
        match self {
            PipelineState::BeforeExtract => PipelineState::Extract,
            PipelineState::Extract => PipelineState::AfterExtract,
            PipelineState::AfterExtract => PipelineState::BeforeTransform,
            PipelineState::BeforeTransform => PipelineState::Transform,
            PipelineState::Transform => PipelineState::AfterTransform,
            PipelineState::AfterTransform => PipelineState::BeforeLoad,
            PipelineState::BeforeLoad => PipelineState::Load,
            PipelineState::Load => PipelineState::AfterLoad,
            PipelineState::AfterLoad => PipelineState::Complete,
            PipelineState::Complete => PipelineState::Complete,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Complete)
    }

    /// The phase whose body runs in this state, if any
    pub fn phase(&self) -> Option<Phase> {
        match self {
            PipelineState::Extract => Some(Phase::Extract),
            PipelineState::Transform => Some(Phase::Transform),
            PipelineState::Load => Some(Phase::Load),
            _ => None,
        }
    }

    /// The hook point this state represents, if any
    pub fn hook_point(&self) -> Option<HookPoint> {
        HookPoint::try_from(*self).ok()
    }
}

/// Advance a state to its fixed successor.
///
/// Total over the closed set of states; `Complete` is absorbing.
pub fn advance(current: PipelineState) -> PipelineState {
    current.next()
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PipelineState {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PipelineState::ALL
            .into_iter()
            .find(|state| state.name() == s)
            .ok_or_else(|| StateError::InvalidState {
                name: s.to_string(),
            })
    }
}

/// One of the three caller-visible phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Extract,
    Transform,
    Load,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Extract, Phase::Transform, Phase::Load];

    pub fn name(&self) -> &'static str {
        match self {
            Phase::Extract => "extract",
            Phase::Transform => "transform",
            Phase::Load => "load",
        }
    }

    /// The state in which this phase's body runs
    pub fn state(&self) -> PipelineState {
        match self {
            Phase::Extract => PipelineState::Extract,
            Phase::Transform => PipelineState::Transform,
            Phase::Load => PipelineState::Load,
        }
    }

    pub fn before(&self) -> HookPoint {
        match self {
            Phase::Extract => HookPoint::BeforeExtract,
            Phase::Transform => HookPoint::BeforeTransform,
            Phase::Load => HookPoint::BeforeLoad,
        }
    }

    pub fn after(&self) -> HookPoint {
        match self {
            Phase::Extract => HookPoint::AfterExtract,
            Phase::Transform => HookPoint::AfterTransform,
            Phase::Load => HookPoint::AfterLoad,
        }
    }

    /// Whether this phase's raw output is committed into data.
    ///
    /// Load output is terminal and never becomes data.
    pub fn commits(&self) -> bool {
        !matches!(self, Phase::Load)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A lifecycle moment where hooks can be registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookPoint {
    BeforeExtract,
    AfterExtract,
    BeforeTransform,
    AfterTransform,
    BeforeLoad,
    AfterLoad,
}

impl HookPoint {
    pub const ALL: [HookPoint; 6] = [
        HookPoint::BeforeExtract,
        HookPoint::AfterExtract,
        HookPoint::BeforeTransform,
        HookPoint::AfterTransform,
        HookPoint::BeforeLoad,
        HookPoint::AfterLoad,
    ];

    pub fn state(&self) -> PipelineState {
        match self {
            HookPoint::BeforeExtract => PipelineState::BeforeExtract,
            HookPoint::AfterExtract => PipelineState::AfterExtract,
            HookPoint::BeforeTransform => PipelineState::BeforeTransform,
            HookPoint::AfterTransform => PipelineState::AfterTransform,
            HookPoint::BeforeLoad => PipelineState::BeforeLoad,
            HookPoint::AfterLoad => PipelineState::AfterLoad,
        }
    }

    /// The phase this point surrounds
    pub fn phase(&self) -> Phase {
        match self {
            HookPoint::BeforeExtract | HookPoint::AfterExtract => Phase::Extract,
            HookPoint::BeforeTransform | HookPoint::AfterTransform => Phase::Transform,
            HookPoint::BeforeLoad | HookPoint::AfterLoad => Phase::Load,
        }
    }

    pub fn is_after(&self) -> bool {
        matches!(
            self,
            HookPoint::AfterExtract | HookPoint::AfterTransform | HookPoint::AfterLoad
        )
    }

    pub(crate) fn slot(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for HookPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.state().name())
    }
}

impl From<HookPoint> for PipelineState {
    fn from(point: HookPoint) -> Self {
        point.state()
    }
}

impl TryFrom<PipelineState> for HookPoint {
    type Error = StateError;

    fn try_from(state: PipelineState) -> Result<Self, Self::Error> {
        HookPoint::ALL
            .into_iter()
            .find(|point| point.state() == state)
            .ok_or(StateError::NotAHookPoint { state })
    }
}

impl FromStr for HookPoint {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HookPoint::try_from(s.parse::<PipelineState>()?)
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
