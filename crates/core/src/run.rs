// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline runs
//!
//! A run is one resumable execution of a pipeline. `process` drives it from
//! its current state to `Complete`; a failure leaves it at the last state it
//! successfully advanced to, and `reverse_to` rewinds it so `process` can
//! re-drive the remaining phases.

use crate::error::{RunError, StateError};
use crate::hooks::{HookContext, HookRegistry};
use crate::id::RunId;
use crate::observer::{TracingObserver, TransitionObserver};
use crate::options::Options;
use crate::stage::{Block, Pipeline, StageContext};
use crate::state::{advance, HookPoint, Phase, PipelineState};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

static NO_OPTIONS: Options = Options::empty();

/// Engine settings for a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Record `(raw, data)` on entering each state so rewinds restore them
    #[serde(default = "default_snapshots")]
    pub snapshots: bool,
}

fn default_snapshots() -> bool {
    true
}

impl Default for RunConfig {
    fn default() -> Self {
        Self { snapshots: true }
    }
}

impl RunConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }
}

/// Values visible on entering a state
#[derive(Debug, Clone)]
struct Snapshot<D> {
    state: PipelineState,
    raw: Option<D>,
    data: Option<D>,
}

/// One stateful execution of a pipeline
pub struct Run<P: Pipeline> {
    id: RunId,
    pipeline: P,
    state: PipelineState,
    options: Option<Options>,
    raw: Option<P::Data>,
    data: Option<P::Data>,
    output: Option<P::Output>,
    block: Option<Block<P::Data>>,
    hooks: Arc<HookRegistry<P>>,
    observer: Arc<dyn TransitionObserver>,
    config: RunConfig,
    snapshots: Vec<Snapshot<P::Data>>,
}

impl<P: Pipeline> Run<P> {
    /// Create a run at `BeforeExtract`, with the type's hooks and the
    /// tracing observer
    pub fn new(pipeline: P) -> Self {
        Self {
            id: RunId::generate(),
            pipeline,
            state: PipelineState::BeforeExtract,
            options: None,
            raw: None,
            data: None,
            output: None,
            block: None,
            hooks: Arc::new(HookRegistry::for_pipeline()),
            observer: Arc::new(TracingObserver),
            config: RunConfig::default(),
            snapshots: Vec::new(),
        }
    }

    /// Create a run and process it once
    pub fn execute(pipeline: P, options: Options) -> Result<Self, RunError<P::Error>> {
        let mut run = Self::new(pipeline);
        run.process(options)?;
        Ok(run)
    }

    pub fn with_id(self, id: impl Into<RunId>) -> Self {
        Self {
            id: id.into(),
            ..self
        }
    }

    /// Share a prebuilt registry instead of building one per run
    pub fn with_registry(self, hooks: Arc<HookRegistry<P>>) -> Self {
        Self { hooks, ..self }
    }

    pub fn with_observer(self, observer: Arc<dyn TransitionObserver>) -> Self {
        Self { observer, ..self }
    }

    pub fn with_config(self, config: RunConfig) -> Self {
        Self { config, ..self }
    }

    pub fn id(&self) -> &RunId {
        &self.id
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state.is_terminal()
    }

    /// Options bound by the first `process` call
    pub fn options(&self) -> Option<&Options> {
        self.options.as_ref()
    }

    /// Output of the last phase body, not yet committed
    pub fn raw(&self) -> Option<&P::Data> {
        self.raw.as_ref()
    }

    /// Last committed value
    pub fn data(&self) -> Option<&P::Data> {
        self.data.as_ref()
    }

    /// What load returned
    pub fn output(&self) -> Option<&P::Output> {
        self.output.as_ref()
    }

    pub fn take_output(&mut self) -> Option<P::Output> {
        self.output.take()
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub fn pipeline_mut(&mut self) -> &mut P {
        &mut self.pipeline
    }

    pub fn hooks(&self) -> &Arc<HookRegistry<P>> {
        &self.hooks
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Drive the run from its current state with no block bound
    pub fn process(&mut self, options: Options) -> Result<PipelineState, RunError<P::Error>> {
        self.process_with(options, None)
    }

    /// Drive the run from its current state.
    ///
    /// `options` are bound only on the first call; later calls keep the
    /// original options so a resumed run sees the same configuration.
    /// `block` is rebound on every call. A run already at `Complete`
    /// returns immediately.
    pub fn process_with(
        &mut self,
        options: Options,
        block: Option<Block<P::Data>>,
    ) -> Result<PipelineState, RunError<P::Error>> {
        if self.options.is_none() {
            self.options = Some(options);
        } else if options != *self.bound_options() {
            tracing::debug!(run = %self.id, "options already bound, ignoring new options");
        }
        self.block = block;
        self.observer
            .on_process(P::NAME, &self.id, self.bound_options(), self.state);

        for phase in Phase::ALL {
            self.dispatch(phase.before())?;
            self.run_phase(phase)?;
            self.dispatch(phase.after())?;
        }
        Ok(self.state)
    }

    /// Dispatch the hooks for `point` if the run is there.
    ///
    /// Returns whether the point was active. Safe to call at any time.
    pub fn dispatch(&mut self, point: HookPoint) -> Result<bool, RunError<P::Error>> {
        let hooks = Arc::clone(&self.hooks);
        hooks.invoke(self, point)
    }

    /// Rewind to a state at or before the current one.
    ///
    /// With snapshots enabled, raw and data are restored to what they were
    /// on entering `target`, and load output is dropped when load will run
    /// again.
    pub fn reverse_to(&mut self, target: PipelineState) -> Result<(), StateError> {
        if target > self.state {
            return Err(StateError::UnreachableState {
                target,
                current: self.state,
            });
        }

        if self.config.snapshots {
            self.snapshots.retain(|snapshot| snapshot.state <= target);
            let (raw, data) = self
                .snapshots
                .last()
                .map(|snapshot| (snapshot.raw.clone(), snapshot.data.clone()))
                .unwrap_or((None, None));
            self.raw = raw;
            self.data = data;
            if target <= PipelineState::Load {
                self.output = None;
            }
        }

        tracing::info!(
            pipeline = P::NAME,
            run = %self.id,
            from = %self.state,
            to = %target,
            "reversed"
        );
        self.state = target;
        Ok(())
    }

    /// [`reverse_to`](Self::reverse_to) by state name
    pub fn reverse_to_named(&mut self, target: &str) -> Result<(), StateError> {
        self.reverse_to(target.parse()?)
    }

    fn bound_options(&self) -> &Options {
        self.options.as_ref().unwrap_or(&NO_OPTIONS)
    }

    fn run_phase(&mut self, phase: Phase) -> Result<(), RunError<P::Error>> {
        if self.state != phase.state() {
            return Ok(());
        }

        let cx = StageContext {
            run_id: &self.id,
            options: self.options.as_ref().unwrap_or(&NO_OPTIONS),
            data: self.data.as_ref(),
            block: self.block.as_ref(),
        };
        let stage_failed = |source| RunError::Stage { phase, source };
        match phase {
            Phase::Extract => self.raw = self.pipeline.extract(&cx).map_err(stage_failed)?,
            Phase::Transform => self.raw = self.pipeline.transform(&cx).map_err(stage_failed)?,
            Phase::Load => self.output = self.pipeline.load(&cx).map_err(stage_failed)?,
        }

        self.advance();
        Ok(())
    }

    pub(crate) fn hook_context(&mut self, point: HookPoint) -> HookContext<'_, P> {
        HookContext {
            pipeline: &mut self.pipeline,
            point,
            run_id: &self.id,
            options: self.options.as_ref().unwrap_or(&NO_OPTIONS),
            raw: &mut self.raw,
            data: &mut self.data,
            output: &mut self.output,
        }
    }

    /// Close out a hook point whose hooks all succeeded
    pub(crate) fn finish_hook_point(&mut self, point: HookPoint) {
        if point.is_after() && point.phase().commits() {
            self.commit();
        }
        self.advance();
    }

    /// Raw becomes data. A phase that produced nothing leaves no data.
    fn commit(&mut self) {
        self.data = self.raw.take();
    }

    fn advance(&mut self) {
        let from = self.state;
        let to = advance(from);
        if from == to {
            return;
        }
        self.state = to;

        if self.config.snapshots {
            self.snapshots.retain(|snapshot| snapshot.state < to);
            self.snapshots.push(Snapshot {
                state: to,
                raw: self.raw.clone(),
                data: self.data.clone(),
            });
        }

        self.observer.on_transition(P::NAME, &self.id, from, to);
    }
}

impl<P: Pipeline> std::fmt::Debug for Run<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Run")
            .field("id", &self.id)
            .field("pipeline", &P::NAME)
            .field("state", &self.state)
            .field("options", &self.options)
            .field("has_raw", &self.raw.is_some())
            .field("has_data", &self.data.is_some())
            .field("has_output", &self.output.is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
