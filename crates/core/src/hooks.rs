// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Callback registry
//!
//! Ordered hook lists for the six hook points of a pipeline type. A
//! registry is built once per type and shared read-only by its runs.

use crate::error::RunError;
use crate::id::RunId;
use crate::options::Options;
use crate::run::Run;
use crate::stage::Pipeline;
use crate::state::HookPoint;
use std::sync::Arc;

/// A hook bound to a lifecycle point
pub type HookFn<P> = Arc<
    dyn Fn(&mut HookContext<'_, P>) -> Result<(), <P as Pipeline>::Error> + Send + Sync,
>;

fn hook_fn<P, F>(hook: F) -> HookFn<P>
where
    P: Pipeline,
    F: Fn(&mut HookContext<'_, P>) -> Result<(), P::Error> + Send + Sync + 'static,
{
    Arc::new(hook)
}

/// Mutable view of a run handed to each hook
pub struct HookContext<'a, P: Pipeline> {
    /// The pipeline value and its run-scoped fields
    pub pipeline: &'a mut P,
    pub point: HookPoint,
    pub run_id: &'a RunId,
    pub options: &'a Options,
    /// Output of the phase body, not yet committed
    pub raw: &'a mut Option<P::Data>,
    /// Last committed value
    pub data: &'a mut Option<P::Data>,
    /// What load returned, once it has run
    pub output: &'a mut Option<P::Output>,
}

/// Per-type hook table.
///
/// Within each point, hooks inherited from parent pipeline types always run
/// before the type's own hooks, each group in registration order.
pub struct HookRegistry<P: Pipeline> {
    hooks: [Vec<HookFn<P>>; 6],
    inherited: [usize; 6],
}

impl<P: Pipeline> HookRegistry<P> {
    /// An empty registry
    pub fn new() -> Self {
        Self {
            hooks: std::array::from_fn(|_| Vec::new()),
            inherited: [0; 6],
        }
    }

    /// Build the registry for `P` from its [`Pipeline::register_hooks`]
    pub fn for_pipeline() -> Self {
        let mut registry = Self::new();
        P::register_hooks(&mut registry);
        registry
    }

    /// Append a hook to `point`
    pub fn register<F>(&mut self, point: HookPoint, hook: F) -> &mut Self
    where
        F: Fn(&mut HookContext<'_, P>) -> Result<(), P::Error> + Send + Sync + 'static,
    {
        self.hooks[point.slot()].push(hook_fn(hook));
        self
    }

    /// Pull in the hooks a parent pipeline type registers.
    ///
    /// `project` reaches the parent's value inside `P`. Parent hooks are
    /// placed after previously inherited hooks and ahead of all of `P`'s
    /// own hooks.
    pub fn inherit<Q>(&mut self, project: fn(&mut P) -> &mut Q) -> &mut Self
    where
        Q: Pipeline<Data = P::Data, Output = P::Output>,
        P::Error: From<Q::Error>,
    {
        let parent = HookRegistry::<Q>::for_pipeline();
        for point in HookPoint::ALL {
            let slot = point.slot();
            for hook in parent.hooks[slot].iter().cloned() {
                let adapted = hook_fn::<P, _>(move |cx| {
                    let mut parent_cx = HookContext {
                        pipeline: project(&mut *cx.pipeline),
                        point: cx.point,
                        run_id: cx.run_id,
                        options: cx.options,
                        raw: &mut *cx.raw,
                        data: &mut *cx.data,
                        output: &mut *cx.output,
                    };
                    hook(&mut parent_cx).map_err(P::Error::from)
                });
                self.hooks[slot].insert(self.inherited[slot], adapted);
                self.inherited[slot] += 1;
            }
        }
        self
    }

    /// Hooks registered at `point`, in run order
    pub fn hooks(&self, point: HookPoint) -> &[HookFn<P>] {
        &self.hooks[point.slot()]
    }

    pub fn len(&self) -> usize {
        self.hooks.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run the hooks for `point` against `run`.
    ///
    /// A no-op returning `false` unless the run is at `point`. Otherwise runs
    /// every hook in order, commits raw into data at the after point of a
    /// committing phase, advances the run and returns `true`. A failing hook
    /// stops dispatch and leaves the run at `point`.
    pub fn invoke(&self, run: &mut Run<P>, point: HookPoint) -> Result<bool, RunError<P::Error>> {
        if run.state() != point.state() {
            return Ok(false);
        }
        for hook in self.hooks(point) {
            let mut cx = run.hook_context(point);
            hook(&mut cx).map_err(|source| RunError::Hook { point, source })?;
        }
        run.finish_hook_point(point);
        Ok(true)
    }
}

impl<P: Pipeline> Default for HookRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Pipeline> Clone for HookRegistry<P> {
    fn clone(&self) -> Self {
        Self {
            hooks: self.hooks.clone(),
            inherited: self.inherited,
        }
    }
}

impl<P: Pipeline> std::fmt::Debug for HookRegistry<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for point in HookPoint::ALL {
            map.entry(&point.to_string(), &self.hooks(point).len());
        }
        map.finish()
    }
}

#[cfg(test)]
#[path = "hooks_tests.rs"]
mod tests;
