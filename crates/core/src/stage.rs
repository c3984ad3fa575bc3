// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stage contract
//!
//! A concrete pipeline supplies up to three stage bodies. Any body left
//! unimplemented is a no-op that produces nothing.

use crate::hooks::HookRegistry;
use crate::id::RunId;
use crate::options::Options;
use std::sync::Arc;

/// Caller-supplied callback bound on each `process` call
pub type Block<D> = Arc<dyn Fn(&D) + Send + Sync>;

/// What a stage body can see of its run
pub struct StageContext<'a, D> {
    pub(crate) run_id: &'a RunId,
    pub(crate) options: &'a Options,
    pub(crate) data: Option<&'a D>,
    pub(crate) block: Option<&'a Block<D>>,
}

impl<'a, D> StageContext<'a, D> {
    pub fn run_id(&self) -> &'a RunId {
        self.run_id
    }

    /// Options bound on the run's first `process` call
    pub fn options(&self) -> &'a Options {
        self.options
    }

    /// The last committed value
    pub fn data(&self) -> Option<&'a D> {
        self.data
    }

    /// Hand `value` to the bound block. Returns false when none is bound.
    pub fn call_block(&self, value: &D) -> bool {
        match self.block {
            Some(block) => {
                block(value);
                true
            }
            None => false,
        }
    }
}

/// A concrete extract/transform/load implementation.
///
/// The implementing value is owned by its [`Run`](crate::Run) and may keep
/// run-scoped fields of its own (a parsed header, counters, ...) that hooks
/// reach through [`HookContext`](crate::HookContext).
pub trait Pipeline: Send + Sized + 'static {
    /// Name used in logs and replay lines
    const NAME: &'static str;

    /// Value produced by extract and transform, committed between phases
    type Data: Clone + Send + 'static;
    /// Value produced by load
    type Output: Send + 'static;
    type Error: std::error::Error + Send + Sync + 'static;

    fn extract(
        &mut self,
        cx: &StageContext<'_, Self::Data>,
    ) -> Result<Option<Self::Data>, Self::Error> {
        let _ = cx;
        Ok(None)
    }

    fn transform(
        &mut self,
        cx: &StageContext<'_, Self::Data>,
    ) -> Result<Option<Self::Data>, Self::Error> {
        let _ = cx;
        Ok(None)
    }

    fn load(
        &mut self,
        cx: &StageContext<'_, Self::Data>,
    ) -> Result<Option<Self::Output>, Self::Error> {
        let _ = cx;
        Ok(None)
    }

    /// Register this type's hooks. Called once per registry build.
    fn register_hooks(hooks: &mut HookRegistry<Self>) {
        let _ = hooks;
    }
}
