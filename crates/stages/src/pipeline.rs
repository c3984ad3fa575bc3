// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ready-made bucket pipeline
//!
//! Options:
//! - `records`: array of JSON objects merged in order by extract
//! - `labels`: array of key names applied as a white list by transform
//! - `require_records`: when true, refuse to load an empty bucket

use crate::bucket::{Bucket, BucketError, Filter, Record};
use etl_core::{HookPoint, HookRegistry, Pipeline, StageContext};
use serde_json::Value;
use std::sync::Arc;

const RECORDS: &str = "records";
const LABELS: &str = "labels";
const REQUIRE_RECORDS: &str = "require_records";

/// Consolidates the `records` option into one record
#[derive(Clone, Default)]
pub struct BucketPipeline {
    filter: Option<Filter>,
    gathered: usize,
}

impl BucketPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter applied to the consolidated record by load
    pub fn with_filter<F>(self, filter: F) -> Self
    where
        F: Fn(&Record) -> Value + Send + Sync + 'static,
    {
        Self {
            filter: Some(Arc::new(filter)),
            ..self
        }
    }

    /// Records merged by the last extract
    pub fn gathered(&self) -> usize {
        self.gathered
    }
}

impl Pipeline for BucketPipeline {
    const NAME: &'static str = "BucketPipeline";
    type Data = Bucket;
    type Output = Value;
    type Error = BucketError;

    fn extract(&mut self, cx: &StageContext<'_, Bucket>) -> Result<Option<Bucket>, BucketError> {
        let mut bucket = Bucket::new().with_shared_filter(self.filter.clone());
        let records = match cx.options().get(RECORDS) {
            None => Vec::new(),
            Some(Value::Array(records)) => records.clone(),
            Some(_) => {
                return Err(BucketError::InvalidOption {
                    key: RECORDS.to_string(),
                    expected: "an array of objects",
                })
            }
        };

        self.gathered = records.len();
        for record in records {
            bucket.add_value(record)?;
        }
        tracing::debug!(
            run = %cx.run_id(),
            records = self.gathered,
            keys = bucket.len(),
            "gathered records"
        );

        cx.call_block(&bucket);
        Ok(Some(bucket))
    }

    fn transform(&mut self, cx: &StageContext<'_, Bucket>) -> Result<Option<Bucket>, BucketError> {
        let labels = match cx.options().get(LABELS) {
            None => return Ok(cx.data().cloned()),
            Some(value) => string_list(value).ok_or_else(|| BucketError::InvalidOption {
                key: LABELS.to_string(),
                expected: "an array of strings",
            })?,
        };

        let mut bucket = cx.data().cloned().unwrap_or_default();
        bucket.set_white_list(labels);
        Ok(Some(bucket))
    }

    fn load(&mut self, cx: &StageContext<'_, Bucket>) -> Result<Option<Value>, BucketError> {
        Ok(cx.data().map(Bucket::filtered_data))
    }

    fn register_hooks(hooks: &mut HookRegistry<Self>) {
        hooks.register(HookPoint::BeforeLoad, |cx| {
            let required = cx.options.get_bool(REQUIRE_RECORDS).unwrap_or(false);
            let empty = match &*cx.data {
                Some(bucket) => bucket.is_empty(),
                None => true,
            };
            if required && empty {
                return Err(BucketError::Empty);
            }
            Ok(())
        });
    }
}

impl std::fmt::Debug for BucketPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BucketPipeline")
            .field("filtered", &self.filter.is_some())
            .field("gathered", &self.gathered)
            .finish()
    }
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|label| label.as_str().map(str::to_string))
        .collect()
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
