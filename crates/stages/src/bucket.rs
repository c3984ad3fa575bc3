// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Record consolidation
//!
//! A bucket merges key/value records arriving from several sources into one
//! record. Later values override earlier ones. An optional white list both
//! restricts which keys are kept and fixes their output order.

use crate::observation::Observation;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// A flat key/value record
pub type Record = BTreeMap<String, Value>;

/// Converts the bucket contents on the way out
pub type Filter = Arc<dyn Fn(&Record) -> Value + Send + Sync>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BucketError {
    #[error("don't know how to use {kind} data")]
    Unsupported { kind: &'static str },

    #[error("option `{key}` must be {expected}")]
    InvalidOption { key: String, expected: &'static str },

    #[error("bucket is empty, nothing to load")]
    Empty,
}

/// Something a bucket knows how to merge
#[derive(Debug, Clone, PartialEq)]
pub enum BucketInput {
    Map(Record),
    Observation(Observation),
    Pairs(Vec<(String, Value)>),
}

impl BucketInput {
    fn into_pairs(self) -> Vec<(String, Value)> {
        match self {
            BucketInput::Map(record) => record.into_iter().collect(),
            BucketInput::Observation(observation) => observation.into_record().into_iter().collect(),
            BucketInput::Pairs(pairs) => pairs,
        }
    }
}

impl From<Record> for BucketInput {
    fn from(record: Record) -> Self {
        BucketInput::Map(record)
    }
}

impl From<Observation> for BucketInput {
    fn from(observation: Observation) -> Self {
        BucketInput::Observation(observation)
    }
}

impl From<Vec<(String, Value)>> for BucketInput {
    fn from(pairs: Vec<(String, Value)>) -> Self {
        BucketInput::Pairs(pairs)
    }
}

impl TryFrom<Value> for BucketInput {
    type Error = BucketError;

    /// Only JSON objects carry key/value data
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(BucketInput::Map(map.into_iter().collect())),
            other => Err(BucketError::Unsupported {
                kind: json_kind(&other),
            }),
        }
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Clone, Default)]
pub struct Bucket {
    raw: Record,
    white_list: Option<Vec<String>>,
    filter: Option<Filter>,
}

impl Bucket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an initial record
    pub fn from_input(input: impl Into<BucketInput>) -> Self {
        let mut bucket = Self::new();
        bucket.add(input);
        bucket
    }

    /// Set the conversion applied by [`filtered_data`](Self::filtered_data)
    /// and [`dump`](Self::dump)
    pub fn with_filter<F>(self, filter: F) -> Self
    where
        F: Fn(&Record) -> Value + Send + Sync + 'static,
    {
        Self {
            filter: Some(Arc::new(filter)),
            ..self
        }
    }

    pub(crate) fn with_shared_filter(self, filter: Option<Filter>) -> Self {
        Self { filter, ..self }
    }

    /// Merge a record, overriding existing keys. Keys outside the white
    /// list are silently dropped.
    pub fn add(&mut self, input: impl Into<BucketInput>) -> &mut Self {
        for (key, value) in input.into().into_pairs() {
            if self.allows(&key) {
                self.raw.insert(key, value);
            }
        }
        self
    }

    /// Merge an arbitrary JSON value, which must be an object
    pub fn add_value(&mut self, value: Value) -> Result<&mut Self, BucketError> {
        let input = BucketInput::try_from(value)?;
        Ok(self.add(input))
    }

    /// Contents as merged, without the filter applied
    pub fn raw_data(&self) -> &Record {
        &self.raw
    }

    pub fn filtered_data(&self) -> Value {
        self.filter_record(&self.raw)
    }

    /// Filtered contents; the bucket is left empty
    pub fn dump(&mut self) -> Value {
        let raw = std::mem::take(&mut self.raw);
        self.filter_record(&raw)
    }

    /// Restrict and order keys. Existing data outside the list is dropped.
    pub fn set_white_list<I, S>(&mut self, labels: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        self.raw.retain(|key, _| labels.contains(key));
        self.white_list = Some(labels);
        self
    }

    /// The white list, if one is set
    pub fn labels(&self) -> Option<&[String]> {
        self.white_list.as_deref()
    }

    /// Entries in white-list order, with `null` for labels never seen.
    /// Without a white list, entries come in key order.
    pub fn ordered_data(&self) -> Vec<(String, Value)> {
        match &self.white_list {
            Some(labels) => labels
                .iter()
                .map(|label| {
                    let value = self.raw.get(label).cloned().unwrap_or(Value::Null);
                    (label.clone(), value)
                })
                .collect(),
            None => self
                .raw
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        }
    }

    pub fn to_vec(&self) -> Vec<Value> {
        self.ordered_data()
            .into_iter()
            .map(|(_, value)| value)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    fn allows(&self, key: &str) -> bool {
        self.white_list
            .as_ref()
            .map_or(true, |labels| labels.iter().any(|label| label == key))
    }

    fn filter_record(&self, record: &Record) -> Value {
        match &self.filter {
            Some(filter) => filter(record),
            None => Value::Object(record.clone().into_iter().collect()),
        }
    }
}

impl std::fmt::Debug for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bucket")
            .field("raw", &self.raw)
            .field("white_list", &self.white_list)
            .field("filtered", &self.filter.is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "bucket_tests.rs"]
mod tests;
