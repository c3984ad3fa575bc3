// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Time-stamped records

use crate::bucket::Record;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const OCCURRED_AT: &str = "occurred_at";

/// A record stamped with when it was observed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub occurred_at: DateTime<Utc>,
    #[serde(flatten)]
    pub fields: Record,
}

impl Observation {
    /// Stamp `fields` with the current time
    pub fn new(fields: Record) -> Self {
        Self::at(Utc::now(), fields)
    }

    pub fn at(occurred_at: DateTime<Utc>, fields: Record) -> Self {
        Self {
            occurred_at,
            fields,
        }
    }

    /// Build from a record that may carry its own `occurred_at`.
    ///
    /// A valid RFC 3339 `occurred_at` becomes the timestamp. Anything else
    /// stays in the fields and the observation is stamped now.
    pub fn from_map(mut fields: Record) -> Self {
        let parsed = match fields.get(OCCURRED_AT) {
            Some(Value::String(s)) => match DateTime::parse_from_rfc3339(s) {
                Ok(time) => Some(time.with_timezone(&Utc)),
                Err(e) => {
                    tracing::debug!(value = %s, error = %e, "ignoring unparseable occurred_at");
                    None
                }
            },
            _ => None,
        };

        match parsed {
            Some(occurred_at) => {
                fields.remove(OCCURRED_AT);
                Self::at(occurred_at, fields)
            }
            None => Self::new(fields),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Fields plus `occurred_at` as an RFC 3339 string
    pub fn into_record(self) -> Record {
        let mut record = self.fields;
        record.insert(
            OCCURRED_AT.to_string(),
            Value::String(self.occurred_at.to_rfc3339()),
        );
        record
    }
}

#[cfg(test)]
#[path = "observation_tests.rs"]
mod tests;
