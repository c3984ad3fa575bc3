// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! etl-stages: building blocks for pipeline stage bodies
//!
//! - `Bucket` consolidates key/value records from several sources
//! - `Observation` is a record stamped with when it occurred
//! - `BucketPipeline` wires a bucket through extract, transform and load

mod bucket;
mod observation;
mod pipeline;

pub use bucket::{Bucket, BucketError, BucketInput, Filter, Record};
pub use observation::Observation;
pub use pipeline::BucketPipeline;
