// Copyright 2025 Stoolap Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Analytic execution stage
//!
//! [`AnalyticRecordSource`] wraps a random-access record source, captures
//! its row-ids once, replays them through groups of analytic functions and
//! finally emits every source row, in its original order, extended with the
//! function outputs.
//!
//! # Components
//!
//! - [`AnalyticRecordSource`] - the cached-row analytic record source
//! - [`AnalyticRecord`] - composite record of source columns and outputs
//! - [`AnalyticStorageFacade`] - symbol resolution over the composite record
//! - [`RecordComparator`] / [`ColumnComparator`] - order group comparators
//! - [`CancellationHandle`] - cooperative cancellation signal

pub mod analytic;
pub mod comparator;
pub mod context;
pub mod record;

pub use analytic::AnalyticRecordSource;
pub use comparator::{ColumnComparator, RecordComparator, SortKey};
pub use context::CancellationHandle;
pub use record::{AnalyticRecord, AnalyticStorageFacade};
