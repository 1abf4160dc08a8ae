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

//! # rowreplay - cached-row analytic execution stage
//!
//! rowreplay evaluates SQL window functions over the rows of an upstream
//! record source without materializing those rows. It caches only row-ids:
//! one natural-order list plus one ordered index per ORDER BY clause. Every
//! row is re-read by random access when a function or the consumer needs it.
//!
//! ## Key Features
//!
//! - **Row-id caching** - paged row list and red-black order indexes
//! - **Order groups** - functions sharing a comparator share one index
//! - **Two-pass and streaming functions** - ROW_NUMBER, RANK, DENSE_RANK,
//!   LAG, LEAD, SUM, COUNT, fraction of total, running row number and sum
//! - **Cooperative cancellation** - polled while rows are captured and replayed
//! - **Symbol facades** - output symbol columns resolve through their functions
//!
//! ## Quick Start
//!
//! ```rust
//! use rowreplay::{
//!     row, AnalyticConfig, AnalyticRecordSource, CancellationHandle, ColumnComparator,
//!     ColumnMetadata, DataType, MemoryRecordSource, PartitionBy, Record, RecordCursor,
//!     RecordMetadata, RowNumberFunction,
//! };
//!
//! let metadata = RecordMetadata::new(vec![
//!     ColumnMetadata::new("part", DataType::Text),
//!     ColumnMetadata::new("val", DataType::Integer),
//! ]);
//! let source = MemoryRecordSource::new(
//!     metadata,
//!     vec![row!["A", 3i64], row!["A", 1i64], row!["B", 5i64]],
//! );
//!
//! let mut analytic = AnalyticRecordSource::new(
//!     AnalyticConfig::default(),
//!     Box::new(source),
//!     vec![Some(Box::new(ColumnComparator::ascending(&[0, 1])))],
//!     vec![vec![Box::new(RowNumberFunction::new("rn", PartitionBy::new(&[0])))]],
//! )
//! .unwrap();
//!
//! analytic.prepare_cursor(&CancellationHandle::new()).unwrap();
//! let mut numbers = Vec::new();
//! while analytic.has_next().unwrap() {
//!     numbers.push(analytic.next().get(2).unwrap().as_int64().unwrap());
//! }
//! assert_eq!(numbers, vec![2, 1, 1]);
//! analytic.close().unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`core`] - Core types ([`DataType`], [`Value`], [`Row`], [`Error`])
//! - [`common`] - Utilities ([`SymbolTable`])
//! - [`storage`] - Cursor traits, row list, order indexes, in-memory source
//! - [`functions`] - Analytic function contract and window functions
//! - [`executor`] - The analytic record source

pub mod common;
pub mod core;
pub mod executor;
pub mod functions;
pub mod storage;

// Re-export main types for convenience
pub use core::{
    ColumnMetadata, DataType, Error, Record, RecordMetadata, Result, Row, RowId, RowRecord, Value,
};

// Re-export common utilities
pub use common::{SymbolTable, NULL_SYMBOL_KEY};

// Re-export config types
pub use storage::{AnalyticConfig, DEFAULT_INDEX_PAGE_SIZE, DEFAULT_ROW_LIST_PAGE_SIZE};

// Re-export storage types
pub use storage::{
    EmptyStorageFacade, MemoryRecordSource, OrderIndex, RandomAccessCursor, RecordCursor,
    RowHandle, RowIdTree, RowList, SourceStats, StorageFacade, SymbolTableFacade,
};

// Re-export function types
pub use functions::{
    AnalyticFunction, AnalyticFunctionType, CountFunction, DenseRankFunction,
    FractionOfTotalFunction, LagFunction, LeadFunction, PartitionBy, PartitionKey, RankFunction,
    RowNumberFunction, RunningRowNumberFunction, RunningSumFunction, SumFunction,
};

// Re-export executor types
pub use executor::{
    AnalyticRecord, AnalyticRecordSource, AnalyticStorageFacade, CancellationHandle,
    ColumnComparator, RecordComparator, SortKey,
};
