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

//! Analytic Function System
//!
//! This module provides the protocol every analytic (window) function follows
//! and a set of reference functions:
//!
//! - [`AnalyticFunction`] - accumulate / prepare / emit protocol
//! - [`AnalyticFunctionType`] - streaming or two-pass evaluation
//! - [`PartitionBy`] - partition key extraction shared by the functions
//! - [`window`] - ROW_NUMBER, RANK, LAG, SUM and friends
//!
//! # Lifecycle
//!
//! `reset()` between executions, `add()` zero or more times during the
//! accumulation pass, `prepare()` once after accumulation, then
//! `prepare_for()` once per emitted row. After `prepare_for()` the row's
//! result is readable through `value()`.

pub mod window;

use std::sync::Arc;

use smallvec::SmallVec;

use crate::common::SymbolTable;
use crate::core::{ColumnMetadata, DataType, Record, Result, Value};
use crate::storage::traits::RandomAccessCursor;

/// Returned for output columns a function does not have
pub(crate) static NULL_VALUE: Value = Value::Null(DataType::Null);

/// How a function obtains its results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalyticFunctionType {
    /// Computes each row's result during emission, in natural row order
    ///
    /// Streaming functions in a group without an order index receive no
    /// `add()` calls.
    Streaming,
    /// Needs every row through `add()` before the first result can be read
    TwoPass,
}

impl AnalyticFunctionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyticFunctionType::Streaming => "STREAMING",
            AnalyticFunctionType::TwoPass => "TWO_PASS",
        }
    }
}

/// Trait for analytic functions
pub trait AnalyticFunction: Send {
    /// Get the function name
    fn name(&self) -> &str;

    /// Evaluation mode
    fn function_type(&self) -> AnalyticFunctionType;

    /// Output columns, usually exactly one
    fn metadata(&self) -> &[ColumnMetadata];

    /// Accumulate one row, in the order of the function's group
    fn add(&mut self, record: &dyn Record) -> Result<()>;

    /// Finish accumulation; `cursor` is the source the rows came from
    fn prepare(&mut self, cursor: &mut dyn RandomAccessCursor) -> Result<()>;

    /// Compute the output for one emitted row into the function's slot
    fn prepare_for(&mut self, record: &dyn Record) -> Result<()>;

    /// Output value of a column for the row last given to `prepare_for()`
    fn value(&self, column: usize) -> &Value;

    /// Symbol table interpreting a symbol-typed output column
    fn symbol_table(&self, _column: usize) -> Option<Arc<SymbolTable>> {
        None
    }

    /// Drop all accumulated state
    fn reset(&mut self);

    /// Release resources; the function is not used afterwards
    fn close(&mut self) {
        self.reset();
    }
}

/// Partition key of one row
pub type PartitionKey = SmallVec<[Value; 2]>;

/// Columns whose values split rows into partitions
///
/// No columns means one partition holding every row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionBy {
    columns: SmallVec<[usize; 4]>,
}

impl PartitionBy {
    pub fn new(columns: &[usize]) -> Self {
        Self {
            columns: SmallVec::from_slice(columns),
        }
    }

    /// Single partition
    pub fn none() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &[usize] {
        &self.columns
    }

    /// Extract the partition key of a record; missing columns read as NULL
    pub fn key(&self, record: &dyn Record) -> PartitionKey {
        self.columns
            .iter()
            .map(|&c| record.get(c).cloned().unwrap_or_default())
            .collect()
    }
}

// Re-export main types
pub use window::{
    CountFunction, DenseRankFunction, FractionOfTotalFunction, LagFunction, LeadFunction,
    RankFunction, RowNumberFunction, RunningRowNumberFunction, RunningSumFunction, SumFunction,
};
