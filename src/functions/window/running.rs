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

//! Streaming (running) analytic functions
//!
//! Streaming functions compute each row's result while rows are emitted in
//! natural order; they need no accumulation pass. Any `add()` they receive is
//! ignored.

use rustc_hash::FxHashMap;

use crate::core::{ColumnMetadata, DataType, Record, Result, Value};
use crate::functions::{
    AnalyticFunction, AnalyticFunctionType, PartitionBy, PartitionKey, NULL_VALUE,
};
use crate::storage::traits::RandomAccessCursor;

use super::aggregate::SumState;

/// Running row number in natural order
///
/// The n-th emitted row of a partition gets n.
pub struct RunningRowNumberFunction {
    partition_by: PartitionBy,
    metadata: [ColumnMetadata; 1],
    counters: FxHashMap<PartitionKey, i64>,
    output: Value,
}

impl RunningRowNumberFunction {
    pub fn new(name: impl Into<String>, partition_by: PartitionBy) -> Self {
        Self {
            partition_by,
            metadata: [ColumnMetadata::not_null(name, DataType::Integer)],
            counters: FxHashMap::default(),
            output: Value::null(DataType::Integer),
        }
    }
}

impl AnalyticFunction for RunningRowNumberFunction {
    fn name(&self) -> &str {
        "RUNNING_ROW_NUMBER"
    }

    fn function_type(&self) -> AnalyticFunctionType {
        AnalyticFunctionType::Streaming
    }

    fn metadata(&self) -> &[ColumnMetadata] {
        &self.metadata
    }

    fn add(&mut self, _record: &dyn Record) -> Result<()> {
        Ok(())
    }

    fn prepare(&mut self, _cursor: &mut dyn RandomAccessCursor) -> Result<()> {
        Ok(())
    }

    fn prepare_for(&mut self, record: &dyn Record) -> Result<()> {
        let counter = self
            .counters
            .entry(self.partition_by.key(record))
            .or_insert(0);
        *counter += 1;
        self.output = Value::integer(*counter);
        Ok(())
    }

    fn value(&self, column: usize) -> &Value {
        if column == 0 {
            &self.output
        } else {
            &NULL_VALUE
        }
    }

    fn reset(&mut self) {
        self.counters.clear();
        self.output = Value::null(DataType::Integer);
    }
}

/// Running SUM in natural order
///
/// Each row reports the sum of `column` over the rows of its partition
/// emitted so far, itself included. NULLs are skipped.
pub struct RunningSumFunction {
    column: usize,
    partition_by: PartitionBy,
    metadata: [ColumnMetadata; 1],
    sums: FxHashMap<PartitionKey, SumState>,
    output: Value,
}

impl RunningSumFunction {
    pub fn new(
        name: impl Into<String>,
        column: usize,
        data_type: DataType,
        partition_by: PartitionBy,
    ) -> Self {
        Self {
            column,
            partition_by,
            metadata: [ColumnMetadata::new(name, data_type)],
            sums: FxHashMap::default(),
            output: Value::null(data_type),
        }
    }
}

impl AnalyticFunction for RunningSumFunction {
    fn name(&self) -> &str {
        "RUNNING_SUM"
    }

    fn function_type(&self) -> AnalyticFunctionType {
        AnalyticFunctionType::Streaming
    }

    fn metadata(&self) -> &[ColumnMetadata] {
        &self.metadata
    }

    fn add(&mut self, _record: &dyn Record) -> Result<()> {
        Ok(())
    }

    fn prepare(&mut self, _cursor: &mut dyn RandomAccessCursor) -> Result<()> {
        Ok(())
    }

    fn prepare_for(&mut self, record: &dyn Record) -> Result<()> {
        let value = record.value(self.column)?;
        let sum = self
            .sums
            .entry(self.partition_by.key(record))
            .or_default();
        sum.accumulate(value);
        self.output = sum.result(self.metadata[0].data_type);
        Ok(())
    }

    fn value(&self, column: usize) -> &Value {
        if column == 0 {
            &self.output
        } else {
            &NULL_VALUE
        }
    }

    fn reset(&mut self) {
        self.sums.clear();
        self.output = Value::null(self.metadata[0].data_type);
    }
}
