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

//! ROW_NUMBER analytic function

use rustc_hash::FxHashMap;

use crate::core::{ColumnMetadata, DataType, Record, Result, RowId, Value};
use crate::functions::{
    AnalyticFunction, AnalyticFunctionType, PartitionBy, PartitionKey, NULL_VALUE,
};
use crate::storage::traits::RandomAccessCursor;

/// ROW_NUMBER analytic function
///
/// Returns the sequential row number within the row's partition, starting at
/// 1, following the order in which rows were accumulated. Placed in an
/// ordered group, that is the group's ORDER BY.
pub struct RowNumberFunction {
    partition_by: PartitionBy,
    metadata: [ColumnMetadata; 1],
    counters: FxHashMap<PartitionKey, i64>,
    numbers: FxHashMap<RowId, i64>,
    output: Value,
}

impl RowNumberFunction {
    pub fn new(name: impl Into<String>, partition_by: PartitionBy) -> Self {
        Self {
            partition_by,
            metadata: [ColumnMetadata::not_null(name, DataType::Integer)],
            counters: FxHashMap::default(),
            numbers: FxHashMap::default(),
            output: Value::null(DataType::Integer),
        }
    }
}

impl AnalyticFunction for RowNumberFunction {
    fn name(&self) -> &str {
        "ROW_NUMBER"
    }

    fn function_type(&self) -> AnalyticFunctionType {
        AnalyticFunctionType::TwoPass
    }

    fn metadata(&self) -> &[ColumnMetadata] {
        &self.metadata
    }

    fn add(&mut self, record: &dyn Record) -> Result<()> {
        let counter = self
            .counters
            .entry(self.partition_by.key(record))
            .or_insert(0);
        *counter += 1;
        self.numbers.insert(record.row_id(), *counter);
        Ok(())
    }

    fn prepare(&mut self, _cursor: &mut dyn RandomAccessCursor) -> Result<()> {
        // per-partition counters are not needed for emission
        self.counters = FxHashMap::default();
        Ok(())
    }

    fn prepare_for(&mut self, record: &dyn Record) -> Result<()> {
        self.output = match self.numbers.get(&record.row_id()) {
            Some(n) => Value::integer(*n),
            None => Value::null(DataType::Integer),
        };
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
        self.numbers.clear();
        self.output = Value::null(DataType::Integer);
    }
}
