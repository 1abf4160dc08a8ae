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

//! Partition-wide aggregates: SUM, COUNT and fraction of total
//!
//! Every row of a partition reports the same aggregate, so the order in
//! which rows are accumulated does not matter. These functions work in
//! ordered and unordered groups alike.

use rustc_hash::FxHashMap;

use crate::core::{ColumnMetadata, DataType, Record, Result, Value};
use crate::functions::{
    AnalyticFunction, AnalyticFunctionType, PartitionBy, PartitionKey, NULL_VALUE,
};
use crate::storage::traits::RandomAccessCursor;

/// Sum state - tracks whether we have integers or floats
#[derive(Debug, Default, Clone, Copy)]
pub(crate) enum SumState {
    #[default]
    Empty,
    Integer(i64),
    Float(f64),
}

impl SumState {
    pub(crate) fn accumulate(&mut self, value: &Value) {
        match value {
            Value::Integer(i) => match self {
                SumState::Empty => *self = SumState::Integer(*i),
                SumState::Integer(sum) => match sum.checked_add(*i) {
                    Some(s) => *sum = s,
                    None => *self = SumState::Float(*sum as f64 + *i as f64),
                },
                SumState::Float(sum) => *sum += *i as f64,
            },
            Value::Float(f) => match self {
                SumState::Empty => *self = SumState::Float(*f),
                SumState::Integer(sum) => *self = SumState::Float(*sum as f64 + f),
                SumState::Float(sum) => *sum += f,
            },
            _ => {} // NULL and non-numeric values are ignored
        }
    }

    pub(crate) fn result(&self, data_type: DataType) -> Value {
        match self {
            SumState::Empty => Value::null(data_type),
            SumState::Integer(sum) => Value::Integer(*sum),
            SumState::Float(sum) => Value::Float(*sum),
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            SumState::Empty => None,
            SumState::Integer(sum) => Some(*sum as f64),
            SumState::Float(sum) => Some(*sum),
        }
    }
}

/// SUM over a partition
///
/// Returns the sum of all non-NULL values of `column` in the row's partition.
pub struct SumFunction {
    column: usize,
    partition_by: PartitionBy,
    metadata: [ColumnMetadata; 1],
    totals: FxHashMap<PartitionKey, SumState>,
    output: Value,
}

impl SumFunction {
    /// `data_type` is the output type: INTEGER for integer columns, FLOAT otherwise
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
            totals: FxHashMap::default(),
            output: Value::null(data_type),
        }
    }
}

impl AnalyticFunction for SumFunction {
    fn name(&self) -> &str {
        "SUM"
    }

    fn function_type(&self) -> AnalyticFunctionType {
        AnalyticFunctionType::TwoPass
    }

    fn metadata(&self) -> &[ColumnMetadata] {
        &self.metadata
    }

    fn add(&mut self, record: &dyn Record) -> Result<()> {
        let value = record.value(self.column)?;
        self.totals
            .entry(self.partition_by.key(record))
            .or_default()
            .accumulate(value);
        Ok(())
    }

    fn prepare(&mut self, _cursor: &mut dyn RandomAccessCursor) -> Result<()> {
        Ok(())
    }

    fn prepare_for(&mut self, record: &dyn Record) -> Result<()> {
        let data_type = self.metadata[0].data_type;
        self.output = match self.totals.get(&self.partition_by.key(record)) {
            Some(total) => total.result(data_type),
            None => Value::null(data_type),
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
        self.totals.clear();
        self.output = Value::null(self.metadata[0].data_type);
    }
}

/// COUNT over a partition
///
/// Counts every row of the partition, or only rows where `column` is not
/// NULL when built with [`CountFunction::of_column`].
pub struct CountFunction {
    column: Option<usize>,
    partition_by: PartitionBy,
    metadata: [ColumnMetadata; 1],
    counts: FxHashMap<PartitionKey, i64>,
    output: Value,
}

impl CountFunction {
    pub fn new(name: impl Into<String>, partition_by: PartitionBy) -> Self {
        Self {
            column: None,
            partition_by,
            metadata: [ColumnMetadata::not_null(name, DataType::Integer)],
            counts: FxHashMap::default(),
            output: Value::integer(0),
        }
    }

    /// Count non-NULL values of `column` instead of rows
    pub fn of_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }
}

impl AnalyticFunction for CountFunction {
    fn name(&self) -> &str {
        "COUNT"
    }

    fn function_type(&self) -> AnalyticFunctionType {
        AnalyticFunctionType::TwoPass
    }

    fn metadata(&self) -> &[ColumnMetadata] {
        &self.metadata
    }

    fn add(&mut self, record: &dyn Record) -> Result<()> {
        let counted = match self.column {
            Some(c) => !record.value(c)?.is_null(),
            None => true,
        };
        let count = self
            .counts
            .entry(self.partition_by.key(record))
            .or_insert(0);
        if counted {
            *count += 1;
        }
        Ok(())
    }

    fn prepare(&mut self, _cursor: &mut dyn RandomAccessCursor) -> Result<()> {
        Ok(())
    }

    fn prepare_for(&mut self, record: &dyn Record) -> Result<()> {
        let count = self
            .counts
            .get(&self.partition_by.key(record))
            .copied()
            .unwrap_or(0);
        self.output = Value::integer(count);
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
        self.counts.clear();
        self.output = Value::integer(0);
    }
}

/// Fraction of the partition total
///
/// Returns `value / SUM(value)` over the row's partition as FLOAT. A NULL
/// value, or a partition whose total is zero or NULL, yields NULL.
pub struct FractionOfTotalFunction {
    column: usize,
    partition_by: PartitionBy,
    metadata: [ColumnMetadata; 1],
    sums: FxHashMap<PartitionKey, SumState>,
    totals: FxHashMap<PartitionKey, f64>,
    output: Value,
}

impl FractionOfTotalFunction {
    pub fn new(name: impl Into<String>, column: usize, partition_by: PartitionBy) -> Self {
        Self {
            column,
            partition_by,
            metadata: [ColumnMetadata::new(name, DataType::Float)],
            sums: FxHashMap::default(),
            totals: FxHashMap::default(),
            output: Value::null(DataType::Float),
        }
    }
}

impl AnalyticFunction for FractionOfTotalFunction {
    fn name(&self) -> &str {
        "FRACTION_OF_TOTAL"
    }

    fn function_type(&self) -> AnalyticFunctionType {
        AnalyticFunctionType::TwoPass
    }

    fn metadata(&self) -> &[ColumnMetadata] {
        &self.metadata
    }

    fn add(&mut self, record: &dyn Record) -> Result<()> {
        let value = record.value(self.column)?;
        self.sums
            .entry(self.partition_by.key(record))
            .or_default()
            .accumulate(value);
        Ok(())
    }

    fn prepare(&mut self, _cursor: &mut dyn RandomAccessCursor) -> Result<()> {
        self.totals = std::mem::take(&mut self.sums)
            .into_iter()
            .filter_map(|(key, sum)| sum.as_f64().map(|t| (key, t)))
            .collect();
        Ok(())
    }

    fn prepare_for(&mut self, record: &dyn Record) -> Result<()> {
        let value = record.value(self.column)?.as_float64();
        let total = self.totals.get(&self.partition_by.key(record)).copied();
        self.output = match (value, total) {
            (Some(v), Some(t)) if t != 0.0 => Value::float(v / t),
            _ => Value::null(DataType::Float),
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
        self.sums.clear();
        self.totals.clear();
        self.output = Value::null(DataType::Float);
    }
}
