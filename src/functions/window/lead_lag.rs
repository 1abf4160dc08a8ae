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

//! LEAD and LAG analytic functions
//!
//! During accumulation both functions only remember the row-ids of each
//! partition in group order. `prepare()` then resolves every row's target
//! row through random access on the source cursor.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::common::SymbolTable;
use crate::core::{ColumnMetadata, DataType, Record, Result, RowId, Value};
use crate::functions::{
    AnalyticFunction, AnalyticFunctionType, PartitionBy, PartitionKey, NULL_VALUE,
};
use crate::storage::traits::{RandomAccessCursor, RecordCursor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Lag,
    Lead,
}

struct Shift {
    direction: Direction,
    column: usize,
    offset: usize,
    default_value: Value,
    partition_by: PartitionBy,
    metadata: [ColumnMetadata; 1],
    partitions: FxHashMap<PartitionKey, Vec<RowId>>,
    results: FxHashMap<RowId, Value>,
    symbol_table: Option<Arc<SymbolTable>>,
    output: Value,
}

impl Shift {
    fn new(
        direction: Direction,
        name: String,
        column: usize,
        data_type: DataType,
        partition_by: PartitionBy,
    ) -> Self {
        Self {
            direction,
            column,
            offset: 1,
            default_value: Value::null(data_type),
            partition_by,
            metadata: [ColumnMetadata::new(name, data_type)],
            partitions: FxHashMap::default(),
            results: FxHashMap::default(),
            symbol_table: None,
            output: Value::null(data_type),
        }
    }

    fn data_type(&self) -> DataType {
        self.metadata[0].data_type
    }

    fn add(&mut self, record: &dyn Record) {
        self.partitions
            .entry(self.partition_by.key(record))
            .or_default()
            .push(record.row_id());
    }

    fn prepare(&mut self, cursor: &mut dyn RandomAccessCursor) -> Result<()> {
        if self.data_type().is_symbol() {
            self.symbol_table = cursor.storage_facade().symbol_table(self.column);
        }

        for rows in self.partitions.values() {
            for (i, row_id) in rows.iter().enumerate() {
                let target = match self.direction {
                    Direction::Lag => i.checked_sub(self.offset),
                    Direction::Lead => i.checked_add(self.offset).filter(|t| *t < rows.len()),
                };
                let value = match target {
                    Some(t) => cursor
                        .record_at(rows[t])?
                        .get(self.column)
                        .cloned()
                        .unwrap_or_else(|| Value::null(self.data_type())),
                    None => self.default_value.clone(),
                };
                self.results.insert(*row_id, value);
            }
        }
        self.partitions = FxHashMap::default();
        Ok(())
    }

    fn prepare_for(&mut self, record: &dyn Record) {
        self.output = self
            .results
            .get(&record.row_id())
            .cloned()
            .unwrap_or_else(|| self.default_value.clone());
    }

    fn reset(&mut self) {
        self.partitions.clear();
        self.results.clear();
        self.symbol_table = None;
        self.output = Value::null(self.data_type());
    }
}

/// LEAD analytic function
///
/// Returns the value from a row that is `offset` rows after the current row
/// within the partition. If there is no such row, returns the default value.
pub struct LeadFunction {
    shift: Shift,
}

impl LeadFunction {
    /// LEAD over `column` with offset 1 and a NULL default
    pub fn new(
        name: impl Into<String>,
        column: usize,
        data_type: DataType,
        partition_by: PartitionBy,
    ) -> Self {
        Self {
            shift: Shift::new(Direction::Lead, name.into(), column, data_type, partition_by),
        }
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.shift.offset = offset;
        self
    }

    pub fn with_default(mut self, default_value: Value) -> Self {
        self.shift.default_value = default_value;
        self
    }
}

/// LAG analytic function
///
/// Returns the value from a row that is `offset` rows before the current row
/// within the partition. If there is no such row, returns the default value.
pub struct LagFunction {
    shift: Shift,
}

impl LagFunction {
    /// LAG over `column` with offset 1 and a NULL default
    pub fn new(
        name: impl Into<String>,
        column: usize,
        data_type: DataType,
        partition_by: PartitionBy,
    ) -> Self {
        Self {
            shift: Shift::new(Direction::Lag, name.into(), column, data_type, partition_by),
        }
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.shift.offset = offset;
        self
    }

    pub fn with_default(mut self, default_value: Value) -> Self {
        self.shift.default_value = default_value;
        self
    }
}

macro_rules! impl_shift_function {
    ($ty:ty, $name:literal) => {
        impl AnalyticFunction for $ty {
            fn name(&self) -> &str {
                $name
            }

            fn function_type(&self) -> AnalyticFunctionType {
                AnalyticFunctionType::TwoPass
            }

            fn metadata(&self) -> &[ColumnMetadata] {
                &self.shift.metadata
            }

            fn add(&mut self, record: &dyn Record) -> Result<()> {
                self.shift.add(record);
                Ok(())
            }

            fn prepare(&mut self, cursor: &mut dyn RandomAccessCursor) -> Result<()> {
                self.shift.prepare(cursor)
            }

            fn prepare_for(&mut self, record: &dyn Record) -> Result<()> {
                self.shift.prepare_for(record);
                Ok(())
            }

            fn value(&self, column: usize) -> &Value {
                if column == 0 {
                    &self.shift.output
                } else {
                    &NULL_VALUE
                }
            }

            fn symbol_table(&self, column: usize) -> Option<Arc<SymbolTable>> {
                if column == 0 {
                    self.shift.symbol_table.clone()
                } else {
                    None
                }
            }

            fn reset(&mut self) {
                self.shift.reset();
            }
        }
    };
}

impl_shift_function!(LeadFunction, "LEAD");
impl_shift_function!(LagFunction, "LAG");
