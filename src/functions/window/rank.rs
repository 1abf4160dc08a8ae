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

//! RANK and DENSE_RANK analytic functions
//!
//! Both expect rows in ORDER BY order within each partition, so they belong
//! in an order group whose comparator sorts by the same order-key columns.

use rustc_hash::FxHashMap;

use crate::core::{ColumnMetadata, DataType, Record, Result, RowId, Value};
use crate::functions::{
    AnalyticFunction, AnalyticFunctionType, PartitionBy, PartitionKey, NULL_VALUE,
};
use crate::storage::traits::RandomAccessCursor;

#[derive(Debug, Default)]
struct PartitionRank {
    rows: i64,
    rank: i64,
    dense_rank: i64,
    last_order_key: Option<PartitionKey>,
}

/// Shared accumulator for RANK and DENSE_RANK
struct Ranker {
    partition_by: PartitionBy,
    order_by: PartitionBy,
    dense: bool,
    partitions: FxHashMap<PartitionKey, PartitionRank>,
    ranks: FxHashMap<RowId, i64>,
    output: Value,
}

impl Ranker {
    fn new(partition_by: PartitionBy, order_by: PartitionBy, dense: bool) -> Self {
        Self {
            partition_by,
            order_by,
            dense,
            partitions: FxHashMap::default(),
            ranks: FxHashMap::default(),
            output: Value::null(DataType::Integer),
        }
    }

    fn add(&mut self, record: &dyn Record) {
        let order_key = self.order_by.key(record);
        let state = self
            .partitions
            .entry(self.partition_by.key(record))
            .or_default();

        state.rows += 1;
        if state.last_order_key.as_ref() != Some(&order_key) {
            state.rank = state.rows;
            state.dense_rank += 1;
            state.last_order_key = Some(order_key);
        }
        let rank = if self.dense {
            state.dense_rank
        } else {
            state.rank
        };
        self.ranks.insert(record.row_id(), rank);
    }

    fn prepare_for(&mut self, record: &dyn Record) {
        self.output = match self.ranks.get(&record.row_id()) {
            Some(r) => Value::integer(*r),
            None => Value::null(DataType::Integer),
        };
    }

    fn reset(&mut self) {
        self.partitions.clear();
        self.ranks.clear();
        self.output = Value::null(DataType::Integer);
    }
}

/// RANK analytic function
///
/// Rows with equal order keys receive the same rank, and the next rank is
/// the row number (leaving gaps).
///
/// Example: If two rows tie for rank 1, the next row gets rank 3 (not 2).
pub struct RankFunction {
    ranker: Ranker,
    metadata: [ColumnMetadata; 1],
}

impl RankFunction {
    pub fn new(name: impl Into<String>, partition_by: PartitionBy, order_by: PartitionBy) -> Self {
        Self {
            ranker: Ranker::new(partition_by, order_by, false),
            metadata: [ColumnMetadata::not_null(name, DataType::Integer)],
        }
    }
}

/// DENSE_RANK analytic function
///
/// Like RANK, but ranks stay consecutive after ties.
///
/// Example: If two rows tie for rank 1, the next row gets rank 2.
pub struct DenseRankFunction {
    ranker: Ranker,
    metadata: [ColumnMetadata; 1],
}

impl DenseRankFunction {
    pub fn new(name: impl Into<String>, partition_by: PartitionBy, order_by: PartitionBy) -> Self {
        Self {
            ranker: Ranker::new(partition_by, order_by, true),
            metadata: [ColumnMetadata::not_null(name, DataType::Integer)],
        }
    }
}

macro_rules! impl_rank_function {
    ($ty:ty, $name:literal) => {
        impl AnalyticFunction for $ty {
            fn name(&self) -> &str {
                $name
            }

            fn function_type(&self) -> AnalyticFunctionType {
                AnalyticFunctionType::TwoPass
            }

            fn metadata(&self) -> &[ColumnMetadata] {
                &self.metadata
            }

            fn add(&mut self, record: &dyn Record) -> Result<()> {
                self.ranker.add(record);
                Ok(())
            }

            fn prepare(&mut self, _cursor: &mut dyn RandomAccessCursor) -> Result<()> {
                self.ranker.partitions = FxHashMap::default();
                Ok(())
            }

            fn prepare_for(&mut self, record: &dyn Record) -> Result<()> {
                self.ranker.prepare_for(record);
                Ok(())
            }

            fn value(&self, column: usize) -> &Value {
                if column == 0 {
                    &self.ranker.output
                } else {
                    &NULL_VALUE
                }
            }

            fn reset(&mut self) {
                self.ranker.reset();
            }
        }
    };
}

impl_rank_function!(RankFunction, "RANK");
impl_rank_function!(DenseRankFunction, "DENSE_RANK");
