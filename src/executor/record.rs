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

//! Composite analytic record and its storage facade
//!
//! Column `i < split` reads the current source row; column `i >= split`
//! reads an output slot of the function that owns it. Function output
//! columns are laid out in function order, each function contributing as
//! many columns as its metadata declares.

use std::fmt;
use std::sync::Arc;

use crate::common::SymbolTable;
use crate::core::{Record, Result, RowId, RowRecord, Value};
use crate::functions::AnalyticFunction;
use crate::storage::traits::{RandomAccessCursor, StorageFacade};

/// Row view stitching a source row with analytic function outputs
pub struct AnalyticRecord {
    source: RowRecord,
    split: usize,
    functions: Vec<Box<dyn AnalyticFunction>>,
    /// (function, local column) for every column at or after `split`
    outputs: Vec<(usize, usize)>,
}

impl AnalyticRecord {
    pub(crate) fn new(split: usize, functions: Vec<Box<dyn AnalyticFunction>>) -> Self {
        let outputs = functions
            .iter()
            .enumerate()
            .flat_map(|(f, func)| (0..func.metadata().len()).map(move |c| (f, c)))
            .collect();
        Self {
            source: RowRecord::empty(),
            split,
            functions,
            outputs,
        }
    }

    /// Index of the first function output column
    pub fn split(&self) -> usize {
        self.split
    }

    pub fn functions(&self) -> &[Box<dyn AnalyticFunction>] {
        &self.functions
    }

    pub(crate) fn functions_mut(&mut self) -> &mut [Box<dyn AnalyticFunction>] {
        &mut self.functions
    }

    /// Point at `row_id` and let every function compute its output for it
    pub(crate) fn position(
        &mut self,
        cursor: &dyn RandomAccessCursor,
        row_id: RowId,
    ) -> Result<()> {
        cursor.record_at_into(&mut self.source, row_id)?;
        for function in self.functions.iter_mut() {
            function.prepare_for(&self.source)?;
        }
        Ok(())
    }

    /// Forget the current row
    pub(crate) fn clear(&mut self) {
        self.source = RowRecord::empty();
    }

    /// Symbol tables of the function output columns, in column order
    pub(crate) fn output_symbol_tables(&self) -> Vec<Option<Arc<SymbolTable>>> {
        self.outputs
            .iter()
            .map(|&(f, c)| self.functions[f].symbol_table(c))
            .collect()
    }
}

impl Record for AnalyticRecord {
    fn row_id(&self) -> RowId {
        self.source.row_id()
    }

    fn column_count(&self) -> usize {
        self.split + self.outputs.len()
    }

    fn get(&self, index: usize) -> Option<&Value> {
        if index < self.split {
            self.source.get(index)
        } else {
            let &(f, c) = self.outputs.get(index - self.split)?;
            Some(self.functions[f].value(c))
        }
    }
}

impl fmt::Debug for AnalyticRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyticRecord")
            .field("row_id", &self.source.row_id())
            .field("split", &self.split)
            .field("functions", &self.functions.len())
            .finish()
    }
}

/// Storage facade of an analytic source
///
/// Source columns resolve through the wrapped source's facade, function
/// output columns through the tables their functions published.
pub struct AnalyticStorageFacade {
    source: Arc<dyn StorageFacade>,
    split: usize,
    outputs: Vec<Option<Arc<SymbolTable>>>,
}

impl AnalyticStorageFacade {
    pub fn new(
        source: Arc<dyn StorageFacade>,
        split: usize,
        outputs: Vec<Option<Arc<SymbolTable>>>,
    ) -> Self {
        Self {
            source,
            split,
            outputs,
        }
    }
}

impl StorageFacade for AnalyticStorageFacade {
    fn symbol_table(&self, column: usize) -> Option<Arc<SymbolTable>> {
        if column < self.split {
            self.source.symbol_table(column)
        } else {
            self.outputs.get(column - self.split).cloned().flatten()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ColumnMetadata, DataType, RecordMetadata};
    use crate::functions::{PartitionBy, RunningRowNumberFunction, RunningSumFunction};
    use crate::row;
    use crate::storage::memory::MemoryRecordSource;
    use crate::storage::traits::{EmptyStorageFacade, RecordCursor};

    fn source() -> MemoryRecordSource {
        let metadata = RecordMetadata::new(vec![
            ColumnMetadata::new("sym", DataType::Symbol),
            ColumnMetadata::new("val", DataType::Integer),
        ]);
        MemoryRecordSource::new(metadata, vec![row![0i64, 5i64], row![1i64, 7i64]])
            .with_symbol_table(0, Arc::new(SymbolTable::from_values(["a", "b"])))
    }

    fn record() -> AnalyticRecord {
        AnalyticRecord::new(
            2,
            vec![
                Box::new(RunningRowNumberFunction::new("rn", PartitionBy::none())),
                Box::new(RunningSumFunction::new(
                    "rs",
                    1,
                    DataType::Integer,
                    PartitionBy::none(),
                )),
            ],
        )
    }

    #[test]
    fn test_column_redirection() {
        let src = source();
        let mut rec = record();
        assert_eq!(rec.column_count(), 4);
        assert_eq!(rec.row_id(), -1);
        assert_eq!(rec.get(0), None);

        rec.position(&src, 0).unwrap();
        rec.position(&src, 1).unwrap();
        assert_eq!(rec.row_id(), 1);
        assert_eq!(rec.get(1), Some(&Value::integer(7)));
        assert_eq!(rec.get(2), Some(&Value::integer(2)));
        assert_eq!(rec.get(3), Some(&Value::integer(12)));
        assert_eq!(rec.get(4), None);
        assert_eq!(rec.to_row(), row![1i64, 7i64, 2i64, 12i64]);
    }

    #[test]
    fn test_position_propagates_errors() {
        let src = source();
        let mut rec = record();
        assert!(rec.position(&src, 99).is_err());
    }

    #[test]
    fn test_facade_composition() {
        let src = source();
        let out = Arc::new(SymbolTable::from_values(["z"]));
        let facade = AnalyticStorageFacade::new(src.storage_facade(), 2, vec![None, Some(out)]);

        assert_eq!(facade.symbol_table(0).unwrap().value_of(1), Some("b"));
        assert!(facade.symbol_table(1).is_none());
        assert!(facade.symbol_table(2).is_none());
        assert_eq!(facade.symbol_table(3).unwrap().value_of(0), Some("z"));
        assert!(facade.symbol_table(4).is_none());

        let empty = AnalyticStorageFacade::new(Arc::new(EmptyStorageFacade), 0, vec![]);
        assert!(empty.symbol_table(0).is_none());
        assert_eq!(record().output_symbol_tables().len(), 2);
    }
}
