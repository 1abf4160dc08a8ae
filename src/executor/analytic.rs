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

//! Analytic record source - caches row-ids and evaluates window functions
//!
//! `prepare_cursor()` runs two passes before the first row is emitted:
//!
//! 1. **Capture**: the wrapped cursor is read once. Every row-id is appended
//!    to a [`RowList`] (natural order) and inserted into one [`OrderIndex`]
//!    per order group that has a comparator.
//! 2. **Accumulation**: each order group replays its rows into its
//!    functions through `add()`, in index order when the group has an index.
//!    Groups without one replay the row list in natural order, and only to
//!    two-pass functions. Every function then gets `prepare()`.
//!
//! `has_next()` then performs the **emission** pass: row-ids come off the
//! row list in natural order, each row is fetched by random access, and
//! every function computes that row's output through `prepare_for()`.
//!
//! Function groups, comparators and the functions themselves are supplied by
//! the planner; this stage owns their lifecycle from then on.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;
use std::time::Instant;

use serde_json::json;

use crate::core::{ColumnMetadata, Error, Record, RecordMetadata, Result, RowRecord};
use crate::functions::{AnalyticFunction, AnalyticFunctionType};
use crate::storage::config::AnalyticConfig;
use crate::storage::index::OrderIndex;
use crate::storage::row_list::RowList;
use crate::storage::traits::{RandomAccessCursor, RecordCursor, StorageFacade};

use super::comparator::RecordComparator;
use super::context::{CancellationHandle, CancellationPoller};
use super::record::{AnalyticRecord, AnalyticStorageFacade};

/// Lifecycle of an analytic source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Nothing to release from a previous run
    Fresh,
    /// A prepare started; per-run state may be partially built
    Dirty,
    /// Passes completed, emission may proceed
    Prepared,
    Closed,
}

/// Record source evaluating analytic functions over a wrapped source
pub struct AnalyticRecordSource {
    config: AnalyticConfig,
    source: Box<dyn RandomAccessCursor>,
    metadata: RecordMetadata,
    comparators: Vec<Option<Arc<dyn RecordComparator>>>,
    /// Function index range of every order group
    groups: Vec<Range<usize>>,
    row_list: RowList,
    /// One slot per order group once prepared, `None` for unordered groups
    indexes: Vec<Option<OrderIndex>>,
    record: AnalyticRecord,
    state: State,
}

impl AnalyticRecordSource {
    /// Wrap `source` with analytic functions
    ///
    /// `comparators[i]` orders the rows for the functions in
    /// `function_groups[i]`; `None` marks a group evaluated in natural order.
    /// Both lists must have the same length.
    pub fn new(
        config: AnalyticConfig,
        source: Box<dyn RandomAccessCursor>,
        comparators: Vec<Option<Box<dyn RecordComparator>>>,
        function_groups: Vec<Vec<Box<dyn AnalyticFunction>>>,
    ) -> Result<Self> {
        if comparators.len() != function_groups.len() {
            return Err(Error::malformed_operator(
                comparators.len(),
                function_groups.len(),
            ));
        }
        config.validate()?;

        let mut groups = Vec::with_capacity(function_groups.len());
        let mut functions: Vec<Box<dyn AnalyticFunction>> = Vec::new();
        for group in function_groups {
            let start = functions.len();
            functions.extend(group);
            groups.push(start..functions.len());
        }

        let outputs: Vec<ColumnMetadata> = functions
            .iter()
            .flat_map(|f| f.metadata().iter().cloned())
            .collect();
        let metadata = RecordMetadata::split(source.metadata(), outputs);
        let split = source.metadata().column_count();

        Ok(Self {
            row_list: RowList::new(config.row_list_page_size),
            config,
            source,
            metadata,
            comparators: comparators
                .into_iter()
                .map(|c| c.map(Arc::from))
                .collect(),
            groups,
            indexes: Vec::new(),
            record: AnalyticRecord::new(split, functions),
            state: State::Fresh,
        })
    }

    /// Number of analytic functions across all groups
    pub fn function_count(&self) -> usize {
        self.record.functions().len()
    }

    /// Number of order groups
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Number of rows captured by the last prepare
    pub fn row_count(&self) -> usize {
        self.row_list.len()
    }

    /// Number of order indexes currently held
    pub fn index_count(&self) -> usize {
        self.indexes.iter().flatten().count()
    }

    fn run_passes(&mut self, cancel: &CancellationHandle) -> Result<()> {
        let mut poller = CancellationPoller::new(cancel, self.config.cancellation_check_interval);

        self.indexes = self
            .comparators
            .iter()
            .map(|c| {
                c.as_ref()
                    .map(|c| OrderIndex::new(Arc::clone(c), self.config.index_page_size))
                    .transpose()
            })
            .collect::<Result<Vec<_>>>()?;

        // capture
        while self.source.has_next()? {
            poller.tick()?;
            let row_id = self.source.next().row_id();
            self.row_list.append(row_id)?;
            for index in self.indexes.iter_mut().flatten() {
                index.insert(row_id, self.source.as_ref())?;
            }
        }

        // accumulation
        let mut buf = RowRecord::empty();
        for (g, range) in self.groups.iter().enumerate() {
            let functions = &mut self.record.functions_mut()[range.clone()];
            match &self.indexes[g] {
                Some(index) => {
                    let mut replayed = 0usize;
                    for row_id in index.iter() {
                        poller.tick()?;
                        self.source.record_at_into(&mut buf, row_id)?;
                        for function in functions.iter_mut() {
                            function.add(&buf)?;
                        }
                        replayed += 1;
                    }
                    tracing::trace!(group = g, rows = replayed, "replayed order index");
                }
                None => {
                    for function in functions
                        .iter_mut()
                        .filter(|f| f.function_type() == AnalyticFunctionType::TwoPass)
                    {
                        self.row_list.to_top();
                        while let Some(row_id) = self.row_list.next() {
                            poller.tick()?;
                            self.source.record_at_into(&mut buf, row_id)?;
                            function.add(&buf)?;
                        }
                    }
                    tracing::trace!(group = g, rows = self.row_list.len(), "replayed row list");
                }
            }
        }

        for function in self.record.functions_mut() {
            function.prepare(self.source.as_mut())?;
        }

        self.row_list.to_top();
        Ok(())
    }
}

impl RecordCursor for AnalyticRecordSource {
    fn metadata(&self) -> &RecordMetadata {
        &self.metadata
    }

    fn prepare_cursor(&mut self, cancel: &CancellationHandle) -> Result<()> {
        match self.state {
            State::Closed => return Err(Error::SourceClosed),
            State::Fresh => {}
            State::Dirty | State::Prepared => self.reset(),
        }

        tracing::debug!(
            functions = self.function_count(),
            groups = self.group_count(),
            "preparing analytic source"
        );
        let start = Instant::now();
        self.state = State::Dirty;

        self.source.prepare_cursor(cancel)?;
        match self.run_passes(cancel) {
            Ok(()) => {
                self.state = State::Prepared;
                tracing::debug!(
                    rows = self.row_list.len(),
                    indexes = self.index_count(),
                    elapsed_us = start.elapsed().as_micros() as u64,
                    "analytic source prepared"
                );
                Ok(())
            }
            Err(err) => {
                if err.is_cancellation() {
                    tracing::debug!(
                        rows = self.row_list.len(),
                        "analytic source prepare cancelled"
                    );
                } else {
                    tracing::debug!(error = %err, "analytic source prepare failed");
                }
                Err(err)
            }
        }
    }

    fn has_next(&mut self) -> Result<bool> {
        match self.state {
            State::Prepared => {}
            State::Closed => return Err(Error::SourceClosed),
            State::Fresh | State::Dirty => return Err(Error::CursorNotPrepared),
        }
        match self.row_list.next() {
            Some(row_id) => {
                self.record.position(self.source.as_ref(), row_id)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn next(&self) -> &dyn Record {
        &self.record
    }

    fn new_record(&self) -> RowRecord {
        RowRecord::new(self.record.row_id(), self.record.to_row())
    }

    fn storage_facade(&self) -> Arc<dyn StorageFacade> {
        Arc::new(AnalyticStorageFacade::new(
            self.source.storage_facade(),
            self.record.split(),
            self.record.output_symbol_tables(),
        ))
    }

    fn reset(&mut self) {
        self.source.reset();
        self.row_list.clear();
        for index in self.indexes.iter_mut().flatten() {
            index.clear();
        }
        self.indexes.clear();
        for function in self.record.functions_mut() {
            function.reset();
        }
        self.record.clear();
        if self.state != State::Closed {
            self.state = State::Fresh;
        }
    }

    fn close(&mut self) -> Result<()> {
        if self.state == State::Closed {
            return Ok(());
        }
        self.state = State::Closed;

        let result = self.source.close();
        self.row_list.close();
        for index in self.indexes.iter_mut().flatten() {
            index.close();
        }
        self.indexes = Vec::new();
        for function in self.record.functions_mut() {
            function.close();
        }
        self.record.clear();

        tracing::debug!("analytic source closed");
        result
    }

    fn explain(&self) -> serde_json::Value {
        json!({
            "op": "CachedRowAnalyticRecordSource",
            "functions": self.function_count(),
            "src": self.source.explain(),
        })
    }
}

impl fmt::Display for AnalyticRecordSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.explain())
    }
}

impl fmt::Debug for AnalyticRecordSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyticRecordSource")
            .field("state", &self.state)
            .field("groups", &self.groups)
            .field("rows", &self.row_list.len())
            .field("record", &self.record)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DataType, Value};
    use crate::executor::ColumnComparator;
    use crate::functions::{PartitionBy, RowNumberFunction, SumFunction};
    use crate::row;
    use crate::storage::memory::MemoryRecordSource;

    fn source() -> MemoryRecordSource {
        let metadata = RecordMetadata::new(vec![
            ColumnMetadata::not_null("id", DataType::Integer),
            ColumnMetadata::new("val", DataType::Integer),
            ColumnMetadata::new("part", DataType::Text),
        ]);
        MemoryRecordSource::new(
            metadata,
            vec![row![0i64, 3i64, "A"], row![1i64, 1i64, "A"], row![2i64, 5i64, "B"]],
        )
    }

    fn row_number_source() -> AnalyticRecordSource {
        AnalyticRecordSource::new(
            AnalyticConfig::small(),
            Box::new(source()),
            vec![Some(Box::new(ColumnComparator::ascending(&[2, 1])))],
            vec![vec![Box::new(RowNumberFunction::new("rn", PartitionBy::new(&[2])))]],
        )
        .unwrap()
    }

    fn drain(src: &mut AnalyticRecordSource) -> Vec<(i64, Value)> {
        let mut out = Vec::new();
        while src.has_next().unwrap() {
            let rec = src.next();
            out.push((rec.row_id(), rec.get(3).cloned().unwrap()));
        }
        out
    }

    #[test]
    fn test_metadata_is_split() {
        let src = row_number_source();
        assert_eq!(src.metadata().column_count(), 4);
        assert_eq!(src.metadata().split_index(), Some(3));
        assert_eq!(src.metadata().column_index("rn"), Some(3));
        assert_eq!(src.function_count(), 1);
    }

    #[test]
    fn test_row_number_example() {
        let mut src = row_number_source();
        src.prepare_cursor(&CancellationHandle::new()).unwrap();
        assert_eq!(src.index_count(), 1);
        assert_eq!(
            drain(&mut src),
            vec![
                (0, Value::integer(2)),
                (1, Value::integer(1)),
                (2, Value::integer(1))
            ]
        );
        assert!(!src.has_next().unwrap());
    }

    #[test]
    fn test_has_next_requires_prepare() {
        let mut src = row_number_source();
        assert_eq!(src.has_next(), Err(Error::CursorNotPrepared));
    }

    #[test]
    fn test_malformed_construction() {
        let result = AnalyticRecordSource::new(
            AnalyticConfig::default(),
            Box::new(source()),
            vec![None, None],
            vec![vec![]],
        );
        assert_eq!(result.err(), Some(Error::malformed_operator(2, 1)));

        let result = AnalyticRecordSource::new(
            AnalyticConfig::default().with_row_list_page_size(0),
            Box::new(source()),
            vec![],
            vec![],
        );
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_new_record_width() {
        let mut src = AnalyticRecordSource::new(
            AnalyticConfig::default(),
            Box::new(source()),
            vec![None],
            vec![vec![Box::new(SumFunction::new(
                "total",
                1,
                DataType::Integer,
                PartitionBy::none(),
            ))]],
        )
        .unwrap();

        let empty = src.new_record();
        assert_eq!(empty.column_count(), 4);
        assert!(empty.row().iter().all(|v| v.is_null()));

        src.prepare_cursor(&CancellationHandle::new()).unwrap();
        assert!(src.has_next().unwrap());
        let rec = src.new_record();
        assert_eq!(rec.row_id(), 0);
        assert_eq!(rec.get(3), Some(&Value::integer(9)));
    }

    #[test]
    fn test_explain_and_display() {
        let src = row_number_source();
        let plan = src.explain();
        assert_eq!(plan["op"], "CachedRowAnalyticRecordSource");
        assert_eq!(plan["functions"], 1);
        assert_eq!(plan["src"]["op"], "MemoryRecordSource");
        assert!(src.to_string().contains("CachedRowAnalyticRecordSource"));
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut src = row_number_source();
        src.prepare_cursor(&CancellationHandle::new()).unwrap();
        src.close().unwrap();
        src.close().unwrap();
        assert_eq!(src.has_next(), Err(Error::SourceClosed));
        assert_eq!(
            src.prepare_cursor(&CancellationHandle::new()),
            Err(Error::SourceClosed)
        );
        src.reset();
    }
}
