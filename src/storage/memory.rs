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

//! In-memory random-access record source
//!
//! Holds its rows in a `Vec` and serves them both sequentially and by row-id.
//! Row-ids default to the row's position; arbitrary ids can be assigned with
//! [`MemoryRecordSource::with_row_ids`]. Failures can be injected to exercise
//! error paths of consumers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde_json::json;

use crate::common::SymbolTable;
use crate::core::{Error, Record, RecordMetadata, Result, Row, RowId, RowRecord};
use crate::executor::CancellationHandle;

use super::traits::{RandomAccessCursor, RecordCursor, StorageFacade};

/// Symbol tables indexed by column
#[derive(Debug, Default, Clone)]
pub struct SymbolTableFacade {
    tables: Vec<Option<Arc<SymbolTable>>>,
}

impl SymbolTableFacade {
    pub fn new(tables: Vec<Option<Arc<SymbolTable>>>) -> Self {
        Self { tables }
    }

    fn set(&mut self, column: usize, table: Arc<SymbolTable>) {
        if self.tables.len() <= column {
            self.tables.resize(column + 1, None);
        }
        self.tables[column] = Some(table);
    }
}

impl StorageFacade for SymbolTableFacade {
    fn symbol_table(&self, column: usize) -> Option<Arc<SymbolTable>> {
        self.tables.get(column).and_then(|t| t.clone())
    }
}

/// Call counters shared between a source and whoever inspects it
#[derive(Debug, Default)]
pub struct SourceStats {
    prepares: AtomicUsize,
    resets: AtomicUsize,
    closes: AtomicUsize,
    random_reads: AtomicUsize,
}

impl SourceStats {
    pub fn prepares(&self) -> usize {
        self.prepares.load(Ordering::Relaxed)
    }

    pub fn resets(&self) -> usize {
        self.resets.load(Ordering::Relaxed)
    }

    /// Number of `close()` calls that actually released the source
    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::Relaxed)
    }

    /// Number of rows served by row-id
    pub fn random_reads(&self) -> usize {
        self.random_reads.load(Ordering::Relaxed)
    }
}

/// Record source over rows held in memory
#[derive(Debug)]
pub struct MemoryRecordSource {
    metadata: RecordMetadata,
    rows: Vec<Row>,
    row_ids: Vec<RowId>,
    /// row-id -> position, only when ids are not the positions themselves
    positions: Option<FxHashMap<RowId, usize>>,
    facade: SymbolTableFacade,
    stats: Arc<SourceStats>,

    current: RowRecord,
    position: usize,
    prepared: bool,
    closed: bool,

    /// Fail `has_next()` once this many rows were returned
    fail_after: Option<(usize, Error)>,
    /// Fail random access to this row-id
    fail_at_row: Option<(RowId, Error)>,
}

impl MemoryRecordSource {
    /// Create a source whose row-ids are the row positions
    pub fn new(metadata: RecordMetadata, rows: Vec<Row>) -> Self {
        let rows: Vec<Row> = rows
            .into_iter()
            .map(|r| Row::from_arc(r.into_values().into()))
            .collect();
        let row_ids = (0..rows.len() as RowId).collect();
        Self {
            metadata,
            rows,
            row_ids,
            positions: None,
            facade: SymbolTableFacade::default(),
            stats: Arc::new(SourceStats::default()),
            current: RowRecord::empty(),
            position: 0,
            prepared: false,
            closed: false,
            fail_after: None,
            fail_at_row: None,
        }
    }

    /// Assign explicit row-ids, one per row in order
    pub fn with_row_ids(mut self, row_ids: Vec<RowId>) -> Result<Self> {
        if row_ids.len() != self.rows.len() {
            return Err(Error::invalid_argument(format!(
                "{} row-ids for {} rows",
                row_ids.len(),
                self.rows.len()
            )));
        }
        let mut positions = FxHashMap::default();
        for (pos, id) in row_ids.iter().enumerate() {
            if positions.insert(*id, pos).is_some() {
                return Err(Error::invalid_argument(format!("duplicate row-id {}", id)));
            }
        }
        self.row_ids = row_ids;
        self.positions = Some(positions);
        Ok(self)
    }

    /// Attach a symbol table to a symbol column
    pub fn with_symbol_table(mut self, column: usize, table: Arc<SymbolTable>) -> Self {
        self.facade.set(column, table);
        self
    }

    /// Make `has_next()` fail with `error` after `rows` rows were returned
    pub fn with_error(mut self, rows: usize, error: Error) -> Self {
        self.fail_after = Some((rows, error));
        self
    }

    /// Make every random access to `row_id` fail with `error`
    pub fn with_record_error(mut self, row_id: RowId, error: Error) -> Self {
        self.fail_at_row = Some((row_id, error));
        self
    }

    /// Counters observing how consumers drive this source
    pub fn stats(&self) -> Arc<SourceStats> {
        Arc::clone(&self.stats)
    }

    /// Number of rows held
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn position_of(&self, row_id: RowId) -> Result<usize> {
        if self.closed {
            return Err(Error::SourceClosed);
        }
        if let Some((id, err)) = &self.fail_at_row {
            if *id == row_id {
                return Err(err.clone());
            }
        }
        let pos = match &self.positions {
            Some(map) => map.get(&row_id).copied(),
            None => usize::try_from(row_id).ok().filter(|p| *p < self.rows.len()),
        };
        pos.ok_or(Error::RowNotFound(row_id))
    }
}

impl RecordCursor for MemoryRecordSource {
    fn metadata(&self) -> &RecordMetadata {
        &self.metadata
    }

    fn prepare_cursor(&mut self, cancel: &CancellationHandle) -> Result<()> {
        if self.closed {
            return Err(Error::SourceClosed);
        }
        cancel.check()?;
        self.stats.prepares.fetch_add(1, Ordering::Relaxed);
        self.position = 0;
        self.prepared = true;
        Ok(())
    }

    fn has_next(&mut self) -> Result<bool> {
        if self.closed {
            return Err(Error::SourceClosed);
        }
        if !self.prepared {
            return Err(Error::CursorNotPrepared);
        }
        if let Some((rows, err)) = &self.fail_after {
            if self.position >= *rows {
                return Err(err.clone());
            }
        }
        if self.position >= self.rows.len() {
            return Ok(false);
        }
        self.current.of(self.row_ids[self.position], self.rows[self.position].clone());
        self.position += 1;
        Ok(true)
    }

    fn next(&self) -> &dyn Record {
        &self.current
    }

    fn new_record(&self) -> RowRecord {
        self.current.clone()
    }

    fn storage_facade(&self) -> Arc<dyn StorageFacade> {
        Arc::new(self.facade.clone())
    }

    fn reset(&mut self) {
        self.stats.resets.fetch_add(1, Ordering::Relaxed);
        self.position = 0;
        self.prepared = false;
        self.current = RowRecord::empty();
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.prepared = false;
        self.rows = Vec::new();
        self.row_ids = Vec::new();
        self.positions = None;
        self.current = RowRecord::empty();
        self.stats.closes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn explain(&self) -> serde_json::Value {
        json!({
            "op": "MemoryRecordSource",
            "rows": self.rows.len(),
        })
    }
}

impl RandomAccessCursor for MemoryRecordSource {
    fn record_at(&mut self, row_id: RowId) -> Result<&dyn Record> {
        let pos = self.position_of(row_id)?;
        self.stats.random_reads.fetch_add(1, Ordering::Relaxed);
        self.current.of(row_id, self.rows[pos].clone());
        Ok(&self.current)
    }

    fn record_at_into(&self, dest: &mut RowRecord, row_id: RowId) -> Result<()> {
        let pos = self.position_of(row_id)?;
        self.stats.random_reads.fetch_add(1, Ordering::Relaxed);
        dest.of(row_id, self.rows[pos].clone());
        Ok(())
    }

    fn to_top(&mut self) {
        self.position = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ColumnMetadata, DataType, Value};
    use crate::row;

    fn metadata() -> RecordMetadata {
        RecordMetadata::new(vec![
            ColumnMetadata::not_null("id", DataType::Integer),
            ColumnMetadata::new("name", DataType::Symbol),
        ])
    }

    fn source() -> MemoryRecordSource {
        MemoryRecordSource::new(metadata(), vec![row![1i64, 0i64], row![2i64, 1i64]])
    }

    #[test]
    fn test_sequential_iteration() {
        let mut src = source();
        let cancel = CancellationHandle::new();
        assert_eq!(src.has_next(), Err(Error::CursorNotPrepared));

        src.prepare_cursor(&cancel).unwrap();
        assert!(src.has_next().unwrap());
        assert_eq!(src.next().row_id(), 0);
        assert_eq!(src.next().get(0), Some(&Value::integer(1)));
        assert!(src.has_next().unwrap());
        assert_eq!(src.new_record().row_id(), 1);
        assert!(!src.has_next().unwrap());

        src.to_top();
        assert!(src.has_next().unwrap());
        assert_eq!(src.next().row_id(), 0);
    }

    #[test]
    fn test_random_access_with_custom_ids() {
        let mut src = source().with_row_ids(vec![100, 7]).unwrap();
        assert_eq!(src.record_at(7).unwrap().get(0), Some(&Value::integer(2)));

        let mut buf = RowRecord::empty();
        src.record_at_into(&mut buf, 100).unwrap();
        assert_eq!(buf.row_id(), 100);
        assert_eq!(src.record_at_into(&mut buf, 1), Err(Error::RowNotFound(1)));
        assert_eq!(src.stats().random_reads(), 2);

        assert!(source().with_row_ids(vec![1]).is_err());
        assert!(source().with_row_ids(vec![3, 3]).is_err());
    }

    #[test]
    fn test_injected_errors() {
        let cancel = CancellationHandle::new();
        let mut src = source().with_error(1, Error::internal("disk gone"));
        src.prepare_cursor(&cancel).unwrap();
        assert!(src.has_next().unwrap());
        assert_eq!(src.has_next(), Err(Error::internal("disk gone")));

        let mut src = source().with_record_error(1, Error::internal("bad page"));
        assert!(src.record_at(0).is_ok());
        assert_eq!(src.record_at(1).err(), Some(Error::internal("bad page")));
    }

    #[test]
    fn test_prepare_honours_cancellation() {
        let cancel = CancellationHandle::new();
        cancel.cancel();
        let mut src = source();
        assert_eq!(src.prepare_cursor(&cancel), Err(Error::QueryCancelled));
    }

    #[test]
    fn test_symbol_facade() {
        let table = Arc::new(SymbolTable::from_values(["x", "y"]));
        let src = source().with_symbol_table(1, table);
        let facade = src.storage_facade();
        assert!(facade.symbol_table(0).is_none());
        assert_eq!(facade.resolve_symbol(1, &Value::integer(1)), Some("y".into()));
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut src = source();
        let stats = src.stats();
        src.close().unwrap();
        src.close().unwrap();
        assert_eq!(stats.closes(), 1);
        assert_eq!(src.record_at(0).err(), Some(Error::SourceClosed));
        assert_eq!(
            src.explain(),
            serde_json::json!({"op": "MemoryRecordSource", "rows": 0})
        );
    }
}
