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

//! Record cursor protocol
//!

use std::sync::Arc;

use crate::core::{Record, RecordMetadata, Result, RowId, RowRecord};
use crate::executor::CancellationHandle;

use super::facade::StorageFacade;

/// Forward-only cursor over records
///
/// # Example
///
/// ```ignore
/// cursor.prepare_cursor(&cancel)?;
/// while cursor.has_next()? {
///     let record = cursor.next();
///     // Process record...
/// }
/// cursor.close()?;
/// ```
pub trait RecordCursor: Send {
    /// Column descriptors of the records this cursor produces
    fn metadata(&self) -> &RecordMetadata;

    /// Make the cursor ready to iterate
    ///
    /// Long-running preparation polls `cancel` and fails with
    /// [`crate::core::Error::QueryCancelled`] once it is set.
    fn prepare_cursor(&mut self, cancel: &CancellationHandle) -> Result<()>;

    /// Advance to the next record
    ///
    /// Returns `false` once the cursor is exhausted.
    fn has_next(&mut self) -> Result<bool>;

    /// The record positioned by the last successful `has_next()`
    ///
    /// Valid until the next call to `has_next()`, `reset()` or `close()`.
    fn next(&self) -> &dyn Record;

    /// Detached copy of the current record, or an empty one before the first row
    fn new_record(&self) -> RowRecord;

    /// Symbol tables for the columns of this cursor
    fn storage_facade(&self) -> Arc<dyn StorageFacade>;

    /// Return to the state right after construction, releasing per-run state
    fn reset(&mut self);

    /// Release every resource held by the cursor; safe to call repeatedly
    fn close(&mut self) -> Result<()>;

    /// Plan description for EXPLAIN output
    fn explain(&self) -> serde_json::Value;
}

/// Cursor that can also fetch any of its records by row-id
pub trait RandomAccessCursor: RecordCursor {
    /// Position the cursor's record at `row_id` and return it
    fn record_at(&mut self, row_id: RowId) -> Result<&dyn Record>;

    /// Materialize the row at `row_id` into a caller-owned buffer
    ///
    /// Unlike [`record_at`](Self::record_at) this leaves the cursor's own
    /// position untouched, so two buffers can be compared side by side.
    fn record_at_into(&self, dest: &mut RowRecord, row_id: RowId) -> Result<()>;

    /// Rewind forward iteration to the first record
    fn to_top(&mut self);
}
