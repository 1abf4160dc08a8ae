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

//! Record views
//!
//! A [`Record`] is what cursors hand out: a row-id plus indexed column access.
//! Records may be plain rows ([`RowRecord`]) or views that redirect column
//! reads elsewhere, such as the analytic composite record.

use std::fmt;

use super::error::{Error, Result};
use super::row::Row;
use super::types::RowId;
use super::value::Value;

/// Row view with a stable row-id
pub trait Record {
    /// Row-id of the row this record currently points at
    fn row_id(&self) -> RowId;

    /// Number of readable columns
    fn column_count(&self) -> usize;

    /// Read a column, `None` when out of range
    fn get(&self, index: usize) -> Option<&Value>;

    /// Read a column, failing when out of range
    fn value(&self, index: usize) -> Result<&Value> {
        self.get(index)
            .ok_or(Error::ColumnIndexOutOfBounds { index })
    }

    /// Copy every column into an owned row
    fn to_row(&self) -> Row {
        (0..self.column_count())
            .map(|i| self.get(i).cloned().unwrap_or_default())
            .collect()
    }
}

/// Owned record: a row plus the row-id it was read from
///
/// Also used as a reusable buffer: `record_at_into` overwrites it in place
/// so comparators do not allocate per comparison.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowRecord {
    row_id: RowId,
    row: Row,
}

impl RowRecord {
    /// Create a record from a row-id and a row
    pub fn new(row_id: RowId, row: Row) -> Self {
        Self { row_id, row }
    }

    /// Create an empty buffer, not pointing at any row
    pub fn empty() -> Self {
        Self {
            row_id: -1,
            row: Row::new(),
        }
    }

    /// Point this record at another row
    #[inline]
    pub fn of(&mut self, row_id: RowId, row: Row) {
        self.row_id = row_id;
        self.row = row;
    }

    /// Borrow the underlying row
    pub fn row(&self) -> &Row {
        &self.row
    }

    /// Take the underlying row
    pub fn into_row(self) -> Row {
        self.row
    }
}

impl Record for RowRecord {
    #[inline]
    fn row_id(&self) -> RowId {
        self.row_id
    }

    #[inline]
    fn column_count(&self) -> usize {
        self.row.len()
    }

    #[inline]
    fn get(&self, index: usize) -> Option<&Value> {
        self.row.get(index)
    }
}

impl fmt::Display for RowRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.row_id, self.row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_record_access() {
        let rec = RowRecord::new(4, Row::from_values(vec![Value::integer(1), Value::text("a")]));
        assert_eq!(rec.row_id(), 4);
        assert_eq!(rec.column_count(), 2);
        assert_eq!(rec.get(1), Some(&Value::text("a")));
        assert_eq!(rec.get(2), None);
        assert_eq!(
            rec.value(2),
            Err(Error::ColumnIndexOutOfBounds { index: 2 })
        );
        assert_eq!(rec.to_string(), "#4 (1, a)");
    }

    #[test]
    fn test_row_record_reuse() {
        let mut rec = RowRecord::empty();
        assert_eq!(rec.row_id(), -1);
        rec.of(9, Row::from_values(vec![Value::float(1.5)]));
        assert_eq!(rec.row_id(), 9);
        assert_eq!(rec.to_row(), Row::from_values(vec![Value::float(1.5)]));
    }
}
