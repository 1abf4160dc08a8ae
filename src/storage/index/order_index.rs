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

//! Order index - row-ids sorted by a record comparator
//!
//! Only row-ids are stored. Every comparison re-reads both rows from the
//! source cursor into two reusable buffers, so the index itself stays small
//! regardless of row width.

use std::fmt;
use std::sync::Arc;

use crate::core::{Result, RowId, RowRecord};
use crate::executor::RecordComparator;
use crate::storage::traits::RandomAccessCursor;

use super::rb_tree::{RowIdTree, RowIdTreeIter};

/// Sorted set of row-ids (duplicates allowed) ordered by a comparator
pub struct OrderIndex {
    tree: RowIdTree,
    comparator: Arc<dyn RecordComparator>,
    left: RowRecord,
    right: RowRecord,
}

impl OrderIndex {
    /// Create an empty index reserving room for `capacity` row-ids
    pub fn new(comparator: Arc<dyn RecordComparator>, capacity: usize) -> Result<Self> {
        Ok(Self {
            tree: RowIdTree::with_capacity(capacity)?,
            comparator,
            left: RowRecord::empty(),
            right: RowRecord::empty(),
        })
    }

    /// Insert a row-id, reading rows through `cursor` to place it
    pub fn insert(&mut self, row_id: RowId, cursor: &dyn RandomAccessCursor) -> Result<()> {
        cursor.record_at_into(&mut self.left, row_id)?;

        let Self {
            tree,
            comparator,
            left,
            right,
        } = self;
        tree.insert_by(row_id, |existing| {
            cursor.record_at_into(right, existing)?;
            Ok(comparator.compare(&*left, &*right))
        })
    }

    /// Row-ids in ascending comparator order, equal keys in insertion order
    pub fn iter(&self) -> RowIdTreeIter<'_> {
        self.tree.iter()
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Drop every row-id, keeping allocated nodes
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Drop every row-id and release the node pool
    pub fn close(&mut self) {
        self.tree.close();
        self.left = RowRecord::empty();
        self.right = RowRecord::empty();
    }
}

impl fmt::Debug for OrderIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderIndex")
            .field("len", &self.tree.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ColumnMetadata, DataType, Error, Record, RecordMetadata};
    use crate::executor::ColumnComparator;
    use crate::row;
    use crate::storage::memory::MemoryRecordSource;

    fn source() -> MemoryRecordSource {
        let metadata = RecordMetadata::new(vec![
            ColumnMetadata::new("grp", DataType::Text),
            ColumnMetadata::new("val", DataType::Integer),
        ]);
        MemoryRecordSource::new(
            metadata,
            vec![
                row!["b", 3i64],
                row!["a", 2i64],
                row!["b", 1i64],
                row!["a", 2i64],
                row!["a", 1i64],
            ],
        )
    }

    #[test]
    fn test_index_orders_by_comparator() {
        let src = source();
        let mut index = OrderIndex::new(Arc::new(ColumnComparator::ascending(&[0, 1])), 2).unwrap();
        for row_id in 0..5 {
            index.insert(row_id, &src).unwrap();
        }
        assert_eq!(index.len(), 5);
        // rows 1 and 3 tie on (a, 2); insertion order is kept
        assert_eq!(index.iter().collect::<Vec<_>>(), vec![4, 1, 3, 2, 0]);
    }

    #[test]
    fn test_duplicate_keys_all_kept() {
        let src = source();
        let mut index = OrderIndex::new(Arc::new(ColumnComparator::ascending(&[0])), 8).unwrap();
        for row_id in 0..5 {
            index.insert(row_id, &src).unwrap();
        }
        assert_eq!(index.iter().collect::<Vec<_>>(), vec![1, 3, 4, 0, 2]);
    }

    #[test]
    fn test_insert_unknown_row_fails() {
        let src = source();
        let mut index = OrderIndex::new(Arc::new(ColumnComparator::ascending(&[0])), 8).unwrap();
        index.insert(0, &src).unwrap();
        assert_eq!(index.insert(42, &src), Err(Error::RowNotFound(42)));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_clear_and_close() {
        let src = source();
        let cmp = |l: &dyn Record, r: &dyn Record| l.get(1).cmp(&r.get(1));
        let mut index = OrderIndex::new(Arc::new(cmp), 8).unwrap();
        index.insert(0, &src).unwrap();
        index.insert(2, &src).unwrap();
        assert_eq!(index.iter().collect::<Vec<_>>(), vec![2, 0]);

        index.clear();
        assert!(index.is_empty());
        index.insert(1, &src).unwrap();
        assert_eq!(index.iter().collect::<Vec<_>>(), vec![1]);

        index.close();
        assert!(index.is_empty());
    }
}
