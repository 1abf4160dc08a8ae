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

//! Page-backed, append-only list of row-ids
//!
//! The row list records the order in which an upstream cursor produced its
//! rows, so that rows can later be emitted in exactly that order no matter
//! how many times they were re-sorted in between.
//!
//! # Layout
//!
//! Entries live in fixed-size pages allocated on demand. A page is reserved
//! once at its full size and only ever pushed into within that capacity, so
//! an entry never moves after it is written and a [`RowHandle`] stays valid
//! until the list is cleared or closed. Each entry carries a link to the
//! entry appended after it; iteration follows those links from the head.
//!
//! `clear()` keeps the pages for reuse by the next capture pass, `close()`
//! gives them back to the allocator.

use std::mem::size_of;

use crate::core::{Error, Result, RowId};

/// Link value meaning "no entry"
const NIL: u64 = u64::MAX;

/// Stable address of an entry inside a [`RowList`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowHandle(u64);

impl RowHandle {
    /// Raw handle value
    #[inline]
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy)]
struct RowEntry {
    row_id: RowId,
    next: u64,
}

/// Append-only list of row-ids backed by fixed-size pages
#[derive(Debug)]
pub struct RowList {
    page_size: usize,
    pages: Vec<Vec<RowEntry>>,
    len: usize,
    head: u64,
    tail: u64,
    /// Next entry `next()` will return, `NIL` once exhausted
    cursor: u64,
}

impl RowList {
    /// Create an empty list; no page is allocated until the first append
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            pages: Vec::new(),
            len: 0,
            head: NIL,
            tail: NIL,
            cursor: NIL,
        }
    }

    /// Number of entries per page
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages currently held, including pages kept by `clear()`
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Number of appended entries
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if nothing was appended since the last clear
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append a row-id, returning the handle of the new entry
    ///
    /// Fails with [`Error::OutOfMemory`] when a new page cannot be allocated.
    pub fn append(&mut self, row_id: RowId) -> Result<RowHandle> {
        let page_idx = self.len / self.page_size;
        if page_idx == self.pages.len() {
            self.allocate_page()?;
        }

        let handle = self.len as u64;
        self.pages[page_idx].push(RowEntry { row_id, next: NIL });

        if self.tail == NIL {
            self.head = handle;
        } else {
            let tail = self.tail;
            self.entry_mut(tail).next = handle;
        }
        self.tail = handle;
        self.len += 1;

        // the cursor of an empty list starts at its first entry
        if self.cursor == NIL && self.head == handle {
            self.cursor = handle;
        }

        Ok(RowHandle(handle))
    }

    /// Read the row-id stored at a handle
    pub fn get(&self, handle: RowHandle) -> Option<RowId> {
        if handle.0 >= self.len as u64 {
            return None;
        }
        Some(self.entry(handle.0).row_id)
    }

    /// Rewind iteration to the first appended entry
    pub fn to_top(&mut self) {
        self.cursor = self.head;
    }

    /// Check whether `next()` will return another row-id
    #[inline]
    pub fn has_next(&self) -> bool {
        self.cursor != NIL
    }

    /// Return the next row-id in append order and advance
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<RowId> {
        if self.cursor == NIL {
            return None;
        }
        let entry = *self.entry(self.cursor);
        self.cursor = entry.next;
        Some(entry.row_id)
    }

    /// Iterate row-ids in append order without touching the internal cursor
    pub fn iter(&self) -> RowListIter<'_> {
        RowListIter {
            list: self,
            cursor: self.head,
        }
    }

    /// Discard all entries, keeping pages for reuse
    pub fn clear(&mut self) {
        for page in &mut self.pages {
            page.clear();
        }
        self.len = 0;
        self.head = NIL;
        self.tail = NIL;
        self.cursor = NIL;
    }

    /// Discard all entries and release every page
    pub fn close(&mut self) {
        self.clear();
        self.pages = Vec::new();
    }

    fn allocate_page(&mut self) -> Result<()> {
        let mut page: Vec<RowEntry> = Vec::new();
        page.try_reserve_exact(self.page_size).map_err(|_| {
            let bytes = self.page_size.saturating_mul(size_of::<RowEntry>());
            Error::out_of_memory("row list page", bytes)
        })?;
        self.pages
            .try_reserve(1)
            .map_err(|_| Error::out_of_memory("row list page table", size_of::<Vec<RowEntry>>()))?;
        self.pages.push(page);
        Ok(())
    }

    #[inline]
    fn entry(&self, handle: u64) -> &RowEntry {
        let h = handle as usize;
        &self.pages[h / self.page_size][h % self.page_size]
    }

    #[inline]
    fn entry_mut(&mut self, handle: u64) -> &mut RowEntry {
        let h = handle as usize;
        &mut self.pages[h / self.page_size][h % self.page_size]
    }
}

/// Borrowing iterator over a [`RowList`]
pub struct RowListIter<'a> {
    list: &'a RowList,
    cursor: u64,
}

impl Iterator for RowListIter<'_> {
    type Item = RowId;

    fn next(&mut self) -> Option<RowId> {
        if self.cursor == NIL {
            return None;
        }
        let entry = self.list.entry(self.cursor);
        self.cursor = entry.next;
        Some(entry.row_id)
    }
}
