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

//! Record comparators
//!
//! A comparator defines the order in which one analytic order group visits
//! the captured rows. Partition columns lead the key list so each partition
//! is visited as one contiguous run.

use std::cmp::Ordering;

use smallvec::SmallVec;

use crate::core::{Record, Value};

/// Total order over records
///
/// Comparators are shared between an analytic source and the order indexes
/// it rebuilds on every run.
pub trait RecordComparator: Send + Sync {
    /// Compare two materialized records
    fn compare(&self, left: &dyn Record, right: &dyn Record) -> Ordering;
}

impl<F> RecordComparator for F
where
    F: Fn(&dyn Record, &dyn Record) -> Ordering + Send + Sync,
{
    fn compare(&self, left: &dyn Record, right: &dyn Record) -> Ordering {
        self(left, right)
    }
}

/// One ORDER BY / PARTITION BY key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub column: usize,
    pub ascending: bool,
    pub nulls_first: bool,
}

impl SortKey {
    /// Ascending key with NULLs first
    pub fn asc(column: usize) -> Self {
        Self {
            column,
            ascending: true,
            nulls_first: true,
        }
    }

    /// Descending key with NULLs last
    pub fn desc(column: usize) -> Self {
        Self {
            column,
            ascending: false,
            nulls_first: false,
        }
    }

    /// Override NULL placement
    pub fn with_nulls_first(mut self, nulls_first: bool) -> Self {
        self.nulls_first = nulls_first;
        self
    }
}

/// Lexicographic comparator over a list of column keys
#[derive(Debug, Clone, Default)]
pub struct ColumnComparator {
    keys: SmallVec<[SortKey; 4]>,
}

impl ColumnComparator {
    pub fn new(keys: impl IntoIterator<Item = SortKey>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    /// Ascending comparator over the given columns
    pub fn ascending(columns: &[usize]) -> Self {
        Self::new(columns.iter().map(|&c| SortKey::asc(c)))
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }
}

impl RecordComparator for ColumnComparator {
    fn compare(&self, left: &dyn Record, right: &dyn Record) -> Ordering {
        let null = Value::null_unknown();
        for key in &self.keys {
            let a = left.get(key.column).unwrap_or(&null);
            let b = right.get(key.column).unwrap_or(&null);

            let ord = match (a.is_null(), b.is_null()) {
                (true, true) => Ordering::Equal,
                (true, false) => {
                    if key.nulls_first {
                        Ordering::Less
                    } else {
                        Ordering::Greater
                    }
                }
                (false, true) => {
                    if key.nulls_first {
                        Ordering::Greater
                    } else {
                        Ordering::Less
                    }
                }
                (false, false) => {
                    let ord = a.cmp(b);
                    if key.ascending {
                        ord
                    } else {
                        ord.reverse()
                    }
                }
            };

            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}
