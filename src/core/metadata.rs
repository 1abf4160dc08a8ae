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

//! Record metadata - ordered column descriptors for a record source
//!
//! An analytic source publishes *split* metadata: the wrapped source's
//! columns first, then every function output column in function order.

use std::fmt;
use std::sync::OnceLock;

use rustc_hash::FxHashMap;

use super::types::DataType;

/// A single column descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMetadata {
    /// Column name
    pub name: String,

    /// Data type of the column
    pub data_type: DataType,

    /// Whether the column can contain NULL values
    pub nullable: bool,
}

impl ColumnMetadata {
    /// Create a nullable column descriptor
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: true,
        }
    }

    /// Create a column descriptor that never holds NULL
    pub fn not_null(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: false,
        }
    }
}

impl fmt::Display for ColumnMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.data_type)?;
        if !self.nullable {
            write!(f, " NOT NULL")?;
        }
        Ok(())
    }
}

/// Ordered list of column descriptors
#[derive(Debug)]
pub struct RecordMetadata {
    columns: Vec<ColumnMetadata>,

    /// Number of leading columns that come from a wrapped source, when this
    /// metadata was produced by [`RecordMetadata::split`]
    split: Option<usize>,

    /// Lowercase name -> index, computed lazily on first lookup
    column_index_map_cache: OnceLock<FxHashMap<String, usize>>,
}

impl Clone for RecordMetadata {
    fn clone(&self) -> Self {
        Self {
            columns: self.columns.clone(),
            split: self.split,
            column_index_map_cache: OnceLock::new(),
        }
    }
}

impl PartialEq for RecordMetadata {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns && self.split == other.split
    }
}

impl Eq for RecordMetadata {}

impl RecordMetadata {
    /// Create metadata from column descriptors
    pub fn new(columns: Vec<ColumnMetadata>) -> Self {
        Self {
            columns,
            split: None,
            column_index_map_cache: OnceLock::new(),
        }
    }

    /// Concatenate a source's metadata with the output columns of its functions
    pub fn split(source: &RecordMetadata, functions: Vec<ColumnMetadata>) -> Self {
        let mut columns = Vec::with_capacity(source.column_count() + functions.len());
        columns.extend(source.columns.iter().cloned());
        columns.extend(functions);
        Self {
            columns,
            split: Some(source.column_count()),
            column_index_map_cache: OnceLock::new(),
        }
    }

    /// Index of the first column that does not come from the wrapped source
    pub fn split_index(&self) -> Option<usize> {
        self.split
    }

    /// Get the number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Check if there are no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// All column descriptors in order
    pub fn columns(&self) -> &[ColumnMetadata] {
        &self.columns
    }

    /// Get a column by index
    pub fn column(&self, index: usize) -> Option<&ColumnMetadata> {
        self.columns.get(index)
    }

    /// Get the column index by name (case-insensitive)
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_index_map()
            .get(name.to_lowercase().as_str())
            .copied()
    }

    /// Get all column names
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    #[inline]
    fn column_index_map(&self) -> &FxHashMap<String, usize> {
        self.column_index_map_cache.get_or_init(|| {
            let mut map = FxHashMap::default();
            // first occurrence wins when a function output shadows a source column
            for (i, c) in self.columns.iter().enumerate() {
                map.entry(c.name.to_lowercase()).or_insert(i);
            }
            map
        })
    }
}

impl fmt::Display for RecordMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, col) in self.columns.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", col)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source_metadata() -> RecordMetadata {
        RecordMetadata::new(vec![
            ColumnMetadata::not_null("id", DataType::Integer),
            ColumnMetadata::new("Val", DataType::Float),
        ])
    }

    #[test]
    fn test_column_lookup_case_insensitive() {
        let md = source_metadata();
        assert_eq!(md.column_count(), 2);
        assert_eq!(md.column_index("val"), Some(1));
        assert_eq!(md.column_index("VAL"), Some(1));
        assert_eq!(md.column_index("missing"), None);
        assert_eq!(md.split_index(), None);
    }

    #[test]
    fn test_split_metadata() {
        let md = RecordMetadata::split(
            &source_metadata(),
            vec![ColumnMetadata::not_null("rn", DataType::Integer)],
        );
        assert_eq!(md.column_count(), 3);
        assert_eq!(md.split_index(), Some(2));
        assert_eq!(md.column_names(), vec!["id", "Val", "rn"]);
        assert_eq!(md.column_index("rn"), Some(2));
    }

    #[test]
    fn test_shadowed_name_resolves_to_source() {
        let md = RecordMetadata::split(
            &source_metadata(),
            vec![ColumnMetadata::new("id", DataType::Integer)],
        );
        assert_eq!(md.column_index("id"), Some(0));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            source_metadata().to_string(),
            "[id INTEGER NOT NULL, Val FLOAT]"
        );
    }
}
