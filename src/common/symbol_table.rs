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

//! Symbol tables
//!
//! Symbol columns store small integer keys instead of strings. A symbol table
//! maps each key back to its interned string, and each string to its key.
//! Keys are dense and assigned in first-seen order starting from zero.

use std::sync::Arc;

use rustc_hash::FxHashMap;

/// Key stored in a symbol column for NULL
pub const NULL_SYMBOL_KEY: i32 = -1;

/// Bidirectional string <-> key dictionary for one symbol column
#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
    keys: FxHashMap<Arc<str>, i32>,
    values: Vec<Arc<str>>,
}

impl SymbolTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table by interning every value in order
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::new();
        for v in values {
            table.intern(v.as_ref());
        }
        table
    }

    /// Return the key for `value`, assigning the next free key on first sight
    pub fn intern(&mut self, value: &str) -> i32 {
        if let Some(&key) = self.keys.get(value) {
            return key;
        }
        let key = self.values.len() as i32;
        let value: Arc<str> = Arc::from(value);
        self.values.push(Arc::clone(&value));
        self.keys.insert(value, key);
        key
    }

    /// Look up the key of an already interned string
    pub fn key_of(&self, value: &str) -> Option<i32> {
        self.keys.get(value).copied()
    }

    /// Resolve a key back to its string; `None` for NULL or unknown keys
    pub fn value_of(&self, key: i32) -> Option<&str> {
        if key < 0 {
            return None;
        }
        self.values.get(key as usize).map(|s| s.as_ref())
    }

    /// Number of distinct symbols
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if no symbol was interned
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_assigns_dense_keys() {
        let mut table = SymbolTable::new();
        assert_eq!(table.intern("A"), 0);
        assert_eq!(table.intern("B"), 1);
        assert_eq!(table.intern("A"), 0);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_lookup_both_ways() {
        let table = SymbolTable::from_values(["x", "y", "x", "z"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.key_of("z"), Some(2));
        assert_eq!(table.key_of("w"), None);
        assert_eq!(table.value_of(1), Some("y"));
        assert_eq!(table.value_of(NULL_SYMBOL_KEY), None);
        assert_eq!(table.value_of(99), None);
    }
}
