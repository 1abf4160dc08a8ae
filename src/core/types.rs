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

//! Core type definitions: DataType and RowId

use std::fmt;

/// Stable identifier of a source row, valid for the whole cursor session
pub type RowId = i64;

/// Column data types understood by the analytic stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DataType {
    /// NULL data type, used for unknown/unspecified types
    #[default]
    Null,

    /// 64-bit signed integer
    Integer,

    /// 64-bit floating point number
    Float,

    /// UTF-8 text string
    Text,

    /// Boolean true/false
    Boolean,

    /// Interned string; values are integer keys resolved through a symbol table
    Symbol,
}

impl DataType {
    /// Returns true if stored values need a storage facade lookup to be read
    pub fn is_symbol(&self) -> bool {
        matches!(self, DataType::Symbol)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Null => write!(f, "NULL"),
            DataType::Integer => write!(f, "INTEGER"),
            DataType::Float => write!(f, "FLOAT"),
            DataType::Text => write!(f, "TEXT"),
            DataType::Boolean => write!(f, "BOOLEAN"),
            DataType::Symbol => write!(f, "SYMBOL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_predicates() {
        assert!(DataType::Symbol.is_symbol());
        assert!(!DataType::Integer.is_symbol());
        assert_eq!(DataType::Symbol.to_string(), "SYMBOL");
        assert_eq!(DataType::default(), DataType::Null);
    }
}
