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

//! Storage facade - per-column lookup services a cursor exposes downstream
//!

use std::sync::Arc;

use crate::common::SymbolTable;
use crate::core::Value;

/// Lookup services attached to a cursor's columns
pub trait StorageFacade: Send + Sync {
    /// Symbol table of a symbol column, `None` for any other column
    fn symbol_table(&self, column: usize) -> Option<Arc<SymbolTable>>;

    /// Resolve a symbol key read from `column` to its string
    fn resolve_symbol(&self, column: usize, key: &Value) -> Option<String> {
        let key = i32::try_from(key.as_int64()?).ok()?;
        self.symbol_table(column)?
            .value_of(key)
            .map(str::to_string)
    }
}

/// Facade for cursors without symbol columns
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyStorageFacade;

impl StorageFacade for EmptyStorageFacade {
    fn symbol_table(&self, _column: usize) -> Option<Arc<SymbolTable>> {
        None
    }
}
