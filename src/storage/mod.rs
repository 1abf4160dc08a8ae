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

//! Storage module
//!
//! This module contains the storage layer components:
//! - Row list recording the natural order of captured rows
//! - Index structures for sorted traversal
//! - Cursor and storage facade traits
//! - In-memory record source
//! - Configuration types

pub mod config;
pub mod index;
pub mod memory;
pub mod row_list;
pub mod traits;

pub use config::{AnalyticConfig, DEFAULT_INDEX_PAGE_SIZE, DEFAULT_ROW_LIST_PAGE_SIZE};
pub use index::{OrderIndex, RowIdTree};
pub use memory::{MemoryRecordSource, SourceStats, SymbolTableFacade};
pub use row_list::{RowHandle, RowList};
pub use traits::{EmptyStorageFacade, RandomAccessCursor, RecordCursor, StorageFacade};
