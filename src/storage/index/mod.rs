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

//! Index structures used by the analytic stage
//!
//! - [`RowIdTree`] - red-black tree of row-ids ordered by an external comparison
//! - [`OrderIndex`] - row-id tree ordered by a record comparator

pub mod order_index;
pub mod rb_tree;

pub use order_index::OrderIndex;
pub use rb_tree::{RowIdTree, RowIdTreeIter};
