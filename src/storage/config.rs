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

//! Analytic stage configuration
//!

use crate::core::{Error, Result};

/// Default number of row-ids per row list page
pub const DEFAULT_ROW_LIST_PAGE_SIZE: usize = 4096;

/// Default initial node capacity of each order index
pub const DEFAULT_INDEX_PAGE_SIZE: usize = 4096;

/// Configuration options for an analytic record source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticConfig {
    /// Number of row-ids stored per row list page
    /// Default: 4096
    pub row_list_page_size: usize,

    /// Initial node capacity reserved for each order index
    /// Default: 4096
    pub index_page_size: usize,

    /// Rows processed between two cancellation polls
    /// Default: 1 (poll on every captured or replayed row)
    pub cancellation_check_interval: usize,
}

impl Default for AnalyticConfig {
    fn default() -> Self {
        Self {
            row_list_page_size: DEFAULT_ROW_LIST_PAGE_SIZE,
            index_page_size: DEFAULT_INDEX_PAGE_SIZE,
            cancellation_check_interval: 1,
        }
    }
}

impl AnalyticConfig {
    /// Creates a new AnalyticConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a config with tiny pages, useful for small result sets
    pub fn small() -> Self {
        Self {
            row_list_page_size: 16,
            index_page_size: 16,
            cancellation_check_interval: 1,
        }
    }

    /// Creates a config sized for multi-million row windows
    pub fn large() -> Self {
        Self {
            row_list_page_size: 1 << 20,
            index_page_size: 1 << 20,
            cancellation_check_interval: 1,
        }
    }

    /// Builder method to set the row list page size
    pub fn with_row_list_page_size(mut self, entries: usize) -> Self {
        self.row_list_page_size = entries;
        self
    }

    /// Builder method to set the order index page size
    pub fn with_index_page_size(mut self, nodes: usize) -> Self {
        self.index_page_size = nodes;
        self
    }

    /// Builder method to set how often cancellation is polled
    pub fn with_cancellation_check_interval(mut self, rows: usize) -> Self {
        self.cancellation_check_interval = rows;
        self
    }

    /// Check that every setting is usable
    pub fn validate(&self) -> Result<()> {
        if self.row_list_page_size == 0 {
            return Err(Error::invalid_config("row_list_page_size must be > 0"));
        }
        if self.index_page_size == 0 {
            return Err(Error::invalid_config("index_page_size must be > 0"));
        }
        if self.cancellation_check_interval == 0 {
            return Err(Error::invalid_config("cancellation_check_interval must be > 0"));
        }
        Ok(())
    }
}
