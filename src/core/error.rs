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

//! Error types for rowreplay
//!
//! Every fallible operation in the crate returns [`Result`]. Errors raised by
//! an upstream record source travel through the analytic stage unchanged.

use thiserror::Error;

/// Result type alias for rowreplay operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the analytic execution stage
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // =========================================================================
    // Operator construction errors
    // =========================================================================
    /// Order groups, comparators and function groups disagree in count
    #[error("malformed analytic operator: {comparators} comparators for {groups} function groups")]
    MalformedOperator { comparators: usize, groups: usize },

    /// Configuration value out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // =========================================================================
    // Execution control
    // =========================================================================
    /// Query cancelled, typically because the client disconnected
    #[error("query cancelled")]
    QueryCancelled,

    /// Off-heap allocation failed
    #[error("out of memory: failed to allocate {bytes} bytes for {what}")]
    OutOfMemory { what: &'static str, bytes: usize },

    // =========================================================================
    // Cursor errors
    // =========================================================================
    /// Cursor used before `prepare_cursor`
    #[error("cursor is not prepared")]
    CursorNotPrepared,

    /// Record source has been closed and cannot be used
    #[error("record source closed")]
    SourceClosed,

    /// Random access to a row id the source does not know about
    #[error("row {0} not found")]
    RowNotFound(i64),

    /// Column index out of bounds
    #[error("column index {index} out of bounds")]
    ColumnIndexOutOfBounds { index: usize },

    // =========================================================================
    // Value errors
    // =========================================================================
    /// Invalid argument for function
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    // =========================================================================
    // Other errors
    // =========================================================================
    /// Internal error for unexpected conditions
    #[error("{message}")]
    Internal { message: String },
}

impl Error {
    /// Create a new MalformedOperator error
    pub fn malformed_operator(comparators: usize, groups: usize) -> Self {
        Error::MalformedOperator {
            comparators,
            groups,
        }
    }

    /// Create a new OutOfMemory error
    pub fn out_of_memory(what: &'static str, bytes: usize) -> Self {
        Error::OutOfMemory { what, bytes }
    }

    /// Create a new Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Error::Internal {
            message: message.into(),
        }
    }

    /// Create a new InvalidArgument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }

    /// Create a new InvalidConfig error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Error::InvalidConfig(message.into())
    }

    /// Check if this error is the cancellation signal
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Error::QueryCancelled)
    }

    /// Check if this error reports resource exhaustion
    pub fn is_resource_exhaustion(&self) -> bool {
        matches!(self, Error::OutOfMemory { .. })
    }

    /// Check if this error is caused by misuse of the cursor protocol
    pub fn is_protocol_error(&self) -> bool {
        matches!(
            self,
            Error::CursorNotPrepared | Error::SourceClosed | Error::MalformedOperator { .. }
        )
    }
}
