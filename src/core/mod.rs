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

//! Core types and definitions
//!
//! - [`DataType`] - column data types
//! - [`Value`] - runtime values with type information
//! - [`Row`] - a collection of values
//! - [`Record`] / [`RowRecord`] - row views carrying a row-id
//! - [`RecordMetadata`] / [`ColumnMetadata`] - column descriptors
//! - [`Error`] - error type shared by every module

pub mod error;
pub mod metadata;
pub mod record;
pub mod row;
pub mod types;
pub mod value;

pub use error::{Error, Result};
pub use metadata::{ColumnMetadata, RecordMetadata};
pub use record::{Record, RowRecord};
pub use row::Row;
pub use types::{DataType, RowId};
pub use value::Value;

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn test_metadata_row_record_integration() {
        let metadata = RecordMetadata::new(vec![
            ColumnMetadata::not_null("id", DataType::Integer),
            ColumnMetadata::new("part", DataType::Text),
        ]);

        let rec = RowRecord::new(0, crate::row![0i64, "A"]);
        assert_eq!(rec.column_count(), metadata.column_count());

        let part = metadata.column_index("part").unwrap();
        assert_eq!(rec.value(part).unwrap(), &Value::text("A"));
        assert_eq!(
            rec.value(part).unwrap().data_type(),
            metadata.column(part).unwrap().data_type
        );
    }
}
