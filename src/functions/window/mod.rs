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

//! Window Functions
//!
//! Reference analytic functions:
//!
//! - [`RowNumberFunction`] - ROW_NUMBER()
//! - [`RankFunction`] - RANK()
//! - [`DenseRankFunction`] - DENSE_RANK()
//! - [`LeadFunction`] - LEAD(column, offset, default)
//! - [`LagFunction`] - LAG(column, offset, default)
//! - [`SumFunction`] - SUM(column) over a partition
//! - [`CountFunction`] - COUNT(*) / COUNT(column) over a partition
//! - [`FractionOfTotalFunction`] - column / SUM(column)
//! - [`RunningRowNumberFunction`] - streaming row number
//! - [`RunningSumFunction`] - streaming running sum

mod aggregate;
mod lead_lag;
mod rank;
mod row_number;
mod running;

pub use aggregate::{CountFunction, FractionOfTotalFunction, SumFunction};
pub use lead_lag::{LagFunction, LeadFunction};
pub use rank::{DenseRankFunction, RankFunction};
pub use row_number::RowNumberFunction;
pub use running::{RunningRowNumberFunction, RunningSumFunction};
