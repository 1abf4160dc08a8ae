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

//! Execution context: cooperative cancellation
//!
//! A query owner keeps a [`CancellationHandle`] and hands clones of it to the
//! cursors it prepares. Cursors poll the flag between rows and bail out with
//! [`Error::QueryCancelled`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::core::{Error, Result};

/// Handle for cancelling a query from another thread
#[derive(Debug, Clone, Default)]
pub struct CancellationHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancellationHandle {
    /// Create a handle that is not cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the query
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Check if the query has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Check for cancellation and return an error if cancelled
    #[inline]
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::QueryCancelled)
        } else {
            Ok(())
        }
    }
}

/// Polls a [`CancellationHandle`] once every `interval` rows
#[derive(Debug)]
pub(crate) struct CancellationPoller<'a> {
    handle: &'a CancellationHandle,
    interval: usize,
    countdown: usize,
}

impl<'a> CancellationPoller<'a> {
    pub(crate) fn new(handle: &'a CancellationHandle, interval: usize) -> Self {
        let interval = interval.max(1);
        Self {
            handle,
            interval,
            countdown: interval,
        }
    }

    /// Count one row, checking the flag when the interval elapses
    #[inline]
    pub(crate) fn tick(&mut self) -> Result<()> {
        self.countdown -= 1;
        if self.countdown == 0 {
            self.countdown = self.interval;
            self.handle.check()?;
        }
        Ok(())
    }
}
