//! Results of processing several inputs in one invocation.

use std::path::PathBuf;

use crate::error::VimballError;

/// Per-input outcomes of a batch.
///
/// A failed input never stops the batch; its error is kept here and the next
/// input is processed.
#[derive(Debug)]
pub struct BatchReport<T> {
    /// Inputs that succeeded, in processing order.
    pub succeeded: Vec<(PathBuf, T)>,
    /// Inputs that failed, in processing order.
    pub failed: Vec<(PathBuf, VimballError)>,
}

impl<T> Default for BatchReport<T> {
    fn default() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }
}

impl<T> BatchReport<T> {
    /// Record the result for `input`.
    pub fn record(&mut self, input: PathBuf, result: Result<T, VimballError>) {
        match result {
            Ok(value) => self.succeeded.push((input, value)),
            Err(e) => self.failed.push((input, e)),
        }
    }

    /// Whether every input succeeded.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Total number of inputs processed.
    pub fn len(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// Whether no inputs were processed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
