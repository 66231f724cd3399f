//! Store writes dispatched after an optimistic local change.

use std::fmt;

use crate::error::SessionError;

/// Result of one dispatched write.
#[derive(Debug)]
pub(crate) struct WriteOutcome {
    pub operation: &'static str,
    pub result: Result<(), SessionError>,
}

/// A write that did not reach the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteFailure {
    /// Which session operation dispatched it (e.g. `record_download`).
    pub operation: &'static str,
    pub message: String,
}

impl fmt::Display for WriteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.operation, self.message)
    }
}

/// What happened to the writes awaited by one `settle`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteReport {
    pub succeeded: usize,
    pub failures: Vec<WriteFailure>,
}

impl WriteReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failures.len()
    }

    pub(crate) fn record(&mut self, outcome: WriteOutcome) -> bool {
        match outcome.result {
            Ok(()) => {
                self.succeeded += 1;
                true
            }
            Err(err) => {
                self.failures.push(WriteFailure {
                    operation: outcome.operation,
                    message: err.user_message(),
                });
                false
            }
        }
    }
}
