//! Process-wide slot with the most recent failure.
//!
//! Every fallible operation of the crate returns a [Result], which is the
//! primary error channel. Additionally, each failure is recorded here for
//! binding layers that follow the "check status, then read the last error"
//! convention.
//!
//! The slot is not reentrant: when several threads fail at the same time,
//! the last writer wins. Multi-threaded callers should rely on the returned
//! [Result] instead.
use std::sync::{Mutex, PoisonError};

use crate::{ErrorKind, ImageError};

/// Snapshot of the last failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastError {
    pub kind: ErrorKind,
    pub message: String,
}

static LAST_ERROR: Mutex<Option<LastError>> = Mutex::new(None);

/// Returns the most recent failure recorded by any operation of the crate.
pub fn last_error() -> Option<LastError> {
    LAST_ERROR
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

pub fn clear_last_error() {
    *LAST_ERROR.lock().unwrap_or_else(PoisonError::into_inner) = None;
}

pub(crate) fn set_last_error(err: &ImageError) {
    let last = LastError {
        kind: err.kind(),
        message: err.to_string(),
    };
    *LAST_ERROR.lock().unwrap_or_else(PoisonError::into_inner) = Some(last);
}

/// Records the error of `result`, if any, and returns `result` as is.
#[inline]
pub(crate) fn track<T>(result: Result<T, ImageError>) -> Result<T, ImageError> {
    if let Err(ref err) = result {
        set_last_error(err);
    }
    result
}
