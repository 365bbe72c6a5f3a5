//! Helpers for checking which code paths were taken by an operation.
//!
//! Operations like codec dispatch record short messages (`"probe png"`,
//! `"decode png"`, `"encode raw"`) into a thread-local log when
//! the `for_testing` feature is enabled.
use std::cell::RefCell;

thread_local!(static TEST_LOGS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) });

pub fn log_message(msg: &str) {
    TEST_LOGS.with(|f| f.borrow_mut().push(msg.to_string()));
}

pub fn logs_contain(msg: &str) -> bool {
    TEST_LOGS.with(|f| f.borrow().iter().any(|line| line.contains(msg)))
}

/// Returns all messages recorded by the current thread.
pub fn logs() -> Vec<String> {
    TEST_LOGS.with(|f| f.borrow().clone())
}

pub fn clear_log() {
    TEST_LOGS.with(|f| f.borrow_mut().clear())
}
