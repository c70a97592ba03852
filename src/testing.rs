//! Thread-local log of internal checkpoints, used by tests to observe
//! what happened inside a filter call (buffer locks, allocations, dispatch).
use std::cell::RefCell;

thread_local!(static TEST_LOGS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) });

pub fn log_message(msg: &str) {
    TEST_LOGS.with(|logs| logs.borrow_mut().push(msg.to_owned()));
}

pub fn logs_contain(msg: &str) -> bool {
    count_messages(msg) > 0
}

/// Returns how many log lines of the current thread contain `msg`.
pub fn count_messages(msg: &str) -> usize {
    TEST_LOGS.with(|logs| logs.borrow().iter().filter(|line| line.contains(msg)).count())
}

pub fn clear_log() {
    TEST_LOGS.with(|logs| logs.borrow_mut().clear());
}
