//! Order in which fakes were called, across all fakes of the current thread.

use std::cell::RefCell;

use crate::CALL_HISTORY_LEN;

#[derive(Debug)]
struct CallHistory {
    calls: Vec<&'static str>,
    capacity: usize,
}

impl CallHistory {
    fn new(capacity: usize) -> Self {
        Self {
            calls: Vec::with_capacity(capacity),
            capacity,
        }
    }

    fn record(&mut self, name: &'static str) {
        if self.calls.len() < self.capacity {
            self.calls.push(name);
        }
    }
}

thread_local! {
    static CALL_HISTORY: RefCell<CallHistory> = RefCell::new(CallHistory::new(CALL_HISTORY_LEN));
}

pub(crate) fn record(name: &'static str) {
    CALL_HISTORY.with_borrow_mut(|history| history.record(name));
}

/// Names of the fakes called since the last [`reset_history`], in call order.
///
/// Calls beyond the history capacity are not recorded.
pub fn call_history() -> Vec<&'static str> {
    CALL_HISTORY.with_borrow(|history| history.calls.clone())
}

/// Forget every recorded call.
pub fn reset_history() {
    CALL_HISTORY.with_borrow_mut(|history| history.calls.clear());
}

/// Change how many calls the history keeps, dropping recorded calls past it.
///
/// The new capacity survives [`reset_history`].
pub fn set_call_history_len(len: usize) {
    CALL_HISTORY.with_borrow_mut(|history| {
        history.capacity = len;
        history.calls.truncate(len);
    });
}

/// Current capacity of the call history.
pub fn call_history_len() -> usize {
    CALL_HISTORY.with_borrow(|history| history.capacity)
}
