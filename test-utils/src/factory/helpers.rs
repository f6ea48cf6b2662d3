//! Shared helper utilities for factories and fixtures.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for generating unique keys in tests.
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Gets the next unique counter value for test data.
pub fn next_id() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Generates a unique record key in the same alphabet the bot uses.
pub fn random_key() -> String {
    format!("fixture{:015}", next_id())
}
