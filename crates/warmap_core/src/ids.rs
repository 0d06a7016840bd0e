//! Identifier generation for tasks and goals.
//!
//! # Responsibility
//! - Produce unique, time-ordered string IDs for in-memory planner entities.
//!
//! # Invariants
//! - The timestamp component never decreases within one process.
//! - IDs are unique for the process lifetime; they are not stable across
//!   restarts unless the caller stores them.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

const RANDOM_SUFFIX_LEN: usize = 12;

static LAST_MILLIS: AtomicU64 = AtomicU64::new(0);

/// Generates a new identifier shaped as `{prefix}_{millis}_{suffix}`.
///
/// `millis` is clamped so it never goes backwards when the wall clock does;
/// the random suffix separates IDs created within the same millisecond.
pub fn new_id(prefix: &str) -> String {
    let millis = next_millis();
    let simple = Uuid::new_v4().simple().to_string();
    format!("{prefix}_{millis}_{}", &simple[..RANDOM_SUFFIX_LEN])
}

/// Extracts the timestamp component from an ID produced by [`new_id`].
pub fn id_millis(id: &str) -> Option<u64> {
    let mut parts = id.rsplitn(3, '_');
    let _suffix = parts.next()?;
    parts.next()?.parse().ok()
}

fn next_millis() -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0);
    let previous = LAST_MILLIS.fetch_max(now, Ordering::SeqCst);
    previous.max(now)
}
