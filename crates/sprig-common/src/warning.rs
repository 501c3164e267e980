//! Parse-anomaly warnings with colored terminal output.
//!
//! Scraped pages are routinely sloppy, so the parser degrades instead of
//! failing; every degradation is reported here. Messages are deduplicated so
//! a page with ten thousand unquoted attributes produces one line, not ten
//! thousand. The total count of distinct anomalies stays queryable through
//! [`warning_count`] for callers (and tests) that want to know whether a
//! scan was clean.

use std::collections::HashSet;
use std::sync::Mutex;

/// ANSI color codes for terminal output
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Global set of warnings already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about a recoverable anomaly (prints once per unique message).
///
/// # Example
/// ```ignore
/// warn_once("Builder", "closing tag with no open scope, skipped");
/// ```
///
/// # Panics
/// Panics if the global warning set mutex is poisoned.
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let should_print = WARNED
        .lock()
        .unwrap()
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_print {
        eprintln!("{YELLOW}[Sprig {component}] warning: {message}{RESET}");
    }
}

/// Number of distinct warnings recorded since the last [`clear_warnings`].
///
/// # Panics
/// Panics if the global warning set mutex is poisoned.
#[must_use]
pub fn warning_count() -> usize {
    WARNED
        .lock()
        .unwrap()
        .as_ref()
        .map_or(0, HashSet::len)
}

/// Clear all recorded warnings (call before scanning a new page).
///
/// # Panics
/// Panics if the global warning set mutex is poisoned.
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap();
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
