//! Deduplicated warnings.
//!
//! The parser recovers from a lot of malformed input silently. When the
//! recovery is worth surfacing (a dropped declaration, an unterminated
//! `<script>`), components report it here. Each distinct message is emitted
//! once through [`tracing::warn!`] until [`clear_warnings`] is called.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Global set of warnings we've already emitted.
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about recovered or unsupported input (emitted once per unique message).
///
/// Returns `true` if the warning was emitted, `false` if it was a duplicate.
///
/// # Example
/// ```
/// use wren_common::warning::warn_once;
///
/// let _ = warn_once("HTML", "dropped declaration <!doctype>");
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    let first_time = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if first_time {
        tracing::warn!(component, "{message}");
    }
    first_time
}

/// Clear all recorded warnings (call before parsing an unrelated document).
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warn_once_deduplicates() {
        let message = "test_warn_once_deduplicates unique message";
        assert!(warn_once("Test", message));
        assert!(!warn_once("Test", message));
        // Same message from another component is a different warning.
        assert!(warn_once("Other", message));

        clear_warnings();
        assert!(warn_once("Test", message));
    }
}
