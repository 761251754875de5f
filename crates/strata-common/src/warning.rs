//! Deduplicated conversion warnings.
//!
//! A conversion records every degraded step as a `ConversionIssue` and also
//! logs it here. The log is deduplicated per conversion: `convert` calls
//! [`clear_warnings`] first, and [`warn_once`] prints each
//! `(component, message)` pair at most once until the next clear.

use std::collections::HashSet;
use std::sync::Mutex;

use owo_colors::OwoColorize;

/// Pairs printed since the last [`clear_warnings`].
static WARNED: Mutex<Option<HashSet<(String, String)>>> = Mutex::new(None);

/// Print `[Strata <component>] ⚠ <message>` to stderr in yellow unless the
/// same pair was already printed during this conversion.
///
/// Returns `true` when the line was printed.
///
/// # Example
/// ```ignore
/// warn_once("assemble", "reconciliation stopped after 10000 passes");
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = (component.to_string(), message.to_string());
    let first = WARNED
        .lock()
        .map(|mut guard| guard.get_or_insert_with(HashSet::new).insert(key))
        // Poisoned: report without deduplication.
        .unwrap_or(true);

    if first {
        eprintln!("{}", format!("[Strata {component}] ⚠ {message}").yellow());
    }
    first
}

/// Forget what has been printed. Called at the start of every conversion.
pub fn clear_warnings() {
    if let Ok(mut guard) = WARNED.lock() {
        if let Some(set) = guard.as_mut() {
            set.clear();
        }
    }
}
