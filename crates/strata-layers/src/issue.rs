//! Non-fatal problems recorded during a conversion.

use std::fmt;

use serde::Serialize;
use strata_common::warning::warn_once;

/// A degraded step: an iteration ceiling, a missing ancestor layer, a failed
/// image. The conversion still returns a tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionIssue {
    /// Pipeline stage that reported it (`assemble`, `images`, ...).
    pub component: String,
    /// Human-readable description.
    pub message: String,
}

impl ConversionIssue {
    /// A new issue.
    #[must_use]
    pub fn new(component: &str, message: impl Into<String>) -> Self {
        Self {
            component: component.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConversionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.component, self.message)
    }
}

/// Print a deduplicated warning and record it.
pub(crate) fn report(issues: &mut Vec<ConversionIssue>, component: &str, message: String) {
    let _ = warn_once(component, &message);
    issues.push(ConversionIssue::new(component, message));
}
