use strum_macros::Display;
use thiserror::Error;

/// The entry point a selector was passed to, named after the DOM method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Operation {
    /// Direct compilation.
    #[strum(serialize = "compile")]
    Compile,
    /// [`query_selector`](crate::query_selector)
    #[strum(serialize = "querySelector")]
    QuerySelector,
    /// [`query_selector_all`](crate::query_selector_all)
    #[strum(serialize = "querySelectorAll")]
    QuerySelectorAll,
    /// [`matches`](crate::matches)
    #[strum(serialize = "matches")]
    Matches,
    /// [`closest`](crate::closest)
    #[strum(serialize = "closest")]
    Closest,
}

/// Errors from compiling a selector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// The selector string is malformed or uses unsupported syntax.
    #[error("failed to execute '{operation}': '{selector}' is not a valid selector ({reason})")]
    InvalidSelector {
        /// Where the selector was used.
        operation: Operation,
        /// The selector as given.
        selector: String,
        /// What was wrong with it.
        reason: String,
    },
}

impl SelectorError {
    /// Build an [`SelectorError::InvalidSelector`].
    pub fn invalid(operation: Operation, selector: &str, reason: impl Into<String>) -> Self {
        Self::InvalidSelector {
            operation,
            selector: selector.to_string(),
            reason: reason.into(),
        }
    }

    /// The same error attributed to a different entry point.
    #[must_use]
    pub fn during(self, operation: Operation) -> Self {
        match self {
            Self::InvalidSelector {
                selector, reason, ..
            } => Self::InvalidSelector {
                operation,
                selector,
                reason,
            },
        }
    }
}
