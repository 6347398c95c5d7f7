//! Error types for the console script.
//!
//! Nothing here ever reaches the host page: the browser glue turns every
//! error into a console diagnostic or, where the user must act, an alert.

use crate::locator::Target;

/// Plugin-level errors
#[derive(Debug, Clone, PartialEq)]
pub enum PluginError {
    /// A host element could not be located (expected, recoverable)
    TargetNotFound(Target),
    /// `window`, `document`, `head` or `body` is unavailable
    MissingDocument(&'static str),
    /// A DOM call failed
    Dom(String),
    /// Configuration rejected by validation
    InvalidConfig(String),
}

impl std::fmt::Display for PluginError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PluginError::TargetNotFound(target) => write!(f, "Target not found: {}", target),
            PluginError::MissingDocument(what) => write!(f, "{} is unavailable", what),
            PluginError::Dom(msg) => write!(f, "DOM error: {}", msg),
            PluginError::InvalidConfig(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for PluginError {}

pub type Result<T> = std::result::Result<T, PluginError>;
