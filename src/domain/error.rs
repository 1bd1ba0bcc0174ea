//! Error types for the catalog browser.
//!
//! This module defines the centralized error type [`BrowserError`] and a type alias
//! [`Result`] used across the crate. All errors are implemented with `thiserror`.
//!
//! None of these errors are meant to reach the presentation layer. The event
//! handler recovers each one where it is detected: malformed catalogs degrade to
//! an empty catalog, unresolved selections are repaired or rejected, and invalid
//! ranges simply match nothing.

use std::fmt;
use thiserror::Error;

/// One problem found while validating a raw catalog payload.
///
/// The `path` uses a JSONPath-like notation rooted at `$`, for example
/// `$[0].genres[1].series[2].title`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub path: String,
    pub problem: String,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, problem: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            problem: problem.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.problem)
    }
}

/// Formats the first issue and how many more follow it.
fn summarize(issues: &[ValidationIssue]) -> String {
    match issues {
        [] => "no details".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{first} (and {} more)", rest.len()),
    }
}

/// The main error type for catalog browser operations.
///
/// # Examples
///
/// ```
/// use catalog_browser::domain::BrowserError;
///
/// let err = BrowserError::UnknownDimension("colour".to_string());
/// assert_eq!(err.to_string(), "Unknown filter dimension: colour");
/// ```
#[derive(Debug, Error)]
pub enum BrowserError {
    /// Raw catalog input failed shape validation.
    ///
    /// Every issue found is reported, not only the first one. Recovered by
    /// substituting an empty catalog.
    #[error("Malformed catalog: {}", summarize(.issues))]
    MalformedCatalog { issues: Vec<ValidationIssue> },

    /// A selection referenced a category or subcategory absent from the catalog.
    ///
    /// Recovered by leaving the selection unchanged or repairing it.
    #[error("Unresolved selection: category {category:?}, subcategory {subcategory:?}")]
    UnresolvedSelection {
        category: Option<String>,
        subcategory: Option<String>,
    },

    /// A numeric range filter was configured with `min > max` or a NaN bound.
    ///
    /// Treated as "no items match".
    #[error("Invalid range for {dimension}: [{min}, {max}]")]
    InvalidFilterRange { dimension: String, min: f64, max: f64 },

    /// A filter or sort operation named a dimension the schema does not define.
    #[error("Unknown filter dimension: {0}")]
    UnknownDimension(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// User-supplied input could not be interpreted.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// A specialized `Result` type for catalog browser operations.
pub type Result<T> = std::result::Result<T, BrowserError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_catalog_message_counts_extra_issues() {
        let err = BrowserError::MalformedCatalog {
            issues: vec![
                ValidationIssue::new("$[0].name", "missing"),
                ValidationIssue::new("$[1].name", "missing"),
                ValidationIssue::new("$[2].name", "missing"),
            ],
        };
        assert_eq!(
            err.to_string(),
            "Malformed catalog: $[0].name: missing (and 2 more)"
        );
    }

    #[test]
    fn malformed_catalog_message_with_single_issue() {
        let err = BrowserError::MalformedCatalog {
            issues: vec![ValidationIssue::new("$", "expected an array")],
        };
        assert_eq!(err.to_string(), "Malformed catalog: $: expected an array");
    }
}
