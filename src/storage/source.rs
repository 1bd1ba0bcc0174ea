//! Catalog sources and the single-shot catalog load.
//!
//! A [`CatalogSource`] supplies a raw payload and nothing more: it either
//! returns a JSON value or fails. [`load_or_empty`] combines fetching with
//! validation and never fails: when anything goes wrong the view gets an empty
//! catalog and the error is logged.

use crate::domain::error::{BrowserError, Result};
use crate::domain::Catalog;
use crate::storage::validate::load;
use serde_json::Value;
use std::path::PathBuf;

/// Abstraction over where a raw catalog payload comes from.
///
/// # Implementations
///
/// - [`JsonFileSource`]: reads and parses a JSON file
/// - [`StaticSource`]: serves a payload already in memory (bundled data)
///
/// # Examples
///
/// ```no_run
/// use catalog_browser::storage::{CatalogSource, JsonFileSource};
///
/// let source = JsonFileSource::new("/srv/data/series.json");
/// let raw = source.fetch()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait CatalogSource {
    /// Produces the raw payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be read or is not valid JSON.
    fn fetch(&self) -> Result<Value>;

    /// Human-readable description used in logs.
    fn describe(&self) -> String;
}

/// Reads a catalog from a JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    file_path: PathBuf,
}

impl JsonFileSource {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }
}

impl CatalogSource for JsonFileSource {
    fn fetch(&self) -> Result<Value> {
        let _span = tracing::debug_span!("json_file_fetch", path = ?self.file_path).entered();

        let contents = std::fs::read_to_string(&self.file_path)?;
        let value = serde_json::from_str(&contents)?;

        tracing::debug!(bytes = contents.len(), "catalog file read");
        Ok(value)
    }

    fn describe(&self) -> String {
        format!("file {}", self.file_path.display())
    }
}

/// Serves a payload that is already in memory.
#[derive(Debug, Clone)]
pub struct StaticSource {
    payload: Value,
}

impl StaticSource {
    #[must_use]
    pub const fn new(payload: Value) -> Self {
        Self { payload }
    }

    /// Parses bundled JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::Json`] if the text is not valid JSON.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(text)?))
    }
}

impl CatalogSource for StaticSource {
    fn fetch(&self) -> Result<Value> {
        Ok(self.payload.clone())
    }

    fn describe(&self) -> String {
        "bundled payload".to_string()
    }
}

/// Outcome of the one-time catalog load.
///
/// There are exactly two outcomes. A degraded load still hands the view a
/// usable (empty) catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The payload was fetched and validated.
    Loaded(Catalog),

    /// Fetching or validation failed; the view shows "no data".
    Degraded {
        /// Description of what went wrong.
        error: String,
    },
}

impl LoadOutcome {
    /// Splits the outcome into the catalog to show and an optional error.
    #[must_use]
    pub fn into_parts(self) -> (Catalog, Option<String>) {
        match self {
            Self::Loaded(catalog) => (catalog, None),
            Self::Degraded { error } => (Catalog::empty(), Some(error)),
        }
    }
}

/// Fetches and validates a catalog, degrading to an empty one on failure.
///
/// # Examples
///
/// ```
/// use catalog_browser::storage::{load_or_empty, LoadOutcome, StaticSource};
/// use serde_json::json;
///
/// let source = StaticSource::new(json!({ "not": "a catalog" }));
/// assert!(matches!(load_or_empty(&source), LoadOutcome::Degraded { .. }));
/// ```
pub fn load_or_empty(source: &dyn CatalogSource) -> LoadOutcome {
    let description = source.describe();
    let _span = tracing::debug_span!("load_catalog", source = %description).entered();

    match source.fetch().and_then(|raw| load(&raw)) {
        Ok(catalog) => {
            tracing::debug!(
                categories = catalog.categories().len(),
                items = catalog.item_count(),
                "catalog loaded"
            );
            LoadOutcome::Loaded(catalog)
        }
        Err(e) => {
            tracing::warn!(error = %e, source = %description, "catalog load failed, using empty catalog");
            LoadOutcome::Degraded {
                error: describe_failure(&e),
            }
        }
    }
}

fn describe_failure(error: &BrowserError) -> String {
    match error {
        BrowserError::Io(e) => format!("could not read catalog: {e}"),
        BrowserError::Json(e) => format!("catalog is not valid JSON: {e}"),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn missing_file_degrades_to_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonFileSource::new(dir.path().join("missing.json"));

        let (catalog, error) = load_or_empty(&source).into_parts();
        assert!(catalog.is_empty());
        assert!(error.unwrap().starts_with("could not read catalog"));
    }

    #[test]
    fn invalid_json_degrades_to_empty_catalog() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[{{ \"id\": ").unwrap();

        let outcome = load_or_empty(&JsonFileSource::new(file.path()));
        let LoadOutcome::Degraded { error } = outcome else {
            panic!("expected degraded outcome");
        };
        assert!(error.starts_with("catalog is not valid JSON"));
    }

    #[test]
    fn valid_file_loads() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "{}",
            json!([{ "id": "swift", "name": "Maruti Swift", "price": 6.49 }])
        )
        .unwrap();

        let outcome = load_or_empty(&JsonFileSource::new(file.path()));
        let LoadOutcome::Loaded(catalog) = outcome else {
            panic!("expected loaded outcome");
        };
        assert_eq!(catalog.item_count(), 1);
    }

    #[test]
    fn static_source_rejects_bad_json_text() {
        assert!(StaticSource::from_json_str("{").is_err());
        assert!(StaticSource::from_json_str("[]").is_ok());
    }
}
