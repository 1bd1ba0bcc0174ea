//! Catalog Browser: a two-level catalog browse engine.
//!
//! A catalog is a list of categories, each holding subcategories, each holding
//! items. One engine powers every browse screen built on it:
//! - Category and subcategory selection that repairs itself when the catalog changes
//! - Composable filters: free-text search, multi-choice, numeric ranges, feature flags
//! - Stable sorting by any configured key, ascending or descending
//! - Memoized derivation of the visible item list
//! - A view model with explicit "no data" and "no matches" empty states

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Host binary (main.rs)                              │  ← Line commands
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← Event handling
//! │  - Browser state and memoized derivation            │
//! │  - Action dispatching                               │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Engine        │   │ Storage       │   │ UI            │
//! │ (engine/)     │   │ (storage/)    │   │ (ui/)         │
//! │ - Schemas     │   │ - Sources     │   │ - View model  │
//! │ - Filters     │   │ - Validation  │   │ - Plain text  │
//! │ - Sort        │   │ - Raw records │   │   rendering   │
//! │ - Selection   │   │               │   │               │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain & Infrastructure                            │
//! │  - Catalog, items, icons, errors (domain/)          │
//! │  - Paths (infrastructure/)                          │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional
//! │  - OpenTelemetry tracing, OTLP JSON file export     │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Browser state with the event/action model
//! - [`engine`]: Schemas, filter composition, sorting, selection, derivation
//! - [`domain`]: Catalog types, icons and errors
//! - [`storage`]: Catalog sources and validated loading
//! - [`ui`]: View model and plain-text rendering
//! - [`tools`]: Word masking and loan installment calculator
//! - [`access`]: Delegated authentication
//! - [`context`]: Application context (config, tracing, authenticator)
//! - [`infrastructure`]: Platform paths
//! - [`observability`]: OpenTelemetry tracing
//!
//! # Configuration
//!
//! ```toml
//! profile = "cars"
//! catalog_path = "~/data/cars.json"
//! preferred_category = "Cars"
//! trace_level = "debug"
//! masked_words = ["darn", "heck"]
//! ```
//!
//! An inline `[schema]` table replaces the profile preset; see
//! [`engine::schema`] for its format.
//!
//! # Example
//!
//! ```rust
//! use catalog_browser::{handle_event, initialize, Config, Event};
//! use catalog_browser::storage::{load_or_empty, StaticSource};
//!
//! let config = Config::from_toml_str("profile = \"guides\"")?;
//! let mut state = initialize(&config);
//!
//! let source = StaticSource::from_json_str(r#"[
//!     {"name": "TV", "icon": "Tv", "genres": [
//!         {"name": "Comedy", "icon": "Smile", "series": [{"id": "1", "title": "Archer"}]}
//!     ]}
//! ]"#)?;
//! handle_event(&mut state, &Event::CatalogLoaded(load_or_empty(&source)))?;
//! handle_event(&mut state, &Event::SetSearch("arch".to_string()))?;
//!
//! assert_eq!(state.derived().ids(), ["1"]);
//! # Ok::<(), catalog_browser::BrowserError>(())
//! ```

pub mod access;
pub mod app;
pub mod context;
pub mod domain;
pub mod engine;
pub mod infrastructure;
pub mod storage;
pub mod tools;
pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, BrowserState, Event};
pub use context::AppContext;
pub use domain::{BrowserError, Result};

use engine::BrowseSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tools::WordMask;

/// Which built-in browse schema to use when no inline schema is given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    /// Entertainment and city guides: search, sort by title.
    #[default]
    Guides,
    /// Car search: body type, fuel, budget, power, boot space, features.
    Cars,
}

impl Profile {
    #[must_use]
    pub fn schema(self) -> BrowseSchema {
        match self {
            Self::Guides => BrowseSchema::guides(),
            Self::Cars => BrowseSchema::cars(),
        }
    }

    fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "guides" => Some(Self::Guides),
            "cars" => Some(Self::Cars),
            _ => None,
        }
    }
}

/// Browser configuration, read from TOML or a flat key/value map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub profile: Profile,

    /// JSON catalog file. `~` expands to the home directory. Without it the
    /// browser starts with an empty catalog.
    pub catalog_path: Option<String>,

    /// Category selected first when present in the catalog.
    pub preferred_category: Option<String>,

    /// Tracing filter (`trace`, `debug`, `info`, `warn`, `error`, or full
    /// `EnvFilter` directives). `RUST_LOG` overrides it. Default: `"info"`
    pub trace_level: Option<String>,

    /// Directory for the trace file. Default: the platform data directory.
    pub trace_dir: Option<String>,

    /// Inline schema replacing the profile preset.
    pub schema: Option<BrowseSchema>,

    /// Words masked by the word mask tool. Default: a built-in list.
    pub masked_words: Option<Vec<String>>,
}

impl Config {
    /// # Errors
    ///
    /// Returns [`BrowserError::Config`] when the text is not valid TOML or
    /// does not match the configuration shape.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| BrowserError::Config(e.to_string()))
    }

    /// # Errors
    ///
    /// Returns [`BrowserError::Io`] if the file cannot be read, otherwise as
    /// [`Config::from_toml_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let _span = tracing::debug_span!("config_from_file", path = ?path).entered();
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Builds a configuration from flat string pairs, such as command-line
    /// `key=value` overrides.
    ///
    /// Parsing is lenient: an unknown profile falls back to the default, blank
    /// values count as unset, and `masked_words` is comma-separated. Keys not
    /// listed here are ignored.
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use catalog_browser::{Config, Profile};
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("profile".to_string(), "cars".to_string());
    /// map.insert("masked_words".to_string(), "darn, heck".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.profile, Profile::Cars);
    /// assert_eq!(config.masked_words, Some(vec!["darn".to_string(), "heck".to_string()]));
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let value = |key: &str| {
            map.get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(String::from)
        };

        let profile = value("profile").map_or_else(Profile::default, |name| {
            Profile::parse(&name).unwrap_or_else(|| {
                tracing::debug!(profile = %name, "unknown profile, using default");
                Profile::default()
            })
        });

        let masked_words = value("masked_words").map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|w| !w.is_empty())
                .map(String::from)
                .collect::<Vec<_>>()
        });

        Self {
            profile,
            catalog_path: value("catalog_path"),
            preferred_category: value("preferred_category"),
            trace_level: value("trace_level"),
            trace_dir: value("trace_dir"),
            schema: None,
            masked_words,
        }
    }

    /// The inline schema if one is configured, otherwise the profile preset.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::Config`] when the inline schema is invalid.
    pub fn schema(&self) -> Result<BrowseSchema> {
        match &self.schema {
            Some(schema) => {
                schema.validate()?;
                Ok(schema.clone())
            }
            None => Ok(self.profile.schema()),
        }
    }

    #[must_use]
    pub fn word_mask(&self) -> WordMask {
        self.masked_words
            .as_ref()
            .map_or_else(WordMask::default, WordMask::new)
    }
}

/// Creates the browser state for a configuration.
///
/// The catalog is not read here: the state starts pending and the host loads
/// the catalog in response to the [`Action::LoadCatalog`] that mounting emits.
/// An invalid inline schema is logged and replaced by the profile preset.
#[must_use]
pub fn initialize(config: &Config) -> BrowserState {
    tracing::debug!(profile = ?config.profile, "initializing catalog browser");

    let schema = config.schema().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "invalid schema in configuration, using profile preset");
        config.profile.schema()
    });

    BrowserState::pending(schema, config.preferred_category.clone())
}
