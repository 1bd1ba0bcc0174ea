//! Browse schemas: which dimensions a view filters on and which keys it sorts by.
//!
//! One engine serves every browse screen. What differs between the guide
//! explorer and car search is only this schema, so both are expressed as
//! configuration rather than as separate filter code. Schemas deserialize from
//! TOML, which lets a deployment define its own without touching the engine.
//!
//! # TOML Format
//!
//! ```toml
//! name = "books"
//! search_fields = ["title", "author"]
//! reset_clears_sort = true
//!
//! [[choices]]
//! key = "genre"
//! label = "Genre"
//! options = ["Fiction", "History"]
//!
//! [[ranges]]
//! key = "pages"
//! label = "Length"
//! presets = [{ label = "Short", min = 0, max = 200 }, { label = "Long", min = 500 }]
//!
//! [[flags]]
//! key = "signed"
//! label = "Signed copy"
//! attribute = "isSigned"
//!
//! [[sort_keys]]
//! key = "title"
//! label = "Title"
//! kind = "text"
//! ```

use crate::domain::{BrowserError, Result, DESCRIPTION_FIELD, TITLE_FIELD};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How the free-text search term is matched against item text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Case-insensitive substring match.
    #[default]
    Substring,
    /// Skim-style fuzzy match; every whitespace-separated token must match.
    Fuzzy,
}

/// A multi-choice inclusion dimension over a text attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceDimension {
    pub key: String,
    pub label: String,
    /// Values offered to the user, in display order.
    #[serde(default)]
    pub options: Vec<String>,
}

/// A labelled preset for a range dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangePreset {
    pub label: String,
    pub min: f64,
    #[serde(default = "unbounded")]
    pub max: f64,
}

const fn unbounded() -> f64 {
    f64::INFINITY
}

/// An inclusive numeric range dimension over a number attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeDimension {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub presets: Vec<RangePreset>,
}

/// A boolean feature toggle.
///
/// Without `at_least`, an enabled flag requires the boolean attribute to be
/// `true`. With it, the attribute is read as a number that must reach the
/// threshold (for example two or more airbags).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagDimension {
    pub key: String,
    pub label: String,
    pub attribute: String,
    #[serde(default)]
    pub at_least: Option<f64>,
}

/// Comparison used for a sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKind {
    Text,
    Numeric,
}

/// A key the result list may be sorted by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortKeySpec {
    pub key: String,
    pub label: String,
    pub kind: SortKind,
}

fn default_search_fields() -> Vec<String> {
    vec![TITLE_FIELD.to_string()]
}

/// The full dimension list and sort keys for one browse screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowseSchema {
    pub name: String,

    /// Item fields searched by the free-text filter; any match suffices.
    #[serde(default = "default_search_fields")]
    pub search_fields: Vec<String>,

    #[serde(default)]
    pub match_mode: MatchMode,

    #[serde(default)]
    pub choices: Vec<ChoiceDimension>,

    #[serde(default)]
    pub ranges: Vec<RangeDimension>,

    #[serde(default)]
    pub flags: Vec<FlagDimension>,

    #[serde(default)]
    pub sort_keys: Vec<SortKeySpec>,

    /// Whether "reset filters" also returns the sort to unsorted.
    #[serde(default)]
    pub reset_clears_sort: bool,
}

impl BrowseSchema {
    /// Schema of the entertainment and city guide explorer.
    ///
    /// Searches title and description, sorts by title, and clears the sort
    /// together with the filters.
    #[must_use]
    pub fn guides() -> Self {
        Self {
            name: "guides".to_string(),
            search_fields: vec![TITLE_FIELD.to_string(), DESCRIPTION_FIELD.to_string()],
            match_mode: MatchMode::Substring,
            choices: vec![],
            ranges: vec![],
            flags: vec![],
            sort_keys: vec![SortKeySpec {
                key: TITLE_FIELD.to_string(),
                label: "Title".to_string(),
                kind: SortKind::Text,
            }],
            reset_clears_sort: true,
        }
    }

    /// Schema of the new-car search screen. Prices are in lakh.
    #[must_use]
    pub fn cars() -> Self {
        let choice = |key: &str, label: &str, options: &[&str]| ChoiceDimension {
            key: key.to_string(),
            label: label.to_string(),
            options: options.iter().map(|o| (*o).to_string()).collect(),
        };
        let preset = |label: &str, min: f64, max: f64| RangePreset {
            label: label.to_string(),
            min,
            max,
        };
        let flag = |key: &str, label: &str, at_least: Option<f64>| FlagDimension {
            key: key.to_string(),
            label: label.to_string(),
            attribute: if at_least.is_some() { "airbagCount" } else { key }.to_string(),
            at_least,
        };

        Self {
            name: "cars".to_string(),
            search_fields: vec![TITLE_FIELD.to_string(), "brand".to_string()],
            match_mode: MatchMode::Substring,
            choices: vec![
                choice(
                    "bodyType",
                    "Body Type",
                    &[
                        "SUV",
                        "Hatchback",
                        "Sedan",
                        "MUV",
                        "Luxury",
                        "Minivan",
                        "Pickup Truck",
                        "Coupe",
                        "Convertible",
                    ],
                ),
                choice(
                    "fuelType",
                    "Fuel Type",
                    &["Petrol", "Diesel", "CNG", "Electric", "Hybrid"],
                ),
            ],
            ranges: vec![
                RangeDimension {
                    key: "price".to_string(),
                    label: "Budget".to_string(),
                    presets: vec![
                        preset("Under 5 Lakh", 0.0, 5.0),
                        preset("5 - 10 Lakh", 5.0, 10.0),
                        preset("10 - 15 Lakh", 10.0, 15.0),
                        preset("15 - 20 Lakh", 15.0, 20.0),
                        preset("20 - 35 Lakh", 20.0, 35.0),
                        preset("35 - 50 Lakh", 35.0, 50.0),
                        preset("50 Lakh - 1 Crore", 50.0, 100.0),
                        preset("Over 1 Crore", 100.0, f64::INFINITY),
                    ],
                },
                RangeDimension {
                    key: "maxPowerHp".to_string(),
                    label: "Max Power".to_string(),
                    presets: vec![
                        preset("Under 100 hp", 0.0, 100.0),
                        preset("100 - 150 hp", 100.0, 150.0),
                        preset("150 - 200 hp", 150.0, 200.0),
                        preset("Over 200 hp", 200.0, f64::INFINITY),
                    ],
                },
                RangeDimension {
                    key: "bootVolumeLitres".to_string(),
                    label: "Boot Space".to_string(),
                    presets: vec![
                        preset("Under 300 L", 0.0, 300.0),
                        preset("300 - 400 L", 300.0, 400.0),
                        preset("Over 400 L", 400.0, f64::INFINITY),
                    ],
                },
            ],
            flags: vec![
                flag("hasTractionControl", "Traction Control", None),
                flag("hasAllPowerWindows", "All Power Windows", None),
                flag("hasMultipleAirbags", "Multiple Airbags", Some(2.0)),
                flag("hasMusicSystem", "Music System", None),
                flag("hasAlloyWheels", "Alloy Wheels", None),
            ],
            sort_keys: vec![
                SortKeySpec {
                    key: "price".to_string(),
                    label: "Price".to_string(),
                    kind: SortKind::Numeric,
                },
                SortKeySpec {
                    key: TITLE_FIELD.to_string(),
                    label: "Name".to_string(),
                    kind: SortKind::Text,
                },
            ],
            reset_clears_sort: false,
        }
    }

    #[must_use]
    pub fn choice(&self, key: &str) -> Option<&ChoiceDimension> {
        self.choices.iter().find(|d| d.key == key)
    }

    #[must_use]
    pub fn range(&self, key: &str) -> Option<&RangeDimension> {
        self.ranges.iter().find(|d| d.key == key)
    }

    #[must_use]
    pub fn flag(&self, key: &str) -> Option<&FlagDimension> {
        self.flags.iter().find(|d| d.key == key)
    }

    #[must_use]
    pub fn sort_key(&self, key: &str) -> Option<&SortKeySpec> {
        self.sort_keys.iter().find(|s| s.key == key)
    }

    /// Checks that dimension keys are unique and presets are well-formed.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::Config`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        let mut keys = HashSet::new();
        let dimension_keys = self
            .choices
            .iter()
            .map(|d| &d.key)
            .chain(self.ranges.iter().map(|d| &d.key))
            .chain(self.flags.iter().map(|d| &d.key));

        for key in dimension_keys {
            if key.trim().is_empty() {
                return Err(BrowserError::Config(format!(
                    "schema {}: dimension key must not be empty",
                    self.name
                )));
            }
            if !keys.insert(key.as_str()) {
                return Err(BrowserError::Config(format!(
                    "schema {}: duplicate dimension key {key:?}",
                    self.name
                )));
            }
        }

        let mut sort_keys = HashSet::new();
        for spec in &self.sort_keys {
            if !sort_keys.insert(spec.key.as_str()) {
                return Err(BrowserError::Config(format!(
                    "schema {}: duplicate sort key {:?}",
                    self.name, spec.key
                )));
            }
        }

        for range in &self.ranges {
            if let Some(bad) = range.presets.iter().find(|p| !(p.min <= p.max)) {
                return Err(BrowserError::Config(format!(
                    "schema {}: preset {:?} of {} has min above max",
                    self.name, bad.label, range.key
                )));
            }
        }

        Ok(())
    }
}
