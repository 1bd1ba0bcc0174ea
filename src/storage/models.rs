//! Raw catalog records as they appear in source payloads.
//!
//! These types are separate from the domain models so that every field can be
//! absent or misspelled without failing deserialization outright. Validation in
//! [`crate::storage::validate`] turns them into domain types and reports what is
//! missing, with the JSON path of each problem.
//!
//! Field aliases accept both the generic names (`subcategories`, `items`,
//! `icon`) and the names used by the guide data files (`genres`, `series`,
//! `iconName`). Car listings name their title `name`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A category record.
///
/// Children stay as raw JSON so each one can be validated with its own path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCategory {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default, alias = "iconName")]
    pub icon: Option<String>,

    #[serde(default, alias = "genres")]
    pub subcategories: Option<Vec<Value>>,
}

/// A subcategory record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSubcategory {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default, alias = "iconName")]
    pub icon: Option<String>,

    #[serde(default, alias = "series")]
    pub items: Option<Vec<Value>>,
}

/// An item record.
///
/// Everything that is not one of the named fields lands in `extra` and becomes
/// an item attribute when it is a string, number or boolean.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawItem {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default, alias = "name")]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default, alias = "imageUrl")]
    pub image_url: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Keys whose presence marks an array element as a category rather than an item.
pub const CATEGORY_MARKERS: &[&str] = &["subcategories", "genres"];
