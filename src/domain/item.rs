//! Catalog item domain model.
//!
//! A [`CatalogItem`] is an immutable record with an identifier, a display title
//! and a bag of domain-specific attributes (price, body type, feature flags and
//! so on). The engine never interprets attributes on its own; the browse schema
//! names which attribute each filter dimension or sort key reads.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attribute key that always resolves to the item title.
pub const TITLE_FIELD: &str = "title";

/// Attribute key that always resolves to the item description.
pub const DESCRIPTION_FIELD: &str = "description";

/// A single attribute value carried by an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl AttributeValue {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// An item that can be browsed, filtered and sorted.
///
/// # Examples
///
/// ```
/// use catalog_browser::domain::{AttributeValue, CatalogItem};
///
/// let car = CatalogItem::new("tata_punch", "Tata Punch")
///     .with_attribute("price", AttributeValue::Number(6.13))
///     .with_attribute("bodyType", AttributeValue::Text("SUV".into()));
///
/// assert_eq!(car.number("price"), Some(6.13));
/// assert_eq!(car.text("bodyType"), Some("SUV"));
/// assert_eq!(car.text("title"), Some("Tata Punch"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl CatalogItem {
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            image_url: None,
            attributes: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: AttributeValue) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Returns the text value of a field.
    ///
    /// `title` and `description` resolve to the built-in fields; any other key
    /// is looked up among the text attributes.
    #[must_use]
    pub fn text(&self, field: &str) -> Option<&str> {
        match field {
            TITLE_FIELD => Some(&self.title),
            DESCRIPTION_FIELD => self.description.as_deref(),
            _ => self.attributes.get(field).and_then(AttributeValue::as_text),
        }
    }

    #[must_use]
    pub fn number(&self, field: &str) -> Option<f64> {
        self.attributes.get(field).and_then(AttributeValue::as_number)
    }

    #[must_use]
    pub fn flag(&self, field: &str) -> Option<bool> {
        self.attributes.get(field).and_then(AttributeValue::as_bool)
    }
}
