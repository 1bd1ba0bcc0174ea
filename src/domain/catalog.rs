//! Catalog domain model: categories, subcategories and their items.
//!
//! A [`Catalog`] is loaded once and never mutated afterwards. Category names are
//! unique within the catalog and subcategory names are unique within their
//! category, because the selection state machine uses them as keys. The loader
//! in [`crate::storage`] enforces both rules; the constructors here trust their
//! input.

use super::item::CatalogItem;
use serde::{Deserialize, Serialize};

/// Name given to the single category and subcategory of a flat catalog.
pub const FLAT_GROUP_NAME: &str = "All";

/// A leaf grouping holding an ordered list of items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subcategory {
    pub name: String,
    pub icon: String,
    pub items: Vec<CatalogItem>,
}

impl Subcategory {
    #[must_use]
    pub fn new(name: impl Into<String>, icon: impl Into<String>, items: Vec<CatalogItem>) -> Self {
        Self {
            name: name.into(),
            icon: icon.into(),
            items,
        }
    }
}

/// An outer grouping holding an ordered list of subcategories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub icon: String,
    pub subcategories: Vec<Subcategory>,
}

impl Category {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        icon: impl Into<String>,
        subcategories: Vec<Subcategory>,
    ) -> Self {
        Self {
            name: name.into(),
            icon: icon.into(),
            subcategories,
        }
    }

    #[must_use]
    pub fn subcategory(&self, name: &str) -> Option<&Subcategory> {
        self.subcategories.iter().find(|s| s.name == name)
    }

    #[must_use]
    pub fn first_subcategory(&self) -> Option<&Subcategory> {
        self.subcategories.first()
    }
}

/// The full, immutable set of browsable items.
///
/// # Examples
///
/// ```
/// use catalog_browser::domain::{Catalog, CatalogItem, Category, Subcategory};
///
/// let catalog = Catalog::new(vec![Category::new(
///     "Guides",
///     "Tv",
///     vec![Subcategory::new("Action", "Zap", vec![CatalogItem::new("a", "A")])],
/// )]);
///
/// assert_eq!(catalog.items_of("Guides", "Action").map(<[_]>::len), Some(1));
/// assert!(catalog.items_of("Guides", "Comedy").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    categories: Vec<Category>,
}

impl Catalog {
    #[must_use]
    pub const fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self {
            categories: Vec::new(),
        }
    }

    /// Wraps an ungrouped item list into one category with one subcategory.
    #[must_use]
    pub fn flat(items: Vec<CatalogItem>) -> Self {
        Self::new(vec![Category::new(
            FLAT_GROUP_NAME,
            "",
            vec![Subcategory::new(FLAT_GROUP_NAME, "", items)],
        )])
    }

    /// Categories in source order.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    #[must_use]
    pub fn first_category(&self) -> Option<&Category> {
        self.categories.first()
    }

    #[must_use]
    pub fn subcategories_of(&self, category: &str) -> Option<&[Subcategory]> {
        self.category(category).map(|c| c.subcategories.as_slice())
    }

    #[must_use]
    pub fn items_of(&self, category: &str, subcategory: &str) -> Option<&[CatalogItem]> {
        self.category(category)
            .and_then(|c| c.subcategory(subcategory))
            .map(|s| s.items.as_slice())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Total number of items across every subcategory.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.categories
            .iter()
            .flat_map(|c| &c.subcategories)
            .map(|s| s.items.len())
            .sum()
    }
}
