//! Icon reference resolution.
//!
//! Categories and subcategories carry an icon reference string. Turning that
//! string into something drawable is the presentation layer's job; the core only
//! checks whether the reference is one it knows and substitutes a placeholder
//! otherwise.

use std::collections::BTreeSet;

const CATEGORY_ICONS: &[&str] = &["Landmark", "Utensils", "Plane", "Tv", "Film"];

const SUBCATEGORY_ICONS: &[&str] = &[
    "Rocket",
    "Swords",
    "Smile",
    "Drama",
    "Zap",
    "Ghost",
    "Heart",
    "PencilLine",
    "BookOpen",
    "Film",
    "Tv",
    "ShieldAlert",
    "Landmark",
    "ChefHat",
    "ShoppingBasket",
    "Utensils",
    "Flame",
    "Coffee",
    "Map",
    "Lightbulb",
    "Briefcase",
];

/// Set of recognized icon references plus the placeholder used for the rest.
///
/// # Examples
///
/// ```
/// use catalog_browser::domain::IconSet;
///
/// let icons = IconSet::categories();
/// assert_eq!(icons.resolve("Plane"), "Plane");
/// assert_eq!(icons.resolve("Sailboat"), "Tv");
/// assert_eq!(icons.resolve(""), "Tv");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSet {
    known: BTreeSet<String>,
    placeholder: String,
}

impl IconSet {
    pub fn new<I, S>(known: I, placeholder: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            known: known.into_iter().map(Into::into).collect(),
            placeholder: placeholder.into(),
        }
    }

    /// Icons recognized for top-level categories; unknown ones fall back to `Tv`.
    #[must_use]
    pub fn categories() -> Self {
        Self::new(CATEGORY_ICONS.iter().copied(), "Tv")
    }

    /// Icons recognized for subcategories; unknown ones fall back to `ListFilter`.
    #[must_use]
    pub fn subcategories() -> Self {
        Self::new(SUBCATEGORY_ICONS.iter().copied(), "ListFilter")
    }

    #[must_use]
    pub fn resolve<'a>(&'a self, reference: &'a str) -> &'a str {
        if self.known.contains(reference) {
            reference
        } else {
            &self.placeholder
        }
    }

    #[must_use]
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }
}
