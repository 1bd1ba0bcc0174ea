//! The two-level selection state machine.
//!
//! A selection names an active category and an active subcategory. Whenever a
//! category is chosen the subcategory follows deterministically: it becomes the
//! category's first subcategory, or none. The selection never references a
//! name missing from the catalog it was last checked against.

use crate::domain::{BrowserError, Catalog, Category, Result, Subcategory};

/// Active `(category, subcategory)` pair.
///
/// # Examples
///
/// ```
/// use catalog_browser::domain::{Catalog, Category, Subcategory};
/// use catalog_browser::engine::SelectionState;
///
/// let catalog = Catalog::new(vec![Category::new(
///     "Guides",
///     "Tv",
///     vec![Subcategory::new("Action", "Swords", vec![])],
/// )]);
///
/// let selection = SelectionState::initial(&catalog, None);
/// assert_eq!(selection.category(), Some("Guides"));
/// assert_eq!(selection.subcategory(), Some("Action"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    category: Option<String>,
    subcategory: Option<String>,
}

impl SelectionState {
    /// Selection at view mount.
    ///
    /// Uses `preferred` when the catalog has a category with that name, the
    /// first category otherwise.
    #[must_use]
    pub fn initial(catalog: &Catalog, preferred: Option<&str>) -> Self {
        let category = preferred
            .and_then(|name| catalog.category(name))
            .or_else(|| catalog.first_category());
        Self::entering(category)
    }

    fn entering(category: Option<&Category>) -> Self {
        Self {
            category: category.map(|c| c.name.clone()),
            subcategory: category
                .and_then(Category::first_subcategory)
                .map(|s| s.name.clone()),
        }
    }

    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    #[must_use]
    pub fn subcategory(&self) -> Option<&str> {
        self.subcategory.as_deref()
    }

    /// Activates a category and its first subcategory.
    ///
    /// Returns whether the selection changed.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::UnresolvedSelection`] if the catalog has no such
    /// category. The selection is left as it was.
    pub fn select_category(&mut self, catalog: &Catalog, name: &str) -> Result<bool> {
        let category = catalog
            .category(name)
            .ok_or_else(|| BrowserError::UnresolvedSelection {
                category: Some(name.to_string()),
                subcategory: None,
            })?;
        Ok(self.replace(Self::entering(Some(category))))
    }

    /// Activates a subcategory of the active category.
    ///
    /// Returns whether the selection changed.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::UnresolvedSelection`] if there is no active
    /// category or `name` is not one of its subcategories. The selection is
    /// left as it was.
    pub fn select_subcategory(&mut self, catalog: &Catalog, name: &str) -> Result<bool> {
        let belongs = self
            .category
            .as_deref()
            .and_then(|c| catalog.category(c))
            .and_then(|c| c.subcategory(name))
            .is_some();
        if !belongs {
            return Err(BrowserError::UnresolvedSelection {
                category: self.category.clone(),
                subcategory: Some(name.to_string()),
            });
        }

        let changed = self.subcategory.as_deref() != Some(name);
        self.subcategory = Some(name.to_string());
        Ok(changed)
    }

    /// Repairs the selection after the catalog was replaced.
    ///
    /// A vanished category falls back to the new catalog's first category and
    /// its first subcategory. A surviving category keeps its subcategory when
    /// that still exists, otherwise moves to its first one. Returns whether the
    /// selection changed.
    pub fn on_catalog_changed(&mut self, catalog: &Catalog) -> bool {
        let repaired = match self.category.as_deref().and_then(|c| catalog.category(c)) {
            None => Self::entering(catalog.first_category()),
            Some(category) => match self.subcategory.as_deref().and_then(|s| category.subcategory(s)) {
                Some(_) => self.clone(),
                None => Self::entering(Some(category)),
            },
        };

        if repaired != *self {
            tracing::debug!(
                from_category = ?self.category,
                to_category = ?repaired.category,
                to_subcategory = ?repaired.subcategory,
                "selection repaired after catalog change"
            );
        }
        self.replace(repaired)
    }

    /// The subcategory the selection points at, if it resolves.
    #[must_use]
    pub fn resolve<'a>(&self, catalog: &'a Catalog) -> Option<&'a Subcategory> {
        catalog
            .category(self.category.as_deref()?)?
            .subcategory(self.subcategory.as_deref()?)
    }

    fn replace(&mut self, next: Self) -> bool {
        if *self == next {
            return false;
        }
        *self = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CatalogItem;

    fn sub(name: &str) -> Subcategory {
        Subcategory::new(name, "ListFilter", vec![CatalogItem::new(name, name)])
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Category::new("Guides", "Tv", vec![sub("Action"), sub("Comedy")]),
            Category::new("Mumbai Guide", "MapPin", vec![sub("Food"), sub("Sights")]),
            Category::new("Empty", "Tv", vec![]),
        ])
    }

    #[test]
    fn initial_prefers_configured_category() {
        let selection = SelectionState::initial(&catalog(), Some("Mumbai Guide"));
        assert_eq!(selection.category(), Some("Mumbai Guide"));
        assert_eq!(selection.subcategory(), Some("Food"));
    }

    #[test]
    fn initial_falls_back_to_first_category() {
        let selection = SelectionState::initial(&catalog(), Some("Delhi Guide"));
        assert_eq!(selection.category(), Some("Guides"));
        assert_eq!(selection.subcategory(), Some("Action"));
    }

    #[test]
    fn initial_on_empty_catalog_selects_nothing() {
        let selection = SelectionState::initial(&Catalog::empty(), None);
        assert_eq!(selection, SelectionState::default());
        assert!(selection.resolve(&Catalog::empty()).is_none());
    }

    #[test]
    fn selecting_a_category_moves_to_its_first_subcategory() {
        let catalog = catalog();
        let mut selection = SelectionState::initial(&catalog, None);
        selection.select_subcategory(&catalog, "Comedy").unwrap();

        assert!(selection.select_category(&catalog, "Mumbai Guide").unwrap());
        assert_eq!(selection.subcategory(), Some("Food"));

        assert!(selection.select_category(&catalog, "Empty").unwrap());
        assert_eq!(selection.category(), Some("Empty"));
        assert_eq!(selection.subcategory(), None);
    }

    #[test]
    fn unknown_category_is_rejected_without_change() {
        let catalog = catalog();
        let mut selection = SelectionState::initial(&catalog, None);
        let before = selection.clone();

        let err = selection.select_category(&catalog, "Nope").unwrap_err();
        assert!(matches!(err, BrowserError::UnresolvedSelection { .. }));
        assert_eq!(selection, before);
    }

    #[test]
    fn orphaned_subcategory_is_rejected() {
        let catalog = catalog();
        let mut selection = SelectionState::initial(&catalog, None);

        assert!(selection.select_subcategory(&catalog, "Food").is_err());
        assert_eq!(selection.subcategory(), Some("Action"));
        assert!(!selection.select_subcategory(&catalog, "Action").unwrap());
    }

    #[test]
    fn catalog_change_without_active_category_moves_to_first() {
        let mut selection = SelectionState::initial(&catalog(), None);
        let replacement = Catalog::new(vec![Category::new("Cars", "Car", vec![sub("SUV")])]);

        assert!(selection.on_catalog_changed(&replacement));
        assert_eq!(selection.category(), Some("Cars"));
        assert_eq!(selection.subcategory(), Some("SUV"));
    }

    #[test]
    fn catalog_change_repairs_missing_subcategory_only() {
        let catalog = catalog();
        let mut selection = SelectionState::initial(&catalog, None);
        selection.select_subcategory(&catalog, "Comedy").unwrap();

        let replacement = Catalog::new(vec![Category::new("Guides", "Tv", vec![sub("Drama"), sub("Action")])]);
        assert!(selection.on_catalog_changed(&replacement));
        assert_eq!(selection.category(), Some("Guides"));
        assert_eq!(selection.subcategory(), Some("Drama"));

        assert!(!selection.on_catalog_changed(&replacement));
    }

    #[test]
    fn catalog_change_to_empty_clears_selection() {
        let mut selection = SelectionState::initial(&catalog(), None);
        assert!(selection.on_catalog_changed(&Catalog::empty()));
        assert_eq!(selection.category(), None);
        assert_eq!(selection.subcategory(), None);
    }
}
