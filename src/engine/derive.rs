//! The pure derivation of the visible item list.
//!
//! [`derive`] resolves the selected subcategory, keeps the items that pass the
//! compiled filter (in catalog order) and then applies the requested sort. It
//! performs no I/O and depends on nothing but its arguments, so calling it twice
//! with the same inputs yields the same list.

use super::filter::CompiledFilter;
use super::schema::BrowseSchema;
use super::selection::SelectionState;
use super::sort::{sort_items, SortState};
use crate::domain::{Catalog, CatalogItem};

/// Result of one derivation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Derived {
    /// Items to display, in display order.
    pub items: Vec<CatalogItem>,

    /// Number of items in the selected subcategory before filtering.
    pub source_len: usize,

    /// Whether any filter dimension was constraining the result.
    pub filters_active: bool,
}

impl Derived {
    /// True when active filters excluded every item.
    #[must_use]
    pub fn is_no_matches(&self) -> bool {
        self.items.is_empty() && self.filters_active
    }

    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.id.as_str()).collect()
    }
}

/// Computes the visible items for the given inputs.
///
/// An unresolved selection yields an empty list. A sort key the schema does not
/// define is ignored with a warning and the list stays in catalog order.
///
/// # Examples
///
/// ```
/// use catalog_browser::domain::{Catalog, CatalogItem};
/// use catalog_browser::engine::{compile, derive, BrowseSchema, FilterState, SelectionState, SortState};
///
/// let catalog = Catalog::flat(vec![
///     CatalogItem::new("c", "Charlie"),
///     CatalogItem::new("a", "Alpha"),
/// ]);
/// let schema = BrowseSchema::guides();
/// let selection = SelectionState::initial(&catalog, None);
/// let filter = compile(&schema, &FilterState::default());
///
/// let derived = derive(&catalog, &selection, &filter, &SortState::ascending("title"), &schema);
/// assert_eq!(derived.ids(), ["a", "c"]);
/// ```
#[must_use]
pub fn derive(
    catalog: &Catalog,
    selection: &SelectionState,
    filter: &CompiledFilter,
    sort: &SortState,
    schema: &BrowseSchema,
) -> Derived {
    let _span = tracing::debug_span!(
        "derive",
        category = ?selection.category(),
        subcategory = ?selection.subcategory(),
        active_filters = filter.active_count(),
        sort = ?sort.key(),
    )
    .entered();

    let source: &[CatalogItem] = selection
        .resolve(catalog)
        .map_or(&[], |s| s.items.as_slice());

    let mut items: Vec<CatalogItem> = source
        .iter()
        .filter(|item| filter.matches(item))
        .cloned()
        .collect();

    if let SortState::By { key, direction } = sort {
        match schema.sort_key(key) {
            Some(spec) => sort_items(&mut items, spec, *direction),
            None => tracing::warn!(key = %key, schema = %schema.name, "unknown sort key, keeping catalog order"),
        }
    }

    tracing::debug!(source = source.len(), visible = items.len(), "derivation complete");

    Derived {
        items,
        source_len: source.len(),
        filters_active: filter.active_count() > 0,
    }
}
