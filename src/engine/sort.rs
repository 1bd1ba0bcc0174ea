//! Sort state and the stable item comparator.
//!
//! Sorting is always stable: items whose keys compare equal keep their catalog
//! order, in both directions. Items lacking the sort attribute go after every
//! item that has it, whichever direction is requested.

use super::schema::{SortKeySpec, SortKind};
use crate::domain::CatalogItem;
use icu_collator::{Collator, CollatorOptions};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    #[must_use]
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// Requested ordering of the derived list.
///
/// # Examples
///
/// ```
/// use catalog_browser::engine::SortState;
///
/// let sort = SortState::Unsorted.cycled("title");
/// assert_eq!(sort, SortState::ascending("title"));
/// let sort = sort.cycled("title");
/// assert_eq!(sort, SortState::descending("title"));
/// assert_eq!(sort.cycled("title"), SortState::Unsorted);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SortState {
    /// Catalog order.
    #[default]
    Unsorted,
    By {
        key: String,
        direction: SortDirection,
    },
}

impl SortState {
    pub fn ascending(key: impl Into<String>) -> Self {
        Self::By {
            key: key.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(key: impl Into<String>) -> Self {
        Self::By {
            key: key.into(),
            direction: SortDirection::Descending,
        }
    }

    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Unsorted => None,
            Self::By { key, .. } => Some(key),
        }
    }

    /// Next state of a sort toggle button for `key`: off, ascending, descending, off.
    ///
    /// A toggle for a key other than the current one starts at ascending.
    #[must_use]
    pub fn cycled(&self, key: &str) -> Self {
        match self {
            Self::By {
                key: current,
                direction: SortDirection::Ascending,
            } if current == key => Self::descending(key),
            Self::By {
                key: current,
                direction: SortDirection::Descending,
            } if current == key => Self::Unsorted,
            _ => Self::ascending(key),
        }
    }

    /// Short label for a sort toggle: `Asc`, `Desc` or `Off`.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Unsorted => "Off",
            Self::By {
                direction: SortDirection::Ascending,
                ..
            } => "Asc",
            Self::By {
                direction: SortDirection::Descending,
                ..
            } => "Desc",
        }
    }
}

thread_local! {
    static COLLATOR: Option<Collator> = Collator::try_new(&Default::default(), CollatorOptions::new())
        .map_err(|e| tracing::warn!(error = %e, "root collator unavailable, using caseless order"))
        .ok();
}

/// Compares text the way a person reading a list expects.
///
/// Uses root-locale collation, so accented letters sort with their base letter
/// and lowercase goes before uppercase. Strings the collator considers equal
/// are then ordered by their exact characters, so the order is total.
#[must_use]
pub fn compare_text(a: &str, b: &str) -> Ordering {
    COLLATOR
        .with(|collator| match collator {
            Some(collator) => collator.compare(a, b),
            None => a
                .chars()
                .flat_map(char::to_lowercase)
                .cmp(b.chars().flat_map(char::to_lowercase)),
        })
        .then_with(|| a.cmp(b))
}

fn present_first<T>(
    a: Option<T>,
    b: Option<T>,
    direction: SortDirection,
    cmp: impl Fn(&T, &T) -> Ordering,
) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => direction.apply(cmp(&x, &y)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Orders two items by one sort key.
#[must_use]
pub fn compare_items(
    a: &CatalogItem,
    b: &CatalogItem,
    spec: &SortKeySpec,
    direction: SortDirection,
) -> Ordering {
    match spec.kind {
        SortKind::Text => present_first(a.text(&spec.key), b.text(&spec.key), direction, |x, y| {
            compare_text(x, y)
        }),
        SortKind::Numeric => present_first(
            a.number(&spec.key),
            b.number(&spec.key),
            direction,
            f64::total_cmp,
        ),
    }
}

/// Stable in-place sort of `items` by one key.
pub fn sort_items(items: &mut [CatalogItem], spec: &SortKeySpec, direction: SortDirection) {
    items.sort_by(|a, b| compare_items(a, b, spec, direction));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AttributeValue;

    fn title_key() -> SortKeySpec {
        SortKeySpec {
            key: "title".to_string(),
            label: "Title".to_string(),
            kind: SortKind::Text,
        }
    }

    fn price_key() -> SortKeySpec {
        SortKeySpec {
            key: "price".to_string(),
            label: "Price".to_string(),
            kind: SortKind::Numeric,
        }
    }

    fn priced(id: &str, price: Option<f64>) -> CatalogItem {
        let item = CatalogItem::new(id, id);
        match price {
            Some(p) => item.with_attribute("price", AttributeValue::Number(p)),
            None => item,
        }
    }

    fn ids(items: &[CatalogItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn text_comparison_ignores_case_first() {
        assert_eq!(compare_text("alpha", "Bravo"), Ordering::Less);
        assert_eq!(compare_text("Charlie", "bravo"), Ordering::Greater);
        assert_eq!(compare_text("alpha", "Alpha"), Ordering::Less);
        assert_eq!(compare_text("same", "same"), Ordering::Equal);
    }

    #[test]
    fn accented_titles_sort_with_their_base_letter() {
        let mut items = vec![
            CatalogItem::new("z", "Zebra"),
            CatalogItem::new("e", "École"),
            CatalogItem::new("a", "apple"),
            CatalogItem::new("A", "Apple"),
        ];
        sort_items(&mut items, &title_key(), SortDirection::Ascending);
        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["apple", "Apple", "École", "Zebra"]);

        assert_eq!(compare_text("Émile", "Eve"), Ordering::Less);
        assert_eq!(compare_text("über", "zeta"), Ordering::Less);
    }

    #[test]
    fn descending_keeps_ties_in_catalog_order() {
        let mut items = vec![
            priced("a", Some(5.0)),
            priced("b", Some(9.0)),
            priced("c", Some(5.0)),
            priced("d", Some(9.0)),
        ];
        sort_items(&mut items, &price_key(), SortDirection::Descending);
        assert_eq!(ids(&items), ["b", "d", "a", "c"]);

        sort_items(&mut items, &price_key(), SortDirection::Ascending);
        assert_eq!(ids(&items), ["a", "c", "b", "d"]);
    }

    #[test]
    fn missing_keys_sort_last_in_both_directions() {
        let mut items = vec![priced("none", None), priced("cheap", Some(4.0)), priced("dear", Some(20.0))];

        sort_items(&mut items, &price_key(), SortDirection::Ascending);
        assert_eq!(ids(&items), ["cheap", "dear", "none"]);

        sort_items(&mut items, &price_key(), SortDirection::Descending);
        assert_eq!(ids(&items), ["dear", "cheap", "none"]);
    }

    #[test]
    fn sorts_titles() {
        let mut items = vec![
            CatalogItem::new("1", "Charlie"),
            CatalogItem::new("2", "alpha"),
            CatalogItem::new("3", "Bravo"),
        ];
        sort_items(&mut items, &title_key(), SortDirection::Ascending);
        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["alpha", "Bravo", "Charlie"]);
    }

    #[test]
    fn cycling_a_different_key_restarts_at_ascending() {
        let sort = SortState::descending("price");
        assert_eq!(sort.cycled("title"), SortState::ascending("title"));
        assert_eq!(sort.label(), "Desc");
        assert_eq!(SortState::Unsorted.label(), "Off");
    }
}
