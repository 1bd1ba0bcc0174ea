//! Browser state management and view model computation.
//!
//! This module defines [`BrowserState`], the state container for one browse
//! view. It owns the four inputs of the derivation (catalog, selection, filter,
//! sort) together with the derived item list, and it is the only place where
//! the derived list is recomputed.
//!
//! # Memoization
//!
//! Every mutator learns from the engine whether its input actually changed.
//! Only a real change re-runs the derivation; a no-op update (selecting the
//! active category again, setting the same search term) leaves the derived list
//! and the derivation counter untouched.
//!
//! # Example
//!
//! ```rust
//! use catalog_browser::app::BrowserState;
//! use catalog_browser::domain::{Catalog, CatalogItem};
//! use catalog_browser::engine::BrowseSchema;
//!
//! let catalog = Catalog::flat(vec![
//!     CatalogItem::new("a", "Archer"),
//!     CatalogItem::new("b", "Breaking Bad"),
//! ]);
//! let mut state = BrowserState::new(catalog, BrowseSchema::guides(), None);
//!
//! state.set_search("break");
//! assert_eq!(state.derived().ids(), ["b"]);
//!
//! let viewmodel = state.compute_viewmodel();
//! assert_eq!(viewmodel.display_items.len(), 1);
//! ```

use crate::domain::{BrowserError, Catalog, IconSet, Result};
use crate::engine::{
    compile, derive, BrowseSchema, Derived, FilterState, MatchMode, NumericRange, SelectionState, SortState,
};
use crate::storage::LoadOutcome;
use crate::ui::viewmodel::{
    ControlInfo, DisplayItem, EmptyState, FooterInfo, HeaderInfo, SearchBarInfo, SortControl, TabInfo, UIViewModel,
};
use fuzzy_matcher::skim::SkimMatcherV2;
use std::sync::Arc;

/// State of one browse view.
///
/// Holds the catalog (shared, read-only), the user's selection, filter and
/// sort, and the memoized derivation. Mutated by the event handler.
#[derive(Debug, Clone)]
pub struct BrowserState {
    catalog: Arc<Catalog>,
    schema: BrowseSchema,
    preferred_category: Option<String>,
    selection: SelectionState,
    filter: FilterState,
    sort: SortState,
    derived: Derived,
    derivation_count: u64,

    /// Whether a catalog has been delivered (by construction or by a load).
    loaded: bool,

    /// Last user-relevant problem, shown in the footer until the next change.
    notice: Option<String>,

    category_icons: IconSet,
    subcategory_icons: IconSet,
}

impl BrowserState {
    /// Creates a mounted state over an already loaded catalog.
    #[must_use]
    pub fn new(catalog: impl Into<Arc<Catalog>>, schema: BrowseSchema, preferred_category: Option<String>) -> Self {
        let catalog = catalog.into();
        let selection = SelectionState::initial(&catalog, preferred_category.as_deref());
        let mut state = Self {
            catalog,
            schema,
            preferred_category,
            selection,
            filter: FilterState::default(),
            sort: SortState::default(),
            derived: Derived::default(),
            derivation_count: 0,
            loaded: true,
            notice: None,
            category_icons: IconSet::categories(),
            subcategory_icons: IconSet::subcategories(),
        };
        state.rederive();
        state
    }

    /// Creates a state whose catalog has not arrived yet.
    ///
    /// The view shows "no data" until an [`Event::CatalogLoaded`](crate::app::Event::CatalogLoaded)
    /// is handled.
    #[must_use]
    pub fn pending(schema: BrowseSchema, preferred_category: Option<String>) -> Self {
        let mut state = Self::new(Catalog::empty(), schema, preferred_category);
        state.loaded = false;
        state
    }

    #[must_use]
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    #[must_use]
    pub const fn schema(&self) -> &BrowseSchema {
        &self.schema
    }

    #[must_use]
    pub const fn selection(&self) -> &SelectionState {
        &self.selection
    }

    #[must_use]
    pub const fn filter(&self) -> &FilterState {
        &self.filter
    }

    #[must_use]
    pub const fn sort(&self) -> &SortState {
        &self.sort
    }

    #[must_use]
    pub const fn derived(&self) -> &Derived {
        &self.derived
    }

    /// How many times the item list has been derived since construction.
    #[must_use]
    pub const fn derivation_count(&self) -> u64 {
        self.derivation_count
    }

    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn set_notice(&mut self, notice: Option<String>) {
        self.notice = notice;
    }

    /// Replaces the catalog with the outcome of a load.
    ///
    /// The first delivery selects the initial category (preferring the
    /// configured one); later deliveries repair the existing selection. A
    /// degraded outcome installs an empty catalog and keeps the error as the
    /// current notice. Returns whether the derived list was recomputed.
    pub fn apply_load(&mut self, outcome: LoadOutcome) -> bool {
        let (catalog, error) = outcome.into_parts();
        self.notice = error;
        self.replace_catalog(catalog)
    }

    /// Installs a new catalog and repairs the selection against it.
    pub fn replace_catalog(&mut self, catalog: impl Into<Arc<Catalog>>) -> bool {
        let catalog = catalog.into();
        let catalog_changed = *catalog != *self.catalog;
        self.catalog = catalog;

        let selection_changed = if self.loaded {
            self.selection.on_catalog_changed(&self.catalog)
        } else {
            self.loaded = true;
            let initial = SelectionState::initial(&self.catalog, self.preferred_category.as_deref());
            let changed = initial != self.selection;
            self.selection = initial;
            changed
        };

        self.refresh(catalog_changed || selection_changed)
    }

    /// # Errors
    ///
    /// Returns [`BrowserError::UnresolvedSelection`] for an unknown category.
    pub fn select_category(&mut self, name: &str) -> Result<bool> {
        let changed = self.selection.select_category(&self.catalog, name)?;
        Ok(self.refresh(changed))
    }

    /// # Errors
    ///
    /// Returns [`BrowserError::UnresolvedSelection`] when `name` is not a
    /// subcategory of the active category.
    pub fn select_subcategory(&mut self, name: &str) -> Result<bool> {
        let changed = self.selection.select_subcategory(&self.catalog, name)?;
        Ok(self.refresh(changed))
    }

    pub fn set_search(&mut self, term: impl Into<String>) -> bool {
        let changed = self.filter.set_search(term);
        self.refresh(changed)
    }

    pub fn push_search_char(&mut self, c: char) -> bool {
        let changed = self.filter.push_search_char(c);
        self.refresh(changed)
    }

    pub fn pop_search_char(&mut self) -> bool {
        let changed = self.filter.pop_search_char();
        self.refresh(changed)
    }

    /// # Errors
    ///
    /// Returns [`BrowserError::UnknownDimension`] for a dimension the schema
    /// does not define.
    pub fn toggle_choice(&mut self, dimension: &str, value: &str) -> Result<bool> {
        let changed = self.filter.toggle_choice(&self.schema, dimension, value)?;
        Ok(self.refresh(changed))
    }

    /// # Errors
    ///
    /// Returns [`BrowserError::UnknownDimension`] for a dimension the schema
    /// does not define.
    pub fn set_choices(&mut self, dimension: &str, values: Vec<String>) -> Result<bool> {
        let changed = self.filter.set_choices(&self.schema, dimension, values)?;
        Ok(self.refresh(changed))
    }

    /// # Errors
    ///
    /// Returns [`BrowserError::UnknownDimension`] for a dimension the schema
    /// does not define.
    pub fn set_range(&mut self, dimension: &str, range: Option<NumericRange>) -> Result<bool> {
        let changed = self.filter.set_range(&self.schema, dimension, range)?;
        Ok(self.refresh(changed))
    }

    /// # Errors
    ///
    /// Returns [`BrowserError::UnknownDimension`] for an unknown dimension and
    /// [`BrowserError::InvalidInput`] for an unknown preset.
    pub fn select_range_preset(&mut self, dimension: &str, label: &str) -> Result<bool> {
        let changed = self.filter.select_range_preset(&self.schema, dimension, label)?;
        Ok(self.refresh(changed))
    }

    /// # Errors
    ///
    /// Returns [`BrowserError::UnknownDimension`] for a flag the schema does
    /// not define.
    pub fn toggle_flag(&mut self, dimension: &str) -> Result<bool> {
        let changed = self.filter.toggle_flag(&self.schema, dimension)?;
        Ok(self.refresh(changed))
    }

    /// Sets the sort state directly.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::UnknownDimension`] for a sort key the schema
    /// does not define.
    pub fn set_sort(&mut self, sort: SortState) -> Result<bool> {
        if let Some(key) = sort.key() {
            if self.schema.sort_key(key).is_none() {
                return Err(BrowserError::UnknownDimension(key.to_string()));
            }
        }
        let changed = self.sort != sort;
        self.sort = sort;
        Ok(self.refresh(changed))
    }

    /// Advances the sort toggle of `key`: off, ascending, descending, off.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::UnknownDimension`] for a sort key the schema
    /// does not define.
    pub fn cycle_sort(&mut self, key: &str) -> Result<bool> {
        let next = self.sort.cycled(key);
        self.set_sort(next)
    }

    /// Clears every filter dimension in one step, and the sort as well when the
    /// schema asks for it.
    pub fn reset_filters(&mut self) -> bool {
        let mut changed = self.filter.reset();
        if self.schema.reset_clears_sort && self.sort != SortState::Unsorted {
            self.sort = SortState::Unsorted;
            changed = true;
        }
        self.refresh(changed)
    }

    fn refresh(&mut self, changed: bool) -> bool {
        if changed {
            self.notice = None;
            self.rederive();
        }
        changed
    }

    fn rederive(&mut self) {
        let compiled = compile(&self.schema, &self.filter);
        self.derived = derive(&self.catalog, &self.selection, &compiled, &self.sort, &self.schema);
        self.derivation_count += 1;
    }

    /// Computes a renderable view model from the current state.
    ///
    /// Tabs carry resolved icon references, every schema dimension gets a
    /// summary, and the empty state distinguishes "no data" from "no matches".
    #[must_use]
    pub fn compute_viewmodel(&self) -> UIViewModel {
        let category_tabs = self
            .catalog
            .categories()
            .iter()
            .map(|c| TabInfo {
                name: c.name.clone(),
                icon: self.category_icons.resolve(&c.icon).to_string(),
                is_active: self.selection.category() == Some(c.name.as_str()),
            })
            .collect();

        let subcategory_tabs = self
            .selection
            .category()
            .and_then(|c| self.catalog.subcategories_of(c))
            .unwrap_or_default()
            .iter()
            .map(|s| TabInfo {
                name: s.name.clone(),
                icon: self.subcategory_icons.resolve(&s.icon).to_string(),
                is_active: self.selection.subcategory() == Some(s.name.as_str()),
            })
            .collect();

        let matcher = (self.schema.match_mode == MatchMode::Fuzzy).then(SkimMatcherV2::default);
        let display_items = self
            .derived
            .items
            .iter()
            .map(|item| DisplayItem {
                id: item.id.clone(),
                title: item.title.clone(),
                subtitle: item.description.clone(),
                details: self.compute_details(item),
                highlight_ranges: self.compute_highlight_ranges(&item.title, matcher.as_ref()),
            })
            .collect();

        UIViewModel {
            header: HeaderInfo {
                title: self.schema.name.clone(),
                visible: self.derived.items.len(),
                total: self.derived.source_len,
            },
            category_tabs,
            subcategory_tabs,
            search_bar: SearchBarInfo {
                query: self.filter.search().to_string(),
            },
            controls: self.compute_controls(),
            sort_controls: self.compute_sort_controls(),
            display_items,
            empty_state: self.compute_empty_state(),
            footer: FooterInfo {
                keybindings: "cat <name>  sub <name>  search <text>  choice <dim> <value>  range <dim> <min> <max>  \
                              preset <dim> <label>  flag <dim>  sort <key>  reset  quit"
                    .to_string(),
                error: self.notice.clone(),
            },
        }
    }

    fn compute_empty_state(&self) -> Option<EmptyState> {
        if !self.derived.items.is_empty() {
            return None;
        }
        if self.derived.is_no_matches() {
            return Some(EmptyState::no_matches());
        }
        let subtitle = if !self.loaded {
            "Loading catalog"
        } else if self.catalog.is_empty() {
            "The catalog is empty"
        } else {
            "This section has no items"
        };
        Some(EmptyState::no_data(subtitle))
    }

    fn compute_details(&self, item: &crate::domain::CatalogItem) -> Vec<(String, String)> {
        let choices = self
            .schema
            .choices
            .iter()
            .filter_map(|d| item.text(&d.key).map(|v| (d.label.clone(), v.to_string())));
        let ranges = self
            .schema
            .ranges
            .iter()
            .filter_map(|d| item.number(&d.key).map(|v| (d.label.clone(), format_number(v))));
        choices.chain(ranges).collect()
    }

    fn compute_controls(&self) -> Vec<ControlInfo> {
        let mut controls = Vec::new();

        for dim in &self.schema.choices {
            let selected = self.filter.selected(&dim.key);
            let summary = selected.map_or_else(
                || "Any".to_string(),
                |s| s.iter().map(String::as_str).collect::<Vec<_>>().join(", "),
            );
            controls.push(ControlInfo {
                key: dim.key.clone(),
                label: dim.label.clone(),
                summary,
                is_active: selected.is_some(),
            });
        }

        for dim in &self.schema.ranges {
            let range = self.filter.range(&dim.key);
            let summary = range.map_or_else(
                || "Any".to_string(),
                |r| {
                    dim.presets
                        .iter()
                        .find(|p| p.min == r.min && p.max == r.max)
                        .map_or_else(|| format_range(r), |p| p.label.clone())
                },
            );
            controls.push(ControlInfo {
                key: dim.key.clone(),
                label: dim.label.clone(),
                summary,
                is_active: range.is_some(),
            });
        }

        for dim in &self.schema.flags {
            let on = self.filter.flag_enabled(&dim.key);
            controls.push(ControlInfo {
                key: dim.key.clone(),
                label: dim.label.clone(),
                summary: if on { "On" } else { "Off" }.to_string(),
                is_active: on,
            });
        }

        controls
    }

    fn compute_sort_controls(&self) -> Vec<SortControl> {
        self.schema
            .sort_keys
            .iter()
            .map(|spec| SortControl {
                key: spec.key.clone(),
                label: spec.label.clone(),
                state: if self.sort.key() == Some(spec.key.as_str()) {
                    self.sort.label()
                } else {
                    SortState::Unsorted.label()
                }
                .to_string(),
            })
            .collect()
    }

    /// Character ranges of `text` matching the search term.
    ///
    /// Substring mode highlights every occurrence of the term; fuzzy mode
    /// coalesces the matcher's character indices into contiguous runs.
    fn compute_highlight_ranges(&self, text: &str, matcher: Option<&SkimMatcherV2>) -> Vec<(usize, usize)> {
        use fuzzy_matcher::FuzzyMatcher;

        let term = self.filter.search().trim().to_lowercase();
        if term.is_empty() {
            return vec![];
        }

        let Some(matcher) = matcher else {
            let lower = text.to_lowercase();
            if lower.chars().count() != text.chars().count() {
                return vec![];
            }
            let width = term.chars().count();
            return lower
                .match_indices(term.as_str())
                .map(|(byte, _)| {
                    let start = lower[..byte].chars().count();
                    (start, start + width)
                })
                .collect();
        };

        let Some((_score, indices)) = matcher.fuzzy_indices(text, &term) else {
            return vec![];
        };

        let mut ranges: Vec<(usize, usize)> = Vec::new();
        for idx in indices {
            match ranges.last_mut() {
                Some((_, end)) if *end == idx => *end = idx + 1,
                _ => ranges.push((idx, idx + 1)),
            }
        }
        ranges
    }
}

fn format_number(value: f64) -> String {
    if value.is_infinite() {
        "∞".to_string()
    } else {
        format!("{value}")
    }
}

fn format_range(range: NumericRange) -> String {
    if range.max.is_infinite() {
        format!("{}+", format_number(range.min))
    } else {
        format!("{} - {}", format_number(range.min), format_number(range.max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AttributeValue, CatalogItem, Category, Subcategory};
    use crate::ui::viewmodel::EmptyKind;

    fn guides() -> Catalog {
        let items = |ids: &[&str]| ids.iter().map(|id| CatalogItem::new(*id, *id)).collect();
        Catalog::new(vec![
            Category::new(
                "Guides",
                "Tv",
                vec![
                    Subcategory::new("Action", "Swords", items(&["A", "B", "C"])),
                    Subcategory::new("Comedy", "NotAnIcon", items(&["D", "E"])),
                ],
            ),
            Category::new("Mumbai Guide", "Mystery", vec![Subcategory::new("Food", "Pizza", items(&["F"]))]),
        ])
    }

    fn cars() -> Catalog {
        Catalog::flat(vec![
            CatalogItem::new("punch", "Tata Punch")
                .with_attribute("price", AttributeValue::Number(6.13))
                .with_attribute("bodyType", AttributeValue::Text("SUV".into())),
            CatalogItem::new("city", "Honda City")
                .with_attribute("price", AttributeValue::Number(11.82))
                .with_attribute("bodyType", AttributeValue::Text("Sedan".into())),
        ])
    }

    #[test]
    fn no_op_updates_do_not_rederive() {
        let mut state = BrowserState::new(guides(), BrowseSchema::guides(), None);
        let count = state.derivation_count();

        assert!(!state.select_category("Guides").unwrap());
        assert!(!state.set_search(""));
        assert!(!state.reset_filters());
        assert_eq!(state.derivation_count(), count);

        assert!(state.set_search("b"));
        assert_eq!(state.derivation_count(), count + 1);
    }

    #[test]
    fn failed_updates_keep_state_and_derivation() {
        let mut state = BrowserState::new(guides(), BrowseSchema::guides(), None);
        let count = state.derivation_count();

        assert!(state.select_subcategory("Food").is_err());
        assert!(state.toggle_flag("hasAlloyWheels").is_err());
        assert!(state.cycle_sort("price").is_err());
        assert_eq!(state.derivation_count(), count);
        assert_eq!(state.selection().subcategory(), Some("Action"));
    }

    #[test]
    fn reset_clears_sort_only_when_schema_says_so() {
        let mut guides_state = BrowserState::new(guides(), BrowseSchema::guides(), None);
        guides_state.cycle_sort("title").unwrap();
        assert!(guides_state.reset_filters());
        assert_eq!(guides_state.sort(), &SortState::Unsorted);

        let mut cars_state = BrowserState::new(cars(), BrowseSchema::cars(), None);
        cars_state.cycle_sort("price").unwrap();
        cars_state.toggle_choice("bodyType", "SUV").unwrap();
        assert!(cars_state.reset_filters());
        assert_eq!(cars_state.sort(), &SortState::ascending("price"));
        assert!(cars_state.filter().is_empty());
    }

    #[test]
    fn pending_state_selects_preferred_category_on_first_load() {
        let mut state = BrowserState::pending(BrowseSchema::guides(), Some("Mumbai Guide".into()));
        assert!(!state.is_loaded());
        assert_eq!(
            state.compute_viewmodel().empty_state.map(|e| e.kind),
            Some(EmptyKind::NoData)
        );

        assert!(state.apply_load(LoadOutcome::Loaded(guides())));
        assert_eq!(state.selection().category(), Some("Mumbai Guide"));
        assert_eq!(state.derived().ids(), ["F"]);
    }

    #[test]
    fn degraded_load_shows_no_data_with_notice() {
        let mut state = BrowserState::pending(BrowseSchema::guides(), None);
        state.apply_load(LoadOutcome::Degraded {
            error: "could not read catalog: gone".into(),
        });

        let vm = state.compute_viewmodel();
        assert_eq!(vm.empty_state.map(|e| e.kind), Some(EmptyKind::NoData));
        assert_eq!(vm.footer.error.as_deref(), Some("could not read catalog: gone"));
    }

    #[test]
    fn viewmodel_resolves_icons_and_marks_active_tabs() {
        let state = BrowserState::new(guides(), BrowseSchema::guides(), None);
        let vm = state.compute_viewmodel();

        assert_eq!(vm.category_tabs[0].icon, "Tv");
        assert!(vm.category_tabs[0].is_active);
        assert_eq!(vm.category_tabs[1].icon, "Tv");
        assert_eq!(vm.subcategory_tabs[1].icon, "ListFilter");
        assert!(vm.subcategory_tabs[0].is_active);
        assert_eq!(vm.header.visible, 3);
    }

    #[test]
    fn viewmodel_offers_reset_when_filters_exclude_everything() {
        let mut state = BrowserState::new(guides(), BrowseSchema::guides(), None);
        state.set_search("zzz");

        let empty = state.compute_viewmodel().empty_state.unwrap();
        assert_eq!(empty.kind, EmptyKind::NoMatches);
        assert!(empty.offer_reset);
    }

    #[test]
    fn viewmodel_summarizes_controls_and_highlights() {
        let mut state = BrowserState::new(cars(), BrowseSchema::cars(), None);
        state.toggle_choice("bodyType", "SUV").unwrap();
        state.select_range_preset("price", "5 - 10 Lakh").unwrap();
        state.set_search("punch");

        let vm = state.compute_viewmodel();
        let body = vm.controls.iter().find(|c| c.key == "bodyType").unwrap();
        assert_eq!(body.summary, "SUV");
        assert!(body.is_active);
        let price = vm.controls.iter().find(|c| c.key == "price").unwrap();
        assert_eq!(price.summary, "5 - 10 Lakh");

        assert_eq!(vm.display_items.len(), 1);
        assert_eq!(vm.display_items[0].highlight_ranges, vec![(5, 10)]);
        assert!(vm.display_items[0]
            .details
            .contains(&("Body Type".to_string(), "SUV".to_string())));
    }

    #[test]
    fn range_summary_without_preset() {
        assert_eq!(format_range(NumericRange::new(5.0, 7.5)), "5 - 7.5");
        assert_eq!(format_range(NumericRange::new(100.0, f64::INFINITY)), "100+");
    }
}
