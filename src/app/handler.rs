//! Event handling and state transition logic.
//!
//! [`handle_event`] is the single entry point through which the presentation
//! layer changes a [`BrowserState`]. Events are applied in the order they
//! arrive and each one re-derives the item list synchronously (when it changed
//! an input) before the next is processed.
//!
//! # Event Types
//!
//! - **Lifecycle**: `Mount`, `CatalogLoaded`
//! - **Selection**: `SelectCategory`, `SelectSubcategory`
//! - **Search**: `SetSearch`, `Char`, `Backspace`
//! - **Filters**: `ToggleChoice`, `SetChoices`, `SetRange`, `SelectRangePreset`,
//!   `ToggleFlag`, `ResetFilters`
//! - **Sort**: `SetSort`, `CycleSort`
//!
//! # Error Recovery
//!
//! Engine errors never reach the caller. A selection naming something absent
//! from the catalog is ignored (it is logged, not shown). A request naming an
//! unknown dimension or preset is ignored and reported through
//! [`Action::ReportError`].
//!
//! # Example
//!
//! ```rust
//! use catalog_browser::app::{handle_event, BrowserState, Event};
//! use catalog_browser::domain::{Catalog, CatalogItem};
//! use catalog_browser::engine::BrowseSchema;
//!
//! let catalog = Catalog::flat(vec![CatalogItem::new("a", "Archer")]);
//! let mut state = BrowserState::new(catalog, BrowseSchema::guides(), None);
//!
//! let (should_render, actions) = handle_event(&mut state, &Event::SetSearch("zzz".into()))?;
//! assert!(should_render);
//! assert!(actions.is_empty());
//! assert!(state.derived().is_no_matches());
//! # Ok::<(), catalog_browser::domain::BrowserError>(())
//! ```

use crate::app::{Action, BrowserState};
use crate::domain::error::{BrowserError, Result};
use crate::engine::{NumericRange, SortState};
use crate::storage::LoadOutcome;

/// Events triggered by user input or by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The view became visible. Requests a catalog load if none arrived yet.
    Mount,

    /// Result of an [`Action::LoadCatalog`].
    CatalogLoaded(LoadOutcome),

    SelectCategory(String),
    SelectSubcategory(String),

    /// Replaces the search term.
    SetSearch(String),
    /// Appends a character to the search term.
    Char(char),
    /// Removes the last character of the search term.
    Backspace,

    /// Adds or removes one value of a multi-choice dimension.
    ToggleChoice {
        dimension: String,
        value: String,
    },

    /// Replaces the selected values of a multi-choice dimension.
    SetChoices {
        dimension: String,
        values: Vec<String>,
    },

    /// Sets (or with `None`, clears) a numeric range.
    SetRange {
        dimension: String,
        range: Option<NumericRange>,
    },

    /// Applies a labelled range preset such as "5 - 10 Lakh".
    SelectRangePreset {
        dimension: String,
        label: String,
    },

    ToggleFlag(String),

    SetSort(SortState),

    /// Advances the sort toggle of one key: off, ascending, descending.
    CycleSort(String),

    /// Clears every filter dimension at once.
    ResetFilters,
}

/// Processes an event, mutates browser state, and returns actions to execute.
///
/// # Returns
///
/// A pair of "the view changed and should be re-rendered" and the actions for
/// the host to run, in order.
///
/// # Errors
///
/// Only failures that cannot be recovered by ignoring the event are returned
/// (I/O, JSON or configuration errors). Engine errors are handled here as
/// described in the module docs.
///
/// # Tracing
///
/// Each call creates a debug-level span with the event.
pub fn handle_event(state: &mut BrowserState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    match event {
        Event::Mount => {
            if state.is_loaded() {
                tracing::debug!("catalog already present, nothing to load");
                Ok((false, vec![]))
            } else {
                Ok((true, vec![Action::LoadCatalog]))
            }
        }
        Event::CatalogLoaded(outcome) => {
            let error = match outcome {
                LoadOutcome::Loaded(catalog) => {
                    tracing::debug!(categories = catalog.categories().len(), "catalog delivered");
                    None
                }
                LoadOutcome::Degraded { error } => Some(error.clone()),
            };
            state.apply_load(outcome.clone());

            let actions = error.map(Action::ReportError).into_iter().collect();
            Ok((true, actions))
        }
        Event::SelectCategory(name) => recover(state, |s| s.select_category(name)),
        Event::SelectSubcategory(name) => recover(state, |s| s.select_subcategory(name)),
        Event::SetSearch(term) => Ok((state.set_search(term.clone()), vec![])),
        Event::Char(c) => {
            let changed = state.push_search_char(*c);
            tracing::trace!(query = %state.filter().search(), char = %c, "search query updated");
            Ok((changed, vec![]))
        }
        Event::Backspace => Ok((state.pop_search_char(), vec![])),
        Event::ToggleChoice { dimension, value } => recover(state, |s| s.toggle_choice(dimension, value)),
        Event::SetChoices { dimension, values } => recover(state, |s| s.set_choices(dimension, values.clone())),
        Event::SetRange { dimension, range } => recover(state, |s| s.set_range(dimension, *range)),
        Event::SelectRangePreset { dimension, label } => {
            recover(state, |s| s.select_range_preset(dimension, label))
        }
        Event::ToggleFlag(dimension) => recover(state, |s| s.toggle_flag(dimension)),
        Event::SetSort(sort) => recover(state, |s| s.set_sort(sort.clone())),
        Event::CycleSort(key) => recover(state, |s| s.cycle_sort(key)),
        Event::ResetFilters => {
            let changed = state.reset_filters();
            if !changed {
                tracing::debug!("filters already clear, skipping render");
            }
            Ok((changed, vec![]))
        }
    }
}

fn recover<F>(state: &mut BrowserState, mutate: F) -> Result<(bool, Vec<Action>)>
where
    F: FnOnce(&mut BrowserState) -> Result<bool>,
{
    match mutate(state) {
        Ok(changed) => Ok((changed, vec![])),
        Err(BrowserError::UnresolvedSelection { category, subcategory }) => {
            tracing::debug!(?category, ?subcategory, "ignoring selection absent from catalog");
            Ok((false, vec![]))
        }
        Err(
            e @ (BrowserError::UnknownDimension(_)
            | BrowserError::InvalidInput(_)
            | BrowserError::InvalidFilterRange { .. }),
        ) => {
            tracing::warn!(error = %e, "ignoring invalid request");
            let message = e.to_string();
            state.set_notice(Some(message.clone()));
            Ok((true, vec![Action::ReportError(message)]))
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Catalog, CatalogItem, Category, Subcategory};
    use crate::engine::BrowseSchema;

    fn catalog() -> Catalog {
        Catalog::new(vec![Category::new(
            "Guides",
            "Tv",
            vec![
                Subcategory::new("Action", "Swords", vec![CatalogItem::new("A", "Alpha")]),
                Subcategory::new("Comedy", "Smile", vec![CatalogItem::new("D", "Delta")]),
            ],
        )])
    }

    #[test]
    fn mount_requests_load_once() {
        let mut state = BrowserState::pending(BrowseSchema::guides(), None);
        let (_, actions) = handle_event(&mut state, &Event::Mount).unwrap();
        assert_eq!(actions, vec![Action::LoadCatalog]);

        handle_event(&mut state, &Event::CatalogLoaded(LoadOutcome::Loaded(catalog()))).unwrap();
        let (render, actions) = handle_event(&mut state, &Event::Mount).unwrap();
        assert!(!render);
        assert!(actions.is_empty());
        assert_eq!(state.derived().ids(), ["A"]);
    }

    #[test]
    fn degraded_load_is_reported() {
        let mut state = BrowserState::pending(BrowseSchema::guides(), None);
        let outcome = LoadOutcome::Degraded {
            error: "catalog is not valid JSON: eof".into(),
        };

        let (render, actions) = handle_event(&mut state, &Event::CatalogLoaded(outcome)).unwrap();
        assert!(render);
        assert_eq!(
            actions,
            vec![Action::ReportError("catalog is not valid JSON: eof".into())]
        );
        assert!(state.catalog().is_empty());
    }

    #[test]
    fn orphaned_subcategory_is_ignored_silently() {
        let mut state = BrowserState::new(catalog(), BrowseSchema::guides(), None);
        let (render, actions) = handle_event(&mut state, &Event::SelectSubcategory("Horror".into())).unwrap();

        assert!(!render);
        assert!(actions.is_empty());
        assert_eq!(state.selection().subcategory(), Some("Action"));
    }

    #[test]
    fn unknown_dimension_is_reported() {
        let mut state = BrowserState::new(catalog(), BrowseSchema::guides(), None);
        let (render, actions) = handle_event(&mut state, &Event::ToggleFlag("hasAlloyWheels".into())).unwrap();

        assert!(render);
        assert_eq!(
            actions,
            vec![Action::ReportError("Unknown filter dimension: hasAlloyWheels".into())]
        );
        assert_eq!(state.notice(), Some("Unknown filter dimension: hasAlloyWheels"));
    }

    #[test]
    fn typing_edits_the_search_term() {
        let mut state = BrowserState::new(catalog(), BrowseSchema::guides(), None);
        for c in "zq".chars() {
            handle_event(&mut state, &Event::Char(c)).unwrap();
        }
        assert!(state.derived().is_no_matches());

        handle_event(&mut state, &Event::Backspace).unwrap();
        handle_event(&mut state, &Event::Backspace).unwrap();
        let (render, _) = handle_event(&mut state, &Event::Backspace).unwrap();
        assert!(!render);
        assert_eq!(state.derived().ids(), ["A"]);
    }

    #[test]
    fn cycle_sort_walks_all_states() {
        let mut state = BrowserState::new(catalog(), BrowseSchema::guides(), None);
        let cycle = Event::CycleSort("title".into());

        handle_event(&mut state, &cycle).unwrap();
        assert_eq!(state.sort(), &SortState::ascending("title"));
        handle_event(&mut state, &cycle).unwrap();
        assert_eq!(state.sort(), &SortState::descending("title"));
        handle_event(&mut state, &cycle).unwrap();
        assert_eq!(state.sort(), &SortState::Unsorted);
    }
}
