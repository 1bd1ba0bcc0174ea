//! View model types representing renderable browser state.
//!
//! View models are computed by
//! [`BrowserState::compute_viewmodel`](crate::app::BrowserState::compute_viewmodel)
//! and consumed by a renderer. They contain no business logic, only
//! display-ready data: resolved icon references, control summaries, highlight
//! ranges and the empty-state decision.
//!
//! # Example
//!
//! ```rust
//! use catalog_browser::ui::viewmodel::{DisplayItem, EmptyKind, EmptyState};
//!
//! let item = DisplayItem {
//!     id: "gateway".to_string(),
//!     title: "Gateway of India".to_string(),
//!     subtitle: Some("Arch monument".to_string()),
//!     details: vec![],
//!     highlight_ranges: vec![(0, 4)],
//! };
//! let empty = EmptyState::no_matches();
//! assert_eq!(empty.kind, EmptyKind::NoMatches);
//! assert!(empty.offer_reset);
//! # let _ = item;
//! ```

/// Complete view model for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct UIViewModel {
    pub header: HeaderInfo,

    /// One tab per category, in catalog order.
    pub category_tabs: Vec<TabInfo>,

    /// One tab per subcategory of the active category.
    pub subcategory_tabs: Vec<TabInfo>,

    pub search_bar: SearchBarInfo,

    /// One summary per filter dimension of the schema.
    pub controls: Vec<ControlInfo>,

    /// One toggle per sort key of the schema.
    pub sort_controls: Vec<SortControl>,

    /// Items to display, in display order.
    pub display_items: Vec<DisplayItem>,

    /// Set when there is nothing to list.
    pub empty_state: Option<EmptyState>,

    pub footer: FooterInfo,
}

/// Title bar: schema name and item counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub title: String,
    pub visible: usize,
    pub total: usize,
}

/// A category or subcategory tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabInfo {
    pub name: String,

    /// Icon reference after resolution; unknown references become a placeholder.
    pub icon: String,

    pub is_active: bool,
}

/// The search input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBarInfo {
    pub query: String,
}

/// Summary of one filter dimension, e.g. `Body Type: SUV, Sedan`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlInfo {
    pub key: String,
    pub label: String,
    pub summary: String,
    pub is_active: bool,
}

/// A sort toggle and its current state label (`Asc`, `Desc` or `Off`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortControl {
    pub key: String,
    pub label: String,
    pub state: String,
}

/// Display information for a single item.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayItem {
    pub id: String,
    pub title: String,

    /// Description, when the item has one.
    pub subtitle: Option<String>,

    /// Attribute label/value pairs shown under the title.
    pub details: Vec<(String, String)>,

    /// Character ranges of `title` matching the search term.
    ///
    /// Each tuple is `(start, end)` in character indices, end exclusive.
    pub highlight_ranges: Vec<(usize, usize)>,
}

/// Why the list is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyKind {
    /// The catalog or the selected subcategory holds no items.
    NoData,

    /// Active filters excluded every item.
    NoMatches,
}

/// Message shown in place of the item list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub kind: EmptyKind,
    pub message: String,
    pub subtitle: String,

    /// Whether the view should offer a "reset filters" action.
    pub offer_reset: bool,
}

impl EmptyState {
    #[must_use]
    pub fn no_data(subtitle: impl Into<String>) -> Self {
        Self {
            kind: EmptyKind::NoData,
            message: "No data available".to_string(),
            subtitle: subtitle.into(),
            offer_reset: false,
        }
    }

    #[must_use]
    pub fn no_matches() -> Self {
        Self {
            kind: EmptyKind::NoMatches,
            message: "No items match your filters".to_string(),
            subtitle: "Reset filters to see everything again".to_string(),
            offer_reset: true,
        }
    }
}

/// Footer: key hints and the last error, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterInfo {
    pub keybindings: String,
    pub error: Option<String>,
}
