//! Actions representing side effects to be executed by the host.
//!
//! The event handler never performs I/O. When handling an event needs the
//! outside world (fetching the catalog, telling the user something went
//! wrong) it returns an [`Action`] and the host carries it out.
//!
//! # Example
//!
//! ```rust
//! use catalog_browser::app::{handle_event, Action, BrowserState, Event};
//! use catalog_browser::engine::BrowseSchema;
//!
//! let mut state = BrowserState::pending(BrowseSchema::guides(), None);
//! let (_, actions) = handle_event(&mut state, &Event::Mount)?;
//! assert_eq!(actions, vec![Action::LoadCatalog]);
//! # Ok::<(), catalog_browser::domain::BrowserError>(())
//! ```

/// Commands for the host runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Fetch and validate the catalog, then deliver the result as
    /// [`Event::CatalogLoaded`](crate::app::Event::CatalogLoaded).
    ///
    /// Emitted once, when a view without a catalog mounts.
    LoadCatalog,

    /// Show a diagnostic to the user.
    ReportError(String),
}
