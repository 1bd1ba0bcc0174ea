//! Presentation layer: view models and a plain-text renderer.
//!
//! ```text
//! BrowserState → compute_viewmodel → UIViewModel → render → text
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: View model types representing renderable state
//! - [`renderer`]: Plain-text rendering used by the host binary

pub mod renderer;
pub mod viewmodel;

pub use renderer::{render, render_viewmodel};
pub use viewmodel::{
    ControlInfo, DisplayItem, EmptyKind, EmptyState, FooterInfo, HeaderInfo, SearchBarInfo, SortControl, TabInfo,
    UIViewModel,
};
