//! Application layer coordinating state, events, and actions.
//!
//! This module sits between the host runtime (main.rs) and the engine. It
//! implements the event-driven flow that powers an interactive browse view.
//!
//! # Architecture
//!
//! ```text
//! User Input → Events → Event Handler → State Mutations → (Re)derivation → View Model
//!                           ↑                                    ↓
//!                           └──────── Host executes Actions ─────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing and error recovery
//! - [`state`]: Browser state container, memoized derivation and view model

pub mod actions;
pub mod handler;
pub mod state;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use state::BrowserState;
