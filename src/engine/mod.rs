//! The browse engine: what is selected, what passes the filters, in which order.
//!
//! Everything in this module is synchronous and free of I/O. The application
//! layer owns the state values defined here and calls [`derive`] whenever one
//! of them changes.
//!
//! # Modules
//!
//! - [`schema`]: Dimension and sort-key configuration per browse screen
//! - [`filter`]: Filter state and predicate composition
//! - [`sort`]: Sort state and the stable comparator
//! - [`selection`]: Two-level category selection state machine
//! - [`derive`](mod@derive): The pure derivation of the visible list

pub mod derive;
pub mod filter;
pub mod schema;
pub mod selection;
pub mod sort;

pub use derive::{derive, Derived};
pub use filter::{compile, CompiledFilter, Constraint, FilterState, NumericRange};
pub use schema::{
    BrowseSchema, ChoiceDimension, FlagDimension, MatchMode, RangeDimension, RangePreset, SortKeySpec, SortKind,
};
pub use selection::SelectionState;
pub use sort::{compare_text, SortDirection, SortState};
