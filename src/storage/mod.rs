//! Catalog store: raw records, validation and loading.
//!
//! This module turns raw payloads into validated [`Catalog`](crate::domain::Catalog)
//! values. Loading happens once per view; afterwards the catalog is read-only.
//!
//! # Modules
//!
//! - `models`: Raw serde records with lenient optional fields
//! - `validate`: Shape and uniqueness validation with JSON paths
//! - `source`: Catalog sources and the degrade-to-empty load

pub mod models;
pub mod source;
pub mod validate;

pub use models::{RawCategory, RawItem, RawSubcategory};
pub use source::{load_or_empty, CatalogSource, JsonFileSource, LoadOutcome, StaticSource};
pub use validate::load;
