//! Domain layer for the catalog browser.
//!
//! This module contains the core domain types, independent of how catalogs are
//! loaded or presented.
//!
//! # Organization
//!
//! - [`catalog`]: Catalog, Category and Subcategory grouping
//! - [`item`]: Catalog items and their attribute values
//! - [`icon`]: Icon reference resolution with placeholders
//! - [`error`]: Error types and result alias
//!
//! # Examples
//!
//! ```
//! use catalog_browser::domain::{Catalog, CatalogItem, Result};
//!
//! fn cars() -> Result<Catalog> {
//!     Ok(Catalog::flat(vec![CatalogItem::new("swift", "Maruti Swift")]))
//! }
//! ```

pub mod catalog;
pub mod error;
pub mod icon;
pub mod item;

pub use catalog::{Catalog, Category, Subcategory, FLAT_GROUP_NAME};
pub use error::{BrowserError, Result, ValidationIssue};
pub use icon::IconSet;
pub use item::{AttributeValue, CatalogItem, DESCRIPTION_FIELD, TITLE_FIELD};
