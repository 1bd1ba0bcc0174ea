//! Shape validation turning raw JSON into a [`Catalog`].
//!
//! Validation walks the whole payload and collects every problem instead of
//! stopping at the first one, so a broken data file can be fixed in one pass.
//! The result is tagged: either a valid catalog or
//! [`BrowserError::MalformedCatalog`] carrying the issues.
//!
//! # Accepted shapes
//!
//! ```json
//! [ { "name": "Mumbai Guide", "iconName": "Landmark", "genres": [
//!     { "name": "Landmarks", "iconName": "Landmark", "series": [
//!         { "id": "gateway", "title": "Gateway of India" } ] } ] } ]
//! ```
//!
//! The same grouping wrapped as `{ "categories": [...] }`, or a flat item list
//! (`[ {...}, ... ]` or `{ "items": [...] }`) which becomes a single `All` group.

use crate::domain::{
    AttributeValue, BrowserError, Catalog, CatalogItem, Category, Result, Subcategory,
    ValidationIssue,
};
use crate::storage::models::{RawCategory, RawItem, RawSubcategory, CATEGORY_MARKERS};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

/// Validates a raw payload and builds the catalog it describes.
///
/// # Errors
///
/// Returns [`BrowserError::MalformedCatalog`] listing every shape or uniqueness
/// violation found.
///
/// # Examples
///
/// ```
/// use catalog_browser::storage::load;
/// use serde_json::json;
///
/// let catalog = load(&json!([
///     { "name": "Guides", "iconName": "Tv", "genres": [
///         { "name": "Action", "iconName": "Zap", "series": [
///             { "id": "a", "title": "A" }
///         ]}
///     ]}
/// ]))?;
/// assert_eq!(catalog.items_of("Guides", "Action").map(<[_]>::len), Some(1));
///
/// assert!(load(&json!([{ "name": "Guides" , "genres": [] }])).is_err());
/// # Ok::<(), catalog_browser::domain::BrowserError>(())
/// ```
pub fn load(raw: &Value) -> Result<Catalog> {
    let _span = tracing::debug_span!("validate_catalog").entered();

    let mut issues = Vec::new();

    let catalog = match raw {
        Value::Array(elems) if is_grouped(elems) => {
            Catalog::new(validate_categories(elems, "$", &mut issues))
        }
        Value::Array(elems) => flat_or_empty(validate_items(elems, "$", &mut issues)),
        Value::Object(map) => match (map.get("categories"), map.get("items")) {
            (Some(Value::Array(elems)), _) => {
                Catalog::new(validate_categories(elems, "$.categories", &mut issues))
            }
            (None, Some(Value::Array(elems))) => {
                flat_or_empty(validate_items(elems, "$.items", &mut issues))
            }
            (Some(_), _) => {
                issues.push(ValidationIssue::new("$.categories", "expected an array"));
                Catalog::empty()
            }
            (None, Some(_)) => {
                issues.push(ValidationIssue::new("$.items", "expected an array"));
                Catalog::empty()
            }
            (None, None) => {
                issues.push(ValidationIssue::new(
                    "$",
                    "expected `categories` or `items` at the top level",
                ));
                Catalog::empty()
            }
        },
        _ => {
            issues.push(ValidationIssue::new(
                "$",
                "expected an array of categories or items",
            ));
            Catalog::empty()
        }
    };

    if issues.is_empty() {
        tracing::debug!(
            categories = catalog.categories().len(),
            items = catalog.item_count(),
            "catalog validated"
        );
        Ok(catalog)
    } else {
        tracing::debug!(issue_count = issues.len(), "catalog rejected");
        Err(BrowserError::MalformedCatalog { issues })
    }
}

/// A flat payload without items is an empty catalog, not an empty `All` group.
fn flat_or_empty(items: Vec<CatalogItem>) -> Catalog {
    if items.is_empty() {
        Catalog::empty()
    } else {
        Catalog::flat(items)
    }
}

fn is_grouped(elems: &[Value]) -> bool {
    elems
        .first()
        .and_then(Value::as_object)
        .is_some_and(|obj| CATEGORY_MARKERS.iter().any(|k| obj.contains_key(*k)))
}

/// Returns whichever of `keys` the object actually uses, for issue paths.
fn present_key<'a>(value: &Value, keys: &[&'a str]) -> &'a str {
    keys.iter()
        .copied()
        .find(|k| value.get(k).is_some())
        .unwrap_or(keys[0])
}

fn parse<T: DeserializeOwned>(
    value: &Value,
    path: &str,
    issues: &mut Vec<ValidationIssue>,
) -> Option<T> {
    if !value.is_object() {
        issues.push(ValidationIssue::new(path, "expected an object"));
        return None;
    }
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            issues.push(ValidationIssue::new(path, e.to_string()));
            None
        }
    }
}

fn require_name(
    name: Option<String>,
    path: &str,
    issues: &mut Vec<ValidationIssue>,
) -> Option<String> {
    match name {
        Some(n) if !n.trim().is_empty() => Some(n),
        Some(_) => {
            issues.push(ValidationIssue::new(path, "must not be empty"));
            None
        }
        None => {
            issues.push(ValidationIssue::new(path, "missing"));
            None
        }
    }
}

fn require_icon(
    icon: Option<String>,
    path: &str,
    issues: &mut Vec<ValidationIssue>,
) -> Option<String> {
    if icon.is_none() {
        issues.push(ValidationIssue::new(path, "missing icon reference"));
    }
    icon
}

fn validate_categories(
    elems: &[Value],
    base: &str,
    issues: &mut Vec<ValidationIssue>,
) -> Vec<Category> {
    let mut seen = HashSet::new();
    let mut categories = Vec::with_capacity(elems.len());

    for (idx, value) in elems.iter().enumerate() {
        let path = format!("{base}[{idx}]");
        let Some(raw) = parse::<RawCategory>(value, &path, issues) else {
            continue;
        };

        let name = require_name(raw.name, &format!("{path}.name"), issues);
        let icon = require_icon(
            raw.icon,
            &format!("{path}.{}", present_key(value, &["icon", "iconName"])),
            issues,
        );

        let children_path = format!("{path}.{}", present_key(value, CATEGORY_MARKERS));
        let subcategories = match raw.subcategories {
            Some(subs) => Some(validate_subcategories(&subs, &children_path, issues)),
            None => {
                issues.push(ValidationIssue::new(&children_path, "missing array"));
                None
            }
        };

        if let Some(n) = &name {
            if !seen.insert(n.clone()) {
                issues.push(ValidationIssue::new(
                    format!("{path}.name"),
                    format!("duplicate category name {n:?}"),
                ));
            }
        }

        if let (Some(name), Some(icon), Some(subcategories)) = (name, icon, subcategories) {
            categories.push(Category::new(name, icon, subcategories));
        }
    }

    categories
}

fn validate_subcategories(
    elems: &[Value],
    base: &str,
    issues: &mut Vec<ValidationIssue>,
) -> Vec<Subcategory> {
    let mut seen = HashSet::new();
    let mut subcategories = Vec::with_capacity(elems.len());

    for (idx, value) in elems.iter().enumerate() {
        let path = format!("{base}[{idx}]");
        let Some(raw) = parse::<RawSubcategory>(value, &path, issues) else {
            continue;
        };

        let name = require_name(raw.name, &format!("{path}.name"), issues);
        let icon = require_icon(
            raw.icon,
            &format!("{path}.{}", present_key(value, &["icon", "iconName"])),
            issues,
        );

        let items_path = format!("{path}.{}", present_key(value, &["items", "series"]));
        let items = match raw.items {
            Some(items) => Some(validate_items(&items, &items_path, issues)),
            None => {
                issues.push(ValidationIssue::new(&items_path, "missing array"));
                None
            }
        };

        if let Some(n) = &name {
            if !seen.insert(n.clone()) {
                issues.push(ValidationIssue::new(
                    format!("{path}.name"),
                    format!("duplicate subcategory name {n:?}"),
                ));
            }
        }

        if let (Some(name), Some(icon), Some(items)) = (name, icon, items) {
            subcategories.push(Subcategory::new(name, icon, items));
        }
    }

    subcategories
}

fn validate_items(
    elems: &[Value],
    base: &str,
    issues: &mut Vec<ValidationIssue>,
) -> Vec<CatalogItem> {
    let mut seen = HashSet::new();
    let mut items = Vec::with_capacity(elems.len());

    for (idx, value) in elems.iter().enumerate() {
        let path = format!("{base}[{idx}]");
        let Some(raw) = parse::<RawItem>(value, &path, issues) else {
            continue;
        };

        let id = require_name(raw.id, &format!("{path}.id"), issues);
        let title = require_name(
            raw.title,
            &format!("{path}.{}", present_key(value, &["title", "name"])),
            issues,
        );

        if let Some(id) = &id {
            if !seen.insert(id.clone()) {
                issues.push(ValidationIssue::new(
                    format!("{path}.id"),
                    format!("duplicate item id {id:?}"),
                ));
            }
        }

        if let (Some(id), Some(title)) = (id, title) {
            items.push(CatalogItem {
                id,
                title,
                description: raw.description,
                image_url: raw.image_url,
                attributes: convert_attributes(raw.extra),
            });
        }
    }

    items
}

fn convert_attributes(extra: BTreeMap<String, Value>) -> BTreeMap<String, AttributeValue> {
    extra
        .into_iter()
        .filter_map(|(key, value)| {
            let converted = match value {
                Value::String(s) => Some(AttributeValue::Text(s)),
                Value::Bool(b) => Some(AttributeValue::Bool(b)),
                Value::Number(n) => n.as_f64().map(AttributeValue::Number),
                Value::Null | Value::Array(_) | Value::Object(_) => None,
            };
            if converted.is_none() {
                tracing::trace!(attribute = %key, "dropping non-scalar attribute");
            }
            converted.map(|v| (key, v))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn issues_of(raw: &Value) -> Vec<ValidationIssue> {
        match load(raw) {
            Err(BrowserError::MalformedCatalog { issues }) => issues,
            other => panic!("expected malformed catalog, got {other:?}"),
        }
    }

    #[test]
    fn accepts_guide_data_field_names() {
        let catalog = load(&json!([
            {
                "name": "Mumbai Guide",
                "iconName": "Landmark",
                "genres": [
                    {
                        "name": "Landmarks",
                        "iconName": "Landmark",
                        "series": [
                            {
                                "id": "gateway",
                                "title": "Gateway of India",
                                "imageUrl": "https://placehold.co/300x450.png",
                                "description": "Arch monument",
                                "dataAiHint": "mumbai monument"
                            }
                        ]
                    }
                ]
            }
        ]))
        .unwrap();

        let items = catalog.items_of("Mumbai Guide", "Landmarks").unwrap();
        assert_eq!(items[0].title, "Gateway of India");
        assert_eq!(items[0].description.as_deref(), Some("Arch monument"));
        assert_eq!(
            items[0].image_url.as_deref(),
            Some("https://placehold.co/300x450.png")
        );
        assert_eq!(items[0].text("dataAiHint"), Some("mumbai monument"));
    }

    #[test]
    fn flat_car_listing_keeps_scalar_attributes() {
        let catalog = load(&json!([
            {
                "id": "tata_punch",
                "name": "Tata Punch",
                "price": 6.13,
                "bodyType": "SUV",
                "hasAlloyWheels": true,
                "colours": ["red", "blue"],
                "safetyRating": null
            }
        ]))
        .unwrap();

        let items = catalog.items_of("All", "All").unwrap();
        assert_eq!(items[0].title, "Tata Punch");
        assert_eq!(items[0].number("price"), Some(6.13));
        assert_eq!(items[0].flag("hasAlloyWheels"), Some(true));
        assert!(!items[0].attributes.contains_key("colours"));
        assert!(!items[0].attributes.contains_key("safetyRating"));
    }

    #[test]
    fn wrapped_shapes_are_accepted() {
        let grouped = load(&json!({
            "categories": [{ "name": "G", "icon": "Tv", "subcategories": [] }]
        }))
        .unwrap();
        assert_eq!(grouped.categories().len(), 1);

        let flat = load(&json!({ "items": [{ "id": "x", "title": "X" }] })).unwrap();
        assert_eq!(flat.item_count(), 1);

        assert!(load(&json!([])).unwrap().is_empty());
    }

    #[test]
    fn empty_flat_payloads_are_empty_catalogs() {
        let bare = load(&json!([])).unwrap();
        assert!(bare.is_empty());
        assert!(bare.categories().is_empty());

        let wrapped = load(&json!({ "items": [] })).unwrap();
        assert!(wrapped.is_empty());
        assert!(wrapped.categories().is_empty());
    }

    #[test]
    fn collects_every_issue_with_paths() {
        let issues = issues_of(&json!([
            {
                "name": "Guides",
                "genres": [
                    { "name": "Action", "iconName": "Zap", "series": [ { "id": "a" } ] },
                    { "iconName": "Smile", "series": [] }
                ]
            }
        ]));

        let paths: Vec<&str> = issues.iter().map(|i| i.path.as_str()).collect();
        assert!(paths.contains(&"$[0].icon"));
        assert!(paths.contains(&"$[0].genres[0].series[0].title"));
        assert!(paths.contains(&"$[0].genres[1].name"));
        assert_eq!(issues.len(), 3);
    }

    #[test]
    fn missing_child_arrays_are_reported() {
        let issues = issues_of(&json!([
            { "name": "Guides", "iconName": "Tv", "genres": [ { "name": "Drama", "iconName": "Drama" } ] },
            { "name": "Cities", "iconName": "Landmark" }
        ]));

        let paths: Vec<&str> = issues.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, ["$[0].genres[0].items", "$[1].subcategories"]);
        assert!(issues.iter().all(|i| i.problem == "missing array"));
    }

    #[test]
    fn rejects_duplicate_names_in_same_scope() {
        let issues = issues_of(&json!([
            { "name": "G", "icon": "Tv", "subcategories": [
                { "name": "S", "icon": "Zap", "items": [] },
                { "name": "S", "icon": "Zap", "items": [] }
            ]},
            { "name": "G", "icon": "Tv", "subcategories": [] }
        ]));

        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].path, "$[0].subcategories[1].name");
        assert_eq!(issues[1].path, "$[1].name");
    }

    #[test]
    fn same_subcategory_name_in_different_categories_is_fine() {
        let catalog = load(&json!([
            { "name": "A", "icon": "Tv", "subcategories": [{ "name": "Top", "icon": "Zap", "items": [] }] },
            { "name": "B", "icon": "Tv", "subcategories": [{ "name": "Top", "icon": "Zap", "items": [] }] }
        ]))
        .unwrap();
        assert_eq!(catalog.categories().len(), 2);
    }

    #[test]
    fn wrong_types_are_reported_not_panicked() {
        let issues = issues_of(&json!(["not an object"]));
        assert_eq!(issues[0].path, "$[0]");

        let issues = issues_of(&json!([{ "id": 7, "title": "Seven" }]));
        assert_eq!(issues[0].path, "$[0]");

        let issues = issues_of(&json!("catalog"));
        assert_eq!(issues[0].path, "$");

        let issues = issues_of(&json!({ "categories": {} }));
        assert_eq!(issues[0].path, "$.categories");
    }
}
