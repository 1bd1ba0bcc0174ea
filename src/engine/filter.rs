//! Filter state and predicate composition.
//!
//! [`FilterState`] holds what the user has asked for, one entry per dimension.
//! [`compile`] turns it into a [`CompiledFilter`] containing only the active
//! constraints; an item passes when it satisfies all of them. A dimension with
//! no active constraint contributes nothing, so it can never exclude an item.
//!
//! # Example
//!
//! ```
//! use catalog_browser::engine::{compile, BrowseSchema, FilterState, NumericRange};
//! use catalog_browser::domain::{AttributeValue, CatalogItem};
//!
//! let schema = BrowseSchema::cars();
//! let mut filter = FilterState::default();
//! filter.set_range(&schema, "price", Some(NumericRange::new(5.0, 10.0)))?;
//!
//! let swift = CatalogItem::new("swift", "Maruti Swift")
//!     .with_attribute("price", AttributeValue::Number(6.49));
//! assert!(compile(&schema, &filter).matches(&swift));
//! # Ok::<(), catalog_browser::domain::BrowserError>(())
//! ```

use super::schema::{BrowseSchema, MatchMode};
use crate::domain::{BrowserError, CatalogItem, Result};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Inclusive numeric range `[min, max]`.
///
/// `max` may be `f64::INFINITY` for open-ended ranges such as "Over 1 Crore".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
}

impl NumericRange {
    /// The range that constrains nothing.
    pub const UNBOUNDED: Self = Self {
        min: 0.0,
        max: f64::INFINITY,
    };

    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Builds a range, rejecting inverted or NaN bounds.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::InvalidFilterRange`] when `min > max` or either
    /// bound is NaN.
    pub fn checked(dimension: &str, min: f64, max: f64) -> Result<Self> {
        let range = Self::new(min, max);
        if range.is_valid() {
            Ok(range)
        } else {
            Err(BrowserError::InvalidFilterRange {
                dimension: dimension.to_string(),
                min,
                max,
            })
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min <= self.max
    }

    /// True for `[0, +inf]` (or a lower minimum): no range selected.
    #[must_use]
    pub fn is_neutral(&self) -> bool {
        self.min <= 0.0 && self.max == f64::INFINITY
    }

    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// The user's current filter choices, keyed by dimension.
///
/// Every mutator reports whether anything actually changed so callers can skip
/// re-derivation for no-op updates. Mutators that name a dimension the schema
/// does not define fail with [`BrowserError::UnknownDimension`] and leave the
/// state untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    search: String,
    choices: BTreeMap<String, BTreeSet<String>>,
    ranges: BTreeMap<String, NumericRange>,
    flags: BTreeSet<String>,
}

impl FilterState {
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    #[must_use]
    pub fn selected(&self, dimension: &str) -> Option<&BTreeSet<String>> {
        self.choices.get(dimension)
    }

    #[must_use]
    pub fn range(&self, dimension: &str) -> Option<NumericRange> {
        self.ranges.get(dimension).copied()
    }

    #[must_use]
    pub fn flag_enabled(&self, dimension: &str) -> bool {
        self.flags.contains(dimension)
    }

    /// True when no dimension constrains anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty()
            && self.choices.is_empty()
            && self.ranges.is_empty()
            && self.flags.is_empty()
    }

    pub fn set_search(&mut self, term: impl Into<String>) -> bool {
        let term = term.into();
        if self.search == term {
            return false;
        }
        self.search = term;
        true
    }

    pub fn push_search_char(&mut self, c: char) -> bool {
        self.search.push(c);
        true
    }

    pub fn pop_search_char(&mut self) -> bool {
        self.search.pop().is_some()
    }

    /// Adds `value` to the selected set of a choice dimension, or removes it if
    /// it was already selected.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::UnknownDimension`] if the schema has no such
    /// choice dimension.
    pub fn toggle_choice(&mut self, schema: &BrowseSchema, dimension: &str, value: &str) -> Result<bool> {
        ensure(schema.choice(dimension).is_some(), dimension)?;

        let selected = self.choices.entry(dimension.to_string()).or_default();
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        if selected.is_empty() {
            self.choices.remove(dimension);
        }
        Ok(true)
    }

    /// Replaces the selected set of a choice dimension.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::UnknownDimension`] if the schema has no such
    /// choice dimension.
    pub fn set_choices<I, S>(&mut self, schema: &BrowseSchema, dimension: &str, values: I) -> Result<bool>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ensure(schema.choice(dimension).is_some(), dimension)?;

        let values: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        let previous = if values.is_empty() {
            self.choices.remove(dimension)
        } else {
            self.choices.insert(dimension.to_string(), values.clone())
        };
        Ok(previous.unwrap_or_default() != values)
    }

    /// Sets or clears the range of a range dimension.
    ///
    /// A neutral range is stored as "no range". An inverted range is kept, so
    /// the dimension matches nothing until it is corrected or reset.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::UnknownDimension`] if the schema has no such
    /// range dimension.
    pub fn set_range(
        &mut self,
        schema: &BrowseSchema,
        dimension: &str,
        range: Option<NumericRange>,
    ) -> Result<bool> {
        ensure(schema.range(dimension).is_some(), dimension)?;

        let range = range.filter(|r| !r.is_neutral());
        if let Some(r) = range.filter(|r| !r.is_valid()) {
            tracing::warn!(dimension = %dimension, min = r.min, max = r.max, "inverted range selected, nothing will match");
        }

        let previous = match range {
            Some(r) => self.ranges.insert(dimension.to_string(), r),
            None => self.ranges.remove(dimension),
        };
        Ok(previous != range)
    }

    /// Removes any range on a dimension.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::UnknownDimension`] if the schema has no such
    /// range dimension.
    pub fn clear_range(&mut self, schema: &BrowseSchema, dimension: &str) -> Result<bool> {
        self.set_range(schema, dimension, None)
    }

    /// Applies the preset with the given label to a range dimension.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::UnknownDimension`] for an unknown dimension and
    /// [`BrowserError::InvalidInput`] for an unknown preset label.
    pub fn select_range_preset(&mut self, schema: &BrowseSchema, dimension: &str, label: &str) -> Result<bool> {
        let spec = schema
            .range(dimension)
            .ok_or_else(|| BrowserError::UnknownDimension(dimension.to_string()))?;
        let preset = spec
            .presets
            .iter()
            .find(|p| p.label == label)
            .ok_or_else(|| BrowserError::InvalidInput(format!("no preset {label:?} for {dimension}")))?;

        self.set_range(schema, dimension, Some(NumericRange::new(preset.min, preset.max)))
    }

    /// Flips a feature flag.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::UnknownDimension`] if the schema has no such flag.
    pub fn toggle_flag(&mut self, schema: &BrowseSchema, dimension: &str) -> Result<bool> {
        let on = !self.flag_enabled(dimension);
        self.set_flag(schema, dimension, on)
    }

    /// Turns a feature flag on or off.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::UnknownDimension`] if the schema has no such flag.
    pub fn set_flag(&mut self, schema: &BrowseSchema, dimension: &str, on: bool) -> Result<bool> {
        ensure(schema.flag(dimension).is_some(), dimension)?;

        Ok(if on {
            self.flags.insert(dimension.to_string())
        } else {
            self.flags.remove(dimension)
        })
    }

    /// Clears every dimension in one step.
    pub fn reset(&mut self) -> bool {
        if *self == Self::default() {
            return false;
        }
        *self = Self::default();
        true
    }
}

fn ensure(known: bool, dimension: &str) -> Result<()> {
    if known {
        Ok(())
    } else {
        Err(BrowserError::UnknownDimension(dimension.to_string()))
    }
}

/// One active constraint of a compiled filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    Text {
        tokens: Vec<String>,
        fields: Vec<String>,
        mode: MatchMode,
    },
    Choice {
        attribute: String,
        allowed: BTreeSet<String>,
    },
    Range {
        attribute: String,
        range: NumericRange,
    },
    Flag {
        attribute: String,
        at_least: Option<f64>,
    },
}

/// The conjunction of all active constraints of a [`FilterState`].
pub struct CompiledFilter {
    constraints: Vec<Constraint>,
    matcher: SkimMatcherV2,
}

impl fmt::Debug for CompiledFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledFilter")
            .field("constraints", &self.constraints)
            .finish_non_exhaustive()
    }
}

impl CompiledFilter {
    /// Number of dimensions currently constraining the result.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.constraints.len()
    }

    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    #[must_use]
    pub fn matches(&self, item: &CatalogItem) -> bool {
        self.constraints.iter().all(|c| self.satisfies(c, item))
    }

    fn satisfies(&self, constraint: &Constraint, item: &CatalogItem) -> bool {
        match constraint {
            Constraint::Text { tokens, fields, mode } => {
                let texts: Vec<String> = fields
                    .iter()
                    .filter_map(|f| item.text(f))
                    .map(str::to_lowercase)
                    .collect();
                match mode {
                    MatchMode::Substring => tokens
                        .iter()
                        .all(|t| texts.iter().any(|text| text.contains(t.as_str()))),
                    MatchMode::Fuzzy => tokens.iter().all(|t| {
                        texts
                            .iter()
                            .any(|text| self.matcher.fuzzy_match(text, t).is_some())
                    }),
                }
            }
            Constraint::Choice { attribute, allowed } => item
                .text(attribute)
                .is_some_and(|value| allowed.contains(value)),
            Constraint::Range { attribute, range } => {
                range.is_valid() && item.number(attribute).is_some_and(|v| range.contains(v))
            }
            Constraint::Flag { attribute, at_least } => match at_least {
                Some(threshold) => item.number(attribute).is_some_and(|v| v >= *threshold),
                None => item.flag(attribute) == Some(true),
            },
        }
    }
}

/// Builds the predicate for a filter state, in schema dimension order.
///
/// In substring mode the whole trimmed term is one token; in fuzzy mode each
/// whitespace-separated word is a token and all must match.
#[must_use]
pub fn compile(schema: &BrowseSchema, filter: &FilterState) -> CompiledFilter {
    let mut constraints = Vec::new();

    let term = filter.search.trim().to_lowercase();
    if !term.is_empty() {
        let tokens = match schema.match_mode {
            MatchMode::Substring => vec![term],
            MatchMode::Fuzzy => term.split_whitespace().map(String::from).collect(),
        };
        constraints.push(Constraint::Text {
            tokens,
            fields: schema.search_fields.clone(),
            mode: schema.match_mode,
        });
    }

    for dim in &schema.choices {
        if let Some(allowed) = filter.choices.get(&dim.key).filter(|s| !s.is_empty()) {
            constraints.push(Constraint::Choice {
                attribute: dim.key.clone(),
                allowed: allowed.clone(),
            });
        }
    }

    for dim in &schema.ranges {
        if let Some(range) = filter.ranges.get(&dim.key).filter(|r| !r.is_neutral()) {
            constraints.push(Constraint::Range {
                attribute: dim.key.clone(),
                range: *range,
            });
        }
    }

    for dim in &schema.flags {
        if filter.flags.contains(&dim.key) {
            constraints.push(Constraint::Flag {
                attribute: dim.attribute.clone(),
                at_least: dim.at_least,
            });
        }
    }

    CompiledFilter {
        constraints,
        matcher: SkimMatcherV2::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AttributeValue;

    fn car(id: &str, body: &str, price: f64) -> CatalogItem {
        CatalogItem::new(id, id)
            .with_attribute("bodyType", AttributeValue::Text(body.into()))
            .with_attribute("price", AttributeValue::Number(price))
    }

    #[test]
    fn empty_state_compiles_to_no_constraints() {
        let compiled = compile(&BrowseSchema::cars(), &FilterState::default());
        assert_eq!(compiled.active_count(), 0);
        assert!(compiled.matches(&CatalogItem::new("x", "X")));
    }

    #[test]
    fn whitespace_search_is_inactive() {
        let mut filter = FilterState::default();
        filter.set_search("   ");
        assert_eq!(compile(&BrowseSchema::guides(), &filter).active_count(), 0);
    }

    #[test]
    fn search_matches_title_or_description_case_insensitively() {
        let schema = BrowseSchema::guides();
        let mut filter = FilterState::default();
        filter.set_search("ARCH");

        let compiled = compile(&schema, &filter);
        let by_description = CatalogItem::new("g", "Gateway of India").with_description("Arch monument");
        let by_title = CatalogItem::new("a", "Archer");
        let neither = CatalogItem::new("b", "Breaking Bad");

        assert!(compiled.matches(&by_description));
        assert!(compiled.matches(&by_title));
        assert!(!compiled.matches(&neither));
    }

    #[test]
    fn fuzzy_mode_requires_every_token() {
        let mut schema = BrowseSchema::guides();
        schema.match_mode = MatchMode::Fuzzy;
        let mut filter = FilterState::default();
        filter.set_search("brkng bd");

        let compiled = compile(&schema, &filter);
        assert!(compiled.matches(&CatalogItem::new("bb", "Breaking Bad")));
        assert!(!compiled.matches(&CatalogItem::new("ds", "Dark Souls")));
    }

    #[test]
    fn choice_requires_membership_and_excludes_missing_attribute() {
        let schema = BrowseSchema::cars();
        let mut filter = FilterState::default();
        filter.toggle_choice(&schema, "bodyType", "SUV").unwrap();
        filter.toggle_choice(&schema, "bodyType", "Sedan").unwrap();

        let compiled = compile(&schema, &filter);
        assert!(compiled.matches(&car("punch", "SUV", 6.13)));
        assert!(compiled.matches(&car("city", "Sedan", 11.8)));
        assert!(!compiled.matches(&car("swift", "Hatchback", 6.49)));
        assert!(!compiled.matches(&CatalogItem::new("mystery", "Mystery")));
    }

    #[test]
    fn toggling_a_choice_twice_clears_the_dimension() {
        let schema = BrowseSchema::cars();
        let mut filter = FilterState::default();
        filter.toggle_choice(&schema, "fuelType", "CNG").unwrap();
        filter.toggle_choice(&schema, "fuelType", "CNG").unwrap();
        assert!(filter.is_empty());
        assert!(filter.selected("fuelType").is_none());
    }

    #[test]
    fn set_choices_reports_changes_only() {
        let schema = BrowseSchema::cars();
        let mut filter = FilterState::default();
        assert!(filter.set_choices(&schema, "fuelType", ["Diesel"]).unwrap());
        assert!(!filter.set_choices(&schema, "fuelType", ["Diesel"]).unwrap());
        assert!(filter.set_choices(&schema, "fuelType", Vec::<String>::new()).unwrap());
        assert!(!filter.set_choices(&schema, "fuelType", Vec::<String>::new()).unwrap());
    }

    #[test]
    fn range_is_inclusive_and_excludes_missing_values() {
        let schema = BrowseSchema::cars();
        let mut filter = FilterState::default();
        filter.set_range(&schema, "price", Some(NumericRange::new(5.0, 10.0))).unwrap();

        let compiled = compile(&schema, &filter);
        assert!(compiled.matches(&car("a", "SUV", 5.0)));
        assert!(compiled.matches(&car("b", "SUV", 10.0)));
        assert!(!compiled.matches(&car("c", "SUV", 10.01)));
        assert!(!compiled.matches(&CatalogItem::new("d", "No price")));
    }

    #[test]
    fn neutral_range_is_not_a_constraint() {
        let schema = BrowseSchema::cars();
        let mut filter = FilterState::default();
        let changed = filter.set_range(&schema, "price", Some(NumericRange::UNBOUNDED)).unwrap();

        assert!(!changed);
        assert!(filter.range("price").is_none());
        assert!(compile(&schema, &filter).matches(&CatalogItem::new("d", "No price")));
    }

    #[test]
    fn inverted_range_matches_nothing() {
        let schema = BrowseSchema::cars();
        let mut filter = FilterState::default();
        filter.set_range(&schema, "price", Some(NumericRange::new(10.0, 5.0))).unwrap();

        let compiled = compile(&schema, &filter);
        assert_eq!(compiled.active_count(), 1);
        assert!(!compiled.matches(&car("a", "SUV", 7.0)));
        assert!(NumericRange::checked("price", 10.0, 5.0).is_err());
        assert!(NumericRange::checked("price", f64::NAN, 5.0).is_err());
    }

    #[test]
    fn presets_select_labelled_ranges() {
        let schema = BrowseSchema::cars();
        let mut filter = FilterState::default();
        filter.select_range_preset(&schema, "price", "Over 1 Crore").unwrap();
        assert_eq!(filter.range("price"), Some(NumericRange::new(100.0, f64::INFINITY)));

        let err = filter.select_range_preset(&schema, "price", "Cheap").unwrap_err();
        assert!(matches!(err, BrowserError::InvalidInput(_)));
    }

    #[test]
    fn flags_require_true_or_threshold() {
        let schema = BrowseSchema::cars();
        let mut filter = FilterState::default();
        filter.toggle_flag(&schema, "hasAlloyWheels").unwrap();
        filter.toggle_flag(&schema, "hasMultipleAirbags").unwrap();

        let compiled = compile(&schema, &filter);
        let loaded = CatalogItem::new("x", "X")
            .with_attribute("hasAlloyWheels", AttributeValue::Bool(true))
            .with_attribute("airbagCount", AttributeValue::Number(6.0));
        let one_airbag = loaded
            .clone()
            .with_attribute("airbagCount", AttributeValue::Number(1.0));
        let steel_wheels = loaded
            .clone()
            .with_attribute("hasAlloyWheels", AttributeValue::Bool(false));

        assert!(compiled.matches(&loaded));
        assert!(!compiled.matches(&one_airbag));
        assert!(!compiled.matches(&steel_wheels));
    }

    #[test]
    fn unknown_dimensions_leave_state_untouched() {
        let schema = BrowseSchema::guides();
        let mut filter = FilterState::default();

        assert!(filter.toggle_choice(&schema, "bodyType", "SUV").is_err());
        assert!(filter.toggle_flag(&schema, "hasAlloyWheels").is_err());
        assert!(filter.set_range(&schema, "price", None).is_err());
        assert!(filter.is_empty());
    }

    #[test]
    fn reset_clears_everything_once() {
        let schema = BrowseSchema::cars();
        let mut filter = FilterState::default();
        filter.set_search("tata");
        filter.toggle_flag(&schema, "hasMusicSystem").unwrap();

        assert!(filter.reset());
        assert!(filter.is_empty());
        assert!(!filter.reset());
    }
}
