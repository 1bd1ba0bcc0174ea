//! Plain-text rendering of a view model.
//!
//! The renderer turns a [`UIViewModel`] into lines of text. It writes to any
//! [`fmt::Write`] sink so the host binary can print it and tests can inspect it.
//!
//! # Layout
//!
//! ```text
//! == guides (3 of 3) ==
//! Categories: [Tv Guides] Mumbai Guide
//! Sections:   [Swords Action] Comedy
//! Search: ""
//! Sort: Title=Off
//!   1. Alpha
//!      Arch monument
//! -- cat <name>  sub <name> ...
//! ```

use crate::app::BrowserState;
use crate::ui::viewmodel::{TabInfo, UIViewModel};
use std::fmt::{self, Write};

/// Renders the current state of a browser to a string.
///
/// At most `max_items` items are listed; the rest are summarized in one line.
#[must_use]
pub fn render(state: &BrowserState, max_items: usize) -> String {
    let viewmodel = state.compute_viewmodel();
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = render_viewmodel(&mut out, &viewmodel, max_items);
    out
}

/// Writes a view model as plain text.
///
/// # Errors
///
/// Returns an error only if the sink fails.
pub fn render_viewmodel(out: &mut impl Write, vm: &UIViewModel, max_items: usize) -> fmt::Result {
    writeln!(out, "== {} ({} of {}) ==", vm.header.title, vm.header.visible, vm.header.total)?;

    if !vm.category_tabs.is_empty() {
        writeln!(out, "Categories: {}", tabs(&vm.category_tabs))?;
    }
    if !vm.subcategory_tabs.is_empty() {
        writeln!(out, "Sections:   {}", tabs(&vm.subcategory_tabs))?;
    }

    writeln!(out, "Search: {:?}", vm.search_bar.query)?;
    for control in vm.controls.iter().filter(|c| c.is_active) {
        writeln!(out, "Filter: {} = {}", control.label, control.summary)?;
    }
    if !vm.sort_controls.is_empty() {
        let sorts: Vec<String> = vm
            .sort_controls
            .iter()
            .map(|s| format!("{}={}", s.label, s.state))
            .collect();
        writeln!(out, "Sort: {}", sorts.join(" "))?;
    }

    if let Some(empty) = &vm.empty_state {
        writeln!(out, "  {}", empty.message)?;
        writeln!(out, "  {}", empty.subtitle)?;
        if empty.offer_reset {
            writeln!(out, "  (type `reset` to clear filters)")?;
        }
    } else {
        for (index, item) in vm.display_items.iter().take(max_items).enumerate() {
            writeln!(out, "{:>3}. {}", index + 1, highlighted(&item.title, &item.highlight_ranges))?;
            if let Some(subtitle) = &item.subtitle {
                writeln!(out, "     {subtitle}")?;
            }
            if !item.details.is_empty() {
                let details: Vec<String> = item.details.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                writeln!(out, "     {}", details.join(" | "))?;
            }
        }
        let hidden = vm.display_items.len().saturating_sub(max_items);
        if hidden > 0 {
            writeln!(out, "     ... and {hidden} more")?;
        }
    }

    if let Some(error) = &vm.footer.error {
        writeln!(out, "!! {error}")?;
    }
    writeln!(out, "-- {}", vm.footer.keybindings)
}

fn tabs(tabs: &[TabInfo]) -> String {
    tabs.iter()
        .map(|t| {
            if t.is_active {
                format!("[{} {}]", t.icon, t.name)
            } else {
                t.name.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Wraps highlighted character ranges in `*`.
fn highlighted(text: &str, ranges: &[(usize, usize)]) -> String {
    if ranges.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len() + ranges.len() * 2);
    for (index, c) in text.chars().enumerate() {
        if ranges.iter().any(|(start, _)| *start == index) {
            out.push('*');
        }
        out.push(c);
        if ranges.iter().any(|(_, end)| *end == index + 1) {
            out.push('*');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Catalog, CatalogItem};
    use crate::engine::BrowseSchema;

    fn state() -> BrowserState {
        let catalog = Catalog::flat(vec![
            CatalogItem::new("a", "Archer").with_description("Spy comedy"),
            CatalogItem::new("b", "Breaking Bad"),
            CatalogItem::new("c", "Chernobyl"),
        ]);
        BrowserState::new(catalog, BrowseSchema::guides(), None)
    }

    #[test]
    fn renders_items_and_overflow() {
        let text = render(&state(), 2);
        assert!(text.starts_with("== guides (3 of 3) =="));
        assert!(text.contains("  1. Archer\n     Spy comedy\n"));
        assert!(text.contains("  2. Breaking Bad\n"));
        assert!(text.contains("... and 1 more"));
        assert!(!text.contains("Chernobyl"));
    }

    #[test]
    fn renders_no_matches_with_reset_hint() {
        let mut state = state();
        state.set_search("zzz");
        let text = render(&state, 10);
        assert!(text.contains("No items match your filters"));
        assert!(text.contains("type `reset`"));
    }

    #[test]
    fn marks_highlights() {
        assert_eq!(highlighted("Breaking Bad", &[(0, 5)]), "*Break*ing Bad");
        assert_eq!(highlighted("abc", &[]), "abc");
    }
}
