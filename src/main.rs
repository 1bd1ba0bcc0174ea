//! Command-line host for the catalog browser.
//!
//! Reads one command per line from stdin, translates it into a library
//! [`Event`], executes the resulting actions and prints the view as plain text.
//!
//! # Usage
//!
//! ```text
//! catalog-browser [config.toml]
//! catalog-browser key=value [key=value ...]
//! ```
//!
//! # Commands
//!
//! - `cat <name>`: Select a category
//! - `sub <name>`: Select a subcategory
//! - `search [term]`: Set (or clear) the search term
//! - `choice <dimension> <value>`: Toggle one choice
//! - `choices <dimension> <a,b,...>`: Replace the choices of a dimension
//! - `range <dimension> <min> [max]` / `range <dimension> off`: Set or clear a range
//! - `preset <dimension> <label>`: Apply a range preset
//! - `flag <dimension>`: Toggle a feature flag
//! - `sort <key>` / `sort off`: Cycle the sort on a key, or turn it off
//! - `reset`: Clear all filters
//! - `reload`: Load the catalog again
//! - `mask <text>`: Mask unwanted words in text
//! - `emi <principal> <annual rate %> <months>`: Loan installment
//! - `help`, `quit`

#![allow(clippy::multiple_crate_versions)]

use catalog_browser::access::DenyAll;
use catalog_browser::engine::{NumericRange, SortState};
use catalog_browser::infrastructure::expand_tilde;
use catalog_browser::storage::{load_or_empty, JsonFileSource, LoadOutcome};
use catalog_browser::tools::{LoanTerms, WordMask};
use catalog_browser::{handle_event, initialize, Action, AppContext, BrowserState, Config, Event};
use std::collections::{BTreeMap, VecDeque};
use std::io::{self, BufRead, Write};
use std::sync::Arc;

const MAX_ITEMS: usize = 20;

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
enum Command {
    Browse(Event),
    Reload,
    Mask(String),
    Emi {
        principal: String,
        rate: String,
        months: String,
    },
    Help,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();
    let owned = |s: &str| s.trim().to_string();

    match verb {
        "cat" if !rest.is_empty() => Command::Browse(Event::SelectCategory(owned(rest))),
        "sub" if !rest.is_empty() => Command::Browse(Event::SelectSubcategory(owned(rest))),
        "search" => Command::Browse(Event::SetSearch(owned(rest))),
        "choice" => match rest.split_once(' ') {
            Some((dimension, value)) => Command::Browse(Event::ToggleChoice {
                dimension: owned(dimension),
                value: owned(value),
            }),
            None => Command::Unknown(line.to_string()),
        },
        "choices" => {
            let (dimension, values) = rest.split_once(' ').unwrap_or((rest, ""));
            if dimension.is_empty() {
                return Command::Unknown(line.to_string());
            }
            Command::Browse(Event::SetChoices {
                dimension: owned(dimension),
                values: values.split(',').map(str::trim).filter(|v| !v.is_empty()).map(String::from).collect(),
            })
        }
        "range" => parse_range(rest).map_or_else(|| Command::Unknown(line.to_string()), Command::Browse),
        "preset" => match rest.split_once(' ') {
            Some((dimension, label)) => Command::Browse(Event::SelectRangePreset {
                dimension: owned(dimension),
                label: owned(label),
            }),
            None => Command::Unknown(line.to_string()),
        },
        "flag" if !rest.is_empty() => Command::Browse(Event::ToggleFlag(owned(rest))),
        "sort" if rest == "off" => Command::Browse(Event::SetSort(SortState::Unsorted)),
        "sort" if !rest.is_empty() => Command::Browse(Event::CycleSort(owned(rest))),
        "reset" => Command::Browse(Event::ResetFilters),
        "reload" => Command::Reload,
        "mask" => Command::Mask(rest.to_string()),
        "emi" => match rest.split_whitespace().collect::<Vec<_>>()[..] {
            [principal, rate, months] => Command::Emi {
                principal: principal.to_string(),
                rate: rate.to_string(),
                months: months.to_string(),
            },
            _ => Command::Unknown(line.to_string()),
        },
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    }
}

/// `<dimension> off`, `<dimension> <min>` or `<dimension> <min> <max>`.
fn parse_range(rest: &str) -> Option<Event> {
    let parts: Vec<&str> = rest.split_whitespace().collect();
    let (dimension, range) = match parts[..] {
        [dimension, "off"] => (dimension, None),
        [dimension, min] => (dimension, Some(NumericRange::new(min.parse().ok()?, f64::INFINITY))),
        [dimension, min, max] => (dimension, Some(NumericRange::new(min.parse().ok()?, max.parse().ok()?))),
        _ => return None,
    };
    Some(Event::SetRange {
        dimension: dimension.to_string(),
        range,
    })
}

fn load_config(args: &[String]) -> catalog_browser::Result<Config> {
    match args {
        [] => Ok(Config::default()),
        [path] if !path.contains('=') => Config::from_file(expand_tilde(path)),
        pairs => {
            let map: BTreeMap<String, String> = pairs
                .iter()
                .filter_map(|pair| pair.split_once('='))
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            Ok(Config::from_map(&map))
        }
    }
}

/// Browser state plus what the host needs to carry out actions.
struct Host {
    state: BrowserState,
    config: Config,
    mask: WordMask,
}

impl Host {
    fn new(config: Config) -> Self {
        Self {
            state: initialize(&config),
            mask: config.word_mask(),
            config,
        }
    }

    fn load_catalog(&self) -> LoadOutcome {
        let _span = tracing::debug_span!("host_load_catalog").entered();
        match &self.config.catalog_path {
            Some(path) => load_or_empty(&JsonFileSource::new(expand_tilde(path))),
            None => {
                tracing::info!("no catalog_path configured, starting empty");
                LoadOutcome::Loaded(catalog_browser::domain::Catalog::empty())
            }
        }
    }

    /// Handles an event and every follow-up event its actions produce.
    fn dispatch(&mut self, event: Event, out: &mut impl Write) -> io::Result<bool> {
        self.dispatch_all([event], out)
    }

    /// Handles `events` in order. Events produced by actions are queued behind
    /// the ones already waiting.
    fn dispatch_all(&mut self, events: impl IntoIterator<Item = Event>, out: &mut impl Write) -> io::Result<bool> {
        let mut pending: VecDeque<Event> = events.into_iter().collect();
        let mut should_render = false;

        while let Some(event) = pending.pop_front() {
            match handle_event(&mut self.state, &event) {
                Ok((render, actions)) => {
                    should_render |= render;
                    for action in actions {
                        if let Some(next) = self.execute_action(&action, out)? {
                            pending.push_back(next);
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "error handling event");
                    writeln!(out, "error: {e}")?;
                }
            }
        }
        Ok(should_render)
    }

    #[tracing::instrument(level = "debug", skip(self, out))]
    fn execute_action(&self, action: &Action, out: &mut impl Write) -> io::Result<Option<Event>> {
        match action {
            Action::LoadCatalog => Ok(Some(Event::CatalogLoaded(self.load_catalog()))),
            Action::ReportError(message) => {
                writeln!(out, "! {message}")?;
                Ok(None)
            }
        }
    }

    /// Runs one input line. Returns `false` when the session should end.
    fn run_line(&mut self, line: &str, out: &mut impl Write) -> io::Result<bool> {
        if line.trim().is_empty() {
            return Ok(true);
        }

        match parse_command(line) {
            Command::Browse(event) => {
                if self.dispatch(event, out)? {
                    write!(out, "{}", catalog_browser::ui::render(&self.state, MAX_ITEMS))?;
                }
            }
            Command::Reload => {
                let outcome = self.load_catalog();
                self.dispatch(Event::CatalogLoaded(outcome), out)?;
                write!(out, "{}", catalog_browser::ui::render(&self.state, MAX_ITEMS))?;
            }
            Command::Mask(text) => writeln!(out, "{}", self.mask.mask(&text))?,
            Command::Emi { principal, rate, months } => match LoanTerms::parse(&principal, &rate, &months) {
                Ok(terms) => match (terms.monthly_installment(), terms.total_interest()) {
                    (Some(emi), Some(interest)) => {
                        writeln!(out, "EMI {emi:.2} per month, total interest {interest:.2}")?;
                    }
                    _ => writeln!(out, "! Loan terms out of range")?,
                },
                Err(e) => writeln!(out, "! {e}")?,
            },
            Command::Help => writeln!(
                out,
                "commands: cat, sub, search, choice, choices, range, preset, flag, sort, reset, reload, mask, emi, quit"
            )?,
            Command::Quit => return Ok(false),
            Command::Unknown(text) => writeln!(out, "? unknown command: {text} (try `help`)")?,
        }
        Ok(true)
    }
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("catalog-browser: {e}");
            std::process::exit(2);
        }
    };

    let context = AppContext::init(config.clone(), Arc::new(DenyAll));
    let span = tracing::debug_span!("host_session");
    let entered = span.enter();

    let mut host = Host::new(config);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let result = (|| -> io::Result<()> {
        host.dispatch(Event::Mount, &mut out)?;
        write!(out, "{}", catalog_browser::ui::render(&host.state, MAX_ITEMS))?;
        out.flush()?;

        for line in io::stdin().lock().lines() {
            if !host.run_line(&line?, &mut out)? {
                break;
            }
            out.flush()?;
        }
        Ok(())
    })();

    drop(entered);
    if let Err(e) = result {
        tracing::warn!(error = %e, "terminal i/o failed");
        eprintln!("catalog-browser: {e}");
    }
    if let Err(e) = context.shutdown() {
        eprintln!("catalog-browser: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_filter_commands() {
        assert_eq!(
            parse_command("choice bodyType SUV"),
            Command::Browse(Event::ToggleChoice {
                dimension: "bodyType".into(),
                value: "SUV".into()
            })
        );
        assert_eq!(
            parse_command("preset price 5 - 10 Lakh"),
            Command::Browse(Event::SelectRangePreset {
                dimension: "price".into(),
                label: "5 - 10 Lakh".into()
            })
        );
        assert_eq!(
            parse_command("choices fuelType Petrol, Diesel"),
            Command::Browse(Event::SetChoices {
                dimension: "fuelType".into(),
                values: vec!["Petrol".into(), "Diesel".into()]
            })
        );
        assert_eq!(parse_command("sort off"), Command::Browse(Event::SetSort(SortState::Unsorted)));
        assert_eq!(parse_command("search"), Command::Browse(Event::SetSearch(String::new())));
    }

    #[test]
    fn parses_ranges() {
        assert_eq!(
            parse_command("range price 5 10"),
            Command::Browse(Event::SetRange {
                dimension: "price".into(),
                range: Some(NumericRange::new(5.0, 10.0))
            })
        );
        assert_eq!(
            parse_command("range price off"),
            Command::Browse(Event::SetRange {
                dimension: "price".into(),
                range: None
            })
        );
        assert!(matches!(parse_command("range price cheap"), Command::Unknown(_)));
    }

    #[test]
    fn config_from_pairs() {
        let args = vec!["profile=cars".to_string(), "trace_level=debug".to_string()];
        let config = load_config(&args).unwrap();
        assert_eq!(config.profile, catalog_browser::Profile::Cars);
        assert_eq!(config.trace_level.as_deref(), Some("debug"));
    }

    #[test]
    fn host_session_loads_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guides.json");
        std::fs::write(
            &path,
            r#"[{"name": "TV", "iconName": "Tv", "genres": [{"name": "Comedy", "iconName": "Smile", "series": [
                {"id": "1", "title": "Archer"},
                {"id": "2", "title": "Brooklyn Nine-Nine"}
            ]}]}]"#,
        )
        .unwrap();

        let config = Config {
            catalog_path: Some(path.to_string_lossy().into_owned()),
            ..Config::default()
        };
        let mut host = Host::new(config);
        let mut out = Vec::new();

        host.dispatch(Event::Mount, &mut out).unwrap();
        assert_eq!(host.state.derived().ids(), ["1", "2"]);

        assert!(host.run_line("search brook", &mut out).unwrap());
        assert_eq!(host.state.derived().ids(), ["2"]);
        assert!(!host.run_line("quit", &mut out).unwrap());
    }

    #[test]
    fn queued_events_are_handled_in_arrival_order() {
        let mut host = Host::new(Config::default());
        let mut out = Vec::new();

        host.dispatch_all(
            [Event::SetSearch("a".into()), Event::SetSearch("ab".into())],
            &mut out,
        )
        .unwrap();
        assert_eq!(host.state.filter().search(), "ab");
    }

    #[test]
    fn unknown_dimension_is_reported() {
        let mut host = Host::new(Config::default());
        let mut out = Vec::new();
        host.dispatch(Event::Mount, &mut out).unwrap();

        host.run_line("flag sunroof", &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("! Unknown filter dimension: sunroof"));
    }
}
