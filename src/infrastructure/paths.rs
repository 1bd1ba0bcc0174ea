//! Path utilities: where trace files live and how `~` expands.
//!
//! Both functions come in two forms: one reading the process environment, and
//! a `*_with` variant taking the environment lookup explicitly so the rules
//! can be tested without touching global state.

use std::path::PathBuf;

/// Directory name used under the platform data directory.
pub const APP_DIR_NAME: &str = "catalog-browser";

/// Returns the data directory for trace output.
///
/// Resolution order:
/// 1. `CATALOG_BROWSER_DATA_DIR`
/// 2. `$XDG_DATA_HOME/catalog-browser`
/// 3. `$HOME/.local/share/catalog-browser`
/// 4. `.catalog-browser` in the working directory
#[must_use]
pub fn get_data_dir() -> PathBuf {
    data_dir_with(|key| std::env::var(key).ok())
}

/// [`get_data_dir`] with an explicit environment lookup.
///
/// # Examples
///
/// ```
/// use catalog_browser::infrastructure::data_dir_with;
/// use std::path::PathBuf;
///
/// let dir = data_dir_with(|key| (key == "HOME").then(|| "/home/ana".to_string()));
/// assert_eq!(dir, PathBuf::from("/home/ana/.local/share/catalog-browser"));
/// ```
#[must_use]
pub fn data_dir_with(lookup: impl Fn(&str) -> Option<String>) -> PathBuf {
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(dir) = non_empty("CATALOG_BROWSER_DATA_DIR") {
        return PathBuf::from(dir);
    }
    if let Some(xdg) = non_empty("XDG_DATA_HOME") {
        return PathBuf::from(xdg).join(APP_DIR_NAME);
    }
    if let Some(home) = non_empty("HOME") {
        return PathBuf::from(home).join(".local").join("share").join(APP_DIR_NAME);
    }
    PathBuf::from(format!(".{APP_DIR_NAME}"))
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading `~`, or any path when `HOME` is unset, are returned
/// unchanged.
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    expand_tilde_with(path, std::env::var("HOME").ok().as_deref())
}

/// [`expand_tilde`] with an explicit home directory.
///
/// # Examples
///
/// ```
/// use catalog_browser::infrastructure::expand_tilde_with;
/// use std::path::PathBuf;
///
/// assert_eq!(expand_tilde_with("~/data/cars.json", Some("/home/ana")), PathBuf::from("/home/ana/data/cars.json"));
/// assert_eq!(expand_tilde_with("~", Some("/home/ana")), PathBuf::from("/home/ana"));
/// assert_eq!(expand_tilde_with("/srv/cars.json", Some("/home/ana")), PathBuf::from("/srv/cars.json"));
/// assert_eq!(expand_tilde_with("~/cars.json", None), PathBuf::from("~/cars.json"));
/// ```
#[must_use]
pub fn expand_tilde_with(path: &str, home: Option<&str>) -> PathBuf {
    match (home, path.strip_prefix('~')) {
        (Some(home), Some("")) => PathBuf::from(home),
        (Some(home), Some(rest)) if rest.starts_with('/') => PathBuf::from(home).join(&rest[1..]),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_override_wins() {
        let dir = data_dir_with(|key| match key {
            "CATALOG_BROWSER_DATA_DIR" => Some("/tmp/traces".into()),
            "HOME" => Some("/home/ana".into()),
            _ => None,
        });
        assert_eq!(dir, PathBuf::from("/tmp/traces"));
    }

    #[test]
    fn xdg_before_home() {
        let dir = data_dir_with(|key| match key {
            "XDG_DATA_HOME" => Some("/data".into()),
            "HOME" => Some("/home/ana".into()),
            _ => None,
        });
        assert_eq!(dir, PathBuf::from("/data/catalog-browser"));
    }

    #[test]
    fn falls_back_to_working_directory() {
        assert_eq!(data_dir_with(|_| None), PathBuf::from(".catalog-browser"));
        assert_eq!(data_dir_with(|_| Some("  ".into())), PathBuf::from(".catalog-browser"));
    }

    #[test]
    fn tilde_user_syntax_is_left_alone() {
        assert_eq!(expand_tilde_with("~bob/x", Some("/home/ana")), PathBuf::from("~bob/x"));
    }
}
