//! Path helpers for log and configuration locations.
//!
//! Locations follow the XDG base directory layout, falling back to the
//! conventional `~/.local/...` directories when the variables are unset.

use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "updown-menu";

/// Returns the directory that holds the log file.
///
/// Resolves to `$XDG_STATE_HOME/updown-menu`, then
/// `$HOME/.local/state/updown-menu`, then `./updown-menu` when neither
/// variable is set.
#[must_use]
pub fn get_data_dir() -> PathBuf {
    env::var_os("XDG_STATE_HOME")
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| home_dir().map(|home| home.join(".local").join("state")))
        .unwrap_or_default()
        .join(APP_DIR)
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading tilde, and any path when `$HOME` is unset, are
/// returned unchanged.
///
/// ```
/// use updown_menu::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("/absolute/path"), "/absolute/path");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    let Some(home) = home_dir() else {
        return path.to_string();
    };
    let home = home.to_string_lossy();

    if let Some(rest) = path.strip_prefix("~/") {
        format!("{home}/{rest}")
    } else if path == "~" {
        home.into_owned()
    } else {
        path.to_string()
    }
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
}
