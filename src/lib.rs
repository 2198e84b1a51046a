//! updown-menu: a keyboard-navigable, filterable selection menu for text
//! terminals.
//!
//! The engine shows a paged list of items, moves a cursor with the arrow
//! keys, optionally narrows the list with a typed query, and runs the
//! selected item's action. Actions may settle immediately or later; while one
//! is in flight the menu is on hold and input is discarded. An action can
//! hand back a replacement [`MenuContext`], which is how menus change their
//! items or caller state over time.

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Demo binary (main.rs)                              │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Input handling                                   │
//! │  - Selection hold and settlement                    │
//! │  - Memoized caption and filter                      │
//! └─────────────────────────────────────────────────────┘
//!         │                                        │
//! ┌───────────────────────┐         ┌───────────────────────────┐
//! │ UI Layer (ui/)        │         │ Infrastructure            │
//! │ - Scroll window       │         │ (infrastructure/)         │
//! │ - Frame composition   │         │ - Key decoding            │
//! └───────────────────────┘         │ - Raw mode, stdin reader  │
//!                                   └───────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain Layer (domain/)                             │
//! │  - Items, context, eventual values, errors          │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional
//! │  - tracing to a rotating log file                   │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Menu state machine, memoization, built-in filter
//! - [`domain`]: Items, context, errors
//! - [`ui`]: Scroll window and frame rendering
//! - [`infrastructure`]: Terminal input decoding, raw mode, paths
//! - [`observability`]: File-based `tracing` setup
//!
//! # Frame layout
//!
//! Every render clears the screen and writes, in order:
//!
//! 1. the visible rows (`"> "` marks the cursor, `"  "` the rest), with
//!    `"   ..."` in place of rows hidden above or below the page;
//! 2. a blank line;
//! 3. the caption and a blank line, when there is one;
//! 4. the status message and a blank line, when there is one;
//! 5. `"<prompt> <query>"`, when a filter is configured.
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use futures::executor::block_on;
//! use futures::stream;
//! use updown_menu::{
//!     CaptureBuffer, InputEvent, Key, Menu, MenuContext, MenuItem, MenuOptions, Output, Selection,
//! };
//!
//! struct Bump;
//!
//! impl MenuItem<u32> for Bump {
//!     fn render(&self) -> String {
//!         "bump".to_string()
//!     }
//!
//!     fn select(&self, context: &MenuContext<u32>) -> Selection<u32> {
//!         Selection::Ready(Ok(Some(context.clone().with_state(context.state + 1))))
//!     }
//! }
//!
//! let screen = CaptureBuffer::new();
//! let items: Vec<Rc<dyn MenuItem<u32>>> = vec![Rc::new(Bump)];
//! let mut menu = Menu::new(Output::new(screen.clone()), items, 0, MenuOptions::default());
//!
//! block_on(menu.listen(stream::iter(vec![InputEvent::Key(Key::Enter)])));
//!
//! assert_eq!(menu.context().state, 1);
//! assert_eq!(screen.last_frame(), "> bump\n\n");
//! ```
//!
//! # Configuration
//!
//! [`Config`] can come from `key=value` pairs or a TOML file:
//!
//! ```toml
//! page_size = 12
//! prompt = ">>"
//! trace_level = "debug"
//! log_file = "~/menu.log"
//! ```

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod ui;

pub use app::{
    fuzzy_filter, CaptionFn, Computation, FilterFn, InputEvent, Key, Memoized, Menu, MenuOptions,
    DEFAULT_PAGE_SIZE, DEFAULT_PROMPT,
};
pub use domain::{
    CaptureBuffer, Derived, ItemError, ItemList, MenuContext, MenuError, MenuItem, Output, Result,
    SelectResult, Selection,
};
pub use ui::Window;

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Menu and logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Rows per page, scroll indicators included. Default: 10
    pub page_size: usize,

    /// Text shown before the query when filtering. Default: `"$"`
    pub prompt: String,

    /// `EnvFilter` directives for the log file, e.g. `debug` or
    /// `updown_menu=trace`. Default: `"info"`
    pub trace_level: Option<String>,

    /// Log file path; `~` is expanded. Default: see
    /// [`observability::log_file_path`].
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            prompt: DEFAULT_PROMPT.to_string(),
            trace_level: None,
            log_file: None,
        }
    }
}

impl Config {
    /// Parses configuration from string key/value pairs.
    ///
    /// Lenient: unknown keys are ignored, and a `page_size` that is not a
    /// positive integer falls back to the default.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use updown_menu::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("page_size".to_string(), "5".to_string());
    /// map.insert("prompt".to_string(), ">".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.page_size, 5);
    /// assert_eq!(config.prompt, ">");
    /// ```
    #[must_use]
    pub fn from_map(config: &BTreeMap<String, String>) -> Self {
        let page_size = config
            .get("page_size")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .filter(|&size| size > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE);

        Self {
            page_size,
            prompt: config
                .get("prompt")
                .cloned()
                .unwrap_or_else(|| DEFAULT_PROMPT.to_string()),
            trace_level: config.get("trace_level").cloned(),
            log_file: config.get("log_file").map(PathBuf::from),
        }
    }

    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::ConfigParse`] for malformed TOML or unknown keys,
    /// and [`MenuError::Config`] for a zero `page_size`.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::Io`] if the file cannot be read, otherwise the
    /// errors of [`Config::from_toml`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loaded configuration file");
        Self::from_toml(&text)
    }

    fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(MenuError::Config("page_size must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn from_map_defaults_when_empty() {
        assert_eq!(Config::from_map(&BTreeMap::new()), Config::default());
    }

    #[test]
    fn from_map_falls_back_on_bad_page_size() {
        assert_eq!(Config::from_map(&map(&[("page_size", "zero")])).page_size, 10);
        assert_eq!(Config::from_map(&map(&[("page_size", "0")])).page_size, 10);
        assert_eq!(Config::from_map(&map(&[("page_size", " 7 ")])).page_size, 7);
    }

    #[test]
    fn from_map_reads_logging_keys() {
        let config = Config::from_map(&map(&[
            ("trace_level", "debug"),
            ("log_file", "/tmp/menu.log"),
            ("unrelated", "x"),
        ]));

        assert_eq!(config.trace_level.as_deref(), Some("debug"));
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/menu.log")));
    }

    #[test]
    fn toml_fills_missing_fields_with_defaults() {
        let config = Config::from_toml("prompt = \">>\"").unwrap();

        assert_eq!(config.prompt, ">>");
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn toml_rejects_zero_page_size() {
        let err = Config::from_toml("page_size = 0").unwrap_err();

        assert!(matches!(err, MenuError::Config(_)));
    }

    #[test]
    fn toml_rejects_unknown_keys() {
        let err = Config::from_toml("colour = \"red\"").unwrap_err();

        assert!(matches!(err, MenuError::ConfigParse(_)));
    }

    #[test]
    fn from_file_reads_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "page_size = 4\ntrace_level = \"trace\"").unwrap();

        let config = Config::from_file(file.path()).unwrap();

        assert_eq!(config.page_size, 4);
        assert_eq!(config.trace_level.as_deref(), Some("trace"));
    }

    #[test]
    fn from_file_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();

        let err = Config::from_file(dir.path().join("absent.toml")).unwrap_err();

        assert!(matches!(err, MenuError::Io(_)));
    }
}
