//! Frame rendering.
//!
//! A frame is the full redraw of the menu: clear the screen, the visible
//! window of items with scroll indicators, then the caption, the status
//! message and finally the query prompt. The frame is composed into a single
//! string and handed to the output sink in one write.
//!
//! # Layout
//!
//! ```text
//!    ...              <- more above
//!   first visible
//! > cursor item
//!   last visible
//!    ...              <- more below
//!
//! caption
//!
//! status message
//!
//! $ query
//! ```

use crate::domain::{ItemList, Output, Result};
use crate::ui::window::Window;
use std::fmt::Write as _;

/// Terminal reset sequence written at the top of every frame.
pub const CLEAR_SCREEN: &str = "\u{1b}c";

/// Row drawn in place of items hidden above or below the page.
pub const SCROLL_INDICATOR: &str = "   ...";

pub const NO_ITEMS: &str = "There are no items";
pub const NO_MATCHING_ITEMS: &str = "There are no items matching the query";

/// Everything a frame shows, borrowed from the menu.
#[derive(Debug)]
pub struct Frame<'a, S> {
    pub items: &'a ItemList<S>,
    pub window: Window,
    pub query: &'a str,
    pub caption: Option<&'a str>,
    pub message: Option<&'a str>,
    /// Prompt for the query box; `None` when filtering is disabled.
    pub prompt: Option<&'a str>,
}

impl<S> Frame<'_, S> {
    /// Composes the frame text.
    #[must_use]
    pub fn compose(&self) -> String {
        let mut out = String::from(CLEAR_SCREEN);

        if self.window.visible().is_empty() {
            let notice = if self.query.trim().is_empty() {
                NO_ITEMS
            } else {
                NO_MATCHING_ITEMS
            };
            out.push_str(notice);
            out.push('\n');
        }

        if self.window.scroll_up {
            out.push_str(SCROLL_INDICATOR);
            out.push('\n');
        }

        for index in self.window.visible() {
            let Some(item) = self.items.item(index) else {
                break;
            };
            let marker = if index == self.window.cursor { '>' } else { ' ' };
            let _ = writeln!(out, "{marker} {}", item.render());
        }

        if self.window.scroll_down {
            out.push_str(SCROLL_INDICATOR);
            out.push('\n');
        }

        out.push('\n');

        if let Some(caption) = self.caption.filter(|c| !c.is_empty()) {
            out.push_str(caption);
            out.push_str("\n\n");
        }

        if let Some(message) = self.message.filter(|m| !m.is_empty()) {
            out.push_str(message);
            out.push_str("\n\n");
        }

        if let Some(prompt) = self.prompt {
            let _ = write!(out, "{prompt} {}", self.query);
        }

        out
    }

    /// Composes the frame and writes it to `output`.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::Io`](crate::MenuError::Io) if the sink rejects the
    /// write.
    pub fn draw(&self, output: &Output) -> Result<()> {
        output.write(&self.compose())?;
        Ok(())
    }
}
