//! Menu context and the output sink it carries.
//!
//! The [`MenuContext`] is the bundle threaded through every selection: the
//! output handle, the current items, the transient status message and
//! arbitrary caller state. The engine owns exactly one context at a time and
//! swaps it wholesale when an item's action hands back a replacement.

use crate::domain::item::ItemList;
use std::cell::RefCell;
use std::fmt;
use std::io::{self, Write};
use std::rc::Rc;

/// Shared handle to the text sink the menu draws on.
///
/// Cloning the handle shares the underlying writer, so items that receive the
/// context can print through the same sink the menu renders to.
#[derive(Clone)]
pub struct Output {
    sink: Rc<RefCell<dyn Write>>,
}

impl Output {
    /// Wraps any writer as the menu's output sink.
    pub fn new<W: Write + 'static>(writer: W) -> Self {
        Self {
            sink: Rc::new(RefCell::new(writer)),
        }
    }

    /// Output sink backed by the process's standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Writes `text` verbatim and flushes.
    ///
    /// # Errors
    ///
    /// Returns the writer's I/O error, or an error if the sink is already
    /// borrowed by an outer write.
    pub fn write(&self, text: &str) -> io::Result<()> {
        let mut sink = self
            .sink
            .try_borrow_mut()
            .map_err(|_| io::Error::other("output sink is busy"))?;
        sink.write_all(text.as_bytes())?;
        sink.flush()
    }
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Output").finish_non_exhaustive()
    }
}

/// In-memory writer whose contents can be inspected after the fact.
///
/// Clones share the same buffer, so one clone can be handed to [`Output::new`]
/// while another is kept to read what was drawn.
#[derive(Debug, Clone, Default)]
pub struct CaptureBuffer {
    bytes: Rc<RefCell<Vec<u8>>>,
}

impl CaptureBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, decoded lossily as UTF-8.
    #[must_use]
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.borrow()).into_owned()
    }

    /// Text written after the last clear-screen sequence.
    #[must_use]
    pub fn last_frame(&self) -> String {
        let contents = self.contents();
        contents
            .rsplit_once(crate::ui::renderer::CLEAR_SCREEN)
            .map_or(contents.clone(), |(_, frame)| frame.to_string())
    }

    pub fn clear(&self) {
        self.bytes.borrow_mut().clear();
    }
}

impl Write for CaptureBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// The bundle of output handle, items, status message and caller state.
///
/// Replaced wholesale, never merged, when a selection returns a new context.
/// `S` is arbitrary caller state that items and caption functions may read.
#[derive(Clone)]
pub struct MenuContext<S> {
    /// Sink the menu renders to.
    pub output: Output,
    /// Items in display order, before filtering.
    pub items: ItemList<S>,
    /// Transient status line, cleared on every keystroke.
    pub message: Option<String>,
    /// Caller-owned state.
    pub state: S,
}

impl<S> MenuContext<S> {
    pub fn new(output: Output, items: ItemList<S>, state: S) -> Self {
        Self {
            output,
            items,
            message: None,
            state,
        }
    }

    /// Returns this context with its items replaced.
    #[must_use]
    pub fn with_items(mut self, items: ItemList<S>) -> Self {
        self.items = items;
        self
    }

    /// Returns this context with its caller state replaced.
    #[must_use]
    pub fn with_state(mut self, state: S) -> Self {
        self.state = state;
        self
    }
}

impl<S: fmt::Debug> fmt::Debug for MenuContext<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuContext")
            .field("items", &self.items.len())
            .field("message", &self.message)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
