//! Input state machine.
//!
//! Input arrives on two channels, both carried by [`InputEvent`]:
//!
//! - **Keystrokes** ([`InputEvent::Key`]): decoded keys that move the cursor,
//!   edit the query or confirm a selection.
//! - **Raw bytes** ([`InputEvent::Data`]): the undecoded chunk each keystroke
//!   came from. The only thing the menu looks for here is a chunk consisting of
//!   a single ESC byte, which clears the query.
//!
//! A bare ESC and the lead byte of an arrow-key sequence look the same on the
//! wire, so the keystroke handler leaves [`Key::Escape`] alone and the raw-byte
//! handler is the one that acts on it. Either way the query is reset exactly
//! once per ESC press.
//!
//! While a selection is in flight every event is dropped without touching
//! cursor, query or screen.
//!
//! | Key         | Effect                                           |
//! |-------------|--------------------------------------------------|
//! | `Up`        | cursor up one row                                |
//! | `Down`      | cursor down one row                              |
//! | `Left`      | cursor to the first item                         |
//! | `Right`     | cursor to the last item                          |
//! | `Escape`    | nothing (see raw bytes)                          |
//! | `Enter`     | start the cursor item's action                   |
//! | `Backspace` | drop the last query character (filtering only)   |
//! | `Text`      | append to the query (filtering only)             |

use super::state::Menu;

/// Byte that starts every escape sequence, and a bare Escape press.
pub const ESC: u8 = 0x1b;

/// A decoded keystroke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    /// Jumps to the first item.
    Left,
    /// Jumps to the last item.
    Right,
    Escape,
    Enter,
    Backspace,
    /// Printable text typed by the user.
    Text(String),
    /// Any other recognized sequence; carries no text.
    Other,
}

/// An event from the input source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A decoded keystroke.
    Key(Key),
    /// The raw byte chunk read from the terminal.
    Data(Vec<u8>),
}

impl From<Key> for InputEvent {
    fn from(key: Key) -> Self {
        Self::Key(key)
    }
}

impl<S: 'static> Menu<S> {
    /// Processes one input event.
    ///
    /// Renders synchronously for every accepted event except `Enter` on an
    /// item (drawn once the action settles) and `Escape` (drawn by the raw-byte
    /// channel). Does nothing at all while a selection is in flight.
    pub fn handle_event(&mut self, event: &InputEvent) {
        let _span = tracing::debug_span!("handle_event", event = ?event).entered();

        if self.hold.is_held() {
            tracing::trace!("input discarded while selection is in flight");
            return;
        }

        match event {
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Data(bytes) => self.handle_data(bytes),
        }
    }

    fn handle_key(&mut self, key: &Key) {
        self.context.message = None;

        match key {
            Key::Up => self.cursor = self.cursor.saturating_sub(1),
            Key::Down => self.cursor = self.cursor.saturating_add(1),
            Key::Left => self.cursor = 0,
            Key::Right => self.cursor = self.filtered_items().len().saturating_sub(1),
            Key::Escape => return,
            Key::Enter => {
                let items = self.filtered_items();
                if let Some(item) = items.item(self.cursor) {
                    tracing::debug!(cursor = self.cursor, item = %item.render(), "item selected");
                    if let Err(e) = self.context.output.write("\n") {
                        tracing::debug!(error = %e, "failed to echo newline");
                    }
                    self.begin_selection(item.as_ref());
                    return;
                }
                tracing::debug!(cursor = self.cursor, "no item under cursor");
            }
            Key::Backspace => {
                if self.is_filtering() {
                    self.query.pop();
                    tracing::trace!(query = %self.query, "query shortened");
                }
            }
            Key::Text(text) => {
                if self.is_filtering() {
                    self.query.push_str(text);
                    tracing::trace!(query = %self.query, "query extended");
                }
            }
            Key::Other => {}
        }

        self.refresh_no_throw();
    }

    fn handle_data(&mut self, bytes: &[u8]) {
        if bytes == [ESC] {
            tracing::debug!("bare escape, clearing query");
            self.query.clear();
            self.refresh_no_throw();
        }
    }
}
