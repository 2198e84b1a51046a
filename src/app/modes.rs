//! Input handling mode.
//!
//! The menu accepts input in one of two modes:
//! - **Idle**: keystrokes and raw bytes are processed
//! - **Held**: a selection action is in flight and all input is discarded
//!
//! The hold is the engine's only mutual exclusion. There is a single thread of
//! control, so a flag is enough: at most one selection can be in flight.

/// Whether the menu is accepting input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoldState {
    /// Accepting input.
    #[default]
    Idle,

    /// A selection action is in flight; input and renders are skipped.
    Held,
}

impl HoldState {
    /// Returns `true` while a selection is in flight.
    #[must_use]
    pub const fn is_held(self) -> bool {
        matches!(self, Self::Held)
    }
}
