//! Application layer: the menu state machine.
//!
//! This module ties the engine together: cached derivations, input handling,
//! selection settlement and the state they all operate on.
//!
//! # Control flow
//!
//! ```text
//! keystroke ──► handle_event ──► cursor/query updated ──► refresh (draw)
//!                    │
//!                  Enter
//!                    ▼
//!            hold + item action ──► settle ──► generation += 1
//!                                                   │
//!                               caption recomputed ◄┘
//!                                       │
//!                     hold released, query cleared, refresh
//! ```
//!
//! # Modules
//!
//! - [`filter`]: Ready-made fuzzy filter
//! - [`handler`]: Input events and the keystroke state machine
//! - [`memo`]: Memoized derivations
//! - [`modes`]: Hold state
//! - [`selection`]: Selection invocation and the input loop
//! - [`state`]: Menu state, options and rendering entry point

pub mod filter;
pub mod handler;
pub mod memo;
pub mod modes;
pub mod selection;
pub mod state;

pub use filter::fuzzy_filter;
pub use handler::{InputEvent, Key, ESC};
pub use memo::{Computation, Memoized};
pub use modes::HoldState;
pub use state::{CaptionFn, FilterFn, Menu, MenuOptions, DEFAULT_PAGE_SIZE, DEFAULT_PROMPT};
