//! Domain layer for the menu engine.
//!
//! This module contains the types the engine and its callers share: the
//! context threaded through selections, the item contract, eventual values and
//! the error taxonomy. Nothing here knows about terminals or key codes.
//!
//! # Organization
//!
//! - [`context`]: Menu context and output sink
//! - [`derived`]: Immediate-or-eventual values
//! - [`error`]: Error types and result aliases
//! - [`item`]: Selectable item trait and item list

pub mod context;
pub mod derived;
pub mod error;
pub mod item;

pub use context::{CaptureBuffer, MenuContext, Output};
pub use derived::Derived;
pub use error::{ItemError, MenuError, Result};
pub use item::{ItemList, MenuItem, SelectResult, Selection};
