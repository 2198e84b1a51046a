//! Infrastructure layer for terminal and filesystem interactions.
//!
//! - [`decoder`]: raw terminal bytes to [`InputEvent`](crate::InputEvent)s
//! - [`terminal`]: raw mode, the stdin reader and the raw-mode output adapter
//! - [`paths`]: log and configuration locations

pub mod decoder;
pub mod paths;
pub mod terminal;

pub use decoder::decode;
pub use paths::{expand_tilde, get_data_dir};
pub use terminal::{spawn_input_reader, RawWriter, Terminal};
