//! File-based logging.
//!
//! Events and spans emitted with `tracing` are formatted by
//! `tracing-subscriber`'s `fmt` layer and written to a rotating log file,
//! since the terminal is occupied by the menu.
//!
//! ```text
//! tracing macros → EnvFilter → fmt layer → FileWriter → updown-menu.log
//! ```
//!
//! # Configuration
//!
//! - `trace_level`: `EnvFilter` directives, default `"info"`
//! - `log_file`: log path, default `~/.local/state/updown-menu/updown-menu.log`
//!
//! Files rotate at 10 MB with three backups retained.

mod file_writer;
mod init;

pub use file_writer::FileWriter;
pub use init::{init_tracing, log_file_path, LOG_FILE_NAME};
