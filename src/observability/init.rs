//! Tracing initialization and subscriber setup.

use super::file_writer::FileWriter;
use crate::infrastructure::paths::{expand_tilde, get_data_dir};
use crate::Config;
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log file name inside the data directory.
pub const LOG_FILE_NAME: &str = "updown-menu.log";

/// Installs the global subscriber, writing to a rotating log file.
///
/// The filter comes from `config.trace_level` (default `"info"`), in
/// `EnvFilter` directive syntax. The file is `config.log_file` when set,
/// otherwise `updown-menu.log` in [`get_data_dir`].
///
/// Gives up silently if the log directory cannot be created. Only the first
/// call in a process takes effect.
///
/// ```rust
/// use updown_menu::observability::init_tracing;
/// use updown_menu::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     log_file: Some(std::env::temp_dir().join("updown-menu-doc.log")),
///     ..Default::default()
/// };
///
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let level = config
        .trace_level
        .clone()
        .unwrap_or_else(|| "info".to_string());

    let log_file = log_file_path(config);
    if let Some(parent) = log_file.parent() {
        if !parent.as_os_str().is_empty() && std::fs::create_dir_all(parent).is_err() {
            return;
        }
    }

    let file_layer = fmt::layer()
        .with_writer(FileWriter::new(log_file))
        .with_ansi(false)
        .with_target(false);

    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(file_layer);

    let _ = subscriber.try_init();
}

/// Resolves where log output goes for `config`.
#[must_use]
pub fn log_file_path(config: &Config) -> PathBuf {
    config.log_file.as_ref().map_or_else(
        || get_data_dir().join(LOG_FILE_NAME),
        |path| PathBuf::from(expand_tilde(&path.to_string_lossy())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_log_file_wins() {
        let config = Config {
            log_file: Some(PathBuf::from("/tmp/menu/trace.log")),
            ..Config::default()
        };

        assert_eq!(log_file_path(&config), PathBuf::from("/tmp/menu/trace.log"));
    }

    #[test]
    fn default_log_file_lives_in_data_dir() {
        let path = log_file_path(&Config::default());

        assert!(path.ends_with(LOG_FILE_NAME));
        assert!(path.starts_with(get_data_dir()));
    }
}
