//! Error types for the menu engine.
//!
//! This module defines the centralized error type [`MenuError`] and a type alias
//! [`Result`] for convenient error handling throughout the crate. All errors are
//! implemented using the `thiserror` crate for automatic `Error` trait implementation.
//!
//! Failures raised by a selectable item's action are not `MenuError`s. They are
//! carried as [`ItemError`] and end up as the menu's status message instead of
//! propagating.

use thiserror::Error;

/// The main error type for menu engine operations.
///
/// # Examples
///
/// ```
/// use updown_menu::MenuError;
///
/// fn validate_page_size(size: usize) -> Result<usize, MenuError> {
///     if size == 0 {
///         return Err(MenuError::Config("page_size must be positive".to_string()));
///     }
///     Ok(size)
/// }
///
/// assert!(validate_page_size(0).is_err());
/// ```
#[derive(Debug, Error)]
pub enum MenuError {
    /// A memoized value was read before its first invocation.
    #[error("The value is not initialized yet")]
    Uninitialized,

    /// Writing to the output sink or talking to the terminal failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid.
    ///
    /// The string describes the specific configuration problem.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file is not valid TOML or does not match the schema.
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

/// Error raised by a selectable item's action.
///
/// Converted to text with `Display` and shown as the status message.
pub type ItemError = Box<dyn std::error::Error>;

/// A specialized `Result` type for menu operations.
pub type Result<T> = std::result::Result<T, MenuError>;
