//! Error handling for the formsmith library.
//!
//! This module defines the main error type `Error` used throughout the crate,
//! along with a convenient `Result` type alias. Per-template failures are
//! converted into recorded outcomes at the dispatcher boundary, so only
//! `InvalidArguments` and configuration errors ever abort a run.
//!
//! # Examples
//!
//! ```
//! use formsmith::core::error::{Error, Result};
//!
//! fn might_fail() -> Result<()> {
//!     Err(Error::invalid_arguments("no mode given"))
//! }
//!
//! assert!(might_fail().is_err());
//! ```

use thiserror::Error;

/// Result type for formsmith operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for formsmith operations
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or contradictory command-line invocation
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Requested template is not registered
    #[error("Unknown template: {name}. Available: {}", known.join(", "))]
    UnknownTemplate { name: String, known: Vec<String> },

    /// Failure raised while a template was rendering
    #[error("Template {template} failed: {message}")]
    Generation { template: String, message: String },

    /// Optional asset (logo, font) could not be used
    #[error("Asset missing: {0}")]
    AssetMissing(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// PDF object model error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Create a new invalid arguments error
    pub fn invalid_arguments<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new asset error
    pub fn asset_missing<S: Into<String>>(msg: S) -> Self {
        Self::AssetMissing(msg.into())
    }

    /// Wrap any displayable failure as a generation error for `template`
    pub fn generation<T: Into<String>, S: std::fmt::Display>(template: T, source: S) -> Self {
        Self::Generation {
            template: template.into(),
            message: source.to_string(),
        }
    }
}
