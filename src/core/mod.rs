//! formsmith core
//!
//! Configuration and error types shared by the drawing layer, the templates
//! and the dispatcher.

pub mod config;
pub mod error;

pub use config::Config;
pub use error::{Error, Result};
