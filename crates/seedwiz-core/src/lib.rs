//! Core domain logic for the seed import wizard.
//!
//! This crate provides:
//! - Core domain types (`types` module)
//! - The validation boundary (`validator` module)
//! - The seed-and-path form controller (`form` module)
//!
//! With the `persistence` feature enabled:
//! - Configuration management (`config` module)

pub mod form;
pub mod types;
pub mod validator;

#[cfg(feature = "persistence")]
pub mod config;

// Re-export commonly used items from core modules
pub use form::*;
pub use types::*;
pub use validator::*;

// Re-export key persistence types when feature is enabled
#[cfg(feature = "persistence")]
pub use config::{AppConfig, ConfigError, ImportedAccount, ThemeConfig};
