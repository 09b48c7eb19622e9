//! Application configuration persistence.
//!
//! This module re-exports the configuration file handling from seedwiz-core.

pub use seedwiz_core::config::{backup_corrupted_config, get_config_path, load_config, save_config};
