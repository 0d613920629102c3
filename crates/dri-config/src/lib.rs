//! Configuration for dri-bot
//!
//! This crate provides:
//! - Config file discovery and loading (TOML)
//! - The immutable run configuration (`DriConfig`) with environment overrides
//! - Comment template rendering

pub mod config_file;
pub mod dri_config;
pub mod error;
pub mod template;

pub use config_file::load_config_file;
pub use dri_config::{CategoryTeam, DriConfig, ProjectBoardConfig};
pub use error::ConfigError;
pub use template::render_template;
