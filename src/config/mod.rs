//! Configuration module for Warden
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - Persistence of the live firewall settings

pub mod paths;
pub mod settings;

pub use paths::WardenPaths;
pub use settings::Settings;
