//! Warden - backup and restore for a per-application firewall configuration
//!
//! This library holds the live configuration stores of the firewall (custom
//! domain rules, blocklist subscriptions, per-application network policy and
//! settings) and the engine that exports them to a single JSON backup and
//! restores them again.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (domains, blocklists, applications)
//! - `storage`: JSON file storage layer
//! - `backup`: Backup export, restore and archive management
//! - `cli`: Command handlers for the `warden` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use warden::config::{paths::WardenPaths, settings::Settings};
//!
//! let paths = WardenPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;

pub use error::WardenError;
