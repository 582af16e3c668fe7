//! Core data models for Warden
//!
//! The live firewall configuration entities: custom domain rules, blocklist
//! subscriptions and installed applications with their network policy.

pub mod application;
pub mod blocklist;
pub mod domain;
pub mod ids;

pub use application::Application;
pub use blocklist::{BlocklistConfiguration, HostEntry, HostState};
pub use domain::{CustomDomain, DomainValidationError};
pub use ids::DomainId;
