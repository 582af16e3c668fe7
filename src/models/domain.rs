//! Custom domain model
//!
//! A user-defined rule that either exempts a domain from blocking
//! (allowlist) or forces it to be blocked. The domain may be a literal
//! hostname or, when `is_regex` is set, a regular expression.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::DomainId;

/// Maximum length of a literal hostname
const MAX_DOMAIN_LEN: usize = 253;

/// A custom allowlist/blocklist domain rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomDomain {
    /// Unique identifier, assigned on creation
    pub id: DomainId,

    /// Hostname or pattern
    pub domain: String,

    #[serde(default)]
    pub description: String,

    /// Whether `domain` is a regular expression
    #[serde(default)]
    pub is_regex: bool,

    /// true = exempt from blocking, false = force-block
    pub is_allowlist: bool,

    #[serde(default = "default_enabled")]
    pub is_enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl CustomDomain {
    /// Create a new enabled literal domain rule
    pub fn new(domain: impl Into<String>, is_allowlist: bool) -> Self {
        Self {
            id: DomainId::new(),
            domain: domain.into(),
            description: String::new(),
            is_regex: false,
            is_allowlist,
            is_enabled: true,
        }
    }

    /// Create a new enabled regex rule
    pub fn regex(pattern: impl Into<String>, is_allowlist: bool) -> Self {
        let mut domain = Self::new(pattern, is_allowlist);
        domain.is_regex = true;
        domain
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Validate the rule
    pub fn validate(&self) -> Result<(), DomainValidationError> {
        let domain = self.domain.trim();
        if domain.is_empty() {
            return Err(DomainValidationError::EmptyDomain);
        }

        if self.is_regex {
            Regex::new(domain)
                .map_err(|e| DomainValidationError::InvalidPattern(e.to_string()))?;
        } else if domain.len() > MAX_DOMAIN_LEN {
            return Err(DomainValidationError::DomainTooLong(domain.len()));
        }

        Ok(())
    }
}

impl fmt::Display for CustomDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let list = if self.is_allowlist { "allow" } else { "block" };
        write!(f, "{} ({})", self.domain, list)
    }
}

/// Validation errors for custom domains
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainValidationError {
    EmptyDomain,
    DomainTooLong(usize),
    InvalidPattern(String),
}

impl fmt::Display for DomainValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDomain => write!(f, "Domain cannot be empty"),
            Self::DomainTooLong(len) => {
                write!(f, "Domain too long ({} chars, max {})", len, MAX_DOMAIN_LEN)
            }
            Self::InvalidPattern(e) => write!(f, "Invalid domain pattern: {}", e),
        }
    }
}

impl std::error::Error for DomainValidationError {}
