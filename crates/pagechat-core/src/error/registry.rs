//! Registry and cleanup-rule errors.

use thiserror::Error;

/// A cleanup rule whose CSS selector does not parse.
#[derive(Debug, Error)]
#[error("Invalid selector '{selector}': {message}")]
pub struct RuleError {
    pub selector: String,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Vendor not found: {0}")]
    NotFound(String),

    #[error("Vendor already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Vendor {vendor} has an invalid cleanup rule: {source}")]
    InvalidRule {
        vendor: String,
        #[source]
        source: RuleError,
    },
}
