//! # pagechat config
//!
//! Configuration management for the pagechat workspace: engine timing,
//! the DevTools endpoint, and per-vendor overrides.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
