//! # Pagechat Core
//!
//! Drives browser-only chat pages as if they were chat endpoints.
//!
//! ## Components
//!
//! - [`SessionHandle`] - The browser-tab contract a backend implements
//! - [`VendorProfile`] - Declarative description of one vendor's page
//! - [`ChatAdapter`] - The engine running readiness probing and turns
//! - [`Normalizer`] - Vendor markup to clean text
//! - [`VendorRegistry`] - Vendor id to profile lookup
//!
//! The engine never creates or closes browser tabs: callers open a tab with
//! whatever backend they use, wrap it in a [`ChatSession`], and hand it to
//! [`ChatAdapter::initialize`] and [`ChatAdapter::converse`].

pub mod adapter;
pub mod error;
pub mod normalizer;
pub mod profile;
pub mod registry;
pub mod session;
pub mod vendors;

pub use adapter::{AdapterConfig, ChatAdapter, Extraction, Turn, TurnPhase};
pub use error::{ChatError, RegistryError, RuleError, SessionError};
pub use normalizer::Normalizer;
pub use profile::{CleanupRules, CodeBlockRule, CompletionStrategy, Timeouts, VendorProfile};
pub use registry::VendorRegistry;
pub use session::{ChatSession, Locator, PasteModifier, Readiness, SessionHandle};
pub use vendors::Vendor;
