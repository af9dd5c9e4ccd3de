//! Session handle errors.

use thiserror::Error;

/// Failure reported by a [`SessionHandle`](crate::session::SessionHandle)
/// backend.
///
/// "Element not found" is never an error: locator queries return `Option`
/// or an empty list for that.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Driver error: {0}")]
    Driver(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Session closed")]
    Closed,
}
