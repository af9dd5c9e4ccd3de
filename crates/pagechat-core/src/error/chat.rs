//! Turn and readiness errors.

use std::time::Duration;

use thiserror::Error;

use super::SessionError;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("{vendor}: chat page not ready after {waited:?}")]
    ReadinessTimeout { vendor: String, waited: Duration },

    #[error("{vendor}: session is not ready, call initialize first")]
    NotReady { vendor: String },

    #[error("{adapter}: session belongs to vendor '{session}'")]
    VendorMismatch { adapter: String, session: String },

    #[error("{vendor}: submit control '{locator}' did not appear within {waited:?}")]
    SubmitTimeout {
        vendor: String,
        locator: String,
        waited: Duration,
    },

    #[error("{vendor}: answer generation did not finish within {waited:?}")]
    CompletionTimeout { vendor: String, waited: Duration },

    #[error("{vendor}: no answer extracted ({reason})")]
    ExtractionEmpty { vendor: String, reason: String },

    #[error("{vendor}: locator '{locator}' matched nothing, the page markup has likely changed")]
    SelectorStale { vendor: String, locator: String },

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ChatError {
    /// The vendor profile no longer matches the page and needs updating.
    pub fn is_selector_stale(&self) -> bool {
        matches!(self, ChatError::SelectorStale { .. })
    }

    /// The turn failed but the same session can run the next one.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ChatError::ReadinessTimeout { .. }
                | ChatError::SubmitTimeout { .. }
                | ChatError::CompletionTimeout { .. }
                | ChatError::ExtractionEmpty { .. }
        )
    }
}
