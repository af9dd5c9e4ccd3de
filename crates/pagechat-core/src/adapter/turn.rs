//! One request/response exchange.

use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

/// Where a turn is in the submit, wait, extract cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,
    Submitting,
    Dwelling,
    AwaitingCompletion,
    Extracting,
    Done,
    Failed,
}

impl TurnPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnPhase::Idle => "idle",
            TurnPhase::Submitting => "submitting",
            TurnPhase::Dwelling => "dwelling",
            TurnPhase::AwaitingCompletion => "awaiting-completion",
            TurnPhase::Extracting => "extracting",
            TurnPhase::Done => "done",
            TurnPhase::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TurnPhase::Done | TurnPhase::Failed)
    }
}

/// How the answer of a turn was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    Pending,
    /// Outer markup of the last answer element.
    Markup,
    /// Text copied by the page's "copy response" control.
    Clipboard,
    /// Nothing could be extracted; the turn still succeeds with empty text.
    Empty,
}

/// Record of one exchange, returned by
/// [`ChatAdapter::run_turn`](super::ChatAdapter::run_turn).
#[derive(Debug, Clone)]
pub struct Turn {
    pub id: Uuid,
    pub prompt: String,
    /// Markup (or clipboard text) as read from the page.
    pub raw_markup: String,
    pub clean_text: String,
    pub phase: TurnPhase,
    pub started_at: Instant,
    pub extraction: Extraction,
}

impl Turn {
    pub(crate) fn new(prompt: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            prompt: prompt.into(),
            raw_markup: String::new(),
            clean_text: String::new(),
            phase: TurnPhase::Idle,
            started_at: Instant::now(),
            extraction: Extraction::Pending,
        }
    }

    pub(crate) fn advance(&mut self, phase: TurnPhase) {
        debug!(
            "Turn {} {} -> {} after {:?}",
            self.id,
            self.phase.as_str(),
            phase.as_str(),
            self.started_at.elapsed()
        );
        self.phase = phase;
    }
}
