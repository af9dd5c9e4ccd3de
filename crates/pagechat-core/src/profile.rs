//! Declarative per-vendor page description.

use std::time::Duration;

use pagechat_config::VendorOverride;

use crate::session::Locator;

/// Signal telling the engine that the assistant finished generating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionStrategy {
    /// The submit control turns disabled again once the page is idle.
    ButtonDisabledAppears(Locator),
    /// The idle control hidden during generation comes back.
    ButtonReappears(Locator),
    /// A vendor-specific marker appears when generation ends.
    MarkerAppears(Locator),
    /// Click the "copy response" control and poll the clipboard until it
    /// holds the answer. The answer is read from the clipboard, not from
    /// the page markup.
    ClipboardPoll {
        copy_button: Locator,
        max_attempts: u32,
        interval: Duration,
        /// Awaited (bounded by the completion timeout) before polling.
        ready: Option<Locator>,
    },
}

impl CompletionStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            CompletionStrategy::ButtonDisabledAppears(_) => "button-disabled-appears",
            CompletionStrategy::ButtonReappears(_) => "button-reappears",
            CompletionStrategy::MarkerAppears(_) => "marker-appears",
            CompletionStrategy::ClipboardPoll { .. } => "clipboard-poll",
        }
    }

    pub fn reads_clipboard(&self) -> bool {
        matches!(self, CompletionStrategy::ClipboardPoll { .. })
    }
}

/// Block code container to fence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlockRule {
    /// CSS selector of the container.
    pub container: String,
    /// Nested element holding the code text. When it matches, only its text
    /// is kept and the surrounding wrapper (toolbars, language labels) goes.
    pub content: Option<String>,
}

impl CodeBlockRule {
    pub fn new(container: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            content: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

/// Markup cleanup rules, all expressed as CSS selectors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupRules {
    pub code_blocks: Vec<CodeBlockRule>,
    pub inline_code: Vec<String>,
    /// Decorative elements emptied before extraction.
    pub strip: Vec<String>,
}

/// Waits and pauses of one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeouts {
    /// Bounded wait for the prompt input.
    pub input: Duration,
    /// Bounded wait for the submit control.
    pub submit: Duration,
    /// Bounded wait for the completion signal.
    pub completion: Duration,
    /// Pause between submitting and the first completion probe.
    pub dwell: Duration,
    /// Pause between finding the submit control and clicking it.
    pub pre_submit_pause: Duration,
    /// Pause between the completion signal and extraction.
    pub post_completion_pause: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            input: Duration::from_secs(10),
            submit: Duration::from_secs(120),
            completion: Duration::from_secs(120),
            dwell: Duration::from_secs(1),
            pre_submit_pause: Duration::ZERO,
            post_completion_pause: Duration::ZERO,
        }
    }
}

/// Everything the engine needs to know about one vendor's chat page.
#[derive(Debug, Clone)]
pub struct VendorProfile {
    pub id: String,
    pub display_name: String,
    pub url: String,
    /// Present once the chat UI is usable (logged in, loaded).
    pub readiness: Locator,
    pub input: Locator,
    pub submit: Locator,
    pub completion: CompletionStrategy,
    /// Answer bubbles; the last match is the newest answer.
    pub answer: Locator,
    pub cleanup: CleanupRules,
    pub timeouts: Timeouts,
}

impl VendorProfile {
    /// Copy of this profile with configured overrides applied.
    pub fn with_override(&self, overrides: &VendorOverride) -> Self {
        let mut profile = self.clone();
        if let Some(url) = &overrides.url {
            profile.url = url.clone();
        }
        if let Some(secs) = overrides.submit_timeout_secs {
            profile.timeouts.submit = Duration::from_secs(secs);
        }
        if let Some(secs) = overrides.completion_timeout_secs {
            profile.timeouts.completion = Duration::from_secs(secs);
        }
        if let Some(ms) = overrides.dwell_ms {
            profile.timeouts.dwell = Duration::from_millis(ms);
        }
        profile
    }
}
