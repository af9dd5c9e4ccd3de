//! The generic chat engine.
//!
//! A [`ChatAdapter`] is one vendor profile plus engine timing. It drives a
//! caller-owned [`ChatSession`] through readiness probing and then through
//! any number of turns:
//!
//! ```text
//! Idle -> Submitting -> Dwelling -> AwaitingCompletion -> Extracting -> Done
//!                      (any step may end in Failed)
//! ```

mod turn;

pub use turn::{Extraction, Turn, TurnPhase};

use std::sync::Arc;
use std::time::Duration;

use pagechat_config::EngineConfig;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, trace, warn};

use crate::error::{ChatError, RuleError};
use crate::normalizer::Normalizer;
use crate::profile::{CompletionStrategy, VendorProfile};
use crate::session::{ChatSession, Locator, Readiness, SessionHandle};

/// Engine timing shared by every vendor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterConfig {
    /// Pause between two readiness probes.
    pub readiness_interval: Duration,
    /// Wait granted to a single readiness probe.
    pub readiness_probe_timeout: Duration,
    /// Give up on readiness after this long. `None` waits forever.
    pub readiness_deadline: Option<Duration>,
    /// Interval of the bounded element waits.
    pub poll_interval: Duration,
    /// Pause after pasting the prompt.
    pub paste_settle: Duration,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            readiness_interval: Duration::from_secs(5),
            readiness_probe_timeout: Duration::from_secs(5),
            readiness_deadline: None,
            poll_interval: Duration::from_millis(250),
            paste_settle: Duration::from_millis(500),
        }
    }
}

impl From<&EngineConfig> for AdapterConfig {
    fn from(config: &EngineConfig) -> Self {
        Self {
            readiness_interval: config.readiness_interval(),
            readiness_probe_timeout: config.readiness_probe_timeout(),
            readiness_deadline: config.readiness_deadline(),
            poll_interval: config.poll_interval(),
            paste_settle: config.paste_settle(),
        }
    }
}

/// Drives one vendor's chat page.
#[derive(Debug)]
pub struct ChatAdapter {
    profile: Arc<VendorProfile>,
    config: AdapterConfig,
    normalizer: Normalizer,
}

impl ChatAdapter {
    /// Fails when one of the profile's cleanup selectors does not parse.
    pub fn new(profile: Arc<VendorProfile>, config: AdapterConfig) -> Result<Self, RuleError> {
        let normalizer = Normalizer::new(&profile.cleanup)?;
        Ok(Self {
            profile,
            config,
            normalizer,
        })
    }

    pub fn profile(&self) -> &VendorProfile {
        &self.profile
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    pub fn vendor_id(&self) -> &str {
        &self.profile.id
    }

    /// Open the vendor page and block until its readiness marker shows up.
    ///
    /// Without a readiness deadline this waits as long as it takes, so a
    /// human can log in or solve a captcha in the tab.
    pub async fn initialize<H: SessionHandle>(
        &self,
        session: &mut ChatSession<H>,
    ) -> Result<(), ChatError> {
        self.check_vendor(session)?;
        let profile = &self.profile;
        info!("Opening {} at {}", profile.display_name, profile.url);
        session.set_readiness(Readiness::NotReady);
        session.handle().navigate(&profile.url).await?;

        let started = Instant::now();
        loop {
            let marker = session
                .handle()
                .find_one(&profile.readiness, self.config.readiness_probe_timeout)
                .await?;
            if marker.is_some() {
                session.set_readiness(Readiness::Ready);
                info!(
                    vendor = %profile.id,
                    waited = ?started.elapsed(),
                    "Chat page ready"
                );
                return Ok(());
            }

            let waited = started.elapsed();
            if let Some(deadline) = self.config.readiness_deadline {
                if waited >= deadline {
                    return Err(ChatError::ReadinessTimeout {
                        vendor: profile.id.clone(),
                        waited,
                    });
                }
            }

            info!(
                "{} not ready yet, log in or solve the captcha if asked ({:?} elapsed)",
                profile.display_name, waited
            );
            sleep(self.config.readiness_interval).await;
        }
    }

    /// Send `prompt` and return the cleaned answer.
    pub async fn converse<H: SessionHandle>(
        &self,
        session: &mut ChatSession<H>,
        prompt: &str,
    ) -> Result<String, ChatError> {
        Ok(self.run_turn(session, prompt).await?.clean_text)
    }

    /// Send `prompt` and return the whole turn record.
    ///
    /// A failed turn leaves the session usable for the next one.
    pub async fn run_turn<H: SessionHandle>(
        &self,
        session: &mut ChatSession<H>,
        prompt: &str,
    ) -> Result<Turn, ChatError> {
        self.check_vendor(session)?;
        if !session.is_ready() {
            return Err(ChatError::NotReady {
                vendor: self.profile.id.clone(),
            });
        }

        // Handles from the previous turn or from readiness probing are stale.
        session.handle().release_elements().await?;

        let mut turn = Turn::new(prompt);
        match self.drive(session.handle(), &mut turn).await {
            Ok(()) => {
                turn.advance(TurnPhase::Done);
                Ok(turn)
            }
            Err(err) => {
                warn!(
                    vendor = %self.profile.id,
                    turn = %turn.id,
                    phase = turn.phase.as_str(),
                    "Turn failed: {}",
                    err
                );
                turn.advance(TurnPhase::Failed);
                Err(err)
            }
        }
    }

    fn check_vendor<H: SessionHandle>(&self, session: &ChatSession<H>) -> Result<(), ChatError> {
        if session.vendor_id() != self.profile.id {
            return Err(ChatError::VendorMismatch {
                adapter: self.profile.id.clone(),
                session: session.vendor_id().to_string(),
            });
        }
        Ok(())
    }

    async fn drive<H: SessionHandle>(&self, handle: &H, turn: &mut Turn) -> Result<(), ChatError> {
        let timeouts = &self.profile.timeouts;

        turn.advance(TurnPhase::Submitting);
        self.submit(handle, &turn.prompt).await?;

        // A completion signal checked right after the click can still
        // describe the previous turn.
        turn.advance(TurnPhase::Dwelling);
        sleep(timeouts.dwell).await;

        turn.advance(TurnPhase::AwaitingCompletion);
        let copied = self.await_completion(handle).await?;
        if !timeouts.post_completion_pause.is_zero() {
            sleep(timeouts.post_completion_pause).await;
        }

        turn.advance(TurnPhase::Extracting);
        match self.extract(handle, copied).await {
            Ok((raw, extraction)) => {
                turn.clean_text = self.normalizer.clean(&raw, &self.profile.completion);
                turn.raw_markup = raw;
                turn.extraction = extraction;
            }
            Err(err @ ChatError::ExtractionEmpty { .. }) => {
                warn!("{}", err);
                turn.extraction = Extraction::Empty;
            }
            Err(err) => return Err(err),
        }
        Ok(())
    }

    async fn submit<H: SessionHandle>(&self, handle: &H, prompt: &str) -> Result<(), ChatError> {
        let profile = &self.profile;
        let timeouts = &profile.timeouts;

        let input = self
            .wait_for(handle, &profile.input, timeouts.input)
            .await?
            .ok_or_else(|| ChatError::SelectorStale {
                vendor: profile.id.clone(),
                locator: profile.input.to_string(),
            })?;

        handle.clipboard_write(prompt).await?;
        handle.paste_from_clipboard(&input).await?;
        debug!("Pasted {} chars into {}", prompt.chars().count(), profile.input);
        sleep(self.config.paste_settle).await;

        let mut button = self
            .wait_for(handle, &profile.submit, timeouts.submit)
            .await?
            .ok_or_else(|| ChatError::SubmitTimeout {
                vendor: profile.id.clone(),
                locator: profile.submit.to_string(),
                waited: timeouts.submit,
            })?;

        if !timeouts.pre_submit_pause.is_zero() {
            sleep(timeouts.pre_submit_pause).await;
            // The control is often re-rendered once the prompt is in.
            if let Some(fresh) = handle.find_all(&profile.submit).await?.pop() {
                button = fresh;
            }
        }

        handle.click(&button).await?;
        Ok(())
    }

    /// Returns the copied answer for clipboard strategies, `None` otherwise.
    async fn await_completion<H: SessionHandle>(
        &self,
        handle: &H,
    ) -> Result<Option<String>, ChatError> {
        let limit = self.profile.timeouts.completion;
        let timed_out = || ChatError::CompletionTimeout {
            vendor: self.profile.id.clone(),
            waited: limit,
        };

        match &self.profile.completion {
            CompletionStrategy::ButtonDisabledAppears(locator)
            | CompletionStrategy::ButtonReappears(locator)
            | CompletionStrategy::MarkerAppears(locator) => {
                self.wait_for(handle, locator, limit)
                    .await?
                    .ok_or_else(timed_out)?;
                Ok(None)
            }
            CompletionStrategy::ClipboardPoll {
                copy_button,
                max_attempts,
                interval,
                ready,
            } => {
                if let Some(ready) = ready {
                    self.wait_for(handle, ready, limit)
                        .await?
                        .ok_or_else(timed_out)?;
                }
                let copied = self
                    .poll_clipboard(handle, copy_button, *max_attempts, *interval)
                    .await?;
                Ok(Some(copied))
            }
        }
    }

    /// Click "copy" and read the clipboard until it holds something.
    /// Running out of attempts yields an empty string.
    async fn poll_clipboard<H: SessionHandle>(
        &self,
        handle: &H,
        copy_button: &Locator,
        max_attempts: u32,
        interval: Duration,
    ) -> Result<String, ChatError> {
        // Still holds the pasted prompt otherwise.
        handle.clipboard_write("").await?;

        for attempt in 1..=max_attempts {
            sleep(interval).await;
            if let Some(button) = handle.find_all(copy_button).await?.pop() {
                handle.click(&button).await?;
            }
            let text = handle.clipboard_read().await?;
            if !text.trim().is_empty() {
                debug!("Answer copied on attempt {}/{}", attempt, max_attempts);
                return Ok(text);
            }
            trace!("Clipboard still empty on attempt {}/{}", attempt, max_attempts);
        }
        Ok(String::new())
    }

    async fn extract<H: SessionHandle>(
        &self,
        handle: &H,
        copied: Option<String>,
    ) -> Result<(String, Extraction), ChatError> {
        let profile = &self.profile;

        if let Some(text) = copied {
            if text.trim().is_empty() {
                return Err(ChatError::ExtractionEmpty {
                    vendor: profile.id.clone(),
                    reason: "clipboard stayed empty".to_string(),
                });
            }
            return Ok((text, Extraction::Clipboard));
        }

        let Some(answer) = handle.find_all(&profile.answer).await?.pop() else {
            return Err(ChatError::ExtractionEmpty {
                vendor: profile.id.clone(),
                reason: format!("nothing matches '{}'", profile.answer),
            });
        };
        let markup = handle.outer_markup(&answer).await?;
        Ok((markup, Extraction::Markup))
    }

    /// Poll until `locator` matches, returning its last match, or `None`
    /// once `limit` has passed.
    async fn wait_for<H: SessionHandle>(
        &self,
        handle: &H,
        locator: &Locator,
        limit: Duration,
    ) -> Result<Option<H::Element>, ChatError> {
        let started = Instant::now();
        loop {
            if let Some(found) = handle.find_all(locator).await?.pop() {
                return Ok(Some(found));
            }
            let elapsed = started.elapsed();
            if elapsed >= limit {
                debug!("'{}' still absent after {:?}", locator, elapsed);
                return Ok(None);
            }
            sleep(self.config.poll_interval.min(limit - elapsed)).await;
        }
    }
}

#[cfg(test)]
#[path = "adapter_tests.rs"]
mod tests;
