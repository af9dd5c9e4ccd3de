//! Scripted session handle for tests.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::Instant;

use crate::error::SessionError;

use super::{Locator, SessionHandle};

/// Element returned by [`MockSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockElement {
    pub locator: Locator,
    pub index: usize,
}

/// Something the engine did to a [`MockSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockEvent {
    Navigate(String),
    Probe(Locator),
    Click(MockElement),
    Type(MockElement, String),
    Paste(MockElement),
    OuterMarkup(MockElement),
    ClipboardRead,
    ClipboardWrite(String),
    ReleaseElements,
}

/// Presence script for one locator.
struct Script {
    /// Number of probes answered with "nothing" before the elements show up.
    hidden_probes: usize,
    probes: usize,
    markup: Vec<String>,
}

#[derive(Default)]
struct State {
    scripts: HashMap<Locator, Script>,
    clipboard_reads: VecDeque<String>,
    events: Vec<(Instant, MockEvent)>,
    navigation_error: Option<String>,
}

/// Session handle that answers from a script and records every call.
///
/// Locators that were never scripted match nothing.
#[derive(Default)]
pub struct MockSession {
    state: Mutex<State>,
}

impl MockSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// `count` elements match `locator` from the first probe on.
    pub fn with_elements(self, locator: Locator, count: usize) -> Self {
        self.with_appearing(locator, 0, count)
    }

    /// `locator` matches nothing for the first `hidden_probes` probes, then
    /// `count` elements.
    pub fn with_appearing(self, locator: Locator, hidden_probes: usize, count: usize) -> Self {
        self.script(locator, hidden_probes, vec![String::new(); count])
    }

    /// One element per entry of `markup`, each returning that outer markup.
    pub fn with_markup(self, locator: Locator, markup: Vec<String>) -> Self {
        self.script(locator, 0, markup)
    }

    /// Successive clipboard reads return these values, then empty strings.
    pub fn with_clipboard_reads<I, S>(self, reads: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state
            .lock()
            .clipboard_reads
            .extend(reads.into_iter().map(Into::into));
        self
    }

    /// Every navigation fails with `message`.
    pub fn with_navigation_error(self, message: impl Into<String>) -> Self {
        self.state.lock().navigation_error = Some(message.into());
        self
    }

    fn script(self, locator: Locator, hidden_probes: usize, markup: Vec<String>) -> Self {
        self.state.lock().scripts.insert(
            locator,
            Script {
                hidden_probes,
                probes: 0,
                markup,
            },
        );
        self
    }

    /// All recorded calls with the (tokio) instant they happened at.
    pub fn events(&self) -> Vec<(Instant, MockEvent)> {
        self.state.lock().events.clone()
    }

    /// How many times `locator` was looked up.
    pub fn probe_count(&self, locator: &Locator) -> usize {
        self.count(|event| matches!(event, MockEvent::Probe(l) if l == locator))
    }

    /// Instants at which `locator` was looked up.
    pub fn probe_times(&self, locator: &Locator) -> Vec<Instant> {
        self.state
            .lock()
            .events
            .iter()
            .filter(|(_, event)| matches!(event, MockEvent::Probe(l) if l == locator))
            .map(|(at, _)| *at)
            .collect()
    }

    /// Instants at which an element found through `locator` was clicked.
    pub fn click_times(&self, locator: &Locator) -> Vec<Instant> {
        self.state
            .lock()
            .events
            .iter()
            .filter(|(_, event)| matches!(event, MockEvent::Click(e) if &e.locator == locator))
            .map(|(at, _)| *at)
            .collect()
    }

    pub fn clipboard_read_count(&self) -> usize {
        self.count(|event| matches!(event, MockEvent::ClipboardRead))
    }

    pub fn clipboard_writes(&self) -> Vec<String> {
        self.state
            .lock()
            .events
            .iter()
            .filter_map(|(_, event)| match event {
                MockEvent::ClipboardWrite(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    fn count(&self, pred: impl Fn(&MockEvent) -> bool) -> usize {
        self.state
            .lock()
            .events
            .iter()
            .filter(|(_, event)| pred(event))
            .count()
    }

    fn record(state: &mut State, event: MockEvent) {
        state.events.push((Instant::now(), event));
    }

    fn lookup(&self, locator: &Locator) -> Vec<MockElement> {
        let mut state = self.state.lock();
        Self::record(&mut state, MockEvent::Probe(locator.clone()));

        let Some(script) = state.scripts.get_mut(locator) else {
            return Vec::new();
        };
        script.probes += 1;
        if script.probes <= script.hidden_probes {
            return Vec::new();
        }
        (0..script.markup.len())
            .map(|index| MockElement {
                locator: locator.clone(),
                index,
            })
            .collect()
    }
}

#[async_trait]
impl SessionHandle for MockSession {
    type Element = MockElement;

    async fn navigate(&self, url: &str) -> Result<(), SessionError> {
        let mut state = self.state.lock();
        Self::record(&mut state, MockEvent::Navigate(url.to_string()));
        match &state.navigation_error {
            Some(message) => Err(SessionError::Navigation(message.clone())),
            None => Ok(()),
        }
    }

    async fn find_one(
        &self,
        locator: &Locator,
        _timeout: Duration,
    ) -> Result<Option<MockElement>, SessionError> {
        Ok(self.lookup(locator).into_iter().next())
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<MockElement>, SessionError> {
        Ok(self.lookup(locator))
    }

    async fn click(&self, element: &MockElement) -> Result<(), SessionError> {
        Self::record(&mut self.state.lock(), MockEvent::Click(element.clone()));
        Ok(())
    }

    async fn type_text(&self, element: &MockElement, text: &str) -> Result<(), SessionError> {
        Self::record(
            &mut self.state.lock(),
            MockEvent::Type(element.clone(), text.to_string()),
        );
        Ok(())
    }

    async fn paste_from_clipboard(&self, element: &MockElement) -> Result<(), SessionError> {
        Self::record(&mut self.state.lock(), MockEvent::Paste(element.clone()));
        Ok(())
    }

    async fn outer_markup(&self, element: &MockElement) -> Result<String, SessionError> {
        let mut state = self.state.lock();
        Self::record(&mut state, MockEvent::OuterMarkup(element.clone()));
        Ok(state
            .scripts
            .get(&element.locator)
            .and_then(|script| script.markup.get(element.index))
            .cloned()
            .unwrap_or_default())
    }

    async fn clipboard_read(&self) -> Result<String, SessionError> {
        let mut state = self.state.lock();
        Self::record(&mut state, MockEvent::ClipboardRead);
        Ok(state.clipboard_reads.pop_front().unwrap_or_default())
    }

    async fn clipboard_write(&self, text: &str) -> Result<(), SessionError> {
        Self::record(
            &mut self.state.lock(),
            MockEvent::ClipboardWrite(text.to_string()),
        );
        Ok(())
    }

    async fn release_elements(&self) -> Result<(), SessionError> {
        Self::record(&mut self.state.lock(), MockEvent::ReleaseElements);
        Ok(())
    }
}
