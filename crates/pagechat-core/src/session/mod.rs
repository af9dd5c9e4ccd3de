//! The browser-tab contract the engine drives, and the per-tab session state.
//!
//! A [`SessionHandle`] is owned by the caller. The engine only borrows it to
//! look elements up, click, paste and read markup; it never opens or closes
//! the tab behind it.

pub mod mock;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::SessionError;

/// How an element is addressed on the page.
///
/// Vendor pages are addressed with whatever syntax fits them best, so both
/// CSS selectors and XPath expressions are kept as written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    Css(String),
    XPath(String),
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn xpath(path: impl Into<String>) -> Self {
        Locator::XPath(path.into())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(selector) => f.write_str(selector),
            Locator::XPath(path) => f.write_str(path),
        }
    }
}

/// Modifier key that triggers a paste on the host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasteModifier {
    Meta,
    Control,
}

impl PasteModifier {
    /// Meta on macOS, Control everywhere else.
    pub fn for_current_platform() -> Self {
        if cfg!(target_os = "macos") {
            PasteModifier::Meta
        } else {
            PasteModifier::Control
        }
    }

    /// Key name as used in key combinations such as `Control+v`.
    pub fn key_name(&self) -> &'static str {
        match self {
            PasteModifier::Meta => "Meta",
            PasteModifier::Control => "Control",
        }
    }
}

/// One live browser tab.
///
/// Lookups return `Ok(None)` or an empty list when nothing matches; `Err`
/// is reserved for real failures (navigation errors, a dead connection)
/// which the engine propagates instead of treating as "not there yet".
#[async_trait]
pub trait SessionHandle: Send + Sync {
    /// Backend-specific element reference.
    type Element: Clone + fmt::Debug + Send + Sync;

    async fn navigate(&self, url: &str) -> Result<(), SessionError>;

    /// First element matching `locator`, waiting up to `timeout` for it.
    async fn find_one(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<Option<Self::Element>, SessionError>;

    /// Every element currently matching `locator`, in document order.
    async fn find_all(&self, locator: &Locator) -> Result<Vec<Self::Element>, SessionError>;

    async fn click(&self, element: &Self::Element) -> Result<(), SessionError>;

    async fn type_text(&self, element: &Self::Element, text: &str) -> Result<(), SessionError>;

    /// Focus `element` and send the platform paste keystroke.
    async fn paste_from_clipboard(&self, element: &Self::Element) -> Result<(), SessionError>;

    async fn outer_markup(&self, element: &Self::Element) -> Result<String, SessionError>;

    async fn clipboard_read(&self) -> Result<String, SessionError>;

    async fn clipboard_write(&self, text: &str) -> Result<(), SessionError>;

    /// Free whatever backs the element references handed out so far.
    /// Those references must not be used afterwards.
    async fn release_elements(&self) -> Result<(), SessionError> {
        Ok(())
    }
}

/// Readiness of the chat page loaded in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Readiness {
    #[default]
    Unknown,
    NotReady,
    Ready,
}

/// A caller-owned tab bound to one vendor.
///
/// Turns take `&mut self`, so a session can never run two turns at once.
pub struct ChatSession<H> {
    handle: H,
    vendor_id: String,
    readiness: Readiness,
}

impl<H: SessionHandle> ChatSession<H> {
    pub fn new(handle: H, vendor_id: impl Into<String>) -> Self {
        Self {
            handle,
            vendor_id: vendor_id.into(),
            readiness: Readiness::Unknown,
        }
    }

    pub fn handle(&self) -> &H {
        &self.handle
    }

    pub fn vendor_id(&self) -> &str {
        &self.vendor_id
    }

    pub fn readiness(&self) -> Readiness {
        self.readiness
    }

    pub fn is_ready(&self) -> bool {
        self.readiness == Readiness::Ready
    }

    pub(crate) fn set_readiness(&mut self, readiness: Readiness) {
        self.readiness = readiness;
    }

    /// Give the handle back to the caller, e.g. to close the tab.
    pub fn into_handle(self) -> H {
        self.handle
    }
}
