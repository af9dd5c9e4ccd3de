//! [`SessionHandle`] backed by a Chrome tab.

use std::time::Duration;

use async_trait::async_trait;
use pagechat_core::{Locator, PasteModifier, SessionError, SessionHandle};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::client::CdpClient;
use crate::clipboard::SystemClipboard;
use crate::error::CdpError;
use crate::session::PageSession;

const FIND_INTERVAL: Duration = Duration::from_millis(100);

/// Remote handle to a DOM element of the tab.
///
/// Handles stay valid until the next navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CdpElement {
    object_id: String,
}

impl CdpElement {
    pub fn object_id(&self) -> &str {
        &self.object_id
    }
}

/// One tab of a running Chrome.
pub struct CdpTab {
    client: CdpClient,
    page: PageSession,
    clipboard: SystemClipboard,
    paste_modifier: PasteModifier,
}

impl CdpTab {
    /// Attach to the first regular tab of the Chrome listening on
    /// `endpoint`, or open a new tab when there is none.
    pub async fn connect(endpoint: &str) -> Result<Self, CdpError> {
        let client = CdpClient::connect(endpoint).await?;
        debug!("Browser socket: {}", client.browser_ws_url());

        let existing = client
            .list_pages()
            .await?
            .into_iter()
            .find(|p| p.is_user_tab());
        let page = match existing {
            Some(info) => {
                info!("Attaching to tab {} ({})", info.id, info.url);
                client.attach_page(&info.id).await?
            }
            None => {
                info!("No open tab found, opening a new one");
                client.new_page().await?
            }
        };

        debug!(
            target_id = page.target_id(),
            session_id = page.session_id(),
            "Page session attached"
        );

        let clipboard = SystemClipboard::new().await?;

        Ok(Self {
            client,
            page,
            clipboard,
            paste_modifier: PasteModifier::for_current_platform(),
        })
    }

    pub fn with_paste_modifier(mut self, modifier: PasteModifier) -> Self {
        self.paste_modifier = modifier;
        self
    }

    pub fn page(&self) -> &PageSession {
        &self.page
    }

    pub fn client(&self) -> &CdpClient {
        &self.client
    }

    /// Current matches of `locator`. While a navigation has no usable
    /// JavaScript context yet this is an empty list, not an error.
    async fn query(&self, locator: &Locator) -> Result<Vec<CdpElement>, CdpError> {
        let ids = match self.page.query_all(locator).await {
            Ok(ids) => ids,
            Err(e) if e.is_context_lost() => {
                debug!("Page is navigating, '{}' counts as absent: {}", locator, e);
                Vec::new()
            }
            Err(e) => return Err(e),
        };
        Ok(ids
            .into_iter()
            .map(|object_id| CdpElement { object_id })
            .collect())
    }
}

#[async_trait]
impl SessionHandle for CdpTab {
    type Element = CdpElement;

    async fn navigate(&self, url: &str) -> Result<(), SessionError> {
        self.release_elements().await?;
        self.page.navigate(url).await?;

        let origin = url::Url::parse(url)
            .map_err(CdpError::from)?
            .origin()
            .ascii_serialization();
        if let Err(e) = self.client.grant_clipboard_access(&origin).await {
            debug!("Clipboard permission not granted for {}: {}", origin, e);
        }
        Ok(())
    }

    async fn find_one(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<Option<CdpElement>, SessionError> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(element) = self.query(locator).await?.into_iter().next() {
                return Ok(Some(element));
            }
            if Instant::now() >= deadline {
                return Ok(None);
            }
            tokio::time::sleep(FIND_INTERVAL).await;
        }
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<CdpElement>, SessionError> {
        Ok(self.query(locator).await?)
    }

    async fn click(&self, element: &CdpElement) -> Result<(), SessionError> {
        self.page.click_element(&element.object_id).await?;
        Ok(())
    }

    async fn type_text(&self, element: &CdpElement, text: &str) -> Result<(), SessionError> {
        self.page.focus_element(&element.object_id).await?;
        self.page.type_text(text).await?;
        Ok(())
    }

    async fn paste_from_clipboard(&self, element: &CdpElement) -> Result<(), SessionError> {
        self.page.click_element(&element.object_id).await?;
        let combo = format!("{}+v", self.paste_modifier.key_name());
        self.page.press_key_combo(&combo).await?;
        Ok(())
    }

    async fn outer_markup(&self, element: &CdpElement) -> Result<String, SessionError> {
        Ok(self.page.outer_html(&element.object_id).await?)
    }

    async fn clipboard_read(&self) -> Result<String, SessionError> {
        Ok(self.clipboard.read_text().await?)
    }

    async fn clipboard_write(&self, text: &str) -> Result<(), SessionError> {
        Ok(self.clipboard.write_text(text).await?)
    }

    async fn release_elements(&self) -> Result<(), SessionError> {
        match self.page.release_elements().await {
            Err(e) if !e.is_context_lost() => Err(e.into()),
            _ => Ok(()),
        }
    }
}
