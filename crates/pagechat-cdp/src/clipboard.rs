//! System clipboard access.
//!
//! Chat pages read pasted prompts and write copied answers through the OS
//! clipboard, so this is the real clipboard, not a page-local buffer.

use std::sync::mpsc as std_mpsc;
use std::thread;

use arboard::Clipboard;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::error::CdpError;

enum Request {
    Read(oneshot::Sender<Result<String, CdpError>>),
    Write(String, oneshot::Sender<Result<(), CdpError>>),
}

/// Handle to the system clipboard.
///
/// One thread owns the [`Clipboard`] for the whole lifetime of the handle.
/// On X11 the written text is served by its owner, so dropping the
/// clipboard right after a write would lose the text before the page
/// pastes it.
pub struct SystemClipboard {
    requests: std_mpsc::Sender<Request>,
}

impl SystemClipboard {
    pub async fn new() -> Result<Self, CdpError> {
        let (requests, inbox) = std_mpsc::channel::<Request>();
        let (ready_tx, ready_rx) = oneshot::channel();

        thread::Builder::new()
            .name("pagechat-clipboard".to_string())
            .spawn(move || {
                let mut clipboard = match Clipboard::new() {
                    Ok(clipboard) => {
                        let _ = ready_tx.send(Ok(()));
                        clipboard
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(CdpError::Clipboard(e.to_string())));
                        return;
                    }
                };
                serve(&mut clipboard, inbox);
                debug!("Clipboard thread stopped");
            })
            .map_err(|e| CdpError::Clipboard(e.to_string()))?;

        ready_rx
            .await
            .map_err(|_| CdpError::Clipboard("clipboard thread exited".to_string()))??;

        Ok(Self { requests })
    }

    /// Current text content; empty when the clipboard holds no text.
    pub async fn read_text(&self) -> Result<String, CdpError> {
        let (tx, rx) = oneshot::channel();
        self.send(Request::Read(tx))?;
        rx.await.map_err(|_| closed())?
    }

    pub async fn write_text(&self, text: &str) -> Result<(), CdpError> {
        let (tx, rx) = oneshot::channel();
        self.send(Request::Write(text.to_string(), tx))?;
        rx.await.map_err(|_| closed())?
    }

    fn send(&self, request: Request) -> Result<(), CdpError> {
        self.requests.send(request).map_err(|_| closed())
    }
}

fn serve(clipboard: &mut Clipboard, inbox: std_mpsc::Receiver<Request>) {
    // Ends once every SystemClipboard handle is dropped.
    for request in inbox {
        match request {
            Request::Read(reply) => {
                let _ = reply.send(read(clipboard));
            }
            Request::Write(text, reply) => {
                let result = clipboard
                    .set_text(text)
                    .map_err(|e| CdpError::Clipboard(e.to_string()));
                if let Err(e) = &result {
                    warn!("Clipboard write failed: {}", e);
                }
                let _ = reply.send(result);
            }
        }
    }
}

fn read(clipboard: &mut Clipboard) -> Result<String, CdpError> {
    match clipboard.get_text() {
        Ok(text) => Ok(text),
        Err(arboard::Error::ContentNotAvailable) => Ok(String::new()),
        Err(e) => Err(CdpError::Clipboard(e.to_string())),
    }
}

fn closed() -> CdpError {
    CdpError::Clipboard("clipboard thread exited".to_string())
}
