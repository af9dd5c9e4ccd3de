//! Chrome DevTools Protocol backend for pagechat.
//!
//! Drives a tab of a Chrome that the user started, so existing logins and
//! cookies of the chat vendors are reused:
//!
//! ```bash
//! # macOS
//! /Applications/Google\ Chrome.app/Contents/MacOS/Google\ Chrome --remote-debugging-port=9222
//!
//! # Linux
//! google-chrome --remote-debugging-port=9222
//! ```
//!
//! Then:
//!
//! ```rust,ignore
//! let tab = CdpTab::connect("http://127.0.0.1:9222").await?;
//! let mut session = ChatSession::new(tab, "gemini");
//! adapter.initialize(&mut session).await?;
//! ```
//!
//! The browser is never launched or stopped from here.

mod client;
mod clipboard;
mod error;
mod protocol;
mod session;
mod tab;

pub use client::CdpClient;
pub use clipboard::SystemClipboard;
pub use error::CdpError;
pub use protocol::*;
pub use session::PageSession;
pub use tab::{CdpElement, CdpTab};
