//! Error types for the pagechat core.

mod chat;
mod registry;
mod session;

pub use chat::*;
pub use registry::*;
pub use session::*;
