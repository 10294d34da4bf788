//! Server-rendered chat UI.
//!
//! # Structure
//!
//! - [`page`]: the full document with the form, chat box and typing indicator
//! - [`chat`]: individual conversation entries

pub mod chat;
pub mod page;

pub use chat::ChatEntry;
pub use page::ChatPage;
