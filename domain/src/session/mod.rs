//! Conversation session domain.
//!
//! - [`entities::Message`]: a single message within a conversation
//! - [`history::HistoryBuffer`]: bounded ring of messages owned by one session
//! - [`key::SessionKey`]: internal identifier derived from a caller id
//! - [`stream::StreamEvent`]: events of a streamed model response
//! - [`response::LlmResponse`]: a complete (non-streamed) model response

pub mod entities;
pub mod history;
pub mod key;
pub mod response;
pub mod stream;
