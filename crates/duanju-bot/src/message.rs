//! Chat transport seam
//!
//! The host framework delivers [`InboundMessage`]s and provides a
//! [`ChatSender`] for replies. Delivery, retries and routing stay on the
//! host's side.

use async_trait::async_trait;

/// Text message as handed over by the chat transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub text: String,
    pub is_group_chat: bool,
    pub group_id: String,
    pub sender_id: String,
}

/// Whether the plugin took the message or left it to the next handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Pass,
    Consumed,
}

/// Outbound text primitive of the chat transport
#[async_trait]
pub trait ChatSender: Send + Sync {
    /// Send `text` to `chat_id`, optionally @-mentioning `mention`
    async fn send_text(&self, chat_id: &str, text: &str, mention: Option<&str>) -> Result<(), String>;
}
