use async_trait::async_trait;

use crate::{
    domain::{ChatId, MessageRef},
    messaging::types::TextFormat,
    Result,
};

/// Outbound side of a messenger.
///
/// The router only ever replies into the chat a message came from, so this is
/// the whole surface it needs.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    async fn send_text(&self, chat_id: ChatId, text: &str, format: TextFormat)
        -> Result<MessageRef>;
}
