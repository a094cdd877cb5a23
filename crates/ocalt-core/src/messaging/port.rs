use std::time::Duration;

use async_trait::async_trait;

use crate::{
    domain::{ChatId, Cursor, Update},
    messaging::types::{ChatAction, MessagingCapabilities},
    Result,
};

/// Inbound side: where updates come from.
#[async_trait]
pub trait UpdateSource: Send + Sync {
    /// Long-poll for updates at or after `cursor`.
    ///
    /// Implementations ask the server to hold the request for up to `wait` and
    /// return an empty batch when nothing arrives in that window.
    async fn get_updates(&self, cursor: Cursor, wait: Duration) -> Result<Vec<Update>>;
}

/// Outbound side: replies and chat actions.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    fn capabilities(&self) -> MessagingCapabilities;

    async fn send_chat_action(&self, chat_id: ChatId, action: ChatAction) -> Result<()>;

    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<()>;
}
