//! Telegram adapter (teloxide).
//!
//! Implements the `ocalt-core` update source and messaging port over the Bot API.

use std::time::Duration;

use async_trait::async_trait;

use teloxide::{
    prelude::*,
    types::{AllowedUpdate, UpdateKind},
};

pub mod router;

use ocalt_core::{
    config::Config,
    domain::{Chat, ChatId, Cursor, IncomingMessage, Sender, Update, UserId},
    errors::Error,
    messaging::{
        port::{MessagingPort, UpdateSource},
        types::{ChatAction, MessagingCapabilities, ParseMode},
    },
    Result,
};

/// Hard platform ceiling for one message.
const TELEGRAM_MESSAGE_LIMIT: usize = 4096;

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
    parse_mode: ParseMode,
}

impl TelegramMessenger {
    pub fn new(bot: Bot, parse_mode: ParseMode) -> Self {
        Self { bot, parse_mode }
    }

    /// Bot with an HTTP client whose request timeout covers a full long-poll.
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let client = teloxide::net::default_reqwest_settings()
            .timeout(cfg.poll_budget())
            .build()
            .map_err(|e: reqwest::Error| {
                Error::Config(format!("failed to build telegram http client: {e}"))
            })?;
        let bot = Bot::with_client(cfg.telegram_bot_token.clone(), client);
        Ok(Self::new(bot, cfg.parse_mode))
    }

    pub fn bot(&self) -> Bot {
        self.bot.clone()
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn map_err(e: teloxide::RequestError) -> Error {
        match e {
            teloxide::RequestError::Network(e) => Error::Network(e.to_string()),
            other => Error::Api(other.to_string()),
        }
    }
}

#[allow(deprecated)]
fn tg_parse_mode(mode: ParseMode) -> Option<teloxide::types::ParseMode> {
    match mode {
        ParseMode::Markdown => Some(teloxide::types::ParseMode::Markdown),
        ParseMode::MarkdownV2 => Some(teloxide::types::ParseMode::MarkdownV2),
        ParseMode::Html => Some(teloxide::types::ParseMode::Html),
        ParseMode::Plain => None,
    }
}

/// Reduce a teloxide update to the fields the relay reads.
pub fn to_update(update: teloxide::types::Update) -> Update {
    let message = match update.kind {
        UpdateKind::Message(msg) => Some(IncomingMessage {
            from: msg.from().map(|u| Sender {
                id: UserId(u.id.0 as i64),
            }),
            chat: Chat {
                id: ChatId(msg.chat.id.0),
            },
            text: msg.text().map(str::to_string),
        }),
        _ => None,
    };

    Update {
        update_id: i64::from(update.id),
        message,
    }
}

#[async_trait]
impl UpdateSource for TelegramMessenger {
    async fn get_updates(&self, cursor: Cursor, wait: Duration) -> Result<Vec<Update>> {
        let offset = i32::try_from(cursor.offset())
            .map_err(|_| Error::Api(format!("update offset {} out of range", cursor.offset())))?;
        let wait_secs = u32::try_from(wait.as_secs()).unwrap_or(u32::MAX);

        let updates = self
            .bot
            .get_updates()
            .offset(offset)
            .timeout(wait_secs)
            .allowed_updates(vec![AllowedUpdate::Message])
            .await
            .map_err(Self::map_err)?;

        Ok(updates.into_iter().map(to_update).collect())
    }
}

#[async_trait]
impl MessagingPort for TelegramMessenger {
    fn capabilities(&self) -> MessagingCapabilities {
        MessagingCapabilities {
            supports_chat_actions: true,
            max_message_len: TELEGRAM_MESSAGE_LIMIT,
        }
    }

    async fn send_chat_action(&self, chat_id: ChatId, action: ChatAction) -> Result<()> {
        let tg_action = match action {
            ChatAction::Typing => teloxide::types::ChatAction::Typing,
        };
        self.bot
            .send_chat_action(Self::tg_chat(chat_id), tg_action)
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }

    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<()> {
        let mut req = self
            .bot
            .send_message(Self::tg_chat(chat_id), text.to_string());
        if let Some(mode) = tg_parse_mode(self.parse_mode) {
            req = req.parse_mode(mode);
        }
        req.await.map_err(Self::map_err)?;
        Ok(())
    }
}
