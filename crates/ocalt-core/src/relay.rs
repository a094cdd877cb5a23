//! The relay loop: long-poll, filter, run, reply. Strictly one update at a time.

use std::{sync::Arc, time::Duration};

use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::{
    config::Config,
    domain::{AcceptedMessage, Cursor, Update, UserId},
    errors::Error,
    formatting::preview,
    messaging::{
        port::{MessagingPort, UpdateSource},
        types::ChatAction,
    },
    model::client::CommandRunner,
    reply::Reply,
    security::accept,
    utils::utc_timestamp,
    Result,
};

/// Characters of incoming text echoed to the console.
const LOG_PREVIEW_CHARS: usize = 100;

#[derive(Clone, Copy, Debug)]
pub struct RelaySettings {
    pub authorized_user: UserId,
    /// Long-poll window requested from the server.
    pub poll_timeout: Duration,
    /// Hard budget for a whole `getUpdates` call (window + network slack).
    pub poll_budget: Duration,
    /// Fixed sleep after a failed fetch.
    pub retry_delay: Duration,
    pub message_limit: usize,
}

impl From<&Config> for RelaySettings {
    fn from(cfg: &Config) -> Self {
        Self {
            authorized_user: cfg.authorized_user,
            poll_timeout: cfg.poll_timeout,
            poll_budget: cfg.poll_budget(),
            retry_delay: cfg.poll_retry_delay,
            message_limit: cfg.telegram_message_limit,
        }
    }
}

/// Result of one Polling step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollOutcome {
    /// The fetch failed; the cursor was left alone and the retry delay already elapsed.
    Backoff,
    Batch { received: usize, handled: usize },
}

pub struct Relay {
    settings: RelaySettings,
    source: Arc<dyn UpdateSource>,
    messenger: Arc<dyn MessagingPort>,
    runner: Arc<dyn CommandRunner>,
}

impl Relay {
    pub fn new(
        settings: RelaySettings,
        source: Arc<dyn UpdateSource>,
        messenger: Arc<dyn MessagingPort>,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            settings,
            source,
            messenger,
            runner,
        }
    }

    /// Poll and handle until `shutdown` fires. The cursor starts at 0 and lives only here.
    pub async fn run(&self, shutdown: CancellationToken) {
        let mut cursor = Cursor::default();
        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    info!("relay stopped");
                    return;
                }
                _ = self.poll_once(&mut cursor) => {}
            }
        }
    }

    /// One Polling step followed by Handling of every accepted message in the batch.
    pub async fn poll_once(&self, cursor: &mut Cursor) -> PollOutcome {
        let mut batch = match self.fetch(*cursor).await {
            Ok(batch) => batch,
            Err(e) => {
                if e.is_transient() {
                    warn!(error = %e, offset = cursor.offset(), "Poll error");
                } else {
                    error!(error = %e, offset = cursor.offset(), "Poll error");
                }
                sleep(self.settings.retry_delay).await;
                return PollOutcome::Backoff;
            }
        };

        // Advance before handling: a crash mid-batch must not refetch these updates.
        cursor.advance_past(&batch);
        batch.sort_by_key(|u| u.update_id);

        let received = batch.len();
        let mut handled = 0;
        for update in batch {
            let Some(msg) = update
                .message
                .as_ref()
                .and_then(|m| accept(m, self.settings.authorized_user))
            else {
                continue;
            };
            self.handle(msg).await;
            handled += 1;
        }

        PollOutcome::Batch { received, handled }
    }

    async fn fetch(&self, cursor: Cursor) -> Result<Vec<Update>> {
        let call = self.source.get_updates(cursor, self.settings.poll_timeout);
        match timeout(self.settings.poll_budget, call).await {
            Ok(res) => res,
            Err(_) => Err(Error::Timeout(self.settings.poll_budget)),
        }
    }

    /// Typing indicator, command, reply. Every step's failure is contained here.
    pub async fn handle(&self, msg: AcceptedMessage) {
        info!(
            received_at = %utc_timestamp(),
            chat_id = msg.chat_id.0,
            "Received: {}",
            preview(&msg.text, LOG_PREVIEW_CHARS)
        );

        let caps = self.messenger.capabilities();
        if caps.supports_chat_actions {
            let _ = self
                .messenger
                .send_chat_action(msg.chat_id, ChatAction::Typing)
                .await;
        }

        let reply = Reply::from_run(self.runner.run(&msg.text).await);
        match &reply {
            Reply::TimedOut(budget) => warn!(budget_secs = budget.as_secs(), "Command timed out"),
            Reply::Failed(reason) => warn!(error = %reason, "Command failed"),
            Reply::Output(_) | Reply::Empty => {}
        }

        let limit = self.settings.message_limit.min(caps.max_message_len);
        let text = reply.render_within(limit);
        let chars = text.chars().count();
        match self.messenger.send_text(msg.chat_id, &text).await {
            Ok(()) => info!(chars, "Replied ({chars} chars)"),
            Err(e) => warn!(error = %e, chat_id = msg.chat_id.0, "Send error"),
        }
    }
}
