use std::sync::Arc;

use teloxide::prelude::*;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use ocalt_core::{
    config::Config,
    model::client::CommandRunner,
    relay::{Relay, RelaySettings},
    Result,
};

use crate::TelegramMessenger;

/// Run the relay against the Telegram Bot API until `shutdown` fires.
pub async fn run_polling(
    cfg: Arc<Config>,
    runner: Arc<dyn CommandRunner>,
    shutdown: CancellationToken,
) -> Result<()> {
    let messenger = Arc::new(TelegramMessenger::from_config(&cfg)?);

    // Basic startup info.
    match messenger.bot().get_me().await {
        Ok(me) => info!(bot = %me.username(), "ocalt relay started"),
        Err(e) => warn!(error = %e, "getMe failed; starting anyway"),
    }
    info!(
        command = %cfg.claude_cli_path.display(),
        timeout_secs = cfg.query_timeout.as_secs(),
        "Raw API relay running. Listening for user {}",
        cfg.authorized_user.0
    );

    let relay = Relay::new(
        RelaySettings::from(cfg.as_ref()),
        messenger.clone(),
        messenger,
        runner,
    );
    relay.run(shutdown).await;

    Ok(())
}
