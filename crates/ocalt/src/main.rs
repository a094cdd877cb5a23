use std::{process::ExitCode, sync::Arc};

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use ocalt_claude_cli::ClaudeCliRunner;

use ocalt_core::{
    config::{Config, USAGE},
    model::types::CommandConfig,
};

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = ocalt_core::logging::init("ocalt") {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    let cfg = match Config::load() {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            eprintln!("{e}");
            eprintln!("{USAGE}");
            return ExitCode::from(1);
        }
    };

    let runner = Arc::new(ClaudeCliRunner::new(CommandConfig::from(cfg.as_ref())));

    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("interrupt received, stopping relay");
                shutdown.cancel();
            }
        });
    }

    if let Err(e) = ocalt_telegram::router::run_polling(cfg, runner, shutdown).await {
        error!(error = %e, "relay failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
