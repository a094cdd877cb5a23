use std::{path::PathBuf, time::Duration};

use crate::config::Config;

/// How to launch the command-line assistant.
#[derive(Clone, Debug)]
pub struct CommandConfig {
    pub program: PathBuf,
    /// Arguments placed before the prompt (e.g. `-p`).
    pub leading_args: Vec<String>,
    /// Working directory; `None` inherits the relay's.
    pub cwd: Option<PathBuf>,
    /// Hard wall-clock budget for one run.
    pub timeout: Duration,
}

impl From<&Config> for CommandConfig {
    fn from(cfg: &Config) -> Self {
        Self {
            program: cfg.claude_cli_path.clone(),
            leading_args: cfg.claude_cli_args.clone(),
            cwd: cfg.claude_working_dir.clone(),
            timeout: cfg.query_timeout,
        }
    }
}
