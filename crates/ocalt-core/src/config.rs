use std::{
    env,
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{domain::UserId, errors::Error, messaging::types::ParseMode, Result};

/// Printed to stderr when required configuration is missing.
pub const USAGE: &str = "Set TELEGRAM_BOT_TOKEN and TELEGRAM_USER_ID";

/// Typed configuration for the relay.
#[derive(Clone, Debug)]
pub struct Config {
    // Core
    pub telegram_bot_token: String,
    pub authorized_user: UserId,

    // Command
    pub claude_cli_path: PathBuf,
    pub claude_cli_args: Vec<String>,
    pub claude_working_dir: Option<PathBuf>,
    pub query_timeout: Duration,

    // Polling
    pub poll_timeout: Duration,
    pub poll_slack: Duration,
    pub poll_retry_delay: Duration,

    // Telegram limits
    pub telegram_message_limit: usize,
    pub parse_mode: ParseMode,
}

impl Config {
    /// Load from the process environment, seeded by `./.env` when present.
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        inject_extra_paths();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (process env in production, a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        // Required env vars
        let telegram_bot_token = lookup("TELEGRAM_BOT_TOKEN")
            .and_then(non_empty)
            .ok_or_else(|| {
                Error::Config("TELEGRAM_BOT_TOKEN environment variable is required".to_string())
            })?;
        let raw_user = lookup("TELEGRAM_USER_ID")
            .and_then(non_empty)
            .ok_or_else(|| {
                Error::Config("TELEGRAM_USER_ID environment variable is required".to_string())
            })?;
        let authorized_user = raw_user.trim().parse::<i64>().map(UserId).map_err(|_| {
            Error::Config(format!("TELEGRAM_USER_ID must be a numeric id, got {raw_user:?}"))
        })?;

        // Command
        let claude_cli_path = lookup("CLAUDE_CLI_PATH")
            .and_then(non_empty)
            .map(PathBuf::from)
            .or_else(|| lookup("PATH").and_then(|p| which_in(&p, "claude")))
            .unwrap_or_else(|| PathBuf::from("claude"));
        let claude_cli_args = lookup("CLAUDE_CLI_ARGS")
            .map(|s| s.split_whitespace().map(str::to_string).collect())
            .unwrap_or_else(|| vec!["-p".to_string()]);
        let claude_working_dir = lookup("CLAUDE_WORKING_DIR")
            .and_then(non_empty)
            .map(PathBuf::from);
        let query_timeout =
            Duration::from_millis(parse_u64(&lookup, "QUERY_TIMEOUT_MS")?.unwrap_or(120_000));

        // Polling
        let poll_timeout =
            Duration::from_secs(parse_u64(&lookup, "POLL_TIMEOUT_SECS")?.unwrap_or(30));
        let poll_slack = Duration::from_secs(parse_u64(&lookup, "POLL_SLACK_SECS")?.unwrap_or(5));
        let poll_retry_delay =
            Duration::from_millis(parse_u64(&lookup, "POLL_RETRY_DELAY_MS")?.unwrap_or(5_000));

        // Telegram limits
        let telegram_message_limit = match parse_u64(&lookup, "TELEGRAM_MESSAGE_LIMIT")? {
            Some(0) => {
                return Err(Error::Config(
                    "TELEGRAM_MESSAGE_LIMIT must be at least 1".to_string(),
                ))
            }
            Some(v) => usize::try_from(v).unwrap_or(usize::MAX),
            None => 4096,
        };
        let parse_mode = match lookup("TELEGRAM_PARSE_MODE").and_then(non_empty) {
            Some(raw) => raw.parse::<ParseMode>()?,
            None => ParseMode::Markdown,
        };

        Ok(Self {
            telegram_bot_token,
            authorized_user,
            claude_cli_path,
            claude_cli_args,
            claude_working_dir,
            query_timeout,
            poll_timeout,
            poll_slack,
            poll_retry_delay,
            telegram_message_limit,
            parse_mode,
        })
    }

    /// Total wall-clock budget for one `getUpdates` call.
    pub fn poll_budget(&self) -> Duration {
        self.poll_timeout.saturating_add(self.poll_slack)
    }
}

fn inject_extra_paths() {
    let Some(home) = env::var_os("HOME").map(PathBuf::from) else {
        return;
    };

    let extras = [
        home.join(".local/bin"),
        home.join(".claude/local"),
        PathBuf::from("/opt/homebrew/bin"),
        PathBuf::from("/usr/local/bin"),
    ];

    let current = env::var_os("PATH").unwrap_or_else(|| OsString::from(""));
    let mut parts: Vec<PathBuf> = env::split_paths(&current).collect();

    for extra in extras.into_iter().rev() {
        if !parts.iter().any(|p| p == &extra) {
            parts.insert(0, extra);
        }
    }

    let joined = env::join_paths(parts).unwrap_or(current);
    env::set_var("PATH", joined);
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for (key, val) in parse_dotenv(&contents) {
        if env::var_os(&key).is_some() {
            continue; // do not override existing env
        }
        env::set_var(key, val);
    }
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }

        let mut val = v.trim();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = &val[1..val.len() - 1];
        }

        out.push((key.to_string(), val.to_string()));
    }
    out
}

fn parse_u64(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<u64>> {
    let Some(raw) = lookup(key).and_then(non_empty) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<u64>()
        .map(Some)
        .map_err(|_| Error::Config(format!("{key} must be a non-negative integer, got {raw:?}")))
}

fn which_in(path_var: &str, binary: &str) -> Option<PathBuf> {
    env::split_paths(path_var)
        .map(|dir| dir.join(binary))
        .find(|candidate| is_executable_file(candidate))
}

fn is_executable_file(p: &Path) -> bool {
    if !p.is_file() {
        return false;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(md) = fs::metadata(p) {
            return (md.permissions().mode() & 0o111) != 0;
        }
    }
    true
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
