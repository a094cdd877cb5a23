//! Claude CLI adapter: runs one prompt through `claude -p <text>` and captures stdout.

use std::{collections::VecDeque, process::Stdio, sync::Arc, time::Duration};

use async_trait::async_trait;

use ocalt_core::{
    errors::Error,
    model::{client::CommandRunner, types::CommandConfig},
    Result,
};

use tokio::{
    io::{AsyncBufReadExt, AsyncReadExt, BufReader},
    process::{Child, Command},
    sync::Mutex,
    time::timeout,
};
use tracing::{debug, error, warn};

const STDERR_TAIL_MAX_BYTES: usize = 16 * 1024;
const STDERR_TAIL_MAX_LINES: usize = 200;
/// How long to wait for the stderr drain after the child has exited.
const STDERR_DRAIN_GRACE: Duration = Duration::from_millis(200);

#[derive(Clone, Debug)]
pub struct ClaudeCliRunner {
    cfg: CommandConfig,
}

#[derive(Clone, Debug, Default)]
struct StderrTail {
    lines: VecDeque<String>,
    bytes: usize,
}

impl StderrTail {
    fn push_line(&mut self, line: String) {
        // +1 for the '\n' we join with later.
        self.bytes = self.bytes.saturating_add(line.len() + 1);
        self.lines.push_back(line);

        while self.lines.len() > STDERR_TAIL_MAX_LINES || self.bytes > STDERR_TAIL_MAX_BYTES {
            if let Some(front) = self.lines.pop_front() {
                self.bytes = self.bytes.saturating_sub(front.len() + 1);
            } else {
                break;
            }
        }
    }

    fn snapshot(&self) -> String {
        self.lines.iter().cloned().collect::<Vec<_>>().join("\n")
    }
}

impl ClaudeCliRunner {
    pub fn new(cfg: CommandConfig) -> Self {
        Self { cfg }
    }

    fn program_name(&self) -> String {
        self.cfg
            .program
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.cfg.program.display().to_string())
    }
}

#[async_trait]
impl CommandRunner for ClaudeCliRunner {
    async fn run(&self, prompt: &str) -> Result<String> {
        let inv = self.cfg.build_invocation(prompt);
        let name = self.program_name();

        let mut cmd = Command::new(&inv.program);
        cmd.args(&inv.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Dropping the run future (shutdown) must not orphan the child.
            .kill_on_drop(true);
        if let Some(cwd) = &inv.cwd {
            cmd.current_dir(cwd);
        }

        let mut child = cmd
            .spawn()
            .map_err(|e| Error::Process(format!("failed to start {name}: {e}")))?;

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::Process(format!("{name} stdout was not captured")))?;

        // Drain stderr in background to avoid blocking on a full pipe.
        let stderr_tail: Arc<Mutex<StderrTail>> = Arc::new(Mutex::new(StderrTail::default()));
        let stderr_task = child.stderr.take().map(|stderr| {
            let tail = stderr_tail.clone();
            tokio::spawn(async move {
                let mut r = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = r.next_line().await {
                    tail.lock().await.push_line(line);
                }
            })
        });

        let run = async {
            let mut out = Vec::new();
            stdout.read_to_end(&mut out).await?;
            let status = child.wait().await?;
            Ok::<_, std::io::Error>((status, out))
        };
        let outcome = timeout(self.cfg.timeout, run).await;

        let (status, out) = match outcome {
            Ok(res) => res?,
            Err(_) => {
                let killed = kill_child(&mut child).await;
                return Err(timeout_error(&name, self.cfg.timeout, killed));
            }
        };

        if let Some(task) = stderr_task {
            let _ = timeout(STDERR_DRAIN_GRACE, task).await;
        }
        let stderr = stderr_tail.lock().await.snapshot();
        let stdout = String::from_utf8_lossy(&out).into_owned();

        if !status.success() && stdout.trim().is_empty() {
            if !stderr.trim().is_empty() {
                warn!(%status, stderr = %stderr, "{name} failed");
            }
            return Err(Error::Process(format!("{name} exited with {status}")));
        }

        if !stderr.trim().is_empty() {
            debug!(stderr = %stderr, "{name} wrote to stderr");
        }

        Ok(stdout)
    }
}

/// A timeout always surfaces as `Error::Timeout`; a failed kill is only logged.
fn timeout_error(name: &str, budget: Duration, killed: std::io::Result<()>) -> Error {
    if let Err(e) = killed {
        error!(error = %e, "{name} timed out and could not be killed");
    }
    Error::Timeout(budget)
}

/// Kill and reap the child so nothing is left running after a timeout.
async fn kill_child(child: &mut Child) -> std::io::Result<()> {
    // If it's already exited, `try_wait` reaps it.
    if child.try_wait()?.is_some() {
        return Ok(());
    }

    match child.kill().await {
        Ok(()) => Ok(()),
        Err(e) => {
            // It may have exited between `try_wait` and `kill`.
            if child.try_wait()?.is_some() {
                Ok(())
            } else {
                Err(e)
            }
        }
    }
}
