use std::path::PathBuf;

use async_trait::async_trait;

use crate::Result;

use super::types::CommandConfig;

/// A concrete CLI invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CliInvocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl CommandConfig {
    /// The prompt is always the final positional argument, passed as one argv entry.
    pub fn build_invocation(&self, prompt: &str) -> CliInvocation {
        let mut args = self.leading_args.clone();
        args.push(prompt.to_string());

        CliInvocation {
            program: self.program.clone(),
            args,
            cwd: self.cwd.clone(),
        }
    }
}

/// Runs one prompt through the external command and returns its captured stdout.
///
/// Errors: `Error::Timeout` when the budget is exceeded (the child must already be
/// gone when this returns), `Error::Process` for spawn failures and non-zero exits
/// without output.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, prompt: &str) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn prompt_is_last_single_argument() {
        let cfg = CommandConfig {
            program: PathBuf::from("claude"),
            leading_args: vec!["-p".to_string()],
            cwd: None,
            timeout: Duration::from_secs(120),
        };
        let inv = cfg.build_invocation("fix the build; rm -rf nothing");
        assert_eq!(inv.program, PathBuf::from("claude"));
        assert_eq!(
            inv.args,
            vec!["-p".to_string(), "fix the build; rm -rf nothing".to_string()]
        );
    }
}
