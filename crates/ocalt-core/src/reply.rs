//! Turning a command outcome into the text sent back to the user.

use std::time::Duration;

use crate::{errors::Error, formatting::truncate_chars, Result};

pub const EMPTY_RESPONSE: &str = "⚠️ Empty response from Claude";

/// What the relay sends back for one accepted message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    Output(String),
    Empty,
    TimedOut(Duration),
    Failed(String),
}

impl Reply {
    /// Classify a runner result. Surrounding whitespace in the output is dropped.
    pub fn from_run(result: Result<String>) -> Self {
        match result {
            Ok(out) => {
                let trimmed = out.trim();
                if trimmed.is_empty() {
                    Reply::Empty
                } else {
                    Reply::Output(trimmed.to_string())
                }
            }
            Err(Error::Timeout(budget)) => Reply::TimedOut(budget),
            Err(e) => Reply::Failed(e.to_string()),
        }
    }

    pub fn render(&self) -> String {
        match self {
            Reply::Output(text) => text.clone(),
            Reply::Empty => EMPTY_RESPONSE.to_string(),
            Reply::TimedOut(budget) => {
                format!("⚠️ Claude timed out ({})", budget_label(*budget))
            }
            Reply::Failed(msg) => format!("⚠️ Error: {msg}"),
        }
    }

    /// Rendered text cut to the platform's message ceiling.
    pub fn render_within(&self, max_chars: usize) -> String {
        truncate_chars(&self.render(), max_chars).to_string()
    }
}

/// `120s` for whole seconds, rounded up otherwise; `500ms` below one second.
fn budget_label(budget: Duration) -> String {
    if budget < Duration::from_secs(1) {
        return format!("{}ms", budget.as_millis());
    }
    let secs = budget.as_secs() + u64::from(budget.subsec_nanos() > 0);
    format!("{secs}s")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_is_trimmed() {
        let r = Reply::from_run(Ok("hello\n".to_string()));
        assert_eq!(r, Reply::Output("hello".to_string()));
        assert_eq!(r.render(), "hello");
    }

    #[test]
    fn blank_output_becomes_placeholder() {
        assert_eq!(Reply::from_run(Ok(String::new())), Reply::Empty);
        assert_eq!(Reply::from_run(Ok(" \n\t".to_string())), Reply::Empty);
        assert_eq!(Reply::Empty.render(), EMPTY_RESPONSE);
    }

    #[test]
    fn timeout_placeholder_names_budget() {
        let r = Reply::from_run(Err(Error::Timeout(Duration::from_secs(120))));
        assert_eq!(r.render(), "⚠️ Claude timed out (120s)");
    }

    #[test]
    fn sub_second_and_fractional_budgets_are_not_shown_as_zero() {
        assert_eq!(
            Reply::TimedOut(Duration::from_millis(500)).render(),
            "⚠️ Claude timed out (500ms)"
        );
        assert_eq!(
            Reply::TimedOut(Duration::from_millis(2500)).render(),
            "⚠️ Claude timed out (3s)"
        );
    }

    #[test]
    fn failure_embeds_error_message() {
        let r = Reply::from_run(Err(Error::Process("failed to start claude".to_string())));
        assert_eq!(r.render(), "⚠️ Error: failed to start claude");
    }

    #[test]
    fn render_within_cuts_long_output() {
        let r = Reply::Output("z".repeat(5000));
        let sent = r.render_within(4096);
        assert_eq!(sent.chars().count(), 4096);
        assert!(sent.chars().all(|c| c == 'z'));
    }
}
