use std::str::FromStr;

use crate::errors::Error;

/// Outgoing "chat action" (typing indicator, etc).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatAction {
    Typing,
}

/// How the messenger should interpret reply text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseMode {
    /// Telegram's legacy `Markdown` mode.
    Markdown,
    MarkdownV2,
    Html,
    Plain,
}

impl FromStr for ParseMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "markdown" => Ok(ParseMode::Markdown),
            "markdownv2" | "markdown_v2" => Ok(ParseMode::MarkdownV2),
            "html" => Ok(ParseMode::Html),
            "plain" | "none" | "" => Ok(ParseMode::Plain),
            other => Err(Error::Config(format!(
                "TELEGRAM_PARSE_MODE must be markdown, markdownv2, html or plain, got {other:?}"
            ))),
        }
    }
}

/// Capabilities / feature flags of a messenger implementation.
#[derive(Clone, Copy, Debug)]
pub struct MessagingCapabilities {
    pub supports_chat_actions: bool,
    pub max_message_len: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_mode_accepts_known_names() {
        assert_eq!("Markdown".parse::<ParseMode>().unwrap(), ParseMode::Markdown);
        assert_eq!("markdownv2".parse::<ParseMode>().unwrap(), ParseMode::MarkdownV2);
        assert_eq!(" HTML ".parse::<ParseMode>().unwrap(), ParseMode::Html);
        assert_eq!("none".parse::<ParseMode>().unwrap(), ParseMode::Plain);
    }

    #[test]
    fn parse_mode_rejects_unknown_names() {
        assert!(matches!("bbcode".parse::<ParseMode>(), Err(Error::Config(_))));
    }
}
