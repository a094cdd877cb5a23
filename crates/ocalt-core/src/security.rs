use crate::domain::{AcceptedMessage, IncomingMessage, UserId};

// ============== Authorization ==============

pub fn is_authorized(user_id: Option<UserId>, authorized: UserId) -> bool {
    user_id == Some(authorized)
}

// ============== Access Filter ==============

/// Decide whether a message is handled at all.
///
/// Rejection is silent: callers must not log or reply for rejected messages.
pub fn accept(msg: &IncomingMessage, authorized: UserId) -> Option<AcceptedMessage> {
    if !is_authorized(msg.from.map(|f| f.id), authorized) {
        return None;
    }

    let text = msg.text.as_deref().unwrap_or_default();
    if text.is_empty() {
        return None;
    }

    Some(AcceptedMessage {
        chat_id: msg.chat.id,
        text: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Chat, ChatId, Sender};

    fn msg(from: Option<i64>, text: Option<&str>) -> IncomingMessage {
        IncomingMessage {
            from: from.map(|id| Sender { id: UserId(id) }),
            chat: Chat { id: ChatId(-100) },
            text: text.map(str::to_string),
        }
    }

    #[test]
    fn authorization_requires_exact_match() {
        assert!(is_authorized(Some(UserId(42)), UserId(42)));
        assert!(!is_authorized(Some(UserId(43)), UserId(42)));
        assert!(!is_authorized(None, UserId(42)));
    }

    #[test]
    fn accepts_text_from_authorized_user() {
        let got = accept(&msg(Some(42), Some("ls -la")), UserId(42)).unwrap();
        assert_eq!(got.chat_id, ChatId(-100));
        assert_eq!(got.text, "ls -la");
    }

    #[test]
    fn rejects_other_senders_and_anonymous_messages() {
        assert_eq!(accept(&msg(Some(7), Some("hi")), UserId(42)), None);
        assert_eq!(accept(&msg(None, Some("hi")), UserId(42)), None);
    }

    #[test]
    fn rejects_missing_or_empty_text() {
        assert_eq!(accept(&msg(Some(42), None), UserId(42)), None);
        assert_eq!(accept(&msg(Some(42), Some("")), UserId(42)), None);
    }

    #[test]
    fn whitespace_text_is_still_relayed() {
        // Only literally empty text is dropped.
        assert!(accept(&msg(Some(42), Some("  ")), UserId(42)).is_some());
    }
}
