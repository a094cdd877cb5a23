use serde::Deserialize;

/// Telegram user id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct UserId(pub i64);

/// Telegram chat id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct ChatId(pub i64);

/// One entry of a `getUpdates` batch.
///
/// Only the fields the relay reads are modeled; anything else in the payload is ignored.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<IncomingMessage>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct IncomingMessage {
    #[serde(default)]
    pub from: Option<Sender>,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct Sender {
    pub id: UserId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct Chat {
    pub id: ChatId,
}

/// A message that passed the access filter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AcceptedMessage {
    pub chat_id: ChatId,
    pub text: String,
}

/// Polling cursor: the `offset` to pass to the next `getUpdates` call.
///
/// Lives only in memory; a restart starts again from 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cursor(pub i64);

impl Cursor {
    pub fn offset(self) -> i64 {
        self.0
    }

    /// Move past every update in `batch`. Never moves backwards.
    pub fn advance_past(&mut self, batch: &[Update]) {
        if let Some(max) = batch.iter().map(|u| u.update_id).max() {
            self.0 = self.0.max(max.saturating_add(1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(id: i64) -> Update {
        Update {
            update_id: id,
            message: None,
        }
    }

    #[test]
    fn cursor_advances_to_max_plus_one() {
        let mut c = Cursor::default();
        c.advance_past(&[update(7), update(5), update(6)]);
        assert_eq!(c.offset(), 8);
    }

    #[test]
    fn cursor_ignores_empty_batch_and_stale_ids() {
        let mut c = Cursor(10);
        c.advance_past(&[]);
        assert_eq!(c, Cursor(10));
        c.advance_past(&[update(3)]);
        assert_eq!(c, Cursor(10));
    }

    #[test]
    fn update_deserializes_from_bot_api_shape() {
        let u: Update = serde_json::from_value(serde_json::json!({
            "update_id": 5,
            "message": {
                "message_id": 77,
                "date": 1_700_000_000,
                "from": { "id": 42, "is_bot": false, "first_name": "Ada" },
                "chat": { "id": 1, "type": "private" },
                "text": "hi"
            }
        }))
        .unwrap();

        let msg = u.message.unwrap();
        assert_eq!(u.update_id, 5);
        assert_eq!(msg.from.map(|f| f.id), Some(UserId(42)));
        assert_eq!(msg.chat.id, ChatId(1));
        assert_eq!(msg.text.as_deref(), Some("hi"));
    }

    #[test]
    fn update_without_message_is_accepted() {
        let u: Update =
            serde_json::from_str(r#"{"update_id": 9, "edited_message": {}}"#).unwrap();
        assert_eq!(u.message, None);
    }
}
