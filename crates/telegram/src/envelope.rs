use serde::{Deserialize, Serialize};

use crate::EnvelopeError;

/// Inbound webhook payload. Only the fields qrbot reads are modelled;
/// everything else in the update is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub message_id: i32,
    #[serde(default)]
    pub chat: Option<Chat>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// Everything needed to answer one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContext {
    pub message_id: i32,
    pub chat_id: i64,
    /// Message text; empty for non-text messages.
    pub text: String,
}

impl MessageContext {
    pub fn from_update(update: &Update) -> Result<Self, EnvelopeError> {
        let message = update
            .message
            .as_ref()
            .ok_or(EnvelopeError::MissingMessage {
                update_id: update.update_id,
            })?;
        let chat = message.chat.as_ref().ok_or(EnvelopeError::MissingChat {
            update_id: update.update_id,
        })?;

        Ok(Self {
            message_id: message.message_id,
            chat_id: chat.id,
            text: message.text.clone().unwrap_or_default(),
        })
    }
}

impl TryFrom<&Update> for MessageContext {
    type Error = EnvelopeError;

    fn try_from(update: &Update) -> Result<Self, Self::Error> {
        Self::from_update(update)
    }
}

/// Decode a raw webhook body.
pub fn decode_update(body: &[u8]) -> Result<Update, EnvelopeError> {
    Ok(serde_json::from_slice(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT_UPDATE: &str = r#"{
        "update_id": 10000,
        "message": {
            "message_id": 1365,
            "date": 1441645532,
            "from": {"id": 1111111, "is_bot": false, "first_name": "Test"},
            "chat": {"id": -1001234567890, "type": "supergroup", "title": "Chat"},
            "text": "vk.com"
        }
    }"#;

    #[test]
    fn text_message_yields_context() {
        let update = decode_update(TEXT_UPDATE.as_bytes()).unwrap();
        let ctx = MessageContext::from_update(&update).unwrap();
        assert_eq!(
            ctx,
            MessageContext {
                message_id: 1365,
                chat_id: -1001234567890,
                text: "vk.com".into(),
            }
        );
    }

    #[test]
    fn non_text_message_has_empty_text() {
        let raw = r#"{"update_id": 1, "message": {"message_id": 7, "chat": {"id": 42}, "photo": []}}"#;
        let update = decode_update(raw.as_bytes()).unwrap();
        let ctx = MessageContext::try_from(&update).unwrap();
        assert_eq!(ctx.text, "");
        assert_eq!(ctx.chat_id, 42);
    }

    #[test]
    fn update_without_message_is_rejected() {
        let raw = r#"{"update_id": 5, "edited_message": {"message_id": 1, "chat": {"id": 1}}}"#;
        let update = decode_update(raw.as_bytes()).unwrap();
        assert!(matches!(
            MessageContext::from_update(&update),
            Err(EnvelopeError::MissingMessage { update_id: 5 })
        ));
    }

    #[test]
    fn message_without_chat_is_rejected() {
        let raw = r#"{"update_id": 6, "message": {"message_id": 1, "text": "/start"}}"#;
        let update = decode_update(raw.as_bytes()).unwrap();
        assert!(matches!(
            MessageContext::from_update(&update),
            Err(EnvelopeError::MissingChat { update_id: 6 })
        ));
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        assert!(matches!(
            decode_update(b"{not json"),
            Err(EnvelopeError::Decode(_))
        ));
        assert!(matches!(
            decode_update(br#"{"message": {}}"#),
            Err(EnvelopeError::Decode(_))
        ));
    }
}
