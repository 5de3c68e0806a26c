//! Webhook payload decoding.

use talker_core::{Message, ToCoreMessage};
use teloxide::types::{Update, UpdateKind};

use super::TelegramMessageWrapper;

/// Parses a raw webhook body into a teloxide [`Update`].
///
/// Update kinds teloxide does not know still decode (as `UpdateKind::Error`); only invalid JSON or
/// a missing `update_id` fail.
pub fn decode_update(body: &[u8]) -> Result<Update, serde_json::Error> {
    serde_json::from_slice(body)
}

/// The message to answer: a new (not edited) message with non-empty text and a sender.
pub fn incoming_text_message(update: &Update) -> Option<&teloxide::types::Message> {
    match &update.kind {
        UpdateKind::Message(msg) => {
            let has_text = msg.text().is_some_and(|t| !t.trim().is_empty());
            (has_text && msg.from.is_some()).then_some(msg)
        }
        _ => None,
    }
}

/// Decode + filter + convert in one step.
pub fn to_core_message(update: &Update) -> Option<Message> {
    incoming_text_message(update).map(|msg| TelegramMessageWrapper(msg).to_core())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text_update(chat_id: i64, text: &str) -> serde_json::Value {
        json!({
            "update_id": 10000,
            "message": {
                "message_id": 1365,
                "date": 1441645532,
                "chat": { "id": chat_id, "type": "private", "first_name": "Ana", "username": "ana_k" },
                "from": { "id": 1111111, "is_bot": false, "first_name": "Ana", "username": "ana_k" },
                "text": text
            }
        })
    }

    #[test]
    fn test_text_message_is_extracted() {
        let body = text_update(1111111, "Hello pig").to_string();
        let update = decode_update(body.as_bytes()).unwrap();
        let message = to_core_message(&update).expect("text message");

        assert_eq!(message.chat.id, 1111111);
        assert_eq!(message.content, "Hello pig");
        assert_eq!(message.user.id, 1111111);
        assert_eq!(message.user.first_name.as_deref(), Some("Ana"));
        assert_eq!(message.chat.chat_type, "private");
        assert_eq!(message.id, "1365");
    }

    #[test]
    fn test_group_chat_ids_are_negative() {
        let mut value = text_update(-1001234567890, "hi all");
        value["message"]["chat"] = json!({ "id": -1001234567890_i64, "type": "supergroup", "title": "Pigs" });
        let update = decode_update(value.to_string().as_bytes()).unwrap();
        let message = to_core_message(&update).unwrap();
        assert_eq!(message.chat.id, -1001234567890);
        assert_eq!(message.chat.chat_type, "public");
    }

    #[test]
    fn test_malformed_payload_is_error() {
        assert!(decode_update(b"not json").is_err());
        assert!(decode_update(b"{\"message\": {}}").is_err());
    }

    #[test]
    fn test_non_text_updates_are_skipped() {
        let mut dice = text_update(1, "x");
        dice["message"].as_object_mut().unwrap().remove("text");
        dice["message"]["dice"] = json!({ "emoji": "🎲", "value": 4 });
        let update = decode_update(dice.to_string().as_bytes()).unwrap();
        assert!(incoming_text_message(&update).is_none());

        let mut edited = text_update(1, "edited text");
        let inner = edited.as_object_mut().unwrap().remove("message").unwrap();
        edited["edited_message"] = inner;
        edited["edited_message"]["edit_date"] = json!(1441645600);
        let update = decode_update(edited.to_string().as_bytes()).unwrap();
        assert!(incoming_text_message(&update).is_none());
    }

    #[test]
    fn test_blank_text_is_skipped() {
        let update = decode_update(text_update(1, "   ").to_string().as_bytes()).unwrap();
        assert!(to_core_message(&update).is_none());
    }

    #[test]
    fn test_unknown_update_kind_is_skipped() {
        let body = json!({ "update_id": 5, "some_future_update": { "x": 1 } }).to_string();
        let update = decode_update(body.as_bytes()).unwrap();
        assert!(to_core_message(&update).is_none());
    }
}
