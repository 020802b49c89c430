//! Unit tests for handlers that need no Bot. Flows with a Bot live in tests/.

mod helpers_test;
mod logging_auth_handler_test;

use crate::core::{
    Chat, Message, MessageDirection, User, MESSAGE_TYPE_CALLBACK, MESSAGE_TYPE_TEXT,
};
use chrono::Utc;

pub(super) fn sample_message(user_id: i64, content: &str) -> Message {
    Message {
        id: "msg-1".to_string(),
        user: User {
            id: user_id,
            username: Some("reader".to_string()),
            first_name: Some("Test".to_string()),
            last_name: None,
        },
        chat: Chat {
            id: 123,
            chat_type: "private".to_string(),
        },
        content: content.to_string(),
        message_type: MESSAGE_TYPE_TEXT.to_string(),
        direction: MessageDirection::Incoming,
        created_at: Utc::now(),
        reply_to_message_id: None,
        callback_data: None,
    }
}

pub(super) fn sample_callback(user_id: i64, data: &str) -> Message {
    Message {
        message_type: MESSAGE_TYPE_CALLBACK.to_string(),
        content: data.to_string(),
        callback_data: Some(data.to_string()),
        ..sample_message(user_id, "")
    }
}
