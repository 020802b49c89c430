//! Shared helpers for book-bot integration tests.
#![allow(dead_code)]

pub mod mock_bot;

use book_bot::{Chat, Message, MessageDirection, User, MESSAGE_TYPE_CALLBACK, MESSAGE_TYPE_TEXT};
use chrono::Utc;

pub const CHAT_ID: i64 = 456;

pub fn text_message(content: &str) -> Message {
    Message {
        id: "test_message_id".to_string(),
        content: content.to_string(),
        user: User {
            id: 123,
            username: Some("test_user".to_string()),
            first_name: Some("Test".to_string()),
            last_name: None,
        },
        chat: Chat {
            id: CHAT_ID,
            chat_type: "private".to_string(),
        },
        message_type: MESSAGE_TYPE_TEXT.to_string(),
        direction: MessageDirection::Incoming,
        created_at: Utc::now(),
        reply_to_message_id: None,
        callback_data: None,
    }
}

pub fn callback(data: &str) -> Message {
    Message {
        id: "101".to_string(),
        message_type: MESSAGE_TYPE_CALLBACK.to_string(),
        callback_data: Some(data.to_string()),
        ..text_message(data)
    }
}

pub fn callback_in_chat(data: &str, chat_id: i64) -> Message {
    let mut msg = callback(data);
    msg.chat.id = chat_id;
    msg
}

pub fn group_text_message(content: &str, chat_id: i64) -> Message {
    let mut msg = text_message(content);
    msg.chat = Chat {
        id: chat_id,
        chat_type: "supergroup".to_string(),
    };
    msg
}
