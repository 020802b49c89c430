//! teloxide updates to core messages. Text messages and button presses both become a core
//! [`Message`]; the handlers tell them apart by `message_type`.

use crate::core::{
    Chat, Message, MessageDirection, ToCoreMessage, ToCoreUser, User, CHAT_TYPE_PRIVATE,
    MESSAGE_TYPE_CALLBACK, MESSAGE_TYPE_TEXT,
};

pub struct TelegramUserWrapper<'a>(pub &'a teloxide::types::User);

impl<'a> ToCoreUser for TelegramUserWrapper<'a> {
    fn to_core(&self) -> User {
        let u = self.0;
        User {
            id: u.id.0 as i64,
            username: u.username.clone(),
            first_name: Some(u.first_name.clone()),
            last_name: u.last_name.clone(),
        }
    }
}

fn core_chat(chat: &teloxide::types::Chat) -> Chat {
    let chat_type = if chat.is_private() {
        CHAT_TYPE_PRIVATE
    } else if chat.is_supergroup() {
        "supergroup"
    } else if chat.is_group() {
        "group"
    } else {
        "channel"
    };
    Chat {
        id: chat.id.0,
        chat_type: chat_type.to_string(),
    }
}

fn incoming(id: String, user: User, chat: Chat, content: String, message_type: &str) -> Message {
    Message {
        id,
        user,
        chat,
        content,
        message_type: message_type.to_string(),
        direction: MessageDirection::Incoming,
        created_at: chrono::Utc::now(),
        reply_to_message_id: None,
        callback_data: None,
    }
}

pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

impl<'a> ToCoreMessage for TelegramMessageWrapper<'a> {
    fn to_core(&self) -> Message {
        let msg = self.0;
        let user = msg
            .from
            .as_ref()
            .map(|u| TelegramUserWrapper(u).to_core())
            .unwrap_or_else(User::unknown);
        let text = msg.text().unwrap_or_default().to_string();
        Message {
            reply_to_message_id: msg.reply_to_message().map(|m| m.id.to_string()),
            ..incoming(msg.id.to_string(), user, core_chat(&msg.chat), text, MESSAGE_TYPE_TEXT)
        }
    }
}

/// A button press. `id` is the message that carries the keyboard (empty when Telegram no longer
/// has it) and the chat falls back to the presser's private chat.
pub struct TelegramCallbackWrapper<'a>(pub &'a teloxide::types::CallbackQuery);

impl<'a> ToCoreMessage for TelegramCallbackWrapper<'a> {
    fn to_core(&self) -> Message {
        let q = self.0;
        let (id, chat) = match q.message.as_ref() {
            Some(m) => (m.id().to_string(), core_chat(m.chat())),
            None => (String::new(), Chat::private(q.from.id.0 as i64)),
        };
        let data = q.data.clone().unwrap_or_default();
        Message {
            callback_data: q.data.clone(),
            ..incoming(id, TelegramUserWrapper(&q.from).to_core(), chat, data, MESSAGE_TYPE_CALLBACK)
        }
    }
}
