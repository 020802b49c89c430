//! Message and direction types for the core model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{chat::Chat, user::User};

pub const MESSAGE_TYPE_TEXT: &str = "text";
pub const MESSAGE_TYPE_CALLBACK: &str = "callback";

/// Direction of the message (from user or from bot).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MessageDirection {
    Incoming,
    Outgoing,
}

/// A text message or a button press. Button presses have `message_type == "callback"` and
/// carry the button payload in `callback_data`; `id` is then the message the button was under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub user: User,
    pub chat: Chat,
    pub content: String,
    pub message_type: String,
    pub direction: MessageDirection,
    pub created_at: DateTime<Utc>,
    pub reply_to_message_id: Option<String>,
    pub callback_data: Option<String>,
}

impl Message {
    pub fn is_callback(&self) -> bool {
        self.message_type == MESSAGE_TYPE_CALLBACK
    }

    /// `/start@my_bot args` → `Some("start")`; plain text → None.
    pub fn command(&self) -> Option<&str> {
        if self.is_callback() {
            return None;
        }
        let first = self.content.trim_start().split_whitespace().next()?;
        let name = first.strip_prefix('/')?;
        let name = name.split('@').next().unwrap_or(name);
        (!name.is_empty()).then_some(name)
    }
}
