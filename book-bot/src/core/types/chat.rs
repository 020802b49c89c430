//! Where replies go.

use serde::{Deserialize, Serialize};

pub const CHAT_TYPE_PRIVATE: &str = "private";

/// `chat_type` is the transport's own label for the chat kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    pub chat_type: String,
}

impl Chat {
    /// One-to-one chat with a user; its id equals the user id on Telegram.
    pub fn private(id: i64) -> Self {
        Self {
            id,
            chat_type: CHAT_TYPE_PRIVATE.to_string(),
        }
    }
}
