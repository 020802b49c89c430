//! Bot abstraction for sending, editing and deleting messages, offering choices and uploading files.
//!
//! [`Bot`] is transport-agnostic; `TelegramBotAdapter` implements it via teloxide and tests
//! substitute a recording mock.

use async_trait::async_trait;
use std::path::Path;

use super::error::{BotError, Result};
use super::types::{Chat, Choice, Message};

#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends a text message to the given chat.
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()>;
    /// Sends a reply to the given message (same chat).
    async fn reply_to(&self, message: &Message, text: &str) -> Result<()>;
    /// Sends a message and returns its id for later `edit_message` / `delete_message`.
    async fn send_message_and_return_id(&self, chat: &Chat, text: &str) -> Result<String>;
    /// Replaces the text of an already-sent message.
    async fn edit_message(&self, chat: &Chat, message_id: &str, text: &str) -> Result<()>;
    async fn delete_message(&self, chat: &Chat, message_id: &str) -> Result<()>;
    /// Sends `text` with one button per choice; returns the message id.
    async fn send_choices(&self, chat: &Chat, text: &str, choices: &[Choice]) -> Result<String>;
    /// Forwards message `message_id` of chat `from_chat_id` (a channel the bot can read).
    async fn forward_message(&self, chat: &Chat, from_chat_id: i64, message_id: i32) -> Result<()>;
    /// Uploads a local file as a document under `file_name`.
    async fn send_document(
        &self,
        chat: &Chat,
        path: &Path,
        file_name: &str,
        caption: Option<&str>,
    ) -> Result<()>;
}

/// Parses a message id string into an i32 (Telegram message ids).
pub fn parse_message_id(s: &str) -> Result<i32> {
    s.parse()
        .map_err(|_| BotError::InvalidMessageId(s.to_string()))
}
