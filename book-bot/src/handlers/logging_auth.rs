//! Chain middleware: request logging and the optional user allowlist.

use crate::core::{Handler, HandlerError, HandlerResponse, Message, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};

/// First in the chain. Logs every search query and button press, then what the bot replied.
pub struct LoggingHandler;

#[async_trait]
impl Handler for LoggingHandler {
    #[instrument(skip(self, message))]
    async fn before(&self, message: &Message) -> Result<bool> {
        let user = message.user.display_name();
        match message.callback_data.as_deref() {
            Some(data) if message.is_callback() => {
                info!(user_id = message.user.id, user = %user, data = %data, "Button pressed")
            }
            _ => info!(
                user_id = message.user.id,
                user = %user,
                text = %message.content,
                "Text received"
            ),
        }
        Ok(true)
    }

    #[instrument(skip(self, message, response))]
    async fn after(&self, message: &Message, response: &HandlerResponse) -> Result<()> {
        match response.reply_text() {
            Some(reply) => info!(chat_id = message.chat.id, reply = %reply, "Replied"),
            None => debug!(chat_id = message.chat.id, response = ?response, "No reply"),
        }
        Ok(())
    }
}

/// Private-bot mode: anyone outside `ALLOWED_USERS` aborts the chain before search runs, so
/// they get no answer at all.
pub struct AuthHandler {
    allowed_users: HashSet<i64>,
}

impl AuthHandler {
    pub fn new(allowed_users: impl IntoIterator<Item = i64>) -> Self {
        Self {
            allowed_users: allowed_users.into_iter().collect(),
        }
    }
}

#[async_trait]
impl Handler for AuthHandler {
    #[instrument(skip(self, message))]
    async fn before(&self, message: &Message) -> Result<bool> {
        let user_id = message.user.id;
        if !self.allowed_users.contains(&user_id) {
            warn!(user_id, chat_id = message.chat.id, "Rejected user outside ALLOWED_USERS");
            return Err(HandlerError::Unauthorized.into());
        }
        debug!(user_id, "User allowed");
        Ok(true)
    }
}
