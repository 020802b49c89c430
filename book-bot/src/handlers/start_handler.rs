//! `/start` and `/help`. Any other command ends the chain without a reply so it is never
//! searched for as a book title.

use crate::core::{Bot, Handler, HandlerResponse, Message, Result};
use crate::messages;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument};

pub struct StartHandler {
    bot: Arc<dyn Bot>,
}

impl StartHandler {
    pub fn new(bot: Arc<dyn Bot>) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Handler for StartHandler {
    #[instrument(skip(self, message))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        match message.command() {
            Some("start") | Some("help") => {
                self.bot.reply_to(message, messages::GREETING).await?;
                Ok(HandlerResponse::Reply(messages::GREETING.to_string()))
            }
            Some(other) => {
                debug!(command = other, "Unknown command ignored");
                Ok(HandlerResponse::Stop)
            }
            None => Ok(HandlerResponse::Continue),
        }
    }
}
