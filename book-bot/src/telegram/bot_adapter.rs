//! Wraps teloxide::Bot and implements [`crate::core::Bot`]. Production code talks to Telegram;
//! tests substitute a recording Bot.

use crate::core::{
    parse_message_id, Bot as CoreBot, BotError, Chat, Choice, ChoiceAction, Message, Result,
};
use async_trait::async_trait;
use std::path::Path;
use teloxide::{
    prelude::*,
    types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, InputFile, MessageId},
};

/// Thin wrapper around teloxide::Bot that implements core's Bot trait.
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }

    /// Returns the underlying teloxide::Bot for direct API use when needed.
    pub fn inner(&self) -> &teloxide::Bot {
        &self.bot
    }
}

/// One button per row.
fn keyboard(choices: &[Choice]) -> Result<InlineKeyboardMarkup> {
    let rows = choices
        .iter()
        .map(|c| {
            let button = match &c.action {
                ChoiceAction::Callback(data) => {
                    InlineKeyboardButton::callback(c.label.clone(), data.clone())
                }
                ChoiceAction::Url(url) => {
                    let url = reqwest::Url::parse(url).map_err(|_| BotError::InvalidButton {
                        label: c.label.clone(),
                        url: url.clone(),
                    })?;
                    InlineKeyboardButton::url(c.label.clone(), url)
                }
            };
            Ok(vec![button])
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(InlineKeyboardMarkup::new(rows))
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat.id), text.to_string())
            .await?;
        Ok(())
    }

    async fn reply_to(&self, message: &Message, text: &str) -> Result<()> {
        self.send_message(&message.chat, text).await
    }

    async fn send_message_and_return_id(&self, chat: &Chat, text: &str) -> Result<String> {
        let sent = self
            .bot
            .send_message(ChatId(chat.id), text.to_string())
            .await?;
        Ok(sent.id.to_string())
    }

    async fn edit_message(&self, chat: &Chat, message_id: &str, text: &str) -> Result<()> {
        let id = parse_message_id(message_id)?;
        self.bot
            .edit_message_text(ChatId(chat.id), MessageId(id), text)
            .await?;
        Ok(())
    }

    async fn delete_message(&self, chat: &Chat, message_id: &str) -> Result<()> {
        let id = parse_message_id(message_id)?;
        self.bot
            .delete_message(ChatId(chat.id), MessageId(id))
            .await?;
        Ok(())
    }

    async fn send_choices(&self, chat: &Chat, text: &str, choices: &[Choice]) -> Result<String> {
        let sent = self
            .bot
            .send_message(ChatId(chat.id), text.to_string())
            .reply_markup(keyboard(choices)?)
            .await?;
        Ok(sent.id.to_string())
    }

    async fn forward_message(&self, chat: &Chat, from_chat_id: i64, message_id: i32) -> Result<()> {
        self.bot
            .forward_message(ChatId(chat.id), ChatId(from_chat_id), MessageId(message_id))
            .await?;
        Ok(())
    }

    async fn send_document(
        &self,
        chat: &Chat,
        path: &Path,
        file_name: &str,
        caption: Option<&str>,
    ) -> Result<()> {
        let file = InputFile::file(path.to_path_buf()).file_name(file_name.to_string());
        let mut request = self.bot.send_document(ChatId(chat.id), file);
        if let Some(caption) = caption {
            request = request.caption(caption.to_string());
        }
        request.await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_one_button_per_row() {
        let markup = keyboard(&[
            Choice::callback("Dune", "dl:abcd1234:0"),
            Choice::url("Search Google", "https://www.google.com/search?q=dune"),
        ])
        .unwrap();
        assert_eq!(markup.inline_keyboard.len(), 2);
        assert!(markup.inline_keyboard.iter().all(|row| row.len() == 1));
        assert_eq!(markup.inline_keyboard[0][0].text, "Dune");
    }

    #[test]
    fn test_keyboard_rejects_bad_url() {
        let err = keyboard(&[Choice::url("x", "not a url")]).unwrap_err();
        assert!(matches!(err, BotError::InvalidButton { .. }));
    }
}
