//! Mock implementation of [`book_bot::Bot`] for integration tests.
//!
//! Records every outgoing call in order so tests can assert on what the user would see without
//! hitting Telegram. Message ids are handed out from a counter starting at 100.

use async_trait::async_trait;
use book_bot::{Bot, BotError, Chat, Choice, Message, Result};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{Arc, Mutex};

/// One recorded call.
#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Text {
        chat_id: i64,
        text: String,
    },
    Status {
        chat_id: i64,
        message_id: String,
        text: String,
    },
    Edit {
        message_id: String,
        text: String,
    },
    Delete {
        message_id: String,
    },
    Choices {
        text: String,
        choices: Vec<Choice>,
    },
    Forward {
        chat_id: i64,
        from_chat_id: i64,
        message_id: i32,
    },
    /// `existed` is whether the local file was still on disk at upload time.
    Document {
        file_name: String,
        caption: Option<String>,
        size: u64,
        existed: bool,
        path: std::path::PathBuf,
    },
}

pub struct MockBot {
    next_id: AtomicI32,
    calls: Mutex<Vec<Sent>>,
    reject_forwards: AtomicBool,
}

impl MockBot {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            next_id: AtomicI32::new(100),
            calls: Mutex::new(Vec::new()),
            reject_forwards: AtomicBool::new(false),
        })
    }

    /// Makes `forward_message` fail like Telegram does when the bot cannot read the source chat.
    pub fn reject_forwards(&self) {
        self.reject_forwards.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<Sent> {
        self.calls.lock().unwrap().clone()
    }

    pub fn documents(&self) -> Vec<Sent> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Sent::Document { .. }))
            .collect()
    }

    /// Callback payloads of the last choices message.
    pub fn last_callbacks(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .rev()
            .find_map(|c| match c {
                Sent::Choices { choices, .. } => Some(choices),
                _ => None,
            })
            .unwrap_or_default()
            .into_iter()
            .filter_map(|c| match c.action {
                book_bot::ChoiceAction::Callback(data) => Some(data),
                book_bot::ChoiceAction::Url(_) => None,
            })
            .collect()
    }

    fn record(&self, call: Sent) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_id(&self) -> String {
        self.next_id.fetch_add(1, Ordering::SeqCst).to_string()
    }
}

#[async_trait]
impl Bot for MockBot {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        self.record(Sent::Text {
            chat_id: chat.id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn reply_to(&self, message: &Message, text: &str) -> Result<()> {
        self.send_message(&message.chat, text).await
    }

    async fn send_message_and_return_id(&self, chat: &Chat, text: &str) -> Result<String> {
        let message_id = self.next_id();
        self.record(Sent::Status {
            chat_id: chat.id,
            message_id: message_id.clone(),
            text: text.to_string(),
        });
        Ok(message_id)
    }

    async fn edit_message(&self, _chat: &Chat, message_id: &str, text: &str) -> Result<()> {
        self.record(Sent::Edit {
            message_id: message_id.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn delete_message(&self, _chat: &Chat, message_id: &str) -> Result<()> {
        self.record(Sent::Delete {
            message_id: message_id.to_string(),
        });
        Ok(())
    }

    async fn send_choices(&self, _chat: &Chat, text: &str, choices: &[Choice]) -> Result<String> {
        self.record(Sent::Choices {
            text: text.to_string(),
            choices: choices.to_vec(),
        });
        Ok(self.next_id())
    }

    async fn forward_message(&self, chat: &Chat, from_chat_id: i64, message_id: i32) -> Result<()> {
        if self.reject_forwards.load(Ordering::SeqCst) {
            return Err(BotError::Transport("Bad Request: chat not found".to_string()));
        }
        self.record(Sent::Forward {
            chat_id: chat.id,
            from_chat_id,
            message_id,
        });
        Ok(())
    }

    async fn send_document(
        &self,
        _chat: &Chat,
        path: &Path,
        file_name: &str,
        caption: Option<&str>,
    ) -> Result<()> {
        let meta = std::fs::metadata(path);
        self.record(Sent::Document {
            file_name: file_name.to_string(),
            caption: caption.map(|s| s.to_string()),
            size: meta.as_ref().map(|m| m.len()).unwrap_or(0),
            existed: meta.is_ok(),
            path: path.to_path_buf(),
        });
        Ok(())
    }
}
