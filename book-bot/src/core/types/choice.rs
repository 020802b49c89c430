//! Buttons offered to the user under a message.

use serde::{Deserialize, Serialize};

/// What pressing a choice does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChoiceAction {
    /// Sends the payload back to the bot as a callback (Telegram limits it to 64 bytes).
    Callback(String),
    /// Opens the URL in the user's client.
    Url(String),
}

/// One button: label plus action. Rendered one per row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub label: String,
    pub action: ChoiceAction,
}

impl Choice {
    pub fn callback(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: ChoiceAction::Callback(data.into()),
        }
    }

    pub fn url(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: ChoiceAction::Url(url.into()),
        }
    }
}
