//! Who sent a message or pressed a button.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl User {
    /// Placeholder for updates without a sender (channel posts).
    pub fn unknown() -> Self {
        Self {
            id: 0,
            username: None,
            first_name: None,
            last_name: None,
        }
    }

    /// `@username`, else the first name, else the numeric id.
    pub fn display_name(&self) -> String {
        match (&self.username, &self.first_name) {
            (Some(u), _) => format!("@{}", u),
            (None, Some(f)) => f.clone(),
            (None, None) => self.id.to_string(),
        }
    }
}
