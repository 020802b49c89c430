//! Base config: Telegram Bot connection, logging, access list. Loaded from env.

use anyhow::{Context, Result};

use super::env::{list, var_any, var_or};

pub const DEFAULT_LOG_FILE: &str = "logs/book-bot.log";

#[derive(Debug, Clone)]
pub struct BaseConfig {
    pub bot_token: String,
    /// TELEGRAM_API_URL, falling back to TELOXIDE_API_URL (local Bot API servers)
    pub telegram_api_url: Option<String>,
    /// LOG_FILE
    pub log_file: String,
    /// ALLOWED_USERS; empty means everyone may use the bot
    pub allowed_users: Vec<i64>,
}

impl BaseConfig {
    /// A non-blank `token` (from `--token`) wins over BOT_TOKEN.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token.filter(|t| !t.trim().is_empty()) {
            Some(t) => t,
            None => var_any(&["BOT_TOKEN"]).context("BOT_TOKEN not set")?,
        };
        let telegram_api_url = var_any(&["TELEGRAM_API_URL", "TELOXIDE_API_URL"]);
        let log_file = var_or("LOG_FILE", DEFAULT_LOG_FILE);
        let allowed_users = list("ALLOWED_USERS")
            .iter()
            .map(|id| {
                id.parse::<i64>()
                    .with_context(|| format!("ALLOWED_USERS contains an invalid user id: {}", id))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            bot_token,
            telegram_api_url,
            log_file,
            allowed_users,
        })
    }

    /// Checks the token has Telegram's `<bot id>:<secret>` shape and the API URL parses.
    pub fn validate(&self) -> Result<()> {
        let shaped = self.bot_token.split_once(':').is_some_and(|(id, secret)| {
            !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) && !secret.is_empty()
        });
        if !shaped {
            anyhow::bail!("BOT_TOKEN does not look like a Telegram bot token (<bot id>:<secret>)");
        }
        if let Some(url) = self.telegram_api_url.as_deref() {
            reqwest::Url::parse(url)
                .with_context(|| format!("TELEGRAM_API_URL is not a valid URL: {}", url))?;
        }
        Ok(())
    }
}
