//! BotConfig: BaseConfig + BookExtensions. Use load() for env-based loading.

use anyhow::Result;

use super::{AppExtensions, BaseConfig, BookExtensions};

pub struct BotConfig {
    pub base: BaseConfig,
    pub extensions: BookExtensions,
}

impl BotConfig {
    /// Reads everything from the environment. Loading only parses; [`BotConfig::validate`] checks.
    pub fn load(token: Option<String>) -> Result<Self> {
        let base = BaseConfig::load(token)?;
        let extensions = BookExtensions::from_env()?;
        Ok(Self { base, extensions })
    }

    /// Fails fast on bad URLs, unknown providers and missing keys.
    pub fn validate(&self) -> Result<()> {
        self.base.validate()?;
        self.extensions.validate()
    }

    pub fn base(&self) -> &BaseConfig {
        &self.base
    }
    pub fn extensions(&self) -> &BookExtensions {
        &self.extensions
    }

    pub fn bot_token(&self) -> &str {
        &self.base.bot_token
    }
    pub fn log_file(&self) -> &str {
        &self.base.log_file
    }
    pub fn telegram_api_url(&self) -> Option<&str> {
        self.base.telegram_api_url.as_deref()
    }
    pub fn allowed_users(&self) -> &[i64] {
        &self.base.allowed_users
    }
    pub fn search(&self) -> &super::SearchSettings {
        self.extensions.search()
    }
    pub fn download(&self) -> &super::DownloadSettings {
        self.extensions.download()
    }
}
