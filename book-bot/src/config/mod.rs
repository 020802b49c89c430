//! Bot configuration: BaseConfig (Telegram + log + access) + AppExtensions (search, AI filter, download).

mod base;
mod bot_config;
mod env;
mod extensions;


pub use base::BaseConfig;
pub use bot_config::BotConfig;
pub use extensions::{
    AiFilterSettings, AppExtensions, BookExtensions, DownloadSettings, SearchSettings,
    KNOWN_PROVIDERS,
};
