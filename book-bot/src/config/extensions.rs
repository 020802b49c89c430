//! App extensions trait and default implementation (search, AI filter, download).

use anyhow::{Context, Result};
use book_search::{
    ChannelSettings, DEFAULT_CHANNEL_SESSION_FILE, DEFAULT_GOOGLE_API_URL, DEFAULT_LIBRARY_BASE_URL, DEFAULT_LIBRARY_SEARCH_PATH,
    DEFAULT_MAX_HOPS, DEFAULT_MAX_RESULTS, DEFAULT_USER_AGENT,
};
use std::path::PathBuf;

use super::env::{bool_or, list, parse_or, var_any, var_or};
use crate::session::MAX_SESSION_TTL_SECS;

/// Provider ids accepted in SEARCH_PROVIDERS.
pub const KNOWN_PROVIDERS: [&str; 4] = ["library", "google", "google_link", "channel"];

const DEFAULT_PROVIDERS: [&str; 3] = ["library", "google", "google_link"];
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_AI_MODEL: &str = "gpt-4o-mini";
const MAX_RESULTS_CAP: usize = 10;

/// Application extension config. Implement this trait to inject custom config.
pub trait AppExtensions: Send + Sync {
    fn search(&self) -> &SearchSettings;
    fn download(&self) -> &DownloadSettings;
    /// Present only when the AI filter is enabled.
    fn ai_filter(&self) -> Option<&AiFilterSettings> {
        None
    }
}

#[derive(Debug, Clone)]
pub struct SearchSettings {
    /// SEARCH_PROVIDERS, in fallback order
    pub providers: Vec<String>,
    /// LIBRARY_BASE_URL
    pub library_base_url: String,
    /// LIBRARY_SEARCH_PATH; the encoded query is appended
    pub library_search_path: String,
    /// MAX_SEARCH_RESULTS
    pub max_results: usize,
    /// GOOGLE_API_KEY
    pub google_api_key: Option<String>,
    /// GOOGLE_CSE_ID
    pub google_cse_id: Option<String>,
    /// GOOGLE_API_URL
    pub google_api_url: String,
    /// SEARCH_LINK_FALLBACK: offer a Google link when nothing was found
    pub link_fallback: bool,
    /// API_ID, from my.telegram.org; kept raw so validate can report a bad value
    pub telegram_api_id: Option<String>,
    /// API_HASH
    pub telegram_api_hash: Option<String>,
    /// TARGET_CHANNEL_ID: numeric id or @username of the book channel
    pub target_channel: Option<String>,
    /// CHANNEL_SESSION_FILE
    pub channel_session_file: PathBuf,
}

impl SearchSettings {
    pub fn from_env() -> Result<Self> {
        let providers = match list("SEARCH_PROVIDERS") {
            p if p.is_empty() => DEFAULT_PROVIDERS.iter().map(|s| s.to_string()).collect(),
            p => p.into_iter().map(|s| s.to_lowercase()).collect(),
        };
        Ok(Self {
            providers,
            library_base_url: var_or("LIBRARY_BASE_URL", DEFAULT_LIBRARY_BASE_URL),
            library_search_path: var_or("LIBRARY_SEARCH_PATH", DEFAULT_LIBRARY_SEARCH_PATH),
            max_results: parse_or("MAX_SEARCH_RESULTS", DEFAULT_MAX_RESULTS)?,
            google_api_key: var_any(&["GOOGLE_API_KEY"]),
            google_cse_id: var_any(&["GOOGLE_CSE_ID", "GOOGLE_CX"]),
            google_api_url: var_or("GOOGLE_API_URL", DEFAULT_GOOGLE_API_URL),
            link_fallback: bool_or("SEARCH_LINK_FALLBACK", true)?,
            telegram_api_id: var_any(&["API_ID", "TELEGRAM_API_ID"]),
            telegram_api_hash: var_any(&["API_HASH", "TELEGRAM_API_HASH"]),
            target_channel: var_any(&["TARGET_CHANNEL_ID"]),
            channel_session_file: PathBuf::from(var_or(
                "CHANNEL_SESSION_FILE",
                DEFAULT_CHANNEL_SESSION_FILE,
            )),
        })
    }

    /// Both key and engine id are needed for the google provider.
    pub fn google_credentials(&self) -> Option<(&str, &str)> {
        match (&self.google_api_key, &self.google_cse_id) {
            (Some(key), Some(cx)) => Some((key.as_str(), cx.as_str())),
            _ => None,
        }
    }

    /// User-account settings for the channel provider; `None` until all three vars are set.
    pub fn channel_settings(&self) -> Result<Option<ChannelSettings>> {
        let (Some(api_id), Some(api_hash), Some(channel)) = (
            &self.telegram_api_id,
            &self.telegram_api_hash,
            &self.target_channel,
        ) else {
            return Ok(None);
        };
        let api_id = api_id
            .trim()
            .parse::<i32>()
            .with_context(|| format!("API_ID must be a number, got '{}'", api_id))?;
        Ok(Some(ChannelSettings {
            api_id,
            api_hash: api_hash.clone(),
            channel: channel.clone(),
            session_file: self.channel_session_file.clone(),
        }))
    }

    pub fn validate(&self) -> Result<()> {
        if self.providers.is_empty() {
            anyhow::bail!("SEARCH_PROVIDERS must name at least one provider");
        }
        if let Some(unknown) = self
            .providers
            .iter()
            .find(|p| !KNOWN_PROVIDERS.contains(&p.as_str()))
        {
            anyhow::bail!(
                "Unknown search provider '{}' (known: {})",
                unknown,
                KNOWN_PROVIDERS.join(", ")
            );
        }
        if !(1..=MAX_RESULTS_CAP).contains(&self.max_results) {
            anyhow::bail!(
                "MAX_SEARCH_RESULTS must be between 1 and {}, got {}",
                MAX_RESULTS_CAP,
                self.max_results
            );
        }
        if reqwest::Url::parse(&self.library_base_url).is_err() {
            anyhow::bail!("LIBRARY_BASE_URL is not a valid URL: {}", self.library_base_url);
        }
        if reqwest::Url::parse(&self.google_api_url).is_err() {
            anyhow::bail!("GOOGLE_API_URL is not a valid URL: {}", self.google_api_url);
        }
        self.channel_settings()?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct AiFilterSettings {
    /// AI_FILTER_ENABLED
    pub enabled: bool,
    /// OPENAI_API_KEY
    pub api_key: Option<String>,
    /// OPENAI_BASE_URL
    pub base_url: String,
    /// AI_MODEL
    pub model: String,
}

impl AiFilterSettings {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            enabled: bool_or("AI_FILTER_ENABLED", false)?,
            api_key: var_any(&["OPENAI_API_KEY"]),
            base_url: var_or("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
            model: var_or("AI_MODEL", DEFAULT_AI_MODEL),
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.enabled && self.api_key.is_none() {
            anyhow::bail!("AI_FILTER_ENABLED=true requires OPENAI_API_KEY");
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct DownloadSettings {
    /// DOWNLOAD_DIR; temp files are created here
    pub dir: PathBuf,
    /// DOWNLOAD_MAX_MB, in bytes
    pub max_bytes: u64,
    /// HTTP_TIMEOUT_SECS, for search and page requests
    pub http_timeout_secs: u64,
    /// DOWNLOAD_TIMEOUT_SECS, for file transfers
    pub download_timeout_secs: u64,
    /// MAX_REDIRECTS
    pub max_redirects: usize,
    /// RESOLVE_MAX_HOPS
    pub resolve_max_hops: usize,
    /// SESSION_TTL_SECS, how long result buttons stay valid
    pub session_ttl_secs: u64,
    /// USER_AGENT
    pub user_agent: String,
}

impl DownloadSettings {
    pub fn from_env() -> Result<Self> {
        let dir = var_any(&["DOWNLOAD_DIR"])
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir);
        let max_mb: u64 = parse_or("DOWNLOAD_MAX_MB", 50)?;
        let max_bytes = max_mb
            .checked_mul(1024 * 1024)
            .with_context(|| format!("DOWNLOAD_MAX_MB is too large: {}", max_mb))?;
        Ok(Self {
            dir,
            max_bytes,
            http_timeout_secs: parse_or("HTTP_TIMEOUT_SECS", 30)?,
            download_timeout_secs: parse_or("DOWNLOAD_TIMEOUT_SECS", 180)?,
            max_redirects: parse_or("MAX_REDIRECTS", 10)?,
            resolve_max_hops: parse_or("RESOLVE_MAX_HOPS", DEFAULT_MAX_HOPS)?,
            session_ttl_secs: parse_or("SESSION_TTL_SECS", 1800)?,
            user_agent: var_or("USER_AGENT", DEFAULT_USER_AGENT),
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_bytes == 0 {
            anyhow::bail!("DOWNLOAD_MAX_MB must be greater than 0");
        }
        if self.http_timeout_secs == 0 || self.download_timeout_secs == 0 {
            anyhow::bail!("HTTP_TIMEOUT_SECS and DOWNLOAD_TIMEOUT_SECS must be greater than 0");
        }
        if self.session_ttl_secs == 0 || self.session_ttl_secs > MAX_SESSION_TTL_SECS {
            anyhow::bail!(
                "SESSION_TTL_SECS must be between 1 and {}, got {}",
                MAX_SESSION_TTL_SECS,
                self.session_ttl_secs
            );
        }
        Ok(())
    }
}

/// Default extensions loaded from env.
pub struct BookExtensions {
    pub search: SearchSettings,
    pub ai_filter: AiFilterSettings,
    pub download: DownloadSettings,
}

impl AppExtensions for BookExtensions {
    fn search(&self) -> &SearchSettings {
        &self.search
    }
    fn download(&self) -> &DownloadSettings {
        &self.download
    }
    fn ai_filter(&self) -> Option<&AiFilterSettings> {
        self.ai_filter.enabled.then_some(&self.ai_filter)
    }
}

impl BookExtensions {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            search: SearchSettings::from_env()?,
            ai_filter: AiFilterSettings::from_env()?,
            download: DownloadSettings::from_env()?,
        })
    }

    pub fn validate(&self) -> Result<()> {
        self.search.validate()?;
        self.ai_filter.validate()?;
        self.download.validate()
    }
}
