//! Search inside a Telegram channel through a user account.
//!
//! Bots cannot search channel history, so a logged-in user session (MTProto, via grammers) runs
//! the search and the bot later forwards the matching post by id. Candidates carry the post as a
//! `https://t.me/c/<channel>/<message>` link.

use async_trait::async_trait;
use grammers_client::types::{Chat, Media};
use grammers_client::{Client, Config, InitParams, SignInError};
use grammers_session::{PackedChat, Session};
use std::path::PathBuf;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, warn};

use crate::error::{Result, SearchError};
use crate::models::{BookCandidate, CandidateKind};
use crate::provider::SearchProvider;

/// Bot API ids of channels and supergroups are the bare id prefixed with `-100`.
const BOT_API_CHANNEL_OFFSET: i64 = 1_000_000_000_000;

/// Posts scanned per query; only those carrying a document become candidates.
const SCAN_PER_RESULT: usize = 4;

pub const DEFAULT_CHANNEL_SESSION_FILE: &str = "user.session";

/// A channel post with a file attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelPost {
    pub channel_id: i64,
    pub message_id: i32,
    pub file_name: Option<String>,
    pub text: String,
}

/// Where a candidate's post lives, as the Bot API addresses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostRef {
    /// `-100…` chat id.
    pub chat_id: i64,
    pub message_id: i32,
}

/// `-1001234` and `1234` both name channel `1234`.
pub fn bare_channel_id(id: i64) -> i64 {
    if id <= -BOT_API_CHANNEL_OFFSET {
        -id - BOT_API_CHANNEL_OFFSET
    } else {
        id.abs()
    }
}

pub fn post_link(channel_id: i64, message_id: i32) -> String {
    format!("https://t.me/c/{}/{}", bare_channel_id(channel_id), message_id)
}

/// Inverse of [`post_link`].
pub fn parse_post_link(url: &str) -> Option<PostRef> {
    let rest = url.strip_prefix("https://t.me/c/")?;
    let (channel, message) = rest.split_once('/')?;
    let channel: i64 = channel.parse().ok().filter(|id| *id > 0)?;
    let message_id: i32 = message.trim_end_matches('/').parse().ok().filter(|id| *id > 0)?;
    Some(PostRef {
        chat_id: -(BOT_API_CHANNEL_OFFSET + channel),
        message_id,
    })
}

/// File name without extension, else the first non-blank caption line, else a placeholder.
pub fn post_title(post: &ChannelPost) -> String {
    let from_file = post
        .file_name
        .as_deref()
        .map(|name| match name.rsplit_once('.') {
            Some((stem, _)) if !stem.trim().is_empty() => stem,
            _ => name,
        })
        .map(str::trim)
        .filter(|name| !name.is_empty());
    let from_text = post.text.lines().map(str::trim).find(|l| !l.is_empty());
    from_file
        .or(from_text)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Channel post {}", post.message_id))
}

/// Message search within the configured channel.
#[async_trait]
pub trait ChannelIndex: Send + Sync {
    /// Up to `limit` posts with a document, best match first.
    async fn search_posts(&self, query: &str, limit: usize) -> Result<Vec<ChannelPost>>;
}

/// The `channel` provider.
pub struct ChannelSearch<I> {
    index: I,
}

impl<I: ChannelIndex> ChannelSearch<I> {
    pub fn new(index: I) -> Self {
        Self { index }
    }
}

#[async_trait]
impl<I: ChannelIndex> SearchProvider for ChannelSearch<I> {
    fn id(&self) -> &str {
        "channel"
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<BookCandidate>> {
        let posts = self.index.search_posts(query, limit).await?;
        info!(count = posts.len(), "Channel search finished");
        Ok(posts
            .into_iter()
            .take(limit)
            .map(|post| {
                let snippet = post.file_name.clone();
                BookCandidate::new(
                    post_title(&post),
                    post_link(post.channel_id, post.message_id),
                    "channel",
                    CandidateKind::ChannelPost,
                )
                .with_snippet(snippet)
            })
            .collect())
    }
}

/// User-account settings (`API_ID`, `API_HASH`, `TARGET_CHANNEL_ID`, `CHANNEL_SESSION_FILE`).
#[derive(Debug, Clone)]
pub struct ChannelSettings {
    pub api_id: i32,
    pub api_hash: String,
    /// Numeric id (`-100…` or bare) or `@username`.
    pub channel: String,
    pub session_file: PathBuf,
}

struct Connected {
    client: Client,
    channel: PackedChat,
}

/// [`ChannelIndex`] over a grammers user session. Connects on first use.
pub struct GrammersIndex {
    settings: ChannelSettings,
    connected: OnceCell<Connected>,
}

impl GrammersIndex {
    pub fn new(settings: ChannelSettings) -> Self {
        Self {
            settings,
            connected: OnceCell::new(),
        }
    }

    async fn connect(&self) -> Result<Client> {
        let session = Session::load_file_or_create(&self.settings.session_file)?;
        let client = Client::connect(Config {
            session,
            api_id: self.settings.api_id,
            api_hash: self.settings.api_hash.clone(),
            params: InitParams::default(),
        })
        .await
        .map_err(|e| SearchError::Channel(format!("Failed to connect: {}", e)))?;
        info!(session = %self.settings.session_file.display(), "User session connected");
        Ok(client)
    }

    async fn connected(&self) -> Result<&Connected> {
        self.connected
            .get_or_try_init(|| async {
                let client = self.connect().await?;
                let authorized = client
                    .is_authorized()
                    .await
                    .map_err(|e| SearchError::Channel(e.to_string()))?;
                if !authorized {
                    return Err(SearchError::Channel(
                        "User session is not logged in; run `book-bot channel-login`".to_string(),
                    ));
                }
                let channel = self.find_channel(&client).await?;
                Ok(Connected { client, channel })
            })
            .await
    }

    async fn find_channel(&self, client: &Client) -> Result<PackedChat> {
        let wanted = self.settings.channel.trim();
        if let Some(username) = wanted.strip_prefix('@') {
            return client
                .resolve_username(username)
                .await
                .map_err(|e| SearchError::Channel(e.to_string()))?
                .map(|chat| chat.pack())
                .ok_or_else(|| SearchError::Channel(format!("Channel {} not found", wanted)));
        }

        let id: i64 = wanted
            .parse()
            .map_err(|_| SearchError::Channel(format!("Invalid channel id: {}", wanted)))?;
        let bare = bare_channel_id(id);
        let mut dialogs = client.iter_dialogs();
        while let Some(dialog) = dialogs
            .next()
            .await
            .map_err(|e| SearchError::Channel(e.to_string()))?
        {
            let chat: &Chat = dialog.chat();
            if chat.id() == bare {
                debug!(channel = %chat.name(), "Channel found among dialogs");
                return Ok(chat.pack());
            }
        }
        Err(SearchError::Channel(format!(
            "Channel {} is not among the account's dialogs; join it first",
            wanted
        )))
    }

    /// Logs the user account in and saves the session file. `ask` shows a prompt and returns
    /// the typed answer. Returns the account's display name.
    pub async fn login<F>(&self, mut ask: F) -> Result<String>
    where
        F: FnMut(&str) -> std::io::Result<String>,
    {
        let client = self.connect().await?;
        let authorized = client
            .is_authorized()
            .await
            .map_err(|e| SearchError::Channel(e.to_string()))?;

        if !authorized {
            let phone = ask("Phone number (international format): ")?;
            let token = client
                .request_login_code(phone.trim())
                .await
                .map_err(|e| SearchError::Channel(format!("Login code request failed: {}", e)))?;
            let code = ask("Login code: ")?;
            match client.sign_in(&token, code.trim()).await {
                Ok(_) => {}
                Err(SignInError::PasswordRequired(password_token)) => {
                    let password = ask("Two-step verification password: ")?;
                    client
                        .check_password(password_token, password.trim())
                        .await
                        .map_err(|e| SearchError::Channel(format!("Password rejected: {}", e)))?;
                }
                Err(e) => return Err(SearchError::Channel(format!("Sign-in failed: {}", e))),
            }
        }

        client
            .session()
            .save_to_file(&self.settings.session_file)?;
        let me = client
            .get_me()
            .await
            .map_err(|e| SearchError::Channel(e.to_string()))?;
        Ok(me.full_name())
    }
}

#[async_trait]
impl ChannelIndex for GrammersIndex {
    async fn search_posts(&self, query: &str, limit: usize) -> Result<Vec<ChannelPost>> {
        let connected = self.connected().await?;
        let channel_id = connected.channel.id;
        let mut messages = connected
            .client
            .search_messages(connected.channel)
            .query(query)
            .limit(limit.max(1) * SCAN_PER_RESULT);

        let mut posts = Vec::new();
        while let Some(message) = messages
            .next()
            .await
            .map_err(|e| SearchError::Channel(e.to_string()))?
        {
            let Some(Media::Document(document)) = message.media() else {
                continue;
            };
            let name = document.name().trim().to_string();
            posts.push(ChannelPost {
                channel_id,
                message_id: message.id(),
                file_name: (!name.is_empty()).then_some(name),
                text: message.text().to_string(),
            });
            if posts.len() >= limit {
                break;
            }
        }
        if posts.is_empty() {
            warn!(query = %query, "No channel post with a file matched");
        }
        Ok(posts)
    }
}
