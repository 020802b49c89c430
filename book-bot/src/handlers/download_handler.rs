//! Handles result button presses: resolve the page, download the file, upload it, delete the
//! local copy. Channel posts are forwarded as they are.

use crate::core::{Bot, Handler, HandlerResponse, Message, Result};
use crate::messages;
use crate::session::{parse_callback_data, SearchSessions};
use async_trait::async_trait;
use book_search::{
    parse_post_link, BookCandidate, CandidateKind, DirectLink, DownloadedFile, Downloader,
    FileKind, LinkResolver, SearchError,
};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

pub struct DownloadHandler {
    bot: Arc<dyn Bot>,
    sessions: Arc<SearchSessions>,
    resolver: Arc<LinkResolver>,
    downloader: Arc<Downloader>,
}

impl DownloadHandler {
    pub fn new(
        bot: Arc<dyn Bot>,
        sessions: Arc<SearchSessions>,
        resolver: Arc<LinkResolver>,
        downloader: Arc<Downloader>,
    ) -> Self {
        Self {
            bot,
            sessions,
            resolver,
            downloader,
        }
    }

    /// Direct candidates skip page resolution.
    async fn fetch(
        &self,
        candidate: &BookCandidate,
    ) -> std::result::Result<DownloadedFile, SearchError> {
        let link = match candidate.kind {
            CandidateKind::Direct => DirectLink {
                url: candidate.url.clone(),
                kind: FileKind::from_url(&candidate.url),
            },
            _ => self.resolver.resolve(&candidate.url).await?,
        };
        info!(url = %link.url, kind = ?link.kind, "step: direct link ready");
        self.downloader.download(&link, &candidate.title).await
    }

    async fn forward_post(
        &self,
        message: &Message,
        candidate: &BookCandidate,
        status_id: &str,
    ) -> Result<HandlerResponse> {
        let forwarded = match parse_post_link(&candidate.url) {
            Some(post) => {
                self.bot
                    .forward_message(&message.chat, post.chat_id, post.message_id)
                    .await
            }
            None => {
                warn!(url = %candidate.url, "Channel candidate without a post link");
                self.bot
                    .edit_message(&message.chat, status_id, messages::DOWNLOAD_FAILED)
                    .await?;
                return Ok(HandlerResponse::Reply(messages::DOWNLOAD_FAILED.to_string()));
            }
        };

        if let Err(e) = forwarded {
            error!(error = %e, url = %candidate.url, "Failed to forward channel post");
            self.bot
                .edit_message(&message.chat, status_id, messages::FORWARD_FAILED)
                .await?;
            return Ok(HandlerResponse::Reply(messages::FORWARD_FAILED.to_string()));
        }
        if let Err(e) = self.bot.delete_message(&message.chat, status_id).await {
            warn!(error = %e, "Failed to delete status message");
        }
        info!(url = %candidate.url, "step: channel post forwarded");
        Ok(HandlerResponse::Reply(candidate.title.clone()))
    }

    async fn deliver(
        &self,
        message: &Message,
        candidate: &BookCandidate,
        file: DownloadedFile,
    ) -> Result<String> {
        let file_name = file.file_name.clone();
        let sent = self
            .bot
            .send_document(&message.chat, file.path(), &file_name, Some(&candidate.title))
            .await;
        if let Err(e) = file.cleanup() {
            warn!(error = %e, "Failed to delete local copy");
        }
        sent.map(|_| file_name)
    }
}

/// User-facing text for a failed fetch.
pub fn error_text(error: &SearchError) -> String {
    match error {
        SearchError::NoDownloadLink(_) => messages::NO_DOWNLOAD_LINK.to_string(),
        SearchError::TooLarge { size, limit } => messages::too_large(*size, *limit),
        SearchError::UnsupportedFile(_) => messages::UNSUPPORTED_FILE.to_string(),
        _ => messages::DOWNLOAD_FAILED.to_string(),
    }
}

#[async_trait]
impl Handler for DownloadHandler {
    #[instrument(skip(self, message), fields(chat_id = message.chat.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if !message.is_callback() {
            return Ok(HandlerResponse::Continue);
        }
        let Some((token, index)) = message
            .callback_data
            .as_deref()
            .and_then(parse_callback_data)
        else {
            return Ok(HandlerResponse::Ignore);
        };

        let Some(candidate) = self.sessions.get(token, message.chat.id, index).await else {
            info!(token = %token, index, "step: session expired or unknown");
            self.bot
                .send_message(&message.chat, messages::SESSION_EXPIRED)
                .await?;
            return Ok(HandlerResponse::Reply(messages::SESSION_EXPIRED.to_string()));
        };
        if !candidate.is_downloadable() {
            return Ok(HandlerResponse::Ignore);
        }

        info!(title = %candidate.title, url = %candidate.url, "step: fetch started");
        let status_id = self
            .bot
            .send_message_and_return_id(&message.chat, &messages::fetching(&candidate.title))
            .await?;

        if candidate.kind == CandidateKind::ChannelPost {
            return self.forward_post(message, &candidate, &status_id).await;
        }

        let outcome = match self.fetch(&candidate).await {
            Ok(file) => {
                info!(file_name = %file.file_name, size = file.size, "step: downloaded");
                self.deliver(message, &candidate, file).await
            }
            Err(e) => {
                warn!(error = %e, url = %candidate.url, "Fetch failed");
                let text = error_text(&e);
                self.bot.edit_message(&message.chat, &status_id, &text).await?;
                return Ok(HandlerResponse::Reply(text));
            }
        };

        match outcome {
            Ok(file_name) => {
                if let Err(e) = self.bot.delete_message(&message.chat, &status_id).await {
                    warn!(error = %e, "Failed to delete status message");
                }
                info!(file_name = %file_name, "step: document sent");
                Ok(HandlerResponse::Reply(file_name))
            }
            Err(e) => {
                error!(error = %e, "Failed to send document");
                self.bot
                    .edit_message(&message.chat, &status_id, messages::DOWNLOAD_FAILED)
                    .await?;
                Ok(HandlerResponse::Reply(messages::DOWNLOAD_FAILED.to_string()))
            }
        }
    }
}
