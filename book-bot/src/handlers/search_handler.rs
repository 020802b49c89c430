//! Turns a text message into a list of book choices.

use crate::core::{Bot, Choice, Handler, HandlerResponse, Message, Result, CHAT_TYPE_PRIVATE};
use crate::messages;
use crate::session::{callback_data, SearchSessions};
use async_trait::async_trait;
use book_search::{BookCandidate, BookSearchService, CandidateKind, GoogleLinkProvider};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

pub const MIN_QUERY_CHARS: usize = 2;

pub struct SearchHandler {
    bot: Arc<dyn Bot>,
    service: Arc<BookSearchService>,
    sessions: Arc<SearchSessions>,
    link_fallback: bool,
}

impl SearchHandler {
    pub fn new(
        bot: Arc<dyn Bot>,
        service: Arc<BookSearchService>,
        sessions: Arc<SearchSessions>,
        link_fallback: bool,
    ) -> Self {
        Self {
            bot,
            service,
            sessions,
            link_fallback,
        }
    }

    async fn present(
        &self,
        message: &Message,
        query: &str,
        status_id: &str,
        candidates: Vec<BookCandidate>,
    ) -> Result<HandlerResponse> {
        if let Err(e) = self.bot.delete_message(&message.chat, status_id).await {
            warn!(error = %e, "Failed to delete status message");
        }
        let text = messages::choices_header(query, candidates.len());
        let token = self
            .sessions
            .insert(message.chat.id, query, candidates.clone())
            .await;
        let choices = build_choices(&token, &candidates);
        self.bot.send_choices(&message.chat, &text, &choices).await?;
        info!(token = %token, count = candidates.len(), "step: choices sent");
        Ok(HandlerResponse::Reply(text))
    }

    async fn not_found(
        &self,
        message: &Message,
        query: &str,
        status_id: &str,
    ) -> Result<HandlerResponse> {
        let text = messages::not_found(query);
        self.bot.edit_message(&message.chat, status_id, &text).await?;
        if self.link_fallback {
            let link = Choice::url(
                messages::GOOGLE_LINK_LABEL,
                GoogleLinkProvider::link_for(query),
            );
            self.bot
                .send_choices(&message.chat, messages::TRY_WEB_SEARCH, &[link])
                .await?;
        }
        Ok(HandlerResponse::Reply(text))
    }
}

/// Downloadable candidates become callback buttons, external ones open in the browser.
pub fn build_choices(token: &str, candidates: &[BookCandidate]) -> Vec<Choice> {
    candidates
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let label = messages::choice_label(i, &c.title);
            match c.kind {
                CandidateKind::External => Choice::url(label, c.url.clone()),
                CandidateKind::Page | CandidateKind::Direct | CandidateKind::ChannelPost => {
                    Choice::callback(label, callback_data(token, i))
                }
            }
        })
        .collect()
}

#[async_trait]
impl Handler for SearchHandler {
    #[instrument(skip(self, message), fields(chat_id = message.chat.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if message.is_callback() || message.command().is_some() {
            return Ok(HandlerResponse::Continue);
        }
        // Group chatter is never a title.
        if message.chat.chat_type != CHAT_TYPE_PRIVATE {
            debug!(chat_type = %message.chat.chat_type, "Ignoring text outside a private chat");
            return Ok(HandlerResponse::Ignore);
        }
        let query = message.content.trim();
        if query.is_empty() {
            return Ok(HandlerResponse::Ignore);
        }
        if query.chars().count() < MIN_QUERY_CHARS {
            self.bot.reply_to(message, messages::QUERY_TOO_SHORT).await?;
            return Ok(HandlerResponse::Reply(messages::QUERY_TOO_SHORT.to_string()));
        }

        info!(query = %query, "step: search started");
        let status_id = self
            .bot
            .send_message_and_return_id(&message.chat, &messages::searching(query))
            .await?;

        match self.service.search(query).await {
            Ok(candidates) if !candidates.is_empty() => {
                self.present(message, query, &status_id, candidates).await
            }
            Ok(_) => {
                info!(query = %query, "step: nothing found");
                self.not_found(message, query, &status_id).await
            }
            Err(e) => {
                error!(error = %e, query = %query, "Search failed");
                self.bot
                    .edit_message(&message.chat, &status_id, messages::SEARCH_FAILED)
                    .await?;
                Ok(HandlerResponse::Reply(messages::SEARCH_FAILED.to_string()))
            }
        }
    }
}
