//! Component factory: builds BotComponents from config. Isolates assembly logic from runner.

use crate::chain::HandlerChain;
use crate::config::{AppExtensions, BotConfig, DownloadSettings};
use crate::core::Bot as CoreBot;
use crate::handlers::{AuthHandler, DownloadHandler, LoggingHandler, SearchHandler, StartHandler};
use crate::session::SearchSessions;
use crate::telegram::TelegramBotAdapter;
use anyhow::Result;
use book_search::{
    AiFilter, BookSearchService, ChannelSearch, Downloader, GoogleLinkProvider, GoogleSearch,
    GrammersIndex, HttpClient, HttpSettings, LibraryScraper, LinkResolver, SearchProvider,
};
use std::sync::Arc;
use std::time::Duration;
use teloxide::prelude::*;
use tracing::{error, info, instrument, warn};

/// Everything the handlers need, built once at startup.
pub struct BotComponents {
    pub teloxide_bot: Bot,
    /// What handlers talk to; the Telegram adapter unless a test injects its own.
    pub bot: Arc<dyn CoreBot>,
    pub service: Arc<BookSearchService>,
    pub resolver: Arc<LinkResolver>,
    pub downloader: Arc<Downloader>,
    pub sessions: Arc<SearchSessions>,
}

fn teloxide_bot(config: &BotConfig) -> Bot {
    let bot = Bot::new(config.bot_token().to_string());
    match config.telegram_api_url() {
        Some(url_str) => match reqwest::Url::parse(url_str) {
            Ok(url) => bot.set_api_url(url),
            Err(e) => {
                error!(error = %e, url = %url_str, "Invalid TELEGRAM_API_URL, using default");
                bot
            }
        },
        None => bot,
    }
}

/// Page and search requests use the short timeout, file transfers the long one.
pub fn http_clients(download: &DownloadSettings) -> Result<(HttpClient, HttpClient)> {
    let page = HttpSettings {
        user_agent: download.user_agent.clone(),
        timeout: Duration::from_secs(download.http_timeout_secs),
        max_redirects: download.max_redirects,
    };
    let file = HttpSettings {
        timeout: Duration::from_secs(download.download_timeout_secs),
        ..page.clone()
    };
    Ok((HttpClient::new(&page)?, HttpClient::new(&file)?))
}

/// Providers in SEARCH_PROVIDERS order. `google` and `channel` are skipped when their credentials
/// are missing.
#[instrument(skip(extensions, http))]
pub fn build_search_service(
    extensions: &dyn AppExtensions,
    http: &HttpClient,
) -> Result<BookSearchService> {
    let search = extensions.search();
    let mut service = BookSearchService::new(search.max_results);

    for id in &search.providers {
        let provider: Arc<dyn SearchProvider> = match id.as_str() {
            "library" => Arc::new(LibraryScraper::new(
                http.clone(),
                &search.library_base_url,
                &search.library_search_path,
            )?),
            "google" => match search.google_credentials() {
                Some((key, cx)) => Arc::new(GoogleSearch::new(
                    http.clone(),
                    &search.google_api_url,
                    key.to_string(),
                    cx.to_string(),
                )),
                None => {
                    warn!("google provider needs GOOGLE_API_KEY and GOOGLE_CSE_ID, skipped");
                    continue;
                }
            },
            "google_link" => Arc::new(GoogleLinkProvider::new()),
            "channel" => match search.channel_settings()? {
                Some(settings) => {
                    info!(channel = %settings.channel, "Channel search enabled");
                    Arc::new(ChannelSearch::new(GrammersIndex::new(settings)))
                }
                None => {
                    warn!("channel provider needs API_ID, API_HASH and TARGET_CHANNEL_ID, skipped");
                    continue;
                }
            },
            other => anyhow::bail!("Unknown search provider '{}'", other),
        };
        service = service.add_provider(provider);
    }

    let filter = extensions.ai_filter().map(|ai| {
        info!(model = %ai.model, base_url = %ai.base_url, "AI relevance filter enabled");
        AiFilter::new(
            ai.api_key.clone().unwrap_or_default(),
            ai.base_url.clone(),
            ai.model.clone(),
        )
    });

    info!(providers = ?service.provider_ids(), "Search service ready");
    Ok(service.with_filter(filter))
}

/// Builds components; `bot_override` replaces the Telegram adapter for handlers (tests).
#[instrument(skip(config, bot_override))]
pub fn build_bot_components(
    config: &BotConfig,
    bot_override: Option<Arc<dyn CoreBot>>,
) -> Result<BotComponents> {
    let teloxide_bot = teloxide_bot(config);
    let bot = bot_override.unwrap_or_else(|| {
        Arc::new(TelegramBotAdapter::new(teloxide_bot.clone())) as Arc<dyn CoreBot>
    });

    let download = config.download();
    let (page_http, file_http) = http_clients(download)?;
    let service = build_search_service(config.extensions(), &page_http)?;

    Ok(BotComponents {
        teloxide_bot,
        bot,
        service: Arc::new(service),
        resolver: Arc::new(LinkResolver::new(page_http, download.resolve_max_hops)),
        downloader: Arc::new(Downloader::new(
            file_http,
            download.dir.clone(),
            download.max_bytes,
        )),
        sessions: Arc::new(SearchSessions::new(download.session_ttl_secs)),
    })
}

/// Logging → auth (only with ALLOWED_USERS) → start → search → download.
pub fn build_handler_chain(config: &BotConfig, components: &BotComponents) -> HandlerChain {
    let mut chain = HandlerChain::new().add_handler(Arc::new(LoggingHandler));
    if !config.allowed_users().is_empty() {
        chain = chain.add_handler(Arc::new(AuthHandler::new(config.allowed_users().to_vec())));
    }
    chain
        .add_handler(Arc::new(StartHandler::new(components.bot.clone())))
        .add_handler(Arc::new(SearchHandler::new(
            components.bot.clone(),
            components.service.clone(),
            components.sessions.clone(),
            config.search().link_fallback,
        )))
        .add_handler(Arc::new(DownloadHandler::new(
            components.bot.clone(),
            components.sessions.clone(),
            components.resolver.clone(),
            components.downloader.clone(),
        )))
}
