//! BookBot: config, components and handler chain, plus the `run` entry point.

use crate::chain::HandlerChain;
use crate::components::{build_bot_components, build_handler_chain, BotComponents};
use crate::config::{AppExtensions, BotConfig};
use crate::core::{init_tracing, Bot, HandlerResponse, Message as CoreMessage};
use crate::telegram::run_dispatcher;
use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info, instrument};

pub struct BookBot {
    pub config: BotConfig,
    pub components: BotComponents,
    pub handler_chain: HandlerChain,
}

impl BookBot {
    pub fn new(config: BotConfig) -> Result<Self> {
        Self::build(config, None)
    }

    /// Handlers talk to `bot` instead of Telegram (integration tests).
    pub fn new_with_bot(config: BotConfig, bot: Arc<dyn Bot>) -> Result<Self> {
        Self::build(config, Some(bot))
    }

    fn build(config: BotConfig, bot: Option<Arc<dyn Bot>>) -> Result<Self> {
        let components = build_bot_components(&config, bot)?;
        let handler_chain = build_handler_chain(&config, &components);
        Ok(Self {
            config,
            components,
            handler_chain,
        })
    }

    /// Runs one update through the chain the way the dispatcher does. `None` when a handler
    /// failed; the failure is logged, not surfaced to the chat.
    pub async fn handle_update(&self, message: &CoreMessage) -> Option<HandlerResponse> {
        match self.handler_chain.handle(message).await {
            Ok(response) => Some(response),
            Err(e) => {
                error!(
                    error = %e,
                    user_id = message.user.id,
                    kind = %message.message_type,
                    "Update dropped"
                );
                None
            }
        }
    }
}

/// Main entry: validate config, init logging, build components, then run the dispatcher.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    config.validate()?;
    init_tracing(config.log_file())?;

    let search = config.search();
    info!(
        providers = ?search.providers,
        max_results = search.max_results,
        ai_filter = config.extensions().ai_filter().is_some(),
        download_dir = %config.download().dir.display(),
        "Initializing bot"
    );

    let bot = BookBot::new(config)?;
    let teloxide_bot = bot.components.teloxide_bot.clone();

    info!("Bot started successfully");
    run_dispatcher(teloxide_bot, bot.handler_chain).await
}
