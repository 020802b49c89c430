//! # Book bot
//!
//! Telegram bot: the user sends a book title, picks one of the results, and gets the PDF/EPUB.
//! Search, link resolution and download live in the `book-search` crate; this crate holds the
//! core types, the handler chain, teloxide glue, config and the handlers.

pub mod chain;
pub mod cli;
pub mod components;
pub mod config;
pub mod core;
pub mod handlers;
pub mod messages;
pub mod runner;
pub mod session;
pub mod telegram;

pub use cli::{load_config, run_channel_login, run_fetch, run_search, Cli, Commands};

pub use crate::core::{
    init_tracing, parse_message_id, Bot, BotError, Chat, Choice, ChoiceAction, Handler,
    HandlerError, HandlerResponse, Message, MessageDirection, Result, ToCoreMessage, ToCoreUser,
    User, MESSAGE_TYPE_CALLBACK, MESSAGE_TYPE_TEXT,
};

pub use chain::HandlerChain;

pub use telegram::{
    run_dispatcher, TelegramBotAdapter, TelegramCallbackWrapper, TelegramMessageWrapper,
    TelegramUserWrapper,
};

pub use config::{AppExtensions, BookExtensions, BotConfig};
pub use runner::{run_bot, BookBot};

pub use components::{build_bot_components, build_handler_chain, BotComponents};
pub use handlers::{AuthHandler, DownloadHandler, LoggingHandler, SearchHandler, StartHandler};
pub use session::{callback_data, parse_callback_data, SearchSessions, MAX_SESSION_TTL_SECS};
