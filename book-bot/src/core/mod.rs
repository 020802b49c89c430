//! Core types and traits: Handler, Bot, Message, HandlerResponse, error, logger.
//! Transport-agnostic; the telegram module adapts teloxide to these.

pub mod bot;
pub mod error;
pub mod logger;
pub mod types;

pub use bot::{parse_message_id, Bot};
pub use error::{BotError, HandlerError, Result};
pub use logger::init_tracing;
pub use types::{
    Chat, Choice, ChoiceAction, Handler, HandlerResponse, Message, MessageDirection,
    ToCoreMessage, ToCoreUser, User, CHAT_TYPE_PRIVATE, MESSAGE_TYPE_CALLBACK, MESSAGE_TYPE_TEXT,
};
