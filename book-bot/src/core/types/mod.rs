//! Core types: user, chat, message, choices, handler response, and Handler trait.

mod chat;
mod choice;
mod handler;
mod message;
mod response;
mod user;

pub use chat::{Chat, CHAT_TYPE_PRIVATE};
pub use choice::{Choice, ChoiceAction};
pub use handler::{Handler, ToCoreMessage, ToCoreUser};
pub use message::{Message, MessageDirection, MESSAGE_TYPE_CALLBACK, MESSAGE_TYPE_TEXT};
pub use response::HandlerResponse;
pub use user::User;
