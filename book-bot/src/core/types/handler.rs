use async_trait::async_trait;

use super::{message::Message, response::HandlerResponse, user::User};
use crate::core::error::Result;

pub trait ToCoreUser: Send + Sync {
    fn to_core(&self) -> User;
}

/// Implemented by teloxide messages and callback queries.
pub trait ToCoreMessage: Send + Sync {
    fn to_core(&self) -> Message;
}

/// A step in the [`crate::HandlerChain`].
///
/// Every handler's `before` runs first, in registration order; any `false` drops the update.
/// Then `handle` runs in order until one returns a response for which
/// [`HandlerResponse::ends_chain`] holds. Finally every `after` runs in reverse order with that
/// response. An `Err` from any hook aborts the chain.
#[async_trait]
pub trait Handler: Send + Sync {
    fn name(&self) -> &'static str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }

    async fn before(&self, _message: &Message) -> Result<bool> {
        Ok(true)
    }

    async fn handle(&self, _message: &Message) -> Result<HandlerResponse> {
        Ok(HandlerResponse::Continue)
    }

    async fn after(&self, _message: &Message, _response: &HandlerResponse) -> Result<()> {
        Ok(())
    }
}
