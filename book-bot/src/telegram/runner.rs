//! Dispatcher runner: converts text messages and button presses to core::Message and passes them
//! to the HandlerChain, one spawned task per update.

use crate::chain::HandlerChain;
use crate::core::{Message as CoreMessage, ToCoreMessage};
use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, Message};
use tracing::{error, info, instrument};

use super::adapters::{TelegramCallbackWrapper, TelegramMessageWrapper};

fn spawn_chain(chain: HandlerChain, core_msg: CoreMessage) {
    tokio::spawn(async move {
        info!(
            user_id = core_msg.user.id,
            chat_id = core_msg.chat.id,
            message_id = %core_msg.id,
            "step: processing update (handler chain started)"
        );
        if let Err(e) = chain.handle(&core_msg).await {
            error!(error = %e, user_id = core_msg.user.id, "Handler chain failed");
        }
    });
}

async fn on_message(chain: HandlerChain, msg: Message) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        info!(chat_id = msg.chat.id.0, "Received non-text message, ignored");
        return Ok(());
    };
    let core_msg = TelegramMessageWrapper(&msg).to_core();
    info!(
        user_id = core_msg.user.id,
        chat_id = core_msg.chat.id,
        message_content = %text,
        "Received message"
    );
    spawn_chain(chain, core_msg);
    Ok(())
}

async fn on_callback(bot: Bot, chain: HandlerChain, q: CallbackQuery) -> ResponseResult<()> {
    // Stops the client spinner; the reply itself comes as a regular message.
    if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
        error!(error = %e, "Failed to answer callback query");
    }
    let core_msg = TelegramCallbackWrapper(&q).to_core();
    info!(
        user_id = core_msg.user.id,
        chat_id = core_msg.chat.id,
        callback_data = ?core_msg.callback_data,
        "Received button press"
    );
    spawn_chain(chain, core_msg);
    Ok(())
}

/// Runs until ctrl-c.
#[instrument(skip(bot, handler_chain))]
pub async fn run_dispatcher(bot: teloxide::Bot, handler_chain: HandlerChain) -> Result<()> {
    if let Ok(me) = bot.get_me().await {
        if let Some(username) = &me.user.username {
            info!(username = %username, "Bot started");
        }
    }

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(on_message))
        .branch(Update::filter_callback_query().endpoint(on_callback));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![handler_chain])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
