//! Telegram update handlers.
//!
//! Each handler adapts a teloxide message into the messenger-neutral
//! `InboundMessage` and hands it to the core command router.

use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{Message, UpdateKind},
};

use cpb_core::{
    domain::{ChatId, UserId},
    messaging::types::InboundMessage,
    router::HandlerOutcome,
};

use crate::router::AppState;

/// Dispatcher endpoint for message updates.
///
/// Always returns `Ok`: failures are logged and must not stop the polling loop.
pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let outcome = process_message(&state, &msg).await;
    if outcome.is_failure() {
        tracing::warn!(chat_id = msg.chat.id.0, ?outcome, "message not handled");
    }
    Ok(())
}

/// Route one raw update. Anything other than a new message is ignored.
pub async fn process_update(state: &AppState, update: Update) -> HandlerOutcome {
    match update.kind {
        UpdateKind::Message(msg) => process_message(state, &msg).await,
        _ => HandlerOutcome::Ignored,
    }
}

async fn process_message(state: &AppState, msg: &Message) -> HandlerOutcome {
    let Some(inbound) = inbound_message(msg) else {
        return HandlerOutcome::Ignored;
    };

    // `/cmd@otherbot` in a group belongs to another bot.
    if inbound.mention.is_some() {
        match state.bot_username().await {
            Ok(me) if !inbound.is_addressed_to(me) => return HandlerOutcome::Ignored,
            Ok(_) => {}
            Err(e) => {
                return HandlerOutcome::Failed {
                    diagnostic: Some(e.to_string()),
                }
            }
        }
    }

    state.router.handle(&inbound).await
}

/// Text messages only; stickers, photos and the like have nothing to route.
pub fn inbound_message(msg: &Message) -> Option<InboundMessage> {
    let text = msg.text()?;
    let sender = msg.from().map(|u| UserId(u.id.0 as i64));
    Some(InboundMessage::new(ChatId(msg.chat.id.0), sender, text))
}
