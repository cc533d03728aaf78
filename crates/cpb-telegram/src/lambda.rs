//! Single-event driver: one serverless invocation, one Telegram update.

use std::sync::Arc;

use teloxide::types::Update;

use cpb_core::{
    config::Config,
    errors::Error,
    event::{InvocationEvent, InvocationResponse},
    router::HandlerOutcome,
    Result,
};
use cpb_github::GithubInviter;

use crate::{build_bot, handlers, router::AppState};

/// Process one raw invocation event.
///
/// Never fails: every error collapses into the 500 "Failure" response and is
/// only logged.
pub async fn process_event(cfg: Arc<Config>, raw_event: &str) -> InvocationResponse {
    InvocationResponse::from_result(try_process_event(cfg, raw_event).await)
}

async fn try_process_event(cfg: Arc<Config>, raw_event: &str) -> Result<HandlerOutcome> {
    let event = InvocationEvent::parse(raw_event)?;
    let update: Update = serde_json::from_str(&event.body)
        .map_err(|e| Error::InvalidEvent(format!("update: {e}")))?;

    // Fresh router per invocation.
    let inviter = Arc::new(GithubInviter::new(&cfg)?);
    let bot = build_bot(&cfg)?;
    let state = AppState::new(&cfg, bot, inviter);

    tracing::debug!(update_id = update.id, "processing update");
    Ok(handlers::process_update(&state, update).await)
}
