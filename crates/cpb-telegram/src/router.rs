use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};
use tokio::sync::OnceCell;

use cpb_core::{
    config::Config, errors::Error, invite::Inviter, messaging::port::MessagingPort,
    router::CommandRouter, Result,
};

use crate::handlers;
use crate::{build_bot, TelegramMessenger};

#[derive(Clone)]
pub struct AppState {
    pub router: Arc<CommandRouter>,
    bot: Bot,
    bot_username: Arc<OnceCell<String>>,
}

impl AppState {
    pub fn new(cfg: &Config, bot: Bot, inviter: Arc<dyn Inviter>) -> Self {
        let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
        let router = Arc::new(CommandRouter::new(
            inviter,
            messenger,
            cfg.invitation_page_url(),
        ));
        Self {
            router,
            bot,
            bot_username: Arc::new(OnceCell::new()),
        }
    }

    /// Pre-seed the username (the polling driver already fetched it).
    pub fn with_bot_username(self, username: impl Into<String>) -> Self {
        let _ = self.bot_username.set(username.into());
        self
    }

    /// Our `@username`, fetched with `getMe` on first use.
    pub async fn bot_username(&self) -> Result<&str> {
        let name = self
            .bot_username
            .get_or_try_init(|| async {
                self.bot
                    .get_me()
                    .await
                    .map(|me| me.username().to_string())
                    .map_err(|e| Error::External(format!("telegram error: {e}")))
            })
            .await?;
        Ok(name.as_str())
    }
}

/// Long-poll driver: build the router once and serve until Ctrl-C.
pub async fn run_polling(cfg: Arc<Config>, inviter: Arc<dyn Inviter>) -> anyhow::Result<()> {
    let bot = build_bot(&cfg)?;

    let mut state = AppState::new(&cfg, bot.clone(), inviter);
    match bot.get_me().await {
        Ok(me) => {
            tracing::info!(username = %me.username(), "bot started");
            state = state.with_bot_username(me.username());
        }
        Err(e) => tracing::warn!(error = %e, "get_me failed; polling anyway"),
    }
    tracing::info!(
        org = %cfg.github_org,
        team_id = cfg.github_team_id,
        "inviting into organization"
    );

    let state = Arc::new(state);
    let handler = dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    tracing::info!("bot stopped");
    Ok(())
}
