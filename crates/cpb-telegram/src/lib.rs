//! Telegram adapter (teloxide).
//!
//! This crate implements the `cpb-core` MessagingPort over the Telegram Bot API
//! and drives the command router from either a long-poll dispatcher or a
//! single serverless event.

use async_trait::async_trait;

use teloxide::{prelude::*, types::ParseMode};

use tokio::time::sleep;

pub mod handlers;
pub mod lambda;
pub mod router;

use cpb_core::{
    config::Config,
    domain::{ChatId, MessageId, MessageRef},
    errors::Error,
    messaging::{port::MessagingPort, types::TextFormat},
    Result,
};

/// Bot client for the configured token, honoring a `TG_API_URL` override.
pub fn build_bot(cfg: &Config) -> Result<Bot> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());
    let Some(api_url) = cfg.telegram_api_url.as_deref() else {
        return Ok(bot);
    };
    let url = reqwest::Url::parse(api_url)
        .map_err(|e| Error::Config(format!("TG_API_URL is not a valid URL: {e}")))?;
    Ok(bot.set_api_url(url))
}

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn map_err(e: teloxide::RequestError) -> Error {
        Error::External(format!("telegram error: {e}"))
    }

    /// Honors one flood-control `RetryAfter`; every other error is returned as-is.
    async fn with_retry<T, Fut>(&self, mut op: impl FnMut() -> Fut) -> Result<T>
    where
        Fut: std::future::IntoFuture<Output = std::result::Result<T, teloxide::RequestError>>,
        Fut::IntoFuture: Send,
    {
        const MAX_RETRIES: usize = 1;
        let mut attempts = 0usize;
        loop {
            match op().await {
                Ok(v) => return Ok(v),
                Err(e) => match e {
                    teloxide::RequestError::RetryAfter(d) if attempts < MAX_RETRIES => {
                        attempts += 1;
                        sleep(d).await;
                        continue;
                    }
                    other => return Err(Self::map_err(other)),
                },
            }
        }
    }
}

#[async_trait]
impl MessagingPort for TelegramMessenger {
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        format: TextFormat,
    ) -> Result<MessageRef> {
        let msg = self
            .with_retry(|| {
                let req = self.bot.send_message(Self::tg_chat(chat_id), text.to_string());
                match format {
                    TextFormat::Plain => req,
                    TextFormat::MarkdownV2 => req.parse_mode(ParseMode::MarkdownV2),
                }
            })
            .await?;

        Ok(MessageRef {
            chat_id,
            message_id: MessageId(msg.id.0),
        })
    }
}
