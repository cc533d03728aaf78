use std::sync::Arc;

use crate::{
    email::{candidate_from_args, validate_email},
    invite::Inviter,
    messaging::{
        port::MessagingPort,
        types::{InboundMessage, TextFormat},
    },
    texts, Result,
};

/// Result of handling one inbound message.
///
/// Business failures (bad address, rejected invitation) are `Handled`: the user
/// got an answer. `Failed` means a reply could not be delivered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandlerOutcome {
    Handled,
    Ignored,
    Failed { diagnostic: Option<String> },
}

impl HandlerOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Commands the bot understands.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Route {
    Help,
    Invite,
    /// Plain text outside any command.
    NotACommand,
    /// A command we do not serve; left unanswered.
    Unknown,
}

impl Route {
    fn of(msg: &InboundMessage) -> Self {
        match msg.command.as_deref() {
            // `/start` shows the usage text too.
            Some("start") | Some("help") => Self::Help,
            Some("invite") => Self::Invite,
            Some(_) => Self::Unknown,
            None => Self::NotACommand,
        }
    }
}

/// Stateless command dispatcher: one inbound message in, replies out.
pub struct CommandRouter {
    inviter: Arc<dyn Inviter>,
    messenger: Arc<dyn MessagingPort>,
    invitation_page_url: String,
}

impl CommandRouter {
    pub fn new(
        inviter: Arc<dyn Inviter>,
        messenger: Arc<dyn MessagingPort>,
        invitation_page_url: impl Into<String>,
    ) -> Self {
        Self {
            inviter,
            messenger,
            invitation_page_url: invitation_page_url.into(),
        }
    }

    pub async fn handle(&self, msg: &InboundMessage) -> HandlerOutcome {
        let route = Route::of(msg);
        tracing::debug!(chat_id = msg.chat_id.0, ?route, "dispatching message");

        let res = match route {
            Route::Help => self.help(msg).await,
            Route::Invite => self.invite(msg).await,
            Route::NotACommand => {
                self.reply(msg, texts::INVALID_COMMAND, TextFormat::Plain)
                    .await
            }
            Route::Unknown => return HandlerOutcome::Ignored,
        };

        match res {
            Ok(()) => HandlerOutcome::Handled,
            Err(e) => {
                tracing::error!(chat_id = msg.chat_id.0, error = %e, "failed to reply");
                HandlerOutcome::Failed {
                    diagnostic: Some(e.to_string()),
                }
            }
        }
    }

    async fn help(&self, msg: &InboundMessage) -> Result<()> {
        self.reply(msg, texts::HELP_MARKDOWN_V2, TextFormat::MarkdownV2)
            .await
    }

    async fn invite(&self, msg: &InboundMessage) -> Result<()> {
        let email = candidate_from_args(&msg.args);
        if !validate_email(&email) {
            tracing::info!(chat_id = msg.chat_id.0, "rejected malformed address");
            return self
                .reply(msg, texts::INVALID_EMAIL, TextFormat::Plain)
                .await;
        }

        if self.inviter.invite(&email).await {
            tracing::info!(chat_id = msg.chat_id.0, %email, "invitation sent");
            let confirmed = async {
                self.reply(msg, &texts::invitation_sent(&email), TextFormat::Plain)
                    .await?;
                self.reply(
                    msg,
                    &texts::accept_instructions(&self.invitation_page_url),
                    TextFormat::Plain,
                )
                .await
            };
            // The invitation exists now; a redelivered update would issue it again.
            if let Err(e) = confirmed.await {
                tracing::error!(chat_id = msg.chat_id.0, error = %e, "invitation sent but confirmation failed");
            }
            Ok(())
        } else {
            tracing::warn!(chat_id = msg.chat_id.0, %email, "invitation failed");
            self.reply(msg, &texts::invitation_failed(&email), TextFormat::Plain)
                .await
        }
    }

    async fn reply(&self, msg: &InboundMessage, text: &str, format: TextFormat) -> Result<()> {
        self.messenger.send_text(msg.chat_id, text, format).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChatId, MessageId, MessageRef, UserId};
    use crate::errors::Error;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    const PAGE: &str = "https://github.com/orgs/cybersecurity-polito/invitation";

    struct ScriptedInviter {
        accept: bool,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedInviter {
        fn new(accept: bool) -> Arc<Self> {
            Arc::new(Self {
                accept,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Inviter for ScriptedInviter {
        async fn invite(&self, email: &str) -> bool {
            self.calls.lock().unwrap().push(email.to_string());
            self.accept
        }
    }

    #[derive(Default)]
    struct FakeMessenger {
        next_id: AtomicUsize,
        broken: AtomicBool,
        sends: Mutex<Vec<(ChatId, String, TextFormat)>>,
    }

    impl FakeMessenger {
        fn texts(&self) -> Vec<String> {
            self.sends
                .lock()
                .unwrap()
                .iter()
                .map(|(_, t, _)| t.clone())
                .collect()
        }
    }

    #[async_trait]
    impl MessagingPort for FakeMessenger {
        async fn send_text(
            &self,
            chat_id: ChatId,
            text: &str,
            format: TextFormat,
        ) -> Result<MessageRef> {
            if self.broken.load(Ordering::SeqCst) {
                return Err(Error::External("telegram error: network down".to_string()));
            }
            self.sends
                .lock()
                .unwrap()
                .push((chat_id, text.to_string(), format));
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i32;
            Ok(MessageRef {
                chat_id,
                message_id: MessageId(id),
            })
        }
    }

    fn setup(accept: bool) -> (CommandRouter, Arc<ScriptedInviter>, Arc<FakeMessenger>) {
        let inviter = ScriptedInviter::new(accept);
        let messenger = Arc::new(FakeMessenger::default());
        let router = CommandRouter::new(inviter.clone(), messenger.clone(), PAGE);
        (router, inviter, messenger)
    }

    fn msg(text: &str) -> InboundMessage {
        InboundMessage::new(ChatId(42), Some(UserId(1)), text)
    }

    #[tokio::test]
    async fn invite_success_sends_confirmation_then_instructions() {
        let (router, inviter, messenger) = setup(true);

        let out = router.handle(&msg("/invite s123456@studenti.polito.it")).await;

        assert_eq!(out, HandlerOutcome::Handled);
        assert_eq!(inviter.calls(), vec!["s123456@studenti.polito.it"]);
        assert_eq!(
            messenger.texts(),
            vec![
                "Invitation sent to s123456@studenti.polito.it.".to_string(),
                format!("Please check your email or {PAGE} to accept the invitation."),
            ]
        );
        let sends = messenger.sends.lock().unwrap();
        assert!(sends
            .iter()
            .all(|(c, _, f)| *c == ChatId(42) && *f == TextFormat::Plain));
    }

    #[tokio::test]
    async fn invite_rejected_by_api_reports_admin_contact() {
        let (router, inviter, messenger) = setup(false);

        let out = router.handle(&msg("/invite s123456@studenti.polito.it")).await;

        assert_eq!(out, HandlerOutcome::Handled);
        assert_eq!(inviter.calls().len(), 1);
        assert_eq!(
            messenger.texts(),
            vec![
                "Error sending invitation to s123456@studenti.polito.it.\nPlease contact the administrator."
            ]
        );
    }

    #[tokio::test]
    async fn invalid_address_never_reaches_inviter() {
        let (router, inviter, messenger) = setup(true);

        for text in [
            "/invite",
            "/invite S123456@studenti.polito.it",
            "/invite s12345@studenti.polito.it",
            "/invite s123456@studenti.polito.it please",
        ] {
            assert_eq!(router.handle(&msg(text)).await, HandlerOutcome::Handled);
        }

        assert!(inviter.calls().is_empty());
        assert_eq!(messenger.texts(), vec![texts::INVALID_EMAIL; 4]);
    }

    #[tokio::test]
    async fn repeated_invites_are_independent_calls() {
        let (router, inviter, _messenger) = setup(true);
        let m = msg("/invite s123456@studenti.polito.it");
        router.handle(&m).await;
        router.handle(&m).await;
        assert_eq!(inviter.calls().len(), 2);
    }

    #[tokio::test]
    async fn start_and_help_share_the_usage_text() {
        let (router, inviter, messenger) = setup(true);

        assert_eq!(router.handle(&msg("/start")).await, HandlerOutcome::Handled);
        assert_eq!(router.handle(&msg("/help")).await, HandlerOutcome::Handled);

        let sends = messenger.sends.lock().unwrap();
        assert_eq!(sends.len(), 2);
        for (_, text, format) in sends.iter() {
            assert_eq!(text, texts::HELP_MARKDOWN_V2);
            assert_eq!(*format, TextFormat::MarkdownV2);
        }
        let en = texts::HELP_MARKDOWN_V2.find("Welcome").unwrap();
        let it = texts::HELP_MARKDOWN_V2.find("Benvenuto").unwrap();
        assert!(en < it);
        assert!(inviter.calls().is_empty());
    }

    #[tokio::test]
    async fn plain_text_gets_invalid_command_reply() {
        let (router, _inviter, messenger) = setup(true);
        let out = router.handle(&msg("hello")).await;
        assert_eq!(out, HandlerOutcome::Handled);
        assert_eq!(messenger.texts(), vec![texts::INVALID_COMMAND]);
    }

    #[tokio::test]
    async fn unknown_command_is_ignored() {
        let (router, _inviter, messenger) = setup(true);
        let out = router.handle(&msg("/stats")).await;
        assert_eq!(out, HandlerOutcome::Ignored);
        assert!(messenger.texts().is_empty());
    }

    #[tokio::test]
    async fn confirmation_failure_after_issued_invitation_is_still_handled() {
        let (router, inviter, messenger) = setup(true);
        messenger.broken.store(true, Ordering::SeqCst);

        let out = router.handle(&msg("/invite s123456@studenti.polito.it")).await;

        assert_eq!(out, HandlerOutcome::Handled);
        assert_eq!(inviter.calls().len(), 1);
    }

    #[tokio::test]
    async fn rejection_reply_failure_is_reported() {
        let (router, _inviter, messenger) = setup(false);
        messenger.broken.store(true, Ordering::SeqCst);

        let out = router.handle(&msg("/invite s123456@studenti.polito.it")).await;
        assert!(out.is_failure());
    }

    #[tokio::test]
    async fn reply_failure_is_reported_not_fatal() {
        let (router, _inviter, messenger) = setup(true);
        messenger.broken.store(true, Ordering::SeqCst);

        let out = router.handle(&msg("/help")).await;
        assert!(out.is_failure());
        match out {
            HandlerOutcome::Failed { diagnostic } => {
                assert!(diagnostic.unwrap().contains("network down"));
            }
            other => panic!("unexpected outcome {other:?}"),
        }

        messenger.broken.store(false, Ordering::SeqCst);
        assert_eq!(router.handle(&msg("/help")).await, HandlerOutcome::Handled);
    }
}
