use async_trait::async_trait;
use serde::Serialize;

/// JSON body of an organization invitation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InvitationRequest {
    pub email: String,
    pub team_ids: Vec<u64>,
}

impl InvitationRequest {
    pub fn new(email: impl Into<String>, team_id: u64) -> Self {
        Self {
            email: email.into(),
            team_ids: vec![team_id],
        }
    }
}

/// Hexagonal port for issuing organization invitations.
///
/// Callers validate the address first; implementations do not re-validate.
/// The result is true only when the invitation was created. Every call is a
/// single independent attempt.
#[async_trait]
pub trait Inviter: Send + Sync {
    async fn invite(&self, email: &str) -> bool;
}
