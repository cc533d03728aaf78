//! GitHub adapter (organization invitations).
//!
//! Uses the REST `POST /orgs/{org}/invitations` endpoint with basic auth.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT},
    StatusCode,
};

use cpb_core::{
    config::Config,
    errors::Error,
    invite::{InvitationRequest, Inviter},
    Result,
};

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

#[derive(Clone)]
pub struct GithubInviter {
    endpoint: String,
    username: String,
    token: String,
    team_id: u64,
    pacing: Duration,
    http: reqwest::Client,
}

impl GithubInviter {
    pub fn new(cfg: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("cpb/", env!("CARGO_PKG_VERSION"))),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| Error::External(format!("github client build error: {e}")))?;

        Ok(Self {
            endpoint: format!("{}/orgs/{}/invitations", cfg.github_api_url, cfg.github_org),
            username: cfg.github_username.clone(),
            token: cfg.github_token.clone(),
            team_id: cfg.github_team_id,
            pacing: cfg.invite_pacing,
            http,
        })
    }

    /// One POST; `Ok(true)` only for 201 Created.
    async fn send_invitation(&self, email: &str) -> Result<bool> {
        let resp = self
            .http
            .post(&self.endpoint)
            .basic_auth(&self.username, Some(&self.token))
            .json(&InvitationRequest::new(email, self.team_id))
            .send()
            .await
            .map_err(|e| Error::External(format!("github request error: {e}")))?;

        let status = resp.status();
        if status == StatusCode::CREATED {
            tracing::debug!(%status, "github accepted invitation");
            return Ok(true);
        }

        let body = resp.text().await.unwrap_or_default();
        tracing::warn!(
            %status,
            body = %body.chars().take(500).collect::<String>(),
            "github rejected invitation"
        );
        Ok(false)
    }
}

#[async_trait]
impl Inviter for GithubInviter {
    async fn invite(&self, email: &str) -> bool {
        let res = self.send_invitation(email).await;

        // Fixed pacing after every call, whatever happened.
        if !self.pacing.is_zero() {
            tokio::time::sleep(self.pacing).await;
        }

        match res {
            Ok(created) => created,
            Err(e) => {
                tracing::warn!(error = %e, "github invitation failed");
                false
            }
        }
    }
}
