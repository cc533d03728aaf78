use std::{env, fs, path::Path, time::Duration};

use crate::{errors::Error, Result};

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_GITHUB_ORG: &str = "cybersecurity-polito";
pub const DEFAULT_GITHUB_USERNAME: &str = "no-mood";
/// Every member lands in the "ALL" team.
pub const DEFAULT_GITHUB_TEAM_ID: u64 = 10_300_386;
pub const DEFAULT_INVITE_PACING: Duration = Duration::from_secs(1);

/// Typed configuration, built once per process (or per invocation for the
/// single-event driver) and passed by reference into constructors.
///
/// Tokens are not validated here: a missing token surfaces as an
/// authentication failure from Telegram or GitHub.
#[derive(Clone)]
pub struct Config {
    // Telegram
    pub telegram_bot_token: String,
    /// Bot API base override (self-hosted Bot API server); `None` uses teloxide's default.
    pub telegram_api_url: Option<String>,

    // GitHub
    pub github_token: String,
    pub github_api_url: String,
    pub github_org: String,
    pub github_username: String,
    pub github_team_id: u64,

    /// Fixed delay after every invitation call, whatever the outcome.
    pub invite_pacing: Duration,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("telegram_bot_token", &redact(&self.telegram_bot_token))
            .field("telegram_api_url", &self.telegram_api_url)
            .field("github_token", &redact(&self.github_token))
            .field("github_api_url", &self.github_api_url)
            .field("github_org", &self.github_org)
            .field("github_username", &self.github_username)
            .field("github_team_id", &self.github_team_id)
            .field("invite_pacing", &self.invite_pacing)
            .finish()
    }
}

impl Config {
    /// Load from the process environment, after merging a `.env` file if present.
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (used by `load` and by tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let telegram_bot_token = lookup("TG_TOKEN").unwrap_or_default();
        let telegram_api_url = lookup("TG_API_URL").and_then(non_empty);
        let github_token = lookup("GH_TOKEN").unwrap_or_default();

        let github_api_url = lookup("GH_API_URL")
            .and_then(non_empty)
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string());
        if !(github_api_url.starts_with("https://") || github_api_url.starts_with("http://")) {
            return Err(Error::Config(format!(
                "GH_API_URL must be an http(s) URL, got {github_api_url}"
            )));
        }
        let github_org = lookup("GH_ORG")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_GITHUB_ORG.to_string());
        let github_username = lookup("GH_USERNAME")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_GITHUB_USERNAME.to_string());
        let github_team_id = lookup("GH_TEAM_ID")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_GITHUB_TEAM_ID);

        let invite_pacing = lookup("INVITE_PACING_MS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_INVITE_PACING);

        Ok(Self {
            telegram_bot_token,
            telegram_api_url,
            github_token,
            github_api_url,
            github_org,
            github_username,
            github_team_id,
            invite_pacing,
        })
    }

    /// Page where invited users accept pending invitations.
    pub fn invitation_page_url(&self) -> String {
        format!("https://github.com/orgs/{}/invitation", self.github_org)
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for (key, val) in parse_dotenv(&contents) {
        if env::var_os(&key).is_some() {
            continue; // do not override existing env
        }
        env::set_var(key, val);
    }
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        out.push((key.to_string(), val));
    }
    out
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}
