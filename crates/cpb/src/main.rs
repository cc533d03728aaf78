use std::sync::Arc;

use cpb_core::config::Config;
use cpb_github::GithubInviter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cpb_core::logging::init("cpb")?;

    let cfg = Arc::new(Config::load()?);
    tracing::debug!(?cfg, "configuration loaded");

    let inviter = Arc::new(GithubInviter::new(&cfg)?);

    cpb_telegram::router::run_polling(cfg, inviter)
        .await
        .map_err(|e| anyhow::anyhow!("telegram bot failed: {e}"))?;

    Ok(())
}
