//! Single-event driver binary.
//!
//! Under AWS Lambda (`AWS_LAMBDA_RUNTIME_API` set) this speaks the custom
//! runtime protocol: fetch the next invocation, process it, post the response,
//! repeat. Elsewhere it reads one event from stdin and prints the response.

use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use cpb_core::{config::Config, event::InvocationResponse};

const RUNTIME_API_VERSION: &str = "2018-06-01";
const REQUEST_ID_HEADER: &str = "lambda-runtime-aws-request-id";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cpb_core::logging::init("cpb-lambda")?;

    match std::env::var("AWS_LAMBDA_RUNTIME_API") {
        Ok(api) if !api.trim().is_empty() => run_runtime_loop(api.trim()).await,
        _ => run_once_from_stdin().await,
    }
}

async fn run_once_from_stdin() -> anyhow::Result<()> {
    let mut raw = Vec::new();
    tokio::io::stdin()
        .read_to_end(&mut raw)
        .await
        .context("read event from stdin")?;

    let response = handle_invocation(&event_text(&raw)).await;

    let mut out = serde_json::to_string(&response)?;
    out.push('\n');
    let mut stdout = tokio::io::stdout();
    stdout.write_all(out.as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}

async fn run_runtime_loop(api: &str) -> anyhow::Result<()> {
    let http = reqwest::Client::new();
    let base = format!("http://{api}/{RUNTIME_API_VERSION}/runtime");
    tracing::info!(%base, "lambda runtime loop started");

    loop {
        let next = http
            .get(format!("{base}/invocation/next"))
            .send()
            .await
            .context("fetch next invocation")?;

        let request_id = next
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .context("invocation without request id")?;
        let raw = next.text().await.context("read invocation body")?;

        let response = handle_invocation(&raw).await;

        let posted = http
            .post(format!("{base}/invocation/{request_id}/response"))
            .json(&response)
            .send()
            .await;
        match posted {
            Ok(r) if r.status().is_success() => {}
            Ok(r) => tracing::error!(%request_id, status = %r.status(), "runtime rejected response"),
            Err(e) => tracing::error!(%request_id, error = %e, "failed to post response"),
        }
    }
}

/// Invalid UTF-8 is still an event: it fails to parse and yields "Failure".
fn event_text(raw: &[u8]) -> std::borrow::Cow<'_, str> {
    String::from_utf8_lossy(raw)
}

/// Configuration is read per invocation; nothing is retained between events.
async fn handle_invocation(raw: &str) -> InvocationResponse {
    let cfg = match Config::load() {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            tracing::error!(error = %e, "configuration error");
            return InvocationResponse::failure();
        }
    };
    cpb_telegram::lambda::process_event(cfg, raw).await
}
