use tracing_subscriber::{fmt, EnvFilter};

use crate::Result;

/// Initialize logging/tracing for the bot.
///
/// Safe to call more than once: the single-event driver runs it on every
/// invocation and only the first call installs the subscriber.
pub fn init(service_name: &str) -> Result<()> {
    // Default: info for our crates, warn for HTTP internals.
    // Can be overridden with `RUST_LOG`.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "info,cpb=info,cpb_core=info,cpb_github=info,cpb_telegram=info,{}=info,hyper=warn,reqwest=warn",
            service_name.replace('-', "_")
        ))
    });

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .try_init();

    Ok(())
}
