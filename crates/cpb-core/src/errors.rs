/// Core error type for the bot.
///
/// Adapter crates map their specific errors into this type so both drivers
/// can report failures consistently.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("invalid event: {0}")]
    InvalidEvent(String),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
