//! Serverless invocation contract for the single-event driver.
//!
//! Input: `{"body": "<JSON-encoded Telegram update>", ...}`.
//! Output: `{"statusCode": 200, "body": "Success"}` or
//! `{"statusCode": 500, "body": "Failure"}`. The status only says whether
//! processing completed, not whether an invitation was issued.

use serde::{Deserialize, Serialize};

use crate::{errors::Error, router::HandlerOutcome, Result};

/// Gateway event envelope. Extra fields (headers, request context, ...) are ignored.
#[derive(Clone, Debug, Deserialize)]
pub struct InvocationEvent {
    pub body: String,
}

impl InvocationEvent {
    pub fn parse(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| Error::InvalidEvent(format!("envelope: {e}")))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl InvocationResponse {
    pub fn success() -> Self {
        Self {
            status_code: 200,
            body: "Success".to_string(),
        }
    }

    pub fn failure() -> Self {
        Self {
            status_code: 500,
            body: "Failure".to_string(),
        }
    }

    /// Reduce a processing result to the coarse hosting status.
    ///
    /// The diagnostic is logged, never returned to the caller.
    pub fn from_result(res: Result<HandlerOutcome>) -> Self {
        match res {
            Ok(HandlerOutcome::Handled) | Ok(HandlerOutcome::Ignored) => Self::success(),
            Ok(HandlerOutcome::Failed { diagnostic }) => {
                tracing::error!(
                    diagnostic = diagnostic.as_deref().unwrap_or("-"),
                    "update processing failed"
                );
                Self::failure()
            }
            Err(e) => {
                tracing::error!(error = %e, "invocation failed");
                Self::failure()
            }
        }
    }
}
