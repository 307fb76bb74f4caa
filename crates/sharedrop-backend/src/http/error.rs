//! Mapping of HTTP failures into [`AppError`].

use reqwest::{Response, StatusCode};
use serde::Deserialize;
use tracing::warn;

use sharedrop_core::error::{AppError, ErrorKind};
use sharedrop_core::result::AppResult;

/// Error payload returned by the remote service.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message.
    #[serde(default)]
    pub message: Option<String>,
    /// Short error code or title.
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// Pick the most descriptive message, falling back to the status line.
    pub fn into_message(self, status: StatusCode) -> String {
        self.message
            .filter(|m| !m.is_empty())
            .or(self.error.filter(|e| !e.is_empty()))
            .unwrap_or_else(|| format!("Request failed with status {status}"))
    }
}

/// Map a reqwest failure (connect, timeout, decode) into an [`AppError`].
pub(crate) fn transport_error(err: reqwest::Error) -> AppError {
    if err.is_decode() {
        AppError::with_source(
            ErrorKind::Serialization,
            format!("Unexpected response body: {err}"),
            err,
        )
    } else {
        AppError::with_source(ErrorKind::Transport, format!("Request failed: {err}"), err)
    }
}

/// Pass successful responses through; turn error statuses into errors
/// carrying the remote message.
pub(crate) async fn check_status(response: Response) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .unwrap_or_default()
        .into_message(status);

    warn!(%status, message = %message, "Remote call rejected");

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::authentication(message),
        StatusCode::NOT_FOUND => AppError::not_found(message),
        _ => AppError::external(message),
    })
}
