//! Mapping between `reqwest` results and [`IntegrationError`] for the icon
//! store and the queue tracker.

use pipeline::IntegrationError;
use reqwest::Response;

/// Wraps connection, timeout and body-read failures.
pub(crate) fn transport(error: reqwest::Error) -> IntegrationError {
    IntegrationError::Transport {
        message: error.to_string(),
    }
}

/// Passes 2xx responses through; anything else becomes
/// [`IntegrationError::Status`] with the response text, so tracker and
/// storage failures keep the upstream explanation in the logs.
pub(crate) async fn ensure_success(response: Response) -> Result<Response, IntegrationError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(IntegrationError::Status {
        status: status.as_u16(),
        body,
    })
}
