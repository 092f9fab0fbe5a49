//! Mapping between `reqwest` results and [`IntegrationError`].

use pipeline::IntegrationError;
use reqwest::Response;
use serde::de::DeserializeOwned;

pub(crate) const JSON_API: &str = "application/vnd.api+json";

pub(crate) fn transport(error: reqwest::Error) -> IntegrationError {
    IntegrationError::Transport {
        message: error.to_string(),
    }
}

/// Passes 2xx responses through; turns anything else into
/// [`IntegrationError::Status`] carrying the response text.
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

/// Reads a successful response body as JSON.
pub(crate) async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, IntegrationError> {
    let bytes = ensure_success(response)
        .await?
        .bytes()
        .await
        .map_err(transport)?;
    serde_json::from_slice(&bytes).map_err(|e| IntegrationError::Decode {
        message: e.to_string(),
    })
}
