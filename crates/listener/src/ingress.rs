use std::future::Future;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use orchestrator::PipelineExecutor;
use pipeline::{queue_id_of, Envelope, QueueId, QueueStatus, QueueTracker};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::{ApiKey, API_KEY_HEADER};

/// Shared state for the ingress handlers.
pub struct IngressState {
    api_key: ApiKey,
    executor: Arc<PipelineExecutor>,
    tracker: Arc<dyn QueueTracker>,
}

impl IngressState {
    pub fn new(
        api_key: ApiKey,
        executor: Arc<PipelineExecutor>,
        tracker: Arc<dyn QueueTracker>,
    ) -> Self {
        Self {
            api_key,
            executor,
            tracker,
        }
    }

    /// Mirrors `status` to the tracker. Failures are logged and otherwise
    /// ignored; they never change the response.
    async fn report(&self, queue_id: Option<QueueId>, status: QueueStatus) {
        let Some(queue_id) = queue_id else {
            return;
        };
        if let Err(e) = self.tracker.update_status(queue_id, status).await {
            warn!(%queue_id, %status, error = %e, "Failed to update queue status");
        }
    }
}

/// Builds the ingress router.
pub fn router(state: IngressState) -> Router {
    Router::new()
        .route("/", post(receive_message))
        .route("/health", get(health))
        .with_state(Arc::new(state))
}

/// Serves the ingress router until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    state: IngressState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "Ingress listening");
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

fn reply(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "message": message })))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn receive_message(
    State(state): State<Arc<IngressState>>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    // An unparseable body still gets the auth check before it is rejected.
    let raw: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let queue_id = queue_id_of(&raw);
    state.report(queue_id, QueueStatus::InProgress).await;

    let presented = headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());
    if !state.api_key.matches(presented) {
        warn!("Rejected request with missing or invalid API key");
        state.report(queue_id, QueueStatus::Error).await;
        return reply(StatusCode::FORBIDDEN, "Not Authorized to Access This Endpoint");
    }

    let envelope = match Envelope::from_value(&raw) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!(error = %e, "Rejected malformed envelope");
            state.report(queue_id, QueueStatus::Error).await;
            return reply(StatusCode::BAD_REQUEST, "Invalid request body");
        }
    };

    let outcome = state.executor.handle(&envelope.record).await;
    state.report(queue_id, outcome.queue_status()).await;

    let status = StatusCode::from_u16(outcome.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(outcome.body))
}
