//! HTTP trigger surface.
//!
//! Exposes the sync controller as a small JSON API:
//! - `GET  /health`
//! - `GET  /api/chart`   renders the current list (trigger `none`)
//! - `POST /api/trigger` runs one [`Trigger`] and returns the [`SyncResponse`]
//! - `GET  /api/stored`  metadata of the stored row, 404 if never saved

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::info;

use crate::sync::{SharedSession, SyncController, SyncResponse, Trigger};

// ---------------------------------------------------------------------------
// Shared application state
// ---------------------------------------------------------------------------

/// Shared state for axum handlers.
#[derive(Clone)]
pub struct AppState {
    controller: Arc<SyncController>,
    session: SharedSession,
}

impl AppState {
    pub fn new(controller: Arc<SyncController>, session: SharedSession) -> Self {
        Self {
            controller,
            session,
        }
    }
}

/// Metadata of the stored row for this session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSummary {
    pub user_id: String,
    pub project_id: String,
    pub task_count: usize,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ErrorBody {
    error: String,
}

// ---------------------------------------------------------------------------
// GanttServer
// ---------------------------------------------------------------------------

/// Background HTTP server bound to one address.
pub struct GanttServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl GanttServer {
    /// Bind to `{host}:{port}` (port `0` auto-assigns) and serve in a background task.
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP listener cannot bind.
    pub async fn start(state: AppState, host: &str, port: u16) -> crate::error::Result<Self> {
        let bind_addr = format!("{host}:{port}");
        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|e| crate::error::GanttError::Server(format!("bind {bind_addr} failed: {e}")))?;
        let addr = listener.local_addr().map_err(|e| {
            crate::error::GanttError::Server(format!("failed to get local addr: {e}"))
        })?;

        let app = router(state);
        info!("gantt server listening on http://{addr}");

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("gantt server error: {e}");
            }
        });

        Ok(Self { addr, handle })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Abort the server task.
    pub fn shutdown(&self) {
        self.handle.abort();
    }
}

impl Drop for GanttServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Build the router without binding.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/api/chart", get(handle_chart))
        .route("/api/trigger", post(handle_trigger))
        .route("/api/stored", get(handle_stored))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn handle_health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn handle_chart(State(state): State<AppState>) -> Json<SyncResponse> {
    Json(dispatch(&state, Trigger::None).await)
}

async fn handle_trigger(
    State(state): State<AppState>,
    Json(trigger): Json<Trigger>,
) -> Json<SyncResponse> {
    Json(dispatch(&state, trigger).await)
}

async fn handle_stored(State(state): State<AppState>) -> Response {
    let owner = state.session.lock().await.owner().clone();
    match state.controller.store().fetch(&owner) {
        Ok(Some(row)) => Json(StoredSummary {
            user_id: row.owner.user_id,
            project_id: row.owner.project_id,
            task_count: row.tasks.len(),
            created_at: row.created_at,
            last_updated: row.last_updated,
        })
        .into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, format!("nothing stored for {owner}")),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

async fn dispatch(state: &AppState, trigger: Trigger) -> SyncResponse {
    let mut session = state.session.lock().await;
    state.controller.handle(&mut session, trigger)
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorBody { error: message })).into_response()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use crate::store::{InMemoryChartStore, OwnerKey};
    use crate::sync::Session;

    #[test]
    fn stored_summary_serializes_timestamps() {
        let at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let summary = StoredSummary {
            user_id: "u".to_owned(),
            project_id: "p".to_owned(),
            task_count: 6,
            created_at: at,
            last_updated: at,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["task_count"], 6);
        assert_eq!(json["last_updated"], "2023-11-14T22:13:20Z");
    }

    #[tokio::test]
    async fn dispatch_serializes_through_session() {
        let store = Arc::new(InMemoryChartStore::new());
        let state = AppState::new(
            Arc::new(SyncController::new(store.clone())),
            Session::new(OwnerKey::new("u", "p")).shared(),
        );
        let resp = dispatch(&state, Trigger::ManualSave).await;
        assert!(resp.status.starts_with("Saved at "));
        assert_eq!(store.len(), 1);
    }
}
