//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use bough_shared::{
    protocol::{Node, NodeId},
    time::timestamp_to_rfc3339,
};
use serde::Serialize;

use crate::ui::state::AppState;

/// Snapshot of the server's activity
#[derive(Debug, Serialize)]
pub struct StatsDto {
    pub root: String,
    pub messages: usize,
    pub clients: usize,
    pub recent: Vec<String>,
}

/// One stored node plus its send time in RFC 3339
#[derive(Debug, Serialize)]
pub struct MessageDto {
    #[serde(flatten)]
    pub node: Node,
    pub sent_at: String,
}

impl From<Node> for MessageDto {
    fn from(node: Node) -> Self {
        let sent_at = timestamp_to_rfc3339(node.timestamp);
        Self { node, sent_at }
    }
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Store size, connected clients and the current recents sample
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<StatsDto> {
    let recent = state
        .recents
        .data()
        .await
        .into_iter()
        .map(|id| id.to_string())
        .collect();

    Json(StatsDto {
        root: state.welcome_client_usecase.root_id().to_string(),
        messages: state.repository.count().await,
        clients: state.broadcaster.client_count().await,
        recent,
    })
}

/// Get one node by id
pub async fn get_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageDto>, StatusCode> {
    state
        .repository
        .get(&NodeId::new(id))
        .await
        .map(|node| Json(MessageDto::from(node)))
        .ok_or(StatusCode::NOT_FOUND)
}
