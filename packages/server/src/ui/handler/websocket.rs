//! WebSocket connection handler.
//!
//! Each connection is registered with the broadcaster on accept, then gets a
//! writer task, a one-shot welcome task and a read loop. Every inbound
//! envelope is handled in its own task, so responses to one client are not
//! necessarily in request order.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use bough_shared::{
    codec::{self, CodecError},
    protocol::Envelope,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::{mpsc, watch};

use crate::{
    domain::{ConnectionId, ConnectionState, Destination},
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

pub async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (destination, outbound) = Destination::channel();
    let connection_id = destination.id;
    let to_client = destination.sender.clone();

    // Eligible for broadcasts from here on, possibly before the welcome.
    state.broadcaster.add(destination);
    let (connection_state, _) = watch::channel(ConnectionState::Accepted);
    let connection_state = Arc::new(connection_state);
    tracing::info!("Client '{}' connected", connection_id);

    let (sender, mut receiver) = socket.split();
    let mut send_task = tokio::spawn(write_envelopes(connection_id, sender, outbound));

    {
        let state = state.clone();
        let to_client = to_client.clone();
        let connection_state = connection_state.clone();
        tokio::spawn(async move {
            let welcome = state.welcome_client_usecase.execute().await;
            if to_client.send(Arc::new(welcome)).await.is_err() {
                tracing::warn!("Client '{}' left before its welcome was sent", connection_id);
                return;
            }
            connection_state.send_modify(|current| *current = current.welcomed());
            tracing::debug!("Welcome queued for client '{}'", connection_id);
        });
    }

    let recv_task = async {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error from '{}': {}", connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => match codec::decode(text.as_str()) {
                    Ok(envelope) => {
                        connection_state.send_modify(|current| *current = current.activated());
                        tokio::spawn(handle_envelope(
                            state.clone(),
                            connection_id,
                            to_client.clone(),
                            envelope,
                        ));
                    }
                    Err(CodecError::UnknownKind(kind)) => {
                        tracing::warn!(
                            "Unrecognized message type '{}' from '{}', ignoring",
                            kind,
                            connection_id
                        );
                    }
                    Err(e) => {
                        tracing::warn!("Discarding envelope from '{}': {}", connection_id, e);
                    }
                },
                Message::Binary(data) => {
                    tracing::warn!(
                        "Discarding {} byte binary frame from '{}'",
                        data.len(),
                        connection_id
                    );
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", connection_id);
                    break;
                }
                _ => {}
            }
        }
    };

    // Whichever side finishes first ends the connection.
    tokio::select! {
        _ = recv_task => send_task.abort(),
        _ = &mut send_task => {},
    };

    tracing::info!(
        "Client '{}' disconnected (state {:?})",
        connection_id,
        *connection_state.borrow()
    );
    // Dropping the outbound receiver with the writer task deregisters this
    // destination from the broadcaster.
}

/// Drain the outbound queue onto the socket.
async fn write_envelopes(
    connection_id: ConnectionId,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
    mut outbound: mpsc::Receiver<Arc<Envelope>>,
) {
    while let Some(envelope) = outbound.recv().await {
        let text = match codec::encode(&envelope) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("{}", e);
                continue;
            }
        };
        if let Err(e) = sender.send(Message::Text(text.into())).await {
            tracing::warn!("Failed to write to client '{}': {}", connection_id, e);
            break;
        }
    }
}

/// Dispatch one inbound envelope by kind.
async fn handle_envelope(
    state: Arc<AppState>,
    connection_id: ConnectionId,
    to_client: mpsc::Sender<Arc<Envelope>>,
    envelope: Envelope,
) {
    match envelope {
        Envelope::Query { id } => {
            tracing::info!("Handling query for '{}' from '{}'", id, connection_id);
            match state.query_message_usecase.execute(&id).await {
                Ok(response) => {
                    if to_client.send(Arc::new(response)).await.is_err() {
                        tracing::debug!("Client '{}' left before query response", connection_id);
                    }
                }
                Err(e) => tracing::warn!("{}", e),
            }
        }
        Envelope::NewMessage { node } => {
            if let Err(e) = state.accept_message_usecase.execute(node).await {
                tracing::warn!("Rejected new message from '{}': {}", connection_id, e);
            }
        }
        other => {
            tracing::warn!(
                "Unexpected {} from client '{}', ignoring",
                other.kind(),
                connection_id
            );
        }
    }
}
