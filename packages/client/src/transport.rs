//! WebSocket transport: envelope writer and server event reader.

use async_trait::async_trait;
use bough_shared::{
    codec::{self, CodecError},
    protocol::{Envelope, Node, Welcome},
};
use futures_util::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use tokio::{net::TcpStream, sync::mpsc};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, tungstenite::protocol::Message};

use crate::{error::ClientError, multiplexer::EnvelopeWriter};

pub type ServerStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// What the server told us
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    Welcome(Welcome),
    Message(Node),
}

/// [`EnvelopeWriter`] over the write half of a WebSocket
pub struct WsEnvelopeWriter {
    sink: SplitSink<ServerStream, Message>,
}

impl WsEnvelopeWriter {
    pub fn new(sink: SplitSink<ServerStream, Message>) -> Self {
        Self { sink }
    }
}

#[async_trait]
impl EnvelopeWriter for WsEnvelopeWriter {
    async fn write(&mut self, envelope: Envelope) -> Result<(), ClientError> {
        let text = codec::encode(&envelope)?;
        self.sink
            .send(Message::text(text))
            .await
            .map_err(|e| ClientError::ConnectionError(e.to_string()))
    }
}

/// Decode frames from the server into events until the connection ends.
///
/// Returns an error when the connection is lost, and `Ok` when the event
/// receiver has gone away.
pub async fn read_server_events(
    mut stream: SplitStream<ServerStream>,
    events: mpsc::UnboundedSender<ServerEvent>,
) -> Result<(), ClientError> {
    while let Some(message) = stream.next().await {
        let text = match message {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => {
                tracing::info!("Server closed the connection");
                return Err(ClientError::ConnectionError(
                    "Server closed the connection".to_string(),
                ));
            }
            Ok(_) => continue,
            Err(e) => {
                tracing::warn!("WebSocket read error: {}", e);
                return Err(ClientError::ConnectionError(e.to_string()));
            }
        };

        let event = match codec::decode(text.as_str()) {
            Ok(Envelope::Welcome(welcome)) => ServerEvent::Welcome(welcome),
            Ok(Envelope::NewMessage { node }) => ServerEvent::Message(node),
            Ok(other) => {
                tracing::warn!("Unexpected {} from server, ignoring", other.kind());
                continue;
            }
            Err(CodecError::UnknownKind(kind)) => {
                tracing::warn!("Unknown message type '{}' from server, ignoring", kind);
                continue;
            }
            Err(e) => {
                tracing::warn!("{}", e);
                continue;
            }
        };
        if events.send(event).is_err() {
            return Ok(());
        }
    }
    Err(ClientError::ConnectionError("Connection lost".to_string()))
}
