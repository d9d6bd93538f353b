//! Text codec for envelopes.
//!
//! Each envelope travels as one JSON document per WebSocket text frame.

use serde::Deserialize;
use thiserror::Error;

use crate::protocol::Envelope;

/// Codec errors
#[derive(Debug, Error)]
pub enum CodecError {
    /// Well-formed envelope with a `type` this peer does not understand
    #[error("Unrecognized envelope kind '{0}'")]
    UnknownKind(String),

    /// Input that is not an envelope at all
    #[error("Malformed envelope: {0}")]
    Malformed(#[source] serde_json::Error),

    /// Envelope could not be serialized
    #[error("Failed to encode envelope: {0}")]
    Encode(#[source] serde_json::Error),
}

#[derive(Deserialize)]
struct KindOnly {
    r#type: String,
}

const KNOWN_KINDS: [&str; 3] = ["WELCOME", "QUERY", "NEW_MESSAGE"];

/// Encode an envelope as a JSON text frame.
pub fn encode(envelope: &Envelope) -> Result<String, CodecError> {
    serde_json::to_string(envelope).map_err(CodecError::Encode)
}

/// Decode a JSON text frame into an envelope.
pub fn decode(text: &str) -> Result<Envelope, CodecError> {
    match serde_json::from_str::<Envelope>(text) {
        Ok(envelope) => Ok(envelope),
        Err(err) => match serde_json::from_str::<KindOnly>(text) {
            Ok(KindOnly { r#type }) if !KNOWN_KINDS.contains(&r#type.as_str()) => {
                Err(CodecError::UnknownKind(r#type))
            }
            _ => Err(CodecError::Malformed(err)),
        },
    }
}
