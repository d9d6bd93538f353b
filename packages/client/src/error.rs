//! Error types for the bough client.

use bough_shared::codec::CodecError;
use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Server URL could not be used at all
    #[error("Invalid server URL '{0}'")]
    InvalidUrl(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Envelope could not be encoded for sending
    #[error(transparent)]
    Codec(#[from] CodecError),
}
