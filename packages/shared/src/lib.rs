//! Shared building blocks for the bough server and client.
//!
//! Holds the wire protocol (nodes and envelopes), the text codec used on
//! WebSocket frames, and small utilities for time and logging.

pub mod codec;
pub mod logger;
pub mod protocol;
pub mod time;
