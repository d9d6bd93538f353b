//! bough broadcast server.
//!
//! Accepts new nodes of a threaded conversation, assigns their ids, and fans
//! them out to every connected client. Newcomers are welcomed with the root id
//! and a sample of recent activity and fetch missing ancestors on demand.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
