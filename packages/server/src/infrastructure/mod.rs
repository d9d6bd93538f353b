//! Infrastructure layer: in-memory store and the single-owner actors that
//! hold the server's shared mutable state.

pub mod broadcaster;
pub mod recents;
pub mod repository;

pub use broadcaster::Broadcaster;
pub use recents::{RecentBuffer, Recents};
pub use repository::InMemoryMessageRepository;
