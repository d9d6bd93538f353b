//! UseCase layer: one struct per protocol operation.

mod accept_message;
mod error;
mod query_message;
mod welcome_client;

pub use accept_message::AcceptMessageUseCase;
pub use error::{AcceptError, QueryError};
pub use query_message::QueryMessageUseCase;
pub use welcome_client::WelcomeClientUseCase;
