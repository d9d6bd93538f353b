//! bough client library.
//!
//! Keeps a partial local copy of the conversation tree, renders one thread
//! at a time, and fetches missing ancestors from the server on demand.

pub mod command;
pub mod controller;
pub mod domain;
pub mod error;
pub mod formatter;
pub mod multiplexer;
pub mod runner;
pub mod session;
pub mod transport;
pub mod ui;

pub use runner::run_client;
