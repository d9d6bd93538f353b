//! Repository implementations

mod inmemory;

pub use inmemory::InMemoryMessageRepository;
