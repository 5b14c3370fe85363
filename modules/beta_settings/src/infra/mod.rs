//! Infrastructure - backend implementations

pub mod memory;

pub use memory::InMemoryBackend;
