//! Adapters for the Evidence subsystem ports

pub mod cache;
pub mod memory;

pub use cache::CacheStore;
pub use memory::InMemoryKVStore;
