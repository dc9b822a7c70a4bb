//! Port definitions (hexagonal architecture)
//!
//! The services depend only on these traits; adapters provide the storage.

mod gateway;

pub use gateway::PersistenceGateway;
