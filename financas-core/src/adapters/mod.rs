//! Adapter implementations (hexagonal architecture)
//!
//! Concrete implementations of the persistence port.

pub mod duckdb;
pub mod memory;

pub use self::duckdb::{DuckDbGateway, PasswordStorage};
pub use memory::{GatewayCall, InMemoryGateway};
