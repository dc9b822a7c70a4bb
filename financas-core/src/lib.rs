//! Minhas Finanças Core - ledger entries and user credentials
//!
//! This crate follows hexagonal architecture:
//!
//! - **domain**: Entry, User, Password and the error types
//! - **ports**: the `PersistenceGateway` trait the services depend on
//! - **services**: entry validation and lifecycle, credentials, event logging
//! - **adapters**: DuckDB and in-memory gateways

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod migrations;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use adapters::DuckDbGateway;
use config::Config;
use services::{CredentialService, EntryLifecycleService};

pub use domain::result::{Error, OperationResult};
pub use domain::{Entry, EntryStatus, EntryType, Password, User};
pub use ports::PersistenceGateway;
pub use services::{AuthenticationService, EntryPoint, LogEntry, LogEvent, LoggingService};

/// Main context for ledger operations
///
/// Holds the configuration, the gateway and the services wired to it.
pub struct FinancasContext {
    pub config: Config,
    pub gateway: Arc<dyn PersistenceGateway>,
    pub entry_service: EntryLifecycleService,
    pub credential_service: CredentialService,
}

impl FinancasContext {
    /// Open the DuckDB ledger in `data_dir`, creating it and its schema if needed
    pub fn new(data_dir: &Path) -> Result<Self> {
        let config = Config::load(data_dir)?;
        std::fs::create_dir_all(data_dir)?;

        let db_path = data_dir.join(&config.database_file);
        let gateway = DuckDbGateway::new(&db_path, config.password_storage.storage())?;
        gateway.ensure_schema()?;

        Ok(Self::with_gateway(config, Arc::new(gateway)))
    }

    /// Wire services to an existing gateway
    pub fn with_gateway(config: Config, gateway: Arc<dyn PersistenceGateway>) -> Self {
        Self {
            entry_service: EntryLifecycleService::new(Arc::clone(&gateway)),
            credential_service: CredentialService::new(Arc::clone(&gateway)),
            config,
            gateway,
        }
    }
}
