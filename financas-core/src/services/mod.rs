//! Service layer - business logic orchestration
//!
//! Services depend on the `PersistenceGateway` port only, so any adapter can
//! back them.

pub mod credential;
mod entry;
pub mod logging;
pub mod validator;

pub use credential::{AuthenticationService, CredentialService};
pub use entry::EntryLifecycleService;
pub use logging::{EntryPoint, LogEntry, LogEvent, LoggingService};
