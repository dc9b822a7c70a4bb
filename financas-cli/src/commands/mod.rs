//! CLI command implementations

pub mod balance;
pub mod entry;
pub mod logs;
pub mod user;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use uuid::Uuid;

use financas_core::{EntryPoint, Error, FinancasContext, LogEvent, LoggingService, OperationResult};

use crate::output::{self, AlreadyReported};

/// Raised when a referenced user id does not exist
pub const USER_ID_NOT_FOUND: &str =
    "Não foi possível realizar a consulta. Usuário não encontrado para o Id informado.";

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let data_dir = get_data_dir().ok()?;
    std::fs::create_dir_all(&data_dir).ok()?;
    LoggingService::new(&data_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Data directory from `FINANCAS_DIR`, else `~/.financas`
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("FINANCAS_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".financas"))
        .ok_or_else(|| anyhow!("Could not find home directory; set FINANCAS_DIR"))
}

/// Open the ledger in the data directory
pub fn get_context() -> Result<FinancasContext> {
    let data_dir = get_data_dir()?;

    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;

    FinancasContext::new(&data_dir).context("Failed to open the ledger")
}

/// Parse a UUID argument
pub fn parse_id(value: &str, what: &str) -> Result<Uuid> {
    Uuid::parse_str(value.trim()).with_context(|| format!("Invalid {} id: {}", what, value))
}

/// Fail with the adapter message unless `user_id` belongs to a registered user
pub fn require_user(ctx: &FinancasContext, user_id: Uuid) -> financas_core::domain::result::Result<()> {
    match ctx.credential_service.get_user_by_id(user_id)? {
        Some(_) => Ok(()),
        None => Err(Error::business_rule(USER_ID_NOT_FOUND)),
    }
}

/// Print the outcome of a core operation and log it
///
/// In JSON mode both outcomes are printed as an `OperationResult` on stdout.
/// Otherwise `render` prints the success and errors go to stderr in red.
pub fn report<T: Serialize>(
    json: bool,
    logger: &Option<LoggingService>,
    command: &str,
    entity: &str,
    result: financas_core::domain::result::Result<T>,
    render: impl FnOnce(&T),
) -> Result<()> {
    match result {
        Ok(data) => {
            log_event(
                logger,
                LogEvent::new("command_succeeded").with_command(command).with_entity(entity),
            );
            if json {
                println!("{}", serde_json::to_string_pretty(&OperationResult::ok(data))?);
            } else {
                render(&data);
            }
            Ok(())
        }
        Err(e) => {
            log_event(
                logger,
                LogEvent::new("command_failed")
                    .with_command(command)
                    .with_entity(entity)
                    .with_error(&e),
            );
            if json {
                println!("{}", serde_json::to_string_pretty(&OperationResult::<T>::from_error(&e))?);
            } else {
                output::error(&e.to_string());
            }
            Err(AlreadyReported.into())
        }
    }
}
