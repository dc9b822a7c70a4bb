//! Minhas Finanças CLI - personal ledger in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use uuid::Uuid;

mod commands;
mod output;

use commands::{balance, entry, logs, user};
use output::AlreadyReported;

/// Minhas Finanças - income and expense ledger
#[derive(Parser)]
#[command(name = "mf", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage users
    User {
        #[command(subcommand)]
        command: user::UserCommands,
    },

    /// Check email and password
    Login {
        #[arg(long)]
        email: String,
        /// Password (falls back to FINANCAS_PASSWORD, then a prompt)
        #[arg(long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage ledger entries
    Entry {
        #[command(subcommand)]
        command: entry::EntryCommands,
    },

    /// Show a user's balance of effective entries
    Balance {
        /// User ID
        #[arg(long)]
        user_id: Uuid,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is::<AlreadyReported>() => ExitCode::FAILURE,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::User { command } => user::run(command),
        Commands::Login { email, password, json } => user::run_login(email, password, json),
        Commands::Entry { command } => entry::run(command),
        Commands::Balance { user_id, json } => balance::run(user_id, json),
        Commands::Logs { command } => logs::run(command),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_entry_add() {
        let cli = Cli::try_parse_from([
            "mf",
            "entry",
            "add",
            "--user-id",
            "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "--description",
            "Salario",
            "--month",
            "1",
            "--year",
            "2024",
            "--value",
            "5000.00",
            "--type",
            "receita",
        ])
        .unwrap();

        match cli.command {
            Commands::Entry {
                command: entry::EntryCommands::Add { entry_type, month, date, .. },
            } => {
                assert_eq!(entry_type, financas_core::EntryType::Income);
                assert_eq!(month, 1);
                assert!(date.is_none());
            }
            _ => panic!("expected entry add"),
        }
    }

    #[test]
    fn test_search_status_is_parsed_by_clap() {
        let user = "67e55044-10b1-426f-9247-bb680e5fe0c8";

        let cli = Cli::try_parse_from(["mf", "entry", "search", "--user-id", user, "--status", "efetivado"]).unwrap();
        match cli.command {
            Commands::Entry {
                command: entry::EntryCommands::Search { status, .. },
            } => assert_eq!(status, Some(financas_core::EntryStatus::Effective)),
            _ => panic!("expected entry search"),
        }

        let err = Cli::try_parse_from(["mf", "entry", "search", "--user-id", user, "--status", "PAGO"])
            .err()
            .unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
        assert!(!err.to_string().contains("atualizar o status"));
    }

    #[test]
    fn test_parse_rejects_bad_user_id() {
        assert!(Cli::try_parse_from(["mf", "balance", "--user-id", "abc"]).is_err());
    }
}
