//! Entry commands - add, update, delete, change status, show and search

use anyhow::Result;
use chrono::NaiveDate;
use clap::Subcommand;
use rust_decimal::Decimal;
use uuid::Uuid;

use financas_core::domain::result::Result as CoreResult;
use financas_core::{Entry, EntryStatus, EntryType, Error, FinancasContext};

use super::{get_context, get_logger, report, require_user};
use crate::output;

pub const ENTRY_NOT_FOUND: &str = "Lançamento não encontrado na base de Dados.";
pub const INVALID_STATUS: &str =
    "Não foi possível atualizar o status do lançamento, envie um status válido.";

#[derive(Subcommand)]
pub enum EntryCommands {
    /// Record a new entry (starts as PENDING)
    Add {
        /// Owner user ID
        #[arg(long)]
        user_id: Uuid,
        #[arg(long)]
        description: String,
        /// Month (1-12)
        #[arg(long)]
        month: i32,
        #[arg(long)]
        year: i32,
        /// Positive amount, e.g. 1500.00
        #[arg(long, allow_hyphen_values = true)]
        value: Decimal,
        /// INCOME or EXPENSE
        #[arg(long = "type")]
        entry_type: EntryType,
        /// Registration date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change fields of an existing entry
    Update {
        /// Entry ID
        id: Uuid,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        month: Option<i32>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long, allow_hyphen_values = true)]
        value: Option<Decimal>,
        #[arg(long = "type")]
        entry_type: Option<EntryType>,
        /// Move the entry to another user
        #[arg(long)]
        user_id: Option<Uuid>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete an entry
    Delete {
        /// Entry ID
        id: Uuid,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set the status of an entry (PENDING, EFFECTIVE, CANCELED)
    Status {
        /// Entry ID
        id: Uuid,
        status: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one entry
    Show {
        /// Entry ID
        id: Uuid,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List a user's entries, optionally filtered
    Search {
        /// Owner user ID
        #[arg(long)]
        user_id: Uuid,
        /// Exact description
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        month: Option<i32>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long = "type")]
        entry_type: Option<EntryType>,
        /// PENDING, EFFECTIVE or CANCELED
        #[arg(long)]
        status: Option<EntryStatus>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn find_entry(ctx: &FinancasContext, id: Uuid) -> CoreResult<Entry> {
    ctx.entry_service
        .get_by_id(id)?
        .ok_or_else(|| Error::business_rule(ENTRY_NOT_FOUND))
}

fn parse_status(status: &str) -> CoreResult<EntryStatus> {
    status
        .parse::<EntryStatus>()
        .map_err(|_| Error::business_rule(INVALID_STATUS))
}

fn print_saved(message: &str, entry: &Entry) {
    output::success(message);
    output::print_entry(entry);
}

pub fn run(command: EntryCommands) -> Result<()> {
    let logger = get_logger();
    let ctx = get_context()?;

    match command {
        EntryCommands::Add {
            user_id,
            description,
            month,
            year,
            value,
            entry_type,
            date,
            json,
        } => {
            let result = require_user(&ctx, user_id).and_then(|_| {
                let mut entry = Entry::new()
                    .with_description(description)
                    .with_month(month)
                    .with_year(year)
                    .with_value(value)
                    .with_type(entry_type)
                    .with_owner(user_id);
                entry.registration_date = date;
                ctx.entry_service.create(entry)
            });

            report(json, &logger, "entry add", "entry", result, |entry| {
                print_saved("Entry recorded", entry)
            })
        }
        EntryCommands::Update {
            id,
            description,
            month,
            year,
            value,
            entry_type,
            user_id,
            json,
        } => {
            let result = find_entry(&ctx, id).and_then(|existing| {
                if let Some(owner) = user_id {
                    require_user(&ctx, owner)?;
                }
                let entry = Entry {
                    description: description.or(existing.description),
                    month: month.or(existing.month),
                    year: year.or(existing.year),
                    value: value.or(existing.value),
                    entry_type: entry_type.or(existing.entry_type),
                    owner_user_id: user_id.or(existing.owner_user_id),
                    ..existing
                };
                ctx.entry_service.update(entry)
            });

            report(json, &logger, "entry update", "entry", result, |entry| {
                print_saved("Entry updated", entry)
            })
        }
        EntryCommands::Delete { id, json } => {
            let result = find_entry(&ctx, id)
                .and_then(|entry| ctx.entry_service.delete(&entry))
                .map(|()| serde_json::json!({ "deleted": id }));

            report(json, &logger, "entry delete", "entry", result, |_| {
                output::success(&format!("Entry {} deleted", id))
            })
        }
        EntryCommands::Status { id, status, json } => {
            let result = find_entry(&ctx, id).and_then(|entry| {
                let status = parse_status(&status)?;
                ctx.entry_service.update_status(entry, status)
            });

            report(json, &logger, "entry status", "entry", result, |entry| {
                print_saved("Status updated", entry)
            })
        }
        EntryCommands::Show { id, json } => {
            let result = find_entry(&ctx, id);
            report(json, &logger, "entry show", "entry", result, output::print_entry)
        }
        EntryCommands::Search {
            user_id,
            description,
            month,
            year,
            entry_type,
            status,
            json,
        } => {
            let result = require_user(&ctx, user_id).and_then(|_| {
                let filter = Entry {
                    description,
                    month,
                    year,
                    entry_type,
                    status,
                    owner_user_id: Some(user_id),
                    ..Entry::default()
                };
                ctx.entry_service.search(&filter)
            });

            report(json, &logger, "entry search", "entry", result, |entries| {
                if entries.is_empty() {
                    output::info("No entries found.");
                } else {
                    println!("{}", output::entries_table(entries));
                    println!("{} entr{}", entries.len(), if entries.len() == 1 { "y" } else { "ies" });
                }
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status_accepts_known_names() {
        assert_eq!(parse_status("effective").unwrap(), EntryStatus::Effective);
        assert_eq!(parse_status("CANCELADO").unwrap(), EntryStatus::Canceled);
    }

    #[test]
    fn test_parse_status_rejects_unknown_with_message() {
        let err = parse_status("PAGO").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Não foi possível atualizar o status do lançamento, envie um status válido."
        );
    }
}
