//! Output formatting utilities

use std::fmt;

use chrono::NaiveDate;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, CellAlignment, ContentArrangement, Table};
use rust_decimal::Decimal;

use financas_core::{Entry, EntryStatus, EntryType};

/// Marker error for failures already printed to the user
///
/// `main` exits non-zero without printing it again.
#[derive(Debug)]
pub struct AlreadyReported;

impl fmt::Display for AlreadyReported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("error already reported")
    }
}

impl std::error::Error for AlreadyReported {}

pub fn success(msg: &str) {
    println!("{}", msg.green());
}

pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Money with two decimal places
pub fn format_value(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn colored_status(status: Option<EntryStatus>) -> String {
    match status {
        Some(EntryStatus::Pending) => "PENDING".yellow().to_string(),
        Some(EntryStatus::Effective) => "EFFECTIVE".green().to_string(),
        Some(EntryStatus::Canceled) => "CANCELED".dimmed().to_string(),
        None => "-".to_string(),
    }
}

fn colored_value(value: Option<Decimal>, entry_type: Option<EntryType>) -> String {
    let Some(value) = value else {
        return "-".to_string();
    };
    match entry_type {
        Some(EntryType::Income) => format_value(value).green().to_string(),
        Some(EntryType::Expense) => format!("-{}", format_value(value)).red().to_string(),
        None => format_value(value),
    }
}

fn format_date(date: Option<NaiveDate>) -> String {
    or_dash(date.map(|d| d.format("%Y-%m-%d")))
}

/// Table of entries, one row each
pub fn entries_table(entries: &[Entry]) -> Table {
    let mut table = create_table();
    table.set_header(vec!["ID", "Description", "Month", "Year", "Value", "Type", "Status", "Registered"]);

    for entry in entries {
        table.add_row(vec![
            Cell::new(or_dash(entry.id)),
            Cell::new(entry.description.as_deref().unwrap_or("-")),
            Cell::new(or_dash(entry.month)),
            Cell::new(or_dash(entry.year)),
            Cell::new(colored_value(entry.value, entry.entry_type)).set_alignment(CellAlignment::Right),
            Cell::new(or_dash(entry.entry_type)),
            Cell::new(colored_status(entry.status)),
            Cell::new(format_date(entry.registration_date)),
        ]);
    }

    table
}

/// Print one entry as labeled lines
pub fn print_entry(entry: &Entry) {
    println!("  {}: {}", "ID".bold(), or_dash(entry.id));
    println!("  {}: {}", "Description".bold(), entry.description.as_deref().unwrap_or("-"));
    println!(
        "  {}: {}/{}",
        "Period".bold(),
        or_dash(entry.month),
        or_dash(entry.year)
    );
    println!("  {}: {}", "Value".bold(), colored_value(entry.value, entry.entry_type));
    println!("  {}: {}", "Type".bold(), or_dash(entry.entry_type));
    println!("  {}: {}", "Status".bold(), colored_status(entry.status));
    println!("  {}: {}", "Registered".bold(), format_date(entry.registration_date));
    println!("  {}: {}", "Owner".bold(), or_dash(entry.owner_user_id));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value_two_places() {
        assert_eq!(format_value(Decimal::from(20)), "20.00");
        assert_eq!(format_value(Decimal::new(12346, 3)), "12.35");
        assert_eq!(format_value(Decimal::new(-150050, 2)), "-1500.50");
    }

    #[test]
    fn test_entries_table_has_row_per_entry() {
        let entries = vec![
            Entry::new().with_description("Salario").with_value(Decimal::from(10)),
            Entry::new().with_description("Aluguel"),
        ];
        let rendered = entries_table(&entries).to_string();
        assert!(rendered.contains("Salario"));
        assert!(rendered.contains("Aluguel"));
    }
}
