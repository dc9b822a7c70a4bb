//! Entry (lançamento) domain model

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Income or expense classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryType {
    Income,
    Expense,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Income => "INCOME",
            EntryType::Expense => "EXPENSE",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryType {
    type Err = String;

    /// Accepts the English names and the Portuguese ones stored by the old app
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "INCOME" | "RECEITA" => Ok(EntryType::Income),
            "EXPENSE" | "DESPESA" => Ok(EntryType::Expense),
            other => Err(format!("unknown entry type: {}", other)),
        }
    }
}

/// Lifecycle marker of an entry
///
/// Any status may be set to any other; there is no transition graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryStatus {
    Pending,
    Effective,
    Canceled,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Pending => "PENDING",
            EntryStatus::Effective => "EFFECTIVE",
            EntryStatus::Canceled => "CANCELED",
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PENDING" | "PENDENTE" => Ok(EntryStatus::Pending),
            "EFFECTIVE" | "EFETIVADO" => Ok(EntryStatus::Effective),
            "CANCELED" | "CANCELLED" | "CANCELADO" => Ok(EntryStatus::Canceled),
            other => Err(format!("unknown entry status: {}", other)),
        }
    }
}

/// A single income or expense record owned by a user
///
/// Every field is optional so the same value doubles as a search filter:
/// unset fields are wildcards. A record is persisted iff `id` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: Option<Uuid>,
    pub description: Option<String>,
    pub month: Option<i32>,
    pub year: Option<i32>,
    pub value: Option<Decimal>,
    pub entry_type: Option<EntryType>,
    pub status: Option<EntryStatus>,
    pub registration_date: Option<NaiveDate>,
    pub owner_user_id: Option<Uuid>,
}

impl Entry {
    /// Create an entry with every field unset (matches everything as a filter)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_month(mut self, month: i32) -> Self {
        self.month = Some(month);
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_value(mut self, value: Decimal) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_type(mut self, entry_type: EntryType) -> Self {
        self.entry_type = Some(entry_type);
        self
    }

    pub fn with_status(mut self, status: EntryStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_registration_date(mut self, date: NaiveDate) -> Self {
        self.registration_date = Some(date);
        self
    }

    pub fn with_owner(mut self, user_id: Uuid) -> Self {
        self.owner_user_id = Some(user_id);
        self
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Query-by-example: true when `candidate` equals `self` on every field
    /// that is set in `self`
    pub fn matches(&self, candidate: &Entry) -> bool {
        fn field<T: PartialEq>(filter: &Option<T>, value: &Option<T>) -> bool {
            match filter {
                Some(expected) => value.as_ref() == Some(expected),
                None => true,
            }
        }

        field(&self.id, &candidate.id)
            && field(&self.description, &candidate.description)
            && field(&self.month, &candidate.month)
            && field(&self.year, &candidate.year)
            && field(&self.value, &candidate.value)
            && field(&self.entry_type, &candidate.entry_type)
            && field(&self.status, &candidate.status)
            && field(&self.registration_date, &candidate.registration_date)
            && field(&self.owner_user_id, &candidate.owner_user_id)
    }
}
