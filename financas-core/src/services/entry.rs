//! Entry service - lifecycle of ledger entries

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::validator;
use crate::domain::result::{Error, Result};
use crate::domain::{Entry, EntryStatus, EntryType};
use crate::ports::PersistenceGateway;

/// Create, update, delete, status change, lookup and search of entries
pub struct EntryLifecycleService {
    gateway: Arc<dyn PersistenceGateway>,
}

impl EntryLifecycleService {
    pub fn new(gateway: Arc<dyn PersistenceGateway>) -> Self {
        Self { gateway }
    }

    /// Validate and store a new entry
    ///
    /// New entries always start as PENDING. The registration date defaults to
    /// today (UTC) when the caller did not supply one.
    pub fn create(&self, mut entry: Entry) -> Result<Entry> {
        validator::validate(&entry)?;

        entry.status = Some(EntryStatus::Pending);
        if entry.registration_date.is_none() {
            entry.registration_date = Some(Utc::now().date_naive());
        }

        self.gateway.create_entry(&entry)
    }

    /// Validate and overwrite a persisted entry
    pub fn update(&self, entry: Entry) -> Result<Entry> {
        require_persisted(&entry, "update")?;
        validator::validate(&entry)?;
        self.gateway.update_entry(&entry)
    }

    pub fn delete(&self, entry: &Entry) -> Result<()> {
        require_persisted(entry, "delete")?;
        self.gateway.delete_entry(entry)
    }

    /// Set the status and save through `update`
    ///
    /// Any status may replace any other.
    pub fn update_status(&self, mut entry: Entry, status: EntryStatus) -> Result<Entry> {
        entry.status = Some(status);
        self.update(entry)
    }

    pub fn get_by_id(&self, id: Uuid) -> Result<Option<Entry>> {
        self.gateway.find_entry_by_id(id)
    }

    /// Entries equal to `filter` on its set fields, in gateway order
    pub fn search(&self, filter: &Entry) -> Result<Vec<Entry>> {
        self.gateway.find_entries_matching(filter)
    }

    /// Effective income minus effective expenses owned by `user_id`
    pub fn balance_for_user(&self, user_id: Uuid) -> Result<Decimal> {
        let filter = Entry::new()
            .with_owner(user_id)
            .with_status(EntryStatus::Effective);

        let balance = self
            .search(&filter)?
            .iter()
            .fold(Decimal::ZERO, |acc, entry| {
                let value = entry.value.unwrap_or(Decimal::ZERO);
                match entry.entry_type {
                    Some(EntryType::Income) => acc + value,
                    Some(EntryType::Expense) => acc - value,
                    None => acc,
                }
            });

        Ok(balance)
    }
}

fn require_persisted(entry: &Entry, operation: &str) -> Result<()> {
    if entry.is_persisted() {
        Ok(())
    } else {
        Err(Error::precondition(format!(
            "cannot {} an entry that has not been saved (missing id)",
            operation
        )))
    }
}
