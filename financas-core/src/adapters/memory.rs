//! In-memory gateway
//!
//! Keeps entries and users in insertion order and records every call, so
//! tests can assert which gateway operations a service performed.

use std::sync::{Mutex, MutexGuard};

use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{Entry, User};
use crate::ports::PersistenceGateway;

/// A gateway operation, as recorded by [`InMemoryGateway`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayCall {
    CreateEntry,
    UpdateEntry,
    DeleteEntry,
    FindEntryById,
    FindEntriesMatching,
    CreateUser,
    ExistsUserWithEmail,
    FindUserByEmail,
    FindUserById,
}

#[derive(Default)]
struct Store {
    entries: Vec<Entry>,
    users: Vec<User>,
    calls: Vec<GatewayCall>,
}

#[derive(Default)]
pub struct InMemoryGateway {
    store: Mutex<Store>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gateway seeded with records, without recording any calls
    pub fn with_records(entries: Vec<Entry>, users: Vec<User>) -> Self {
        Self {
            store: Mutex::new(Store {
                entries,
                users,
                calls: Vec::new(),
            }),
        }
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.store.lock().map(|s| s.calls.clone()).unwrap_or_default()
    }

    /// Number of times `call` was made
    pub fn count(&self, call: GatewayCall) -> usize {
        self.calls().iter().filter(|c| **c == call).count()
    }

    pub fn clear_calls(&self) {
        if let Ok(mut store) = self.store.lock() {
            store.calls.clear();
        }
    }

    fn record(&self, call: GatewayCall) -> Result<MutexGuard<'_, Store>> {
        let mut store = self
            .store
            .lock()
            .map_err(|e| Error::database(format!("Lock poisoned: {}", e)))?;
        store.calls.push(call);
        Ok(store)
    }
}

impl PersistenceGateway for InMemoryGateway {
    fn create_entry(&self, entry: &Entry) -> Result<Entry> {
        let mut store = self.record(GatewayCall::CreateEntry)?;
        let stored = Entry {
            id: Some(Uuid::new_v4()),
            ..entry.clone()
        };
        store.entries.push(stored.clone());
        Ok(stored)
    }

    fn update_entry(&self, entry: &Entry) -> Result<Entry> {
        let mut store = self.record(GatewayCall::UpdateEntry)?;
        let slot = store
            .entries
            .iter_mut()
            .find(|e| e.id.is_some() && e.id == entry.id)
            .ok_or_else(|| Error::not_found(format!("entry {:?}", entry.id)))?;
        *slot = entry.clone();
        Ok(entry.clone())
    }

    fn delete_entry(&self, entry: &Entry) -> Result<()> {
        let mut store = self.record(GatewayCall::DeleteEntry)?;
        let before = store.entries.len();
        store.entries.retain(|e| e.id != entry.id);
        if store.entries.len() == before {
            return Err(Error::not_found(format!("entry {:?}", entry.id)));
        }
        Ok(())
    }

    fn find_entry_by_id(&self, id: Uuid) -> Result<Option<Entry>> {
        let store = self.record(GatewayCall::FindEntryById)?;
        Ok(store.entries.iter().find(|e| e.id == Some(id)).cloned())
    }

    fn find_entries_matching(&self, filter: &Entry) -> Result<Vec<Entry>> {
        let store = self.record(GatewayCall::FindEntriesMatching)?;
        Ok(store
            .entries
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect())
    }

    fn create_user(&self, user: &User) -> Result<User> {
        let mut store = self.record(GatewayCall::CreateUser)?;
        if store.users.iter().any(|u| u.email == user.email) {
            return Err(Error::database(format!("duplicate email: {}", user.email)));
        }
        let stored = User {
            id: Some(Uuid::new_v4()),
            ..user.clone()
        };
        store.users.push(stored.clone());
        Ok(stored)
    }

    fn exists_user_with_email(&self, email: &str) -> Result<bool> {
        let store = self.record(GatewayCall::ExistsUserWithEmail)?;
        Ok(store.users.iter().any(|u| u.email == email))
    }

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let store = self.record(GatewayCall::FindUserByEmail)?;
        Ok(store.users.iter().find(|u| u.email == email).cloned())
    }

    fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let store = self.record(GatewayCall::FindUserById)?;
        Ok(store.users.iter().find(|u| u.id == Some(id)).cloned())
    }
}
