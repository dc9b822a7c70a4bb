//! Persistence gateway port - durable store for entries and users

use uuid::Uuid;

use crate::domain::result::Result;
use crate::domain::{Entry, User};

/// Storage abstraction consumed by the entry and credential services
///
/// Each method is a single round trip to the store. Implementations assign
/// ids on create and report unknown ids on update/delete as `Error::NotFound`.
pub trait PersistenceGateway: Send + Sync {
    // === Entries ===

    /// Store a new entry and return it with its assigned id
    fn create_entry(&self, entry: &Entry) -> Result<Entry>;

    /// Overwrite a persisted entry
    fn update_entry(&self, entry: &Entry) -> Result<Entry>;

    /// Remove a persisted entry
    fn delete_entry(&self, entry: &Entry) -> Result<()>;

    fn find_entry_by_id(&self, id: Uuid) -> Result<Option<Entry>>;

    /// Equality match on every field set in `filter`; unset fields match anything
    fn find_entries_matching(&self, filter: &Entry) -> Result<Vec<Entry>>;

    // === Users ===

    /// Store a new user and return it with its assigned id
    fn create_user(&self, user: &User) -> Result<User>;

    fn exists_user_with_email(&self, email: &str) -> Result<bool>;

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>>;
}
