//! Core domain entities
//!
//! Pure data structures with no I/O. Validation of entries lives in
//! `services::validator`; credential matching lives with the password type.

pub mod credential;
mod entry;
pub mod result;
mod user;

pub use credential::{Argon2Params, HashedPassword, Password};
pub use entry::{Entry, EntryStatus, EntryType};
pub use user::User;
