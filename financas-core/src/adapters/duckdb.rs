//! DuckDB gateway implementation

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use chrono::NaiveDate;
use duckdb::{params, Connection, ToSql};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{Argon2Params, Entry, EntryStatus, EntryType, HashedPassword, Password, User};
use crate::migrations::{self, MigrationReport, MIGRATIONS};
use crate::ports::PersistenceGateway;

/// Maximum number of retries when database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

const ENTRY_COLUMNS: &str = "entry_id, description, month, year, value, entry_type, status,
                             registration_date::VARCHAR, owner_user_id";

const USER_COLUMNS: &str = "user_id, name, email, password_scheme, password";

impl From<duckdb::Error> for Error {
    fn from(e: duckdb::Error) -> Self {
        Error::database(e.to_string())
    }
}

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
}

/// How `create_user` stores passwords
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordStorage {
    Plain,
    Argon2id(Argon2Params),
}

/// DuckDB gateway: one connection guarded by a mutex
pub struct DuckDbGateway {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
    password_storage: PasswordStorage,
}

impl DuckDbGateway {
    /// Open (or create) the database file
    ///
    /// Retries with exponential backoff while another process holds the file.
    pub fn new(db_path: &Path, password_storage: PasswordStorage) -> Result<Self> {
        let mut attempt = 0;
        loop {
            match Self::open_connection(db_path) {
                Ok(conn) => {
                    return Ok(Self {
                        conn: Mutex::new(conn),
                        db_path: Some(db_path.to_path_buf()),
                        password_storage,
                    });
                }
                Err(e) if is_retryable_error(&e.to_string()) && attempt + 1 < MAX_RETRIES => {
                    let delay = Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                    eprintln!(
                        "[financas] Database busy, retrying in {}ms (attempt {}/{}): {}",
                        delay.as_millis(),
                        attempt + 1,
                        MAX_RETRIES,
                        e
                    );
                    thread::sleep(delay);
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Database living only as long as the gateway
    pub fn in_memory(password_storage: PasswordStorage) -> Result<Self> {
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        let conn = Connection::open_in_memory_with_flags(config)?;
        Ok(Self {
            conn: Mutex::new(conn),
            db_path: None,
            password_storage,
        })
    }

    fn open_connection(db_path: &Path) -> duckdb::Result<Connection> {
        // Autoloaded extensions from ~/.duckdb can fail code-signing checks on macOS
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        Connection::open_with_flags(db_path, config)
    }

    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Run pending schema migrations
    pub fn run_migrations(&self) -> Result<MigrationReport> {
        let conn = self.conn()?;
        Ok(migrations::apply(&conn, MIGRATIONS)?)
    }

    /// Ensure database schema exists (runs pending migrations)
    pub fn ensure_schema(&self) -> Result<()> {
        self.run_migrations()?;
        Ok(())
    }

    pub fn entry_count(&self) -> Result<i64> {
        let conn = self.conn()?;
        Ok(conn.query_row("SELECT COUNT(*) FROM sys_entries", [], |row| row.get(0))?)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| Error::database(format!("Lock poisoned: {}", e)))
    }

    fn query_entries(conn: &Connection, sql: &str, params: &[&dyn ToSql]) -> Result<Vec<Entry>> {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params, |row| {
            Ok(RawEntry {
                id: row.get(0)?,
                description: row.get(1)?,
                month: row.get(2)?,
                year: row.get(3)?,
                value: row.get(4)?,
                entry_type: row.get(5)?,
                status: row.get(6)?,
                registration_date: row.get(7)?,
                owner_user_id: row.get(8)?,
            })
        })?;

        let mut entries = Vec::new();
        for raw in rows {
            entries.push(raw?.into_entry()?);
        }
        Ok(entries)
    }

    fn query_user(conn: &Connection, sql: &str, param: &str) -> Result<Option<User>> {
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query_map([param], |row| {
            Ok(RawUser {
                id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
                password_scheme: row.get(3)?,
                password: row.get(4)?,
            })
        })?;

        let first = rows.next();
        match first {
            Some(raw) => Ok(Some(raw?.into_user()?)),
            None => Ok(None),
        }
    }

    /// Password in the configured storage form, plus its column encoding
    fn encode_password(&self, password: &Password) -> Result<(Password, String)> {
        let stored = match (&self.password_storage, password) {
            (PasswordStorage::Argon2id(params), Password::Plain(_)) => password.clone().into_hashed(params)?,
            _ => password.clone(),
        };

        let encoded = match &stored {
            Password::Plain(secret) => secret.clone(),
            Password::Hashed(hashed) => serde_json::to_string(hashed)?,
        };
        Ok((stored, encoded))
    }
}

/// Row as read from `sys_entries`, before parsing
struct RawEntry {
    id: String,
    description: Option<String>,
    month: Option<i32>,
    year: Option<i32>,
    value: Option<String>,
    entry_type: Option<String>,
    status: Option<String>,
    registration_date: Option<String>,
    owner_user_id: Option<String>,
}

impl RawEntry {
    fn into_entry(self) -> Result<Entry> {
        Ok(Entry {
            id: Some(parse_uuid(&self.id)?),
            description: self.description,
            month: self.month,
            year: self.year,
            value: self
                .value
                .map(|v| Decimal::from_str(&v).map_err(|e| corrupt("value", e)))
                .transpose()?,
            entry_type: self
                .entry_type
                .map(|t| EntryType::from_str(&t).map_err(|e| corrupt("entry_type", e)))
                .transpose()?,
            status: self
                .status
                .map(|s| EntryStatus::from_str(&s).map_err(|e| corrupt("status", e)))
                .transpose()?,
            registration_date: self
                .registration_date
                .map(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").map_err(|e| corrupt("registration_date", e)))
                .transpose()?,
            owner_user_id: self.owner_user_id.map(|id| parse_uuid(&id)).transpose()?,
        })
    }
}

struct RawUser {
    id: String,
    name: String,
    email: String,
    password_scheme: String,
    password: String,
}

impl RawUser {
    fn into_user(self) -> Result<User> {
        let password = match self.password_scheme.as_str() {
            "plain" => Password::Plain(self.password),
            "argon2id" => Password::Hashed(serde_json::from_str::<HashedPassword>(&self.password)?),
            other => return Err(corrupt("password_scheme", other)),
        };

        Ok(User {
            id: Some(parse_uuid(&self.id)?),
            name: self.name,
            email: self.email,
            password,
        })
    }
}

fn parse_uuid(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| corrupt("id", e))
}

fn corrupt(column: &str, detail: impl std::fmt::Display) -> Error {
    Error::database(format!("Unreadable {} column: {}", column, detail))
}

/// Stored form of an amount: every digit kept, trailing zeros dropped, so
/// numerically equal values compare equal as text
fn value_text(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Owned SQL parameters for an entry's columns, in `ENTRY_COLUMNS` order after the id
fn entry_params(entry: &Entry) -> Vec<Box<dyn ToSql>> {
    vec![
        Box::new(entry.description.clone()),
        Box::new(entry.month),
        Box::new(entry.year),
        Box::new(entry.value.map(value_text)),
        Box::new(entry.entry_type.map(|t| t.as_str())),
        Box::new(entry.status.map(|s| s.as_str())),
        Box::new(entry.registration_date.map(|d| d.to_string())),
        Box::new(entry.owner_user_id.map(|id| id.to_string())),
    ]
}

/// Build the `WHERE` clause for query-by-example: one equality per set field
fn filter_clause(filter: &Entry) -> (String, Vec<Box<dyn ToSql>>) {
    let mut conditions: Vec<&str> = Vec::new();
    let mut values: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(id) = filter.id {
        conditions.push("entry_id = ?");
        values.push(Box::new(id.to_string()));
    }
    if let Some(description) = &filter.description {
        conditions.push("description = ?");
        values.push(Box::new(description.clone()));
    }
    if let Some(month) = filter.month {
        conditions.push("month = ?");
        values.push(Box::new(month));
    }
    if let Some(year) = filter.year {
        conditions.push("year = ?");
        values.push(Box::new(year));
    }
    if let Some(value) = filter.value {
        conditions.push("value = ?");
        values.push(Box::new(value_text(value)));
    }
    if let Some(entry_type) = filter.entry_type {
        conditions.push("entry_type = ?");
        values.push(Box::new(entry_type.as_str()));
    }
    if let Some(status) = filter.status {
        conditions.push("status = ?");
        values.push(Box::new(status.as_str()));
    }
    if let Some(date) = filter.registration_date {
        conditions.push("registration_date = CAST(? AS DATE)");
        values.push(Box::new(date.to_string()));
    }
    if let Some(owner) = filter.owner_user_id {
        conditions.push("owner_user_id = ?");
        values.push(Box::new(owner.to_string()));
    }

    let clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };
    (clause, values)
}

impl PersistenceGateway for DuckDbGateway {
    fn create_entry(&self, entry: &Entry) -> Result<Entry> {
        let conn = self.conn()?;
        let id = Uuid::new_v4();

        let mut values: Vec<Box<dyn ToSql>> = vec![Box::new(id.to_string())];
        values.extend(entry_params(entry));
        let refs: Vec<&dyn ToSql> = values.iter().map(|b| b.as_ref()).collect();

        conn.execute(
            "INSERT INTO sys_entries (entry_id, description, month, year, value, entry_type, status,
                                      registration_date, owner_user_id)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            refs.as_slice(),
        )?;

        Ok(Entry {
            id: Some(id),
            ..entry.clone()
        })
    }

    fn update_entry(&self, entry: &Entry) -> Result<Entry> {
        let id = entry
            .id
            .ok_or_else(|| Error::precondition("cannot update an entry without id"))?;
        let conn = self.conn()?;

        let mut values = entry_params(entry);
        values.push(Box::new(id.to_string()));
        let refs: Vec<&dyn ToSql> = values.iter().map(|b| b.as_ref()).collect();

        let changed = conn.execute(
            "UPDATE sys_entries SET description = ?, month = ?, year = ?, value = ?, entry_type = ?,
                    status = ?, registration_date = ?, owner_user_id = ?, updated_at = CURRENT_TIMESTAMP
             WHERE entry_id = ?",
            refs.as_slice(),
        )?;
        if changed == 0 {
            return Err(Error::not_found(format!("entry {}", id)));
        }

        Ok(entry.clone())
    }

    fn delete_entry(&self, entry: &Entry) -> Result<()> {
        let id = entry
            .id
            .ok_or_else(|| Error::precondition("cannot delete an entry without id"))?;
        let conn = self.conn()?;

        let deleted = conn.execute("DELETE FROM sys_entries WHERE entry_id = ?", params![id.to_string()])?;
        if deleted == 0 {
            return Err(Error::not_found(format!("entry {}", id)));
        }
        Ok(())
    }

    fn find_entry_by_id(&self, id: Uuid) -> Result<Option<Entry>> {
        let conn = self.conn()?;
        let sql = format!("SELECT {} FROM sys_entries WHERE entry_id = ?", ENTRY_COLUMNS);
        let id = id.to_string();
        Ok(Self::query_entries(&conn, &sql, &[&id as &dyn ToSql])?.into_iter().next())
    }

    fn find_entries_matching(&self, filter: &Entry) -> Result<Vec<Entry>> {
        let conn = self.conn()?;
        let (clause, values) = filter_clause(filter);
        let refs: Vec<&dyn ToSql> = values.iter().map(|b| b.as_ref()).collect();

        // Insertion order, so results are stable across calls
        let sql = format!(
            "SELECT {} FROM sys_entries{} ORDER BY seq",
            ENTRY_COLUMNS, clause
        );
        Self::query_entries(&conn, &sql, &refs)
    }

    fn create_user(&self, user: &User) -> Result<User> {
        let (password, encoded) = self.encode_password(&user.password)?;
        let conn = self.conn()?;
        let id = Uuid::new_v4();

        conn.execute(
            "INSERT INTO sys_users (user_id, name, email, password_scheme, password) VALUES (?, ?, ?, ?, ?)",
            params![id.to_string(), user.name, user.email, password.scheme(), encoded],
        )?;

        Ok(User {
            id: Some(id),
            name: user.name.clone(),
            email: user.email.clone(),
            password,
        })
    }

    fn exists_user_with_email(&self, email: &str) -> Result<bool> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sys_users WHERE email = ?",
            [email],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let sql = format!("SELECT {} FROM sys_users WHERE email = ?", USER_COLUMNS);
        Self::query_user(&conn, &sql, email)
    }

    fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let conn = self.conn()?;
        let sql = format!("SELECT {} FROM sys_users WHERE user_id = ?", USER_COLUMNS);
        Self::query_user(&conn, &sql, &id.to_string())
    }
}
