//! Database migrations - embedded SQL files
//!
//! Each migration is a (name, sql) pair compiled in with `include_str!` and
//! recorded in `sys_migrations` once applied. The first entry must create
//! `sys_migrations` itself.

use duckdb::Connection;

/// Schema migrations for the ledger database, in order.
///
/// When adding a migration, create `NNN_description.sql` next to this file and
/// append it here.
pub const MIGRATIONS: &[(&str, &str)] = &[
    ("000_migrations.sql", include_str!("000_migrations.sql")),
    ("001_initial_schema.sql", include_str!("001_initial_schema.sql")),
];

/// Outcome of a migration run
#[derive(Debug, Default)]
pub struct MigrationReport {
    /// Names of newly applied migrations
    pub applied: Vec<String>,
    /// Count of migrations that were already applied before this run
    pub already_applied: usize,
}

/// Apply every migration in `migrations` that is not yet recorded
pub fn apply(conn: &Connection, migrations: &[(&str, &str)]) -> duckdb::Result<MigrationReport> {
    let mut report = MigrationReport::default();

    let Some(((bootstrap_name, bootstrap_sql), rest)) = migrations.split_first() else {
        return Ok(report);
    };

    if !tracking_table_exists(conn) {
        conn.execute_batch(bootstrap_sql)?;
        record(conn, bootstrap_name)?;
        report.applied.push(bootstrap_name.to_string());
    }

    let applied = applied_names(conn)?;
    report.already_applied = applied.len() - report.applied.len();

    for (name, sql) in rest {
        if applied.iter().any(|a| a == name) {
            continue;
        }
        conn.execute_batch(sql)?;
        record(conn, name)?;
        report.applied.push(name.to_string());
    }

    Ok(report)
}

/// Names of applied migrations, sorted
pub fn applied_names(conn: &Connection) -> duckdb::Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT migration_name FROM sys_migrations ORDER BY migration_name")?;
    let names = stmt.query_map([], |row| row.get::<_, String>(0))?;
    names.collect()
}

fn tracking_table_exists(conn: &Connection) -> bool {
    conn.query_row(
        "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = 'sys_migrations'",
        [],
        |row| row.get::<_, i64>(0),
    )
    .map(|count| count > 0)
    .unwrap_or(false)
}

fn record(conn: &Connection, name: &str) -> duckdb::Result<()> {
    conn.execute("INSERT INTO sys_migrations (migration_name) VALUES (?)", [name])?;
    Ok(())
}
