//! Log database migrations - embedded SQL files
//!
//! Applied by `migrations::apply` against logs.duckdb.

/// All log migrations, in order. Format: (filename, sql_content)
pub const LOG_MIGRATIONS: &[(&str, &str)] = &[
    ("000_migrations.sql", include_str!("000_migrations.sql")),
    (
        "001_initial_schema.sql",
        include_str!("001_initial_schema.sql"),
    ),
];
