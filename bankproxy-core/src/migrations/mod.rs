//! Database migrations - embedded SQL files
//!
//! Migrations are compiled into the binary with `include_str!` and applied
//! in name order. Each applied migration is recorded in `sys_migrations`, so
//! running them again is a no-op.

use duckdb::Connection;

use crate::domain::result::Result;

/// All migrations, embedded at compile time.
/// Format: (filename, sql_content)
///
/// When adding a migration, create `NNN_description.sql` and append it here.
pub const MIGRATIONS: &[(&str, &str)] = &[
    ("000_migrations.sql", include_str!("000_migrations.sql")),
    ("001_transfer_audit.sql", include_str!("001_transfer_audit.sql")),
];

/// Result of running migrations
#[derive(Debug)]
pub struct MigrationResult {
    /// Names of newly applied migrations
    pub applied: Vec<String>,
    /// Count of migrations that were already applied
    pub already_applied: usize,
}

/// Apply every migration not yet recorded in `sys_migrations`.
///
/// The bookkeeping migration is idempotent (`CREATE TABLE IF NOT EXISTS`),
/// so it is executed unconditionally before anything is looked up.
pub fn run_pending(conn: &Connection) -> Result<MigrationResult> {
    let (bootstrap_name, bootstrap_sql) = MIGRATIONS[0];
    conn.execute_batch(bootstrap_sql)?;

    let applied_before = applied(conn)?;
    let mut newly_applied = Vec::new();

    for (name, sql) in MIGRATIONS {
        if applied_before.iter().any(|a| a == name) {
            continue;
        }
        if *name != bootstrap_name {
            conn.execute_batch(sql)?;
        }
        conn.execute(
            "INSERT INTO sys_migrations (migration_name) VALUES (?)",
            [name],
        )?;
        tracing::info!(migration = name, "Applied migration");
        newly_applied.push(name.to_string());
    }

    Ok(MigrationResult {
        applied: newly_applied,
        already_applied: applied_before.len(),
    })
}

/// Names of already applied migrations
pub fn applied(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt =
        conn.prepare("SELECT migration_name FROM sys_migrations ORDER BY migration_name")?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(names)
}
