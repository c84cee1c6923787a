//! DuckDB audit store implementation

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use duckdb::{params, Connection};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::AuditRecord;
use crate::migrations::{self, MigrationResult};
use crate::ports::TransferAuditStore;

/// Maximum number of retries when database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400, 800ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

/// Timestamps are stored as naive UTC
const TIMESTAMP_WRITE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";
const TIMESTAMP_READ_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    // Windows error messages
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        // Unix/macOS error messages
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
}

/// Audit row as read from DuckDB, before conversion to the domain type
type AuditRow = (
    String,
    String,
    String,
    String,
    String,
    String,
    Option<String>,
    Option<String>,
    String,
    String,
);

const SELECT_AUDIT_COLUMNS: &str = "SELECT local_id, transfer_id, execution_date::VARCHAR,
        amount, currency, description, creditor_name, creditor_account_code,
        status, created_at::VARCHAR
 FROM transfer_audit";

/// DuckDB-backed transfer audit store
pub struct DuckDbAuditStore {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
}

impl DuckDbAuditStore {
    /// Open (or create) the audit database at `db_path`.
    ///
    /// Retries with exponential backoff when the file is locked by another
    /// process, e.g. two CLI invocations starting at the same time.
    pub fn new(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            match Self::try_open_connection(db_path) {
                Ok(conn) => {
                    return Ok(Self {
                        conn: Mutex::new(conn),
                        db_path: Some(db_path.to_path_buf()),
                    });
                }
                Err(e) => {
                    let err_msg = e.to_string();
                    if is_retryable_error(&err_msg) && attempt < MAX_RETRIES - 1 {
                        let delay =
                            Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                        tracing::warn!(
                            "Database busy, retrying in {}ms (attempt {}/{}): {}",
                            delay.as_millis(),
                            attempt + 1,
                            MAX_RETRIES,
                            err_msg
                        );
                        thread::sleep(delay);
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            Error::database(format!(
                "Failed to open database after {} retries",
                MAX_RETRIES
            ))
        }))
    }

    /// In-memory store, gone when dropped
    pub fn in_memory() -> Result<Self> {
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        let conn = Connection::open_in_memory_with_flags(config)?;
        Ok(Self {
            conn: Mutex::new(conn),
            db_path: None,
        })
    }

    fn try_open_connection(db_path: &Path) -> Result<Connection> {
        // No extension autoloading: the store only needs core types
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        Ok(Connection::open_with_flags(db_path, config)?)
    }

    /// Location of the database file, `None` when in memory
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    pub fn run_migrations(&self) -> Result<MigrationResult> {
        let conn = self.conn()?;
        migrations::run_pending(&conn)
    }

    /// Ensure database schema exists (runs pending migrations)
    pub fn ensure_schema(&self) -> Result<()> {
        let result = self.run_migrations()?;
        if !result.applied.is_empty() {
            tracing::debug!(applied = ?result.applied, "Audit schema migrated");
        }
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::database("Database connection lock poisoned"))
    }
}

impl TransferAuditStore for DuckDbAuditStore {
    fn save(&self, record: &AuditRecord) -> Result<Uuid> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO transfer_audit (
                local_id, transfer_id, execution_date, amount, currency, description,
                creditor_name, creditor_account_code, status, created_at
             ) VALUES (?, ?, CAST(? AS DATE), ?, ?, ?, ?, ?, ?, CAST(? AS TIMESTAMP))",
            params![
                record.local_id.to_string(),
                record.transfer_id,
                record.execution_date.format(DATE_FORMAT).to_string(),
                record.amount.to_string(),
                record.currency,
                record.description,
                record.creditor_name,
                record.creditor_account_code,
                record.status,
                record
                    .created_at
                    .naive_utc()
                    .format(TIMESTAMP_WRITE_FORMAT)
                    .to_string(),
            ],
        )?;
        tracing::debug!(local_id = %record.local_id, transfer_id = %record.transfer_id, "Saved transfer audit record");
        Ok(record.local_id)
    }

    fn find_by_execution_date_between(
        &self,
        from_date: NaiveDate,
        to_date: NaiveDate,
    ) -> Result<Vec<AuditRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE execution_date BETWEEN CAST(? AS DATE) AND CAST(? AS DATE)
             ORDER BY execution_date, created_at",
            SELECT_AUDIT_COLUMNS
        ))?;

        let rows = stmt
            .query_map(
                params![
                    from_date.format(DATE_FORMAT).to_string(),
                    to_date.format(DATE_FORMAT).to_string()
                ],
                |row| {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                        row.get(5)?,
                        row.get(6)?,
                        row.get(7)?,
                        row.get(8)?,
                        row.get(9)?,
                    ))
                },
            )?
            .collect::<std::result::Result<Vec<AuditRow>, _>>()?;

        rows.into_iter().map(row_to_record).collect()
    }

    fn count(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM transfer_audit", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn row_to_record(row: AuditRow) -> Result<AuditRecord> {
    let (
        local_id,
        transfer_id,
        execution_date,
        amount,
        currency,
        description,
        creditor_name,
        creditor_account_code,
        status,
        created_at,
    ) = row;

    let local_id = Uuid::parse_str(&local_id)
        .map_err(|e| Error::database(format!("Invalid local_id '{}': {}", local_id, e)))?;
    let execution_date = NaiveDate::parse_from_str(&execution_date, DATE_FORMAT)
        .map_err(|e| Error::database(format!("Invalid execution_date '{}': {}", execution_date, e)))?;
    let amount = Decimal::from_str(&amount)
        .map_err(|e| Error::database(format!("Invalid amount '{}': {}", amount, e)))?;
    let created_at = NaiveDateTime::parse_from_str(&created_at, TIMESTAMP_READ_FORMAT)
        .map_err(|e| Error::database(format!("Invalid created_at '{}': {}", created_at, e)))?;

    Ok(AuditRecord {
        local_id,
        transfer_id,
        execution_date,
        amount,
        currency,
        description,
        creditor_name,
        creditor_account_code,
        status,
        created_at: DateTime::<Utc>::from_naive_utc_and_offset(created_at, Utc),
    })
}
