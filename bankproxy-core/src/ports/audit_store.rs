//! Audit store port - durable storage of executed transfers

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::result::Result;
use crate::domain::AuditRecord;

/// Append-only store for transfer audit records
pub trait TransferAuditStore: Send + Sync {
    /// Persist a record, returning its local id
    fn save(&self, record: &AuditRecord) -> Result<Uuid>;

    /// Records whose execution date lies in `[from_date, to_date]`, oldest first
    fn find_by_execution_date_between(
        &self,
        from_date: NaiveDate,
        to_date: NaiveDate,
    ) -> Result<Vec<AuditRecord>>;

    /// Number of stored records
    fn count(&self) -> Result<i64>;
}
