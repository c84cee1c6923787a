//! Audit service - local record of executed transfers

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::result::Result;
use crate::domain::{AuditRecord, TransferRequest, TransferResult};
use crate::ports::TransferAuditStore;

/// Records transfers the banking API accepted
pub struct TransferAuditor {
    store: Arc<dyn TransferAuditStore>,
}

impl TransferAuditor {
    pub fn new(store: Arc<dyn TransferAuditStore>) -> Self {
        Self { store }
    }

    /// Persist the audit record of a completed transfer.
    ///
    /// Store failures are returned as-is. The remote transfer has already
    /// happened at this point and is not rolled back. The returned record
    /// carries the id the store assigned.
    pub fn record(&self, request: &TransferRequest, result: &TransferResult) -> Result<AuditRecord> {
        let record = AuditRecord::from_transfer(request, result);
        let local_id = self.store.save(&record)?;
        let record = AuditRecord { local_id, ..record };

        tracing::info!(
            local_id = %record.local_id,
            transfer_id = %record.transfer_id,
            status = %record.status,
            "Recorded money transfer"
        );
        Ok(record)
    }

    /// Recorded transfers executed in `[from_date, to_date]`
    pub fn list(&self, from_date: NaiveDate, to_date: NaiveDate) -> Result<Vec<AuditRecord>> {
        self.store.find_by_execution_date_between(from_date, to_date)
    }
}
