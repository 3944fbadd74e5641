//! Boundary between callers and a [`LedgerStore`]: entries are validated here
//! once, so the aggregation code can trust them.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::core::services::{ServiceError, ServiceResult};
use crate::core::time::Clock;
use crate::ledger::{EntryKind, LedgerEntry, TenantId};
use crate::remarks::{PaymentRemark, RemarkVocabulary};
use crate::storage::LedgerStore;

pub struct LedgerService {
    store: Box<dyn LedgerStore>,
}

impl LedgerService {
    pub fn new(store: Box<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// Appends a new entry dated `created_at` and returns it.
    pub fn record(
        &self,
        tenant: &TenantId,
        kind: EntryKind,
        amount: f64,
        remarks: &str,
        created_at: DateTime<Utc>,
    ) -> ServiceResult<LedgerEntry> {
        let entry = LedgerEntry::new(kind, amount, remarks.trim(), created_at)?;
        self.store.append_entry(tenant, entry.clone())?;
        debug!(%tenant, id = %entry.id, %kind, amount, "recorded ledger entry");
        Ok(entry)
    }

    pub fn record_gain<C: Clock>(
        &self,
        tenant: &TenantId,
        amount: f64,
        remarks: &str,
        clock: &C,
    ) -> ServiceResult<LedgerEntry> {
        self.record(tenant, EntryKind::Gain, amount, remarks, clock.now_utc())
    }

    pub fn record_loss<C: Clock>(
        &self,
        tenant: &TenantId,
        amount: f64,
        remarks: &str,
        clock: &C,
    ) -> ServiceResult<LedgerEntry> {
        self.record(tenant, EntryKind::Loss, amount, remarks, clock.now_utc())
    }

    /// Records a student payment as a gain whose remark carries the receipt,
    /// student, group and billing months.
    pub fn record_payment<C: Clock>(
        &self,
        tenant: &TenantId,
        amount: f64,
        payment: &PaymentRemark,
        vocabulary: &RemarkVocabulary,
        clock: &C,
    ) -> ServiceResult<LedgerEntry> {
        if amount <= 0.0 {
            return Err(ServiceError::Invalid(
                "a payment must have a positive amount".into(),
            ));
        }
        let remark = payment.render(vocabulary)?;
        self.record(tenant, EntryKind::Gain, amount, &remark, clock.now_utc())
    }

    pub fn entries(&self, tenant: &TenantId) -> ServiceResult<Vec<LedgerEntry>> {
        Ok(self.store.fetch_entries(tenant)?)
    }

    pub fn reset(&self, tenant: &TenantId) -> ServiceResult<usize> {
        let removed = self.store.reset(tenant)?;
        info!(%tenant, removed, "ledger reset");
        Ok(removed)
    }

    pub fn tenants(&self) -> ServiceResult<Vec<TenantId>> {
        Ok(self.store.tenants()?)
    }
}
