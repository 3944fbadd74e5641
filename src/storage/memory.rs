use std::{collections::BTreeMap, sync::RwLock};

use super::{LedgerDocument, LedgerStore};
use crate::{
    errors::{LedgerError, Result},
    ledger::{LedgerEntry, TenantId},
};

/// Process-local store, used by tests and embedders that own persistence.
#[derive(Debug, Default)]
pub struct MemoryLedgerStore {
    ledgers: RwLock<BTreeMap<TenantId, LedgerDocument>>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> LedgerError {
    LedgerError::Storage("memory store lock poisoned".into())
}

impl LedgerStore for MemoryLedgerStore {
    fn fetch_entries(&self, tenant: &TenantId) -> Result<Vec<LedgerEntry>> {
        let ledgers = self.ledgers.read().map_err(|_| poisoned())?;
        Ok(ledgers
            .get(tenant)
            .map(|document| document.entries.clone())
            .unwrap_or_default())
    }

    fn append_entry(&self, tenant: &TenantId, entry: LedgerEntry) -> Result<()> {
        let mut ledgers = self.ledgers.write().map_err(|_| poisoned())?;
        ledgers
            .entry(tenant.clone())
            .or_insert_with(|| LedgerDocument::new(tenant.clone()))
            .push(entry)
    }

    /// Empties a known tenant's ledger, which stays listed by
    /// [`LedgerStore::tenants`]. Unknown tenants are left untouched.
    fn reset(&self, tenant: &TenantId) -> Result<usize> {
        let mut ledgers = self.ledgers.write().map_err(|_| poisoned())?;
        Ok(ledgers
            .get_mut(tenant)
            .map(|document| std::mem::take(&mut document.entries).len())
            .unwrap_or(0))
    }

    fn tenants(&self) -> Result<Vec<TenantId>> {
        let ledgers = self.ledgers.read().map_err(|_| poisoned())?;
        Ok(ledgers.keys().cloned().collect())
    }
}
