pub mod json_backend;
pub mod memory;

use serde::{Deserialize, Serialize};

use crate::{
    errors::{LedgerError, Result},
    ledger::{LedgerEntry, TenantId},
};

pub const LEDGER_SCHEMA_VERSION: u8 = 1;

/// Source and sink for tenant ledgers. Entries are append-only; the only
/// removal is a full reset of one tenant.
pub trait LedgerStore: Send + Sync {
    /// All entries of `tenant`, in insertion order. Unknown tenants have an
    /// empty ledger.
    fn fetch_entries(&self, tenant: &TenantId) -> Result<Vec<LedgerEntry>>;

    fn append_entry(&self, tenant: &TenantId, entry: LedgerEntry) -> Result<()>;

    /// Clears the ledger and returns how many entries were removed.
    fn reset(&self, tenant: &TenantId) -> Result<usize>;

    fn tenants(&self) -> Result<Vec<TenantId>>;
}

/// Serialized form of one tenant's ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerDocument {
    #[serde(default = "LedgerDocument::schema_version_default")]
    pub schema_version: u8,
    pub tenant: TenantId,
    #[serde(default)]
    pub entries: Vec<LedgerEntry>,
}

impl LedgerDocument {
    pub fn new(tenant: TenantId) -> Self {
        Self {
            schema_version: LEDGER_SCHEMA_VERSION,
            tenant,
            entries: Vec::new(),
        }
    }

    pub fn schema_version_default() -> u8 {
        LEDGER_SCHEMA_VERSION
    }

    /// Rejects documents from newer releases and entries breaking the amount
    /// invariant.
    pub fn validate(&self) -> Result<()> {
        if self.schema_version > LEDGER_SCHEMA_VERSION {
            return Err(LedgerError::Storage(format!(
                "ledger `{}` uses schema version {} (supported: {})",
                self.tenant, self.schema_version, LEDGER_SCHEMA_VERSION
            )));
        }
        self.entries.iter().try_for_each(LedgerEntry::validate)
    }

    pub(crate) fn push(&mut self, entry: LedgerEntry) -> Result<()> {
        entry.validate()?;
        if self.entries.iter().any(|existing| existing.id == entry.id) {
            return Err(LedgerError::Storage(format!(
                "entry {} already exists in ledger `{}`",
                entry.id, self.tenant
            )));
        }
        self.entries.push(entry);
        Ok(())
    }
}

pub use json_backend::JsonLedgerStore;
pub use memory::MemoryLedgerStore;
