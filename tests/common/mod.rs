#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use school_ledger::{
    core::services::LedgerService,
    ledger::{LedgerEntry, TenantId},
    storage::{json_backend::StoragePaths, JsonLedgerStore},
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Unique directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// JSON-backed store keeping at most `retention` backups per tenant.
pub fn json_store(retention: usize) -> (JsonLedgerStore, PathBuf) {
    let base = temp_base();
    let store = JsonLedgerStore::with_retention(StoragePaths::under(&base), retention)
        .expect("create json ledger store");
    (store, base)
}

pub fn setup_service() -> LedgerService {
    let (store, _) = json_store(3);
    LedgerService::new(Box::new(store))
}

pub fn tenant(name: &str) -> TenantId {
    TenantId::new(name).expect("valid tenant")
}

pub fn gain(amount: f64, at: DateTime<Utc>) -> LedgerEntry {
    LedgerEntry::gain(amount, "", at).expect("valid gain")
}

pub fn loss(amount: f64, at: DateTime<Utc>) -> LedgerEntry {
    LedgerEntry::loss(amount, "", at).expect("valid loss")
}
