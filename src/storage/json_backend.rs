use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use chrono::Utc;
use tracing::{debug, info, warn};

use super::{LedgerDocument, LedgerStore};
use crate::{
    errors::{LedgerError, Result},
    ledger::{LedgerEntry, TenantId},
    utils::paths::ensure_dir,
};

const LEDGER_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TMP_SUFFIX: &str = "tmp";
pub const DEFAULT_RETENTION: usize = 5;

/// Directory layout used by [`JsonLedgerStore`].
#[derive(Debug, Clone)]
pub struct StoragePaths {
    pub ledger_root: PathBuf,
    pub backup_root: PathBuf,
}

impl StoragePaths {
    pub fn under(base: &Path) -> Self {
        Self {
            ledger_root: base.join("ledgers"),
            backup_root: base.join("backups"),
        }
    }
}

/// One pretty-printed JSON document per tenant. Every write is staged to a
/// temporary file and renamed into place; a reset first copies the current
/// document into the tenant's backup folder.
///
/// Writers within one process are serialized by an internal lock. Two
/// processes sharing the same directory are not coordinated.
#[derive(Debug)]
pub struct JsonLedgerStore {
    ledgers_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
    write_lock: Mutex<()>,
}

impl JsonLedgerStore {
    pub fn new(paths: StoragePaths) -> Result<Self> {
        Self::with_retention(paths, DEFAULT_RETENTION)
    }

    pub fn with_retention(paths: StoragePaths, retention: usize) -> Result<Self> {
        ensure_dir(&paths.ledger_root)?;
        ensure_dir(&paths.backup_root)?;
        Ok(Self {
            ledgers_dir: paths.ledger_root,
            backups_dir: paths.backup_root,
            retention: retention.max(1),
            write_lock: Mutex::new(()),
        })
    }

    pub fn ledger_path(&self, tenant: &TenantId) -> PathBuf {
        self.ledgers_dir
            .join(format!("{}.{}", tenant, LEDGER_EXTENSION))
    }

    fn backup_dir(&self, tenant: &TenantId) -> PathBuf {
        self.backups_dir.join(tenant.as_str())
    }

    /// Backup file names for `tenant`, newest first.
    pub fn list_backups(&self, tenant: &TenantId) -> Result<Vec<String>> {
        let dir = self.backup_dir(tenant);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(LEDGER_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                names.push(name.to_string());
            }
        }
        names.sort_by(|a, b| b.cmp(a));
        Ok(names)
    }

    /// Entries held by a backup written before a reset.
    pub fn load_backup(&self, tenant: &TenantId, backup_name: &str) -> Result<Vec<LedgerEntry>> {
        let path = self.backup_dir(tenant).join(backup_name);
        if !path.exists() {
            return Err(LedgerError::Storage(format!(
                "backup `{}` not found for `{}`",
                backup_name, tenant
            )));
        }
        Ok(load_document(&path, tenant)?.entries)
    }

    /// Held across every read-modify-write of a ledger file.
    fn lock_writes(&self) -> Result<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| LedgerError::Storage("ledger write lock poisoned".into()))
    }

    fn load(&self, tenant: &TenantId) -> Result<LedgerDocument> {
        let path = self.ledger_path(tenant);
        if !path.exists() {
            return Ok(LedgerDocument::new(tenant.clone()));
        }
        load_document(&path, tenant)
    }

    fn save(&self, document: &LedgerDocument) -> Result<()> {
        let path = self.ledger_path(&document.tenant);
        let json = serde_json::to_string_pretty(document)?;
        let tmp = tmp_path(&path);
        write_file(&tmp, &json)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn backup_current(&self, tenant: &TenantId) -> Result<Option<PathBuf>> {
        let source = self.ledger_path(tenant);
        if !source.exists() {
            return Ok(None);
        }
        let dir = self.backup_dir(tenant);
        ensure_dir(&dir)?;
        let stem = format!("{}_{}", tenant, Utc::now().format(BACKUP_TIMESTAMP_FORMAT));
        let mut target = dir.join(format!("{stem}.{LEDGER_EXTENSION}"));
        let mut attempt = 2;
        while target.exists() {
            target = dir.join(format!("{stem}_{attempt}.{LEDGER_EXTENSION}"));
            attempt += 1;
        }
        fs::copy(&source, &target)?;
        self.prune_backups(tenant)?;
        Ok(Some(target))
    }

    fn prune_backups(&self, tenant: &TenantId) -> Result<()> {
        let backups = self.list_backups(tenant)?;
        for name in backups.iter().skip(self.retention) {
            let path = self.backup_dir(tenant).join(name);
            if let Err(err) = fs::remove_file(&path) {
                warn!(path = %path.display(), %err, "failed to prune ledger backup");
            }
        }
        Ok(())
    }
}

impl LedgerStore for JsonLedgerStore {
    fn fetch_entries(&self, tenant: &TenantId) -> Result<Vec<LedgerEntry>> {
        Ok(self.load(tenant)?.entries)
    }

    fn append_entry(&self, tenant: &TenantId, entry: LedgerEntry) -> Result<()> {
        let _guard = self.lock_writes()?;
        let mut document = self.load(tenant)?;
        let id = entry.id;
        document.push(entry)?;
        self.save(&document)?;
        debug!(%tenant, %id, total = document.entries.len(), "appended ledger entry");
        Ok(())
    }

    /// Empties a known tenant's ledger, which stays listed by
    /// [`LedgerStore::tenants`]. Unknown tenants are left untouched.
    fn reset(&self, tenant: &TenantId) -> Result<usize> {
        let _guard = self.lock_writes()?;
        if !self.ledger_path(tenant).exists() {
            return Ok(0);
        }
        let document = self.load(tenant)?;
        let removed = document.entries.len();
        if let Some(backup) = self.backup_current(tenant)? {
            info!(%tenant, backup = %backup.display(), "backed up ledger before reset");
        }
        self.save(&LedgerDocument::new(tenant.clone()))?;
        Ok(removed)
    }

    fn tenants(&self) -> Result<Vec<TenantId>> {
        let mut tenants = Vec::new();
        for entry in fs::read_dir(&self.ledgers_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(LEDGER_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            match TenantId::new(stem) {
                Ok(tenant) => tenants.push(tenant),
                Err(err) => warn!(path = %path.display(), %err, "skipping ledger file"),
            }
        }
        tenants.sort();
        Ok(tenants)
    }
}

fn load_document(path: &Path, tenant: &TenantId) -> Result<LedgerDocument> {
    let data = fs::read_to_string(path)?;
    let document: LedgerDocument = serde_json::from_str(&data)?;
    if &document.tenant != tenant {
        return Err(LedgerError::Storage(format!(
            "`{}` holds the ledger of `{}`, expected `{}`",
            path.display(),
            document.tenant,
            tenant
        )));
    }
    document.validate()?;
    Ok(document)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    tmp.set_extension(format!("{LEDGER_EXTENSION}.{TMP_SUFFIX}"));
    tmp
}

fn write_file(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
