use std::{
    env, fs,
    path::{Path, PathBuf},
};

use dirs::home_dir;

use crate::errors::Result;

pub const HOME_ENV: &str = "SCHOOL_LEDGER_HOME";
const DEFAULT_DIR_NAME: &str = ".school_ledger";
const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";

/// Application data directory: `$SCHOOL_LEDGER_HOME`, else `~/.school_ledger`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

pub fn config_file_in(base: &Path) -> PathBuf {
    base.join(CONFIG_DIR).join(CONFIG_FILE)
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
