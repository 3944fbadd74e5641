use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    errors::{LedgerError, Result},
    remarks::RemarkVocabulary,
    storage::json_backend::DEFAULT_RETENTION,
    utils::paths::{config_file_in, ensure_dir},
};

const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_tenant: Option<String>,
    pub backup_retention: usize,
    /// Overrides for the remark markers; `None` keeps the built-in format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vocabulary: Option<RemarkVocabulary>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "ar-DZ".into(),
            currency: "DZD".into(),
            default_tenant: None,
            backup_retention: DEFAULT_RETENTION,
            vocabulary: None,
        }
    }
}

impl Config {
    /// Applies a `config set <key> <value>` style update.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "locale" => self.locale = value.to_string(),
            "currency" => self.currency = value.to_uppercase(),
            "default_tenant" | "tenant" => {
                self.default_tenant = (!value.is_empty()).then(|| value.to_string())
            }
            "backup_retention" => {
                let retention: usize = value.parse().map_err(|_| {
                    LedgerError::Config(format!("`{value}` is not a valid retention count"))
                })?;
                if retention == 0 {
                    return Err(LedgerError::Config(
                        "backup retention must be at least 1".into(),
                    ));
                }
                self.backup_retention = retention;
            }
            other => {
                return Err(LedgerError::Config(format!("unknown setting `{other}`")));
            }
        }
        Ok(())
    }

    pub fn vocabulary(&self) -> RemarkVocabulary {
        self.vocabulary.clone().unwrap_or_default()
    }
}

/// Loads and atomically saves [`Config`] as pretty JSON.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        let path = config_file_in(&base);
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        Ok(Self { path })
    }

    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: Config = serde_json::from_str(&data)
            .map_err(|err| LedgerError::Config(format!("{}: {err}", self.path.display())))?;
        if let Some(vocabulary) = &config.vocabulary {
            vocabulary.validate()?;
        }
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let mut tmp = self.path.clone();
        tmp.set_extension(format!("json.{TMP_SUFFIX}"));
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
