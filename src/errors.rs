use thiserror::Error;

/// Error type shared by the storage, service, and configuration layers.
///
/// The aggregation and remark tagging routines never produce one of these;
/// failures only arise where entries cross a boundary (disk, user input).
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid entry: {0}")]
    InvalidEntry(String),
    #[error("Invalid range: {0}")]
    InvalidRange(String),
    #[error("Invalid tenant: {0}")]
    InvalidTenant(String),
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Invalid remark vocabulary: {0}")]
    Vocabulary(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
