pub mod ledger_service;
pub mod summary_service;

pub use ledger_service::LedgerService;
pub use summary_service::{SummaryService, TaggedEntry};

use crate::errors::LedgerError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("{0}")]
    Invalid(String),
}
