use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{LedgerError, Result};

/// Direction of a ledger entry. The sign of its contribution to any balance
/// depends on this alone.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Gain,
    Loss,
}

impl EntryKind {
    pub fn sign(self) -> f64 {
        match self {
            EntryKind::Gain => 1.0,
            EntryKind::Loss => -1.0,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "gain" | "income" | "in" => Some(EntryKind::Gain),
            "loss" | "expense" | "out" => Some(EntryKind::Loss),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EntryKind::Gain => "gain",
            EntryKind::Loss => "loss",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One financial record of a tenant's ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub kind: EntryKind,
    pub amount: f64,
    #[serde(default)]
    pub remarks: String,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Builds a validated entry with a fresh id.
    pub fn new(
        kind: EntryKind,
        amount: f64,
        remarks: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self> {
        let entry = Self {
            id: Uuid::new_v4(),
            kind,
            amount,
            remarks: remarks.into(),
            created_at,
        };
        entry.validate()?;
        Ok(entry)
    }

    pub fn gain(amount: f64, remarks: impl Into<String>, created_at: DateTime<Utc>) -> Result<Self> {
        Self::new(EntryKind::Gain, amount, remarks, created_at)
    }

    pub fn loss(amount: f64, remarks: impl Into<String>, created_at: DateTime<Utc>) -> Result<Self> {
        Self::new(EntryKind::Loss, amount, remarks, created_at)
    }

    /// Checks the amount invariant. Called wherever entries enter the crate.
    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_finite() {
            return Err(LedgerError::InvalidEntry(format!(
                "entry {} has a non-finite amount",
                self.id
            )));
        }
        if self.amount < 0.0 {
            return Err(LedgerError::InvalidEntry(format!(
                "entry {} has a negative amount ({})",
                self.id, self.amount
            )));
        }
        Ok(())
    }

    /// Signed contribution of this entry to a balance.
    pub fn signed_amount(&self) -> f64 {
        self.kind.sign() * self.amount
    }
}
