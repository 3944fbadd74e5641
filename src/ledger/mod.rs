//! Ledger entries, reporting windows, and balance aggregation.

pub mod balance;
pub mod entry;
pub mod tenant;
pub mod window;

pub use balance::{
    balance_for_range, balance_for_window, compute_balance, entries_in_window, period_balances,
    window_totals, PeriodBalances, WindowTotals,
};
pub use entry::{EntryKind, LedgerEntry};
pub use tenant::TenantId;
pub use window::{DateRange, PeriodWindow};
