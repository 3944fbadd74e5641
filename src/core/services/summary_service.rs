use serde::Serialize;

use crate::core::time::Clock;
use crate::ledger::{
    balance_for_range, balance_for_window, period_balances, window_totals, DateRange,
    LedgerEntry, PeriodBalances, PeriodWindow, WindowTotals,
};
use crate::remarks::{RemarkTag, RemarkTagger};

/// An entry paired with the tags extracted from its remark.
#[derive(Debug, Clone, Serialize)]
pub struct TaggedEntry {
    pub entry: LedgerEntry,
    pub tags: Vec<RemarkTag>,
}

/// Reporting over entries already fetched from a store. `now` is read from
/// the clock exactly once per call.
pub struct SummaryService;

impl SummaryService {
    pub fn period_balances<C: Clock>(entries: &[LedgerEntry], clock: &C) -> PeriodBalances {
        period_balances(entries, &clock.now())
    }

    pub fn window_balance<C: Clock>(entries: &[LedgerEntry], window: PeriodWindow, clock: &C) -> f64 {
        balance_for_window(entries, window, &clock.now())
    }

    pub fn range_balance(entries: &[LedgerEntry], range: &DateRange) -> f64 {
        balance_for_range(entries, range)
    }

    pub fn range_totals(entries: &[LedgerEntry], range: &DateRange) -> WindowTotals {
        window_totals(entries, |created_at| range.contains(created_at))
    }

    /// Entries newest first, each with its display tags.
    pub fn tagged_entries(entries: &[LedgerEntry], tagger: &RemarkTagger) -> Vec<TaggedEntry> {
        let mut rows: Vec<TaggedEntry> = entries
            .iter()
            .map(|entry| TaggedEntry {
                entry: entry.clone(),
                tags: tagger.extract(&entry.remarks),
            })
            .collect();
        rows.sort_by(|a, b| b.entry.created_at.cmp(&a.entry.created_at));
        rows
    }
}
