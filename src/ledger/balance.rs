//! Signed balances over ledger entries.
//!
//! Everything here is a pure function of its inputs. Callers capture `now`
//! once and pass it in; nothing reads the clock.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    entry::{EntryKind, LedgerEntry},
    window::{DateRange, PeriodWindow},
};

/// Sums `+amount` for gains and `-amount` for losses over the entries whose
/// timestamp satisfies `predicate`. Returns `0.0` when nothing matches.
pub fn compute_balance<P>(entries: &[LedgerEntry], predicate: P) -> f64
where
    P: Fn(&DateTime<Utc>) -> bool,
{
    entries
        .iter()
        .filter(|entry| predicate(&entry.created_at))
        .map(LedgerEntry::signed_amount)
        .sum()
}

pub fn balance_for_window<Tz: TimeZone>(
    entries: &[LedgerEntry],
    window: PeriodWindow,
    now: &DateTime<Tz>,
) -> f64 {
    compute_balance(entries, window.predicate(now))
}

pub fn balance_for_range(entries: &[LedgerEntry], range: &DateRange) -> f64 {
    compute_balance(entries, |created_at| range.contains(created_at))
}

/// Ids of the entries that fall inside `window`, in input order.
pub fn entries_in_window<Tz: TimeZone>(
    entries: &[LedgerEntry],
    window: PeriodWindow,
    now: &DateTime<Tz>,
) -> Vec<Uuid> {
    let contains = window.predicate(now);
    entries
        .iter()
        .filter(|entry| contains(&entry.created_at))
        .map(|entry| entry.id)
        .collect()
}

/// Gain/loss breakdown behind a balance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowTotals {
    pub gains: f64,
    pub losses: f64,
    pub balance: f64,
    pub entry_count: usize,
}

impl WindowTotals {
    fn record(&mut self, entry: &LedgerEntry) {
        match entry.kind {
            EntryKind::Gain => self.gains += entry.amount,
            EntryKind::Loss => self.losses += entry.amount,
        }
        self.balance += entry.signed_amount();
        self.entry_count += 1;
    }
}

pub fn window_totals<P>(entries: &[LedgerEntry], predicate: P) -> WindowTotals
where
    P: Fn(&DateTime<Utc>) -> bool,
{
    let mut totals = WindowTotals::default();
    for entry in entries.iter().filter(|entry| predicate(&entry.created_at)) {
        totals.record(entry);
    }
    totals
}

/// Totals for every fixed window, computed against a single `now`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodBalances {
    pub as_of: DateTime<Utc>,
    pub today: WindowTotals,
    pub last_7_days: WindowTotals,
    pub last_30_days: WindowTotals,
    pub this_year: WindowTotals,
    pub all_time: WindowTotals,
}

impl PeriodBalances {
    pub fn get(&self, window: PeriodWindow) -> &WindowTotals {
        match window {
            PeriodWindow::Today => &self.today,
            PeriodWindow::Last7Days => &self.last_7_days,
            PeriodWindow::Last30Days => &self.last_30_days,
            PeriodWindow::ThisYear => &self.this_year,
            PeriodWindow::AllTime => &self.all_time,
        }
    }

    pub fn balance(&self, window: PeriodWindow) -> f64 {
        self.get(window).balance
    }

    pub fn iter(&self) -> impl Iterator<Item = (PeriodWindow, &WindowTotals)> + '_ {
        PeriodWindow::ALL
            .into_iter()
            .map(move |window| (window, self.get(window)))
    }
}

pub fn period_balances<Tz: TimeZone>(entries: &[LedgerEntry], now: &DateTime<Tz>) -> PeriodBalances {
    let totals_for = |window: PeriodWindow| window_totals(entries, window.predicate(now));
    PeriodBalances {
        as_of: now.with_timezone(&Utc),
        today: totals_for(PeriodWindow::Today),
        last_7_days: totals_for(PeriodWindow::Last7Days),
        last_30_days: totals_for(PeriodWindow::Last30Days),
        this_year: totals_for(PeriodWindow::ThisYear),
        all_time: totals_for(PeriodWindow::AllTime),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset};

    fn now() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2025, 8, 14, 12, 0, 0)
            .unwrap()
    }

    fn entry(kind: EntryKind, amount: f64, created_at: DateTime<Utc>) -> LedgerEntry {
        LedgerEntry::new(kind, amount, "", created_at).unwrap()
    }

    #[test]
    fn empty_input_balances_to_zero() {
        for window in PeriodWindow::ALL {
            assert_eq!(balance_for_window(&[], window, &now()), 0.0);
        }
        assert_eq!(compute_balance(&[], |_| true), 0.0);
    }

    #[test]
    fn predicate_selects_entries() {
        let at = now().with_timezone(&Utc);
        let entries = vec![
            entry(EntryKind::Gain, 40.0, at),
            entry(EntryKind::Loss, 15.0, at - Duration::days(2)),
        ];
        assert_eq!(compute_balance(&entries, |_| true), 25.0);
        assert_eq!(compute_balance(&entries, |created_at| *created_at >= at), 40.0);
        assert_eq!(compute_balance(&entries, |_| false), 0.0);
    }

    #[test]
    fn window_totals_split_gains_and_losses() {
        let at = now().with_timezone(&Utc);
        let entries = vec![
            entry(EntryKind::Gain, 500.0, at),
            entry(EntryKind::Gain, 250.0, at),
            entry(EntryKind::Loss, 100.0, at),
        ];
        let totals = window_totals(&entries, |_| true);
        assert_eq!(totals.gains, 750.0);
        assert_eq!(totals.losses, 100.0);
        assert_eq!(totals.balance, 650.0);
        assert_eq!(totals.entry_count, 3);
    }

    #[test]
    fn period_balances_match_single_window_calls() {
        let at = now().with_timezone(&Utc);
        let entries = vec![
            entry(EntryKind::Gain, 1000.0, at),
            entry(EntryKind::Loss, 300.0, at - Duration::days(10)),
            entry(EntryKind::Gain, 80.0, at - Duration::days(200)),
        ];
        let balances = period_balances(&entries, &now());
        for (window, totals) in balances.iter() {
            assert_eq!(totals.balance, balance_for_window(&entries, window, &now()));
        }
        assert_eq!(balances.as_of, at);
    }
}
