mod common;

use std::collections::HashSet;

use chrono::{Duration, FixedOffset, TimeZone, Utc};
use common::{gain, loss};
use school_ledger::{
    core::{services::SummaryService, time::FixedClock},
    ledger::{
        balance_for_range, balance_for_window, compute_balance, entries_in_window,
        period_balances, DateRange, PeriodWindow,
    },
};

fn now() -> chrono::DateTime<FixedOffset> {
    FixedOffset::east_opt(3600)
        .unwrap()
        .with_ymd_and_hms(2025, 8, 14, 15, 45, 0)
        .unwrap()
}

#[test]
fn worked_example_matches_every_window() {
    let now = now();
    let now_utc = now.with_timezone(&Utc);
    let entries = vec![gain(1000.0, now_utc), loss(300.0, now_utc - Duration::days(10))];

    let balances = period_balances(&entries, &now);
    assert_eq!(balances.balance(PeriodWindow::Today), 1000.0);
    assert_eq!(balances.balance(PeriodWindow::Last7Days), 1000.0);
    assert_eq!(balances.balance(PeriodWindow::Last30Days), 700.0);
    assert_eq!(balances.balance(PeriodWindow::ThisYear), 700.0);
    assert_eq!(balances.balance(PeriodWindow::AllTime), 700.0);
    assert_eq!(balances.all_time.gains, 1000.0);
    assert_eq!(balances.all_time.losses, 300.0);
}

#[test]
fn all_time_is_gains_minus_losses() {
    let base = Utc.with_ymd_and_hms(2019, 3, 2, 9, 0, 0).unwrap();
    let entries: Vec<_> = (0..40)
        .map(|idx| {
            let at = base + Duration::days(idx * 53);
            if idx % 3 == 0 {
                loss(idx as f64 * 7.5, at)
            } else {
                gain(idx as f64 * 11.0, at)
            }
        })
        .collect();
    let expected: f64 = entries.iter().map(|entry| entry.signed_amount()).sum();
    assert!((compute_balance(&entries, |_| true) - expected).abs() < 1e-9);
    assert!(
        (balance_for_window(&entries, PeriodWindow::AllTime, &now()) - expected).abs() < 1e-9
    );
}

#[test]
fn empty_ledger_balances_to_zero() {
    let balances = period_balances(&[], &now());
    for (_, totals) in balances.iter() {
        assert_eq!(totals.balance, 0.0);
        assert_eq!(totals.entry_count, 0);
    }
}

#[test]
fn narrower_windows_select_a_subset_of_wider_ones() {
    let now = now();
    let local = |days_back: i64, h: u32, m: u32, sec: u32| {
        let day = now.date_naive() - Duration::days(days_back);
        now.offset()
            .from_local_datetime(&day.and_hms_opt(h, m, sec).unwrap())
            .unwrap()
            .with_timezone(&Utc)
    };
    let mut entries = Vec::new();
    // Straddle every boundary: the last second before each start, the start
    // itself, and one hour later.
    for days_back in [0, 7, 30] {
        entries.push(gain(1.0, local(days_back, 0, 0, 0)));
        entries.push(gain(1.0, local(days_back, 1, 0, 0)));
        entries.push(loss(1.0, local(days_back + 1, 23, 59, 59)));
    }
    entries.push(gain(1.0, local(0, 23, 0, 0)));
    entries.push(gain(1.0, now.with_timezone(&Utc) + Duration::days(2)));
    entries.push(loss(1.0, local(400, 12, 0, 0)));

    let ids = |window| -> HashSet<_> { entries_in_window(&entries, window, &now).into_iter().collect() };
    let today = ids(PeriodWindow::Today);
    let last_7 = ids(PeriodWindow::Last7Days);
    let last_30 = ids(PeriodWindow::Last30Days);
    let this_year = ids(PeriodWindow::ThisYear);
    let all_time = ids(PeriodWindow::AllTime);

    assert!(today.is_subset(&last_7));
    assert!(last_7.is_subset(&last_30));
    assert!(last_30.is_subset(&all_time));
    assert!(this_year.is_subset(&all_time));
    assert!(today.len() < last_7.len() && last_7.len() < last_30.len());

    assert_eq!(today.len(), 4);
    assert_eq!(last_7.len(), 7);
    assert_eq!(last_30.len(), 10);
    assert_eq!(all_time.len(), entries.len());

    let balances = period_balances(&entries, &now);
    assert_eq!(balances.today.entry_count, today.len());
    assert_eq!(balances.last_7_days.entry_count, last_7.len());
    assert_eq!(balances.last_30_days.entry_count, last_30.len());
}

#[test]
fn window_start_is_inclusive_in_the_local_zone() {
    let now = now();
    let offset = *now.offset();
    let midnight = offset
        .with_ymd_and_hms(2025, 8, 14, 0, 0, 0)
        .unwrap()
        .with_timezone(&Utc);
    let entries = vec![
        gain(10.0, midnight),
        gain(5.0, midnight - Duration::seconds(1)),
    ];
    assert_eq!(balance_for_window(&entries, PeriodWindow::Today, &now), 10.0);

    let seven_days_back = midnight - Duration::days(7);
    let entries = vec![gain(4.0, seven_days_back), gain(2.0, seven_days_back - Duration::seconds(1))];
    assert_eq!(balance_for_window(&entries, PeriodWindow::Last7Days, &now), 4.0);
}

#[test]
fn this_year_starts_on_january_first() {
    let now = now();
    let new_year = FixedOffset::east_opt(3600)
        .unwrap()
        .with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
        .unwrap()
        .with_timezone(&Utc);
    let entries = vec![gain(100.0, new_year), loss(40.0, new_year - Duration::seconds(1))];
    assert_eq!(balance_for_window(&entries, PeriodWindow::ThisYear, &now), 100.0);
    assert_eq!(balance_for_window(&entries, PeriodWindow::AllTime, &now), 60.0);
}

#[test]
fn future_entries_count_in_every_window() {
    let now = now();
    let tomorrow = now.with_timezone(&Utc) + Duration::days(1);
    let entries = vec![gain(25.0, tomorrow)];
    assert_eq!(balance_for_window(&entries, PeriodWindow::Today, &now), 25.0);
    assert_eq!(balance_for_window(&entries, PeriodWindow::ThisYear, &now), 25.0);
}

#[test]
fn ad_hoc_ranges_cover_whole_days() {
    let zone = FixedOffset::east_opt(3600).unwrap();
    let first = chrono::NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
    let last = chrono::NaiveDate::from_ymd_opt(2025, 8, 10).unwrap();
    let range = DateRange::from_dates(&zone, Some(first), Some(last)).unwrap();

    let inside_first = zone.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap().with_timezone(&Utc);
    let inside_last = zone.with_ymd_and_hms(2025, 8, 10, 23, 59, 59).unwrap().with_timezone(&Utc);
    let after = zone.with_ymd_and_hms(2025, 8, 11, 0, 0, 0).unwrap().with_timezone(&Utc);
    let entries = vec![gain(10.0, inside_first), loss(3.0, inside_last), gain(99.0, after)];

    assert_eq!(balance_for_range(&entries, &range), 7.0);
    assert_eq!(SummaryService::range_totals(&entries, &range).entry_count, 2);
    assert!(DateRange::from_dates(&zone, Some(last), Some(first)).is_err());
}

#[test]
fn summary_service_reads_now_from_the_clock() {
    let now = now();
    let clock = FixedClock(now);
    let entries = vec![gain(50.0, now.with_timezone(&Utc) - Duration::days(40))];
    assert_eq!(
        SummaryService::window_balance(&entries, PeriodWindow::Last30Days, &clock),
        0.0
    );
    assert_eq!(SummaryService::period_balances(&entries, &clock).this_year.balance, 50.0);
}
