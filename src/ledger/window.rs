use std::fmt;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};

/// Fixed reporting windows, each anchored on a caller-supplied `now`.
///
/// Windows have an inclusive lower bound and no upper bound, so entries dated
/// after `now` still count toward every window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PeriodWindow {
    Today,
    Last7Days,
    Last30Days,
    ThisYear,
    AllTime,
}

impl PeriodWindow {
    pub const ALL: [PeriodWindow; 5] = [
        PeriodWindow::Today,
        PeriodWindow::Last7Days,
        PeriodWindow::Last30Days,
        PeriodWindow::ThisYear,
        PeriodWindow::AllTime,
    ];

    /// Lower boundary of the window, or `None` for [`PeriodWindow::AllTime`].
    ///
    /// Calendar arithmetic happens in `now`'s time zone, so "today" starts at
    /// local midnight.
    pub fn start<Tz: TimeZone>(self, now: &DateTime<Tz>) -> Option<DateTime<Utc>> {
        let zone = now.timezone();
        let today = now.date_naive();
        let first_day = match self {
            PeriodWindow::Today => today,
            PeriodWindow::Last7Days => today - Duration::days(7),
            PeriodWindow::Last30Days => today - Duration::days(30),
            PeriodWindow::ThisYear => today.with_ordinal(1).unwrap_or(today),
            PeriodWindow::AllTime => return None,
        };
        Some(local_midnight(&zone, first_day))
    }

    /// Membership test with the boundary resolved once, for filtering many
    /// entries against the same `now`. The start is inclusive; there is no
    /// upper bound.
    pub fn predicate<Tz: TimeZone>(self, now: &DateTime<Tz>) -> impl Fn(&DateTime<Utc>) -> bool {
        let start = self.start(now);
        move |created_at: &DateTime<Utc>| start.map_or(true, |start| *created_at >= start)
    }

    pub fn contains<Tz: TimeZone>(self, created_at: &DateTime<Utc>, now: &DateTime<Tz>) -> bool {
        self.predicate(now)(created_at)
    }

    pub fn label(self) -> &'static str {
        match self {
            PeriodWindow::Today => "Today",
            PeriodWindow::Last7Days => "Last 7 days",
            PeriodWindow::Last30Days => "Last 30 days",
            PeriodWindow::ThisYear => "This year",
            PeriodWindow::AllTime => "All time",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "today" | "day" => Some(PeriodWindow::Today),
            "last_7_days" | "last7days" | "week" => Some(PeriodWindow::Last7Days),
            "last_30_days" | "last30days" | "month" => Some(PeriodWindow::Last30Days),
            "this_year" | "thisyear" | "year" => Some(PeriodWindow::ThisYear),
            "all_time" | "alltime" | "all" => Some(PeriodWindow::AllTime),
            _ => None,
        }
    }
}

impl fmt::Display for PeriodWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Caller-selected window: inclusive `start`, exclusive `end`, either side
/// optional.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Result<Self> {
        if let (Some(start), Some(end)) = (start, end) {
            if end <= start {
                return Err(LedgerError::InvalidRange(
                    "range end must be after start".into(),
                ));
            }
        }
        Ok(Self { start, end })
    }

    /// Covers whole calendar days in `zone`, from the first midnight of
    /// `first` up to (excluding) the midnight after `last`.
    pub fn from_dates<Tz: TimeZone>(
        zone: &Tz,
        first: Option<NaiveDate>,
        last: Option<NaiveDate>,
    ) -> Result<Self> {
        let start = first.map(|day| local_midnight(zone, day));
        let end = last.map(|day| local_midnight(zone, day + Duration::days(1)));
        Self::new(start, end)
    }

    pub fn contains(&self, created_at: &DateTime<Utc>) -> bool {
        let after_start = self.start.map_or(true, |start| *created_at >= start);
        let before_end = self.end.map_or(true, |end| *created_at < end);
        after_start && before_end
    }
}

/// First instant of `day` in `zone`. When a DST jump skips midnight the first
/// valid instant after it is used.
pub(crate) fn local_midnight<Tz: TimeZone>(zone: &Tz, day: NaiveDate) -> DateTime<Utc> {
    let naive = day.and_time(NaiveTime::MIN);
    zone.from_local_datetime(&naive)
        .earliest()
        .or_else(|| {
            zone.from_local_datetime(&(naive + Duration::hours(1)))
                .earliest()
        })
        .map(|instant| instant.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
}
