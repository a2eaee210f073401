use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use chrono_tz::Tz;

/// Weekday names for the report, pluralized, indexed by day-of-week (0 = Sunday)
const WEEKDAYS: [&str; 7] = [
    "Sundays",
    "Mondays",
    "Tuesdays",
    "Wednesdays",
    "Thursdays",
    "Fridays",
    "Saturdays",
];

/// The 29-day query window ending yesterday, plus yesterday's weekday name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub weekday_label: &'static str,
}

/// Compute the query window for a run happening at `now`.
///
/// "Today" is the calendar date of `now` in `tz`, not in UTC. Truncating in
/// the wrong zone shifts the whole window by a day near midnight. The window
/// ends at yesterday and reaches back 28 more days, so the last row and its
/// four same-weekday reference rows (7/14/21/28 days earlier) are all inside
/// it. Pure function of its inputs.
pub fn compute_window(now: DateTime<Utc>, tz: Tz) -> ReportWindow {
    let today = now.with_timezone(&tz).date_naive();
    let yesterday = today - Days::new(1);
    let start_date = yesterday - Days::new(28);

    ReportWindow {
        start_date,
        end_date: yesterday,
        weekday_label: WEEKDAYS[yesterday.weekday().num_days_from_sunday() as usize],
    }
}
