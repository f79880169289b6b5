//! Calendar-day bucketing shared by the filters and the streak stats.
//!
//! Everything here works on local calendar dates and takes `today` as an
//! argument; only [`today`] reads the clock.

use chrono::{
    DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Calendar date of `timestamp` in the local timezone.
pub fn local_date(timestamp: &DateTime<Utc>) -> NaiveDate {
    timestamp.with_timezone(&Local).date_naive()
}

/// Start of `date` in the local timezone, as an absolute instant.
pub fn start_of_local_day(date: NaiveDate) -> DateTime<Utc> {
    first_instant_of_day(date, |naive| {
        Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|local| local.with_timezone(&Utc))
    })
}

/// First of the early hours of `date` that `resolve` can place on the
/// timeline, so a DST gap at midnight lands later on the same day.
/// Falls back to UTC noon, which stays on `date` for any offset under 12h.
fn first_instant_of_day<F>(date: NaiveDate, resolve: F) -> DateTime<Utc>
where
    F: Fn(NaiveDateTime) -> Option<DateTime<Utc>>,
{
    (0..=3)
        .filter_map(|hour| date.and_hms_opt(hour, 0, 0))
        .find_map(&resolve)
        .unwrap_or_else(|| Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)) + Duration::hours(12))
}

/// `date` falls in `[today - days, today]`.
pub fn within_last_days(date: NaiveDate, today: NaiveDate, days: i64) -> bool {
    date <= today && date >= today - Duration::days(days)
}

pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
