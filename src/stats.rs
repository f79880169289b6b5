use crate::dates;
use crate::models::{Entry, StatsResponse};
use chrono::NaiveDate;
use std::collections::BTreeSet;

pub fn build_stats(entries: &[Entry]) -> StatsResponse {
    build_stats_at(dates::today(), entries)
}

pub fn build_stats_at(today: NaiveDate, entries: &[Entry]) -> StatsResponse {
    StatsResponse {
        today: today.to_string(),
        total_entries: entries.len(),
        entries_this_month: monthly_count(entries, today),
        current_streak: current_streak(entries, today),
    }
}

/// Consecutive days with at least one entry, ending today or yesterday.
///
/// Entries dated after `today` never extend the streak.
pub fn current_streak(entries: &[Entry], today: NaiveDate) -> u32 {
    let days: BTreeSet<NaiveDate> = entries
        .iter()
        .map(Entry::local_date)
        .filter(|date| *date <= today)
        .collect();

    let mut cursor = if days.contains(&today) {
        Some(today)
    } else {
        today.pred_opt()
    };

    let mut streak = 0;
    while let Some(date) = cursor.filter(|date| days.contains(date)) {
        streak += 1;
        cursor = date.pred_opt();
    }
    streak
}

/// Entries dated on or after the first day of `today`'s month.
pub fn monthly_count(entries: &[Entry], today: NaiveDate) -> usize {
    let start = dates::month_start(today);
    entries
        .iter()
        .filter(|entry| entry.local_date() >= start)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Local, TimeZone, Utc};

    fn entry_on(id: u64, date: NaiveDate) -> Entry {
        let noon = date.and_hms_opt(12, 0, 0).unwrap();
        Entry {
            id,
            timestamp: Local
                .from_local_datetime(&noon)
                .unwrap()
                .with_timezone(&Utc),
            content: format!("entry {id}"),
            tags: Default::default(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 18).unwrap()
    }

    fn days_ago(n: i64) -> NaiveDate {
        today() - Duration::days(n)
    }

    #[test]
    fn streak_counts_consecutive_days_ending_today() {
        let entries: Vec<Entry> = (0..5).map(|n| entry_on(n as u64, days_ago(n))).collect();
        assert_eq!(current_streak(&entries, today()), 5);
    }

    #[test]
    fn streak_can_end_yesterday() {
        let entries = vec![entry_on(1, days_ago(1)), entry_on(2, days_ago(2))];
        assert_eq!(current_streak(&entries, today()), 2);
    }

    #[test]
    fn same_day_entries_count_once() {
        let entries = vec![entry_on(1, today()), entry_on(2, today())];
        assert_eq!(current_streak(&entries, today()), 1);
    }

    #[test]
    fn gap_truncates_streak() {
        let entries = vec![
            entry_on(1, today()),
            entry_on(2, days_ago(1)),
            entry_on(3, days_ago(3)),
        ];
        assert_eq!(current_streak(&entries, today()), 2);
    }

    #[test]
    fn empty_or_stale_entries_have_no_streak() {
        assert_eq!(current_streak(&[], today()), 0);

        let stale = vec![entry_on(1, days_ago(2)), entry_on(2, days_ago(3))];
        assert_eq!(current_streak(&stale, today()), 0);
    }

    #[test]
    fn future_entries_do_not_extend_streak() {
        let entries = vec![entry_on(1, today() + Duration::days(1))];
        assert_eq!(current_streak(&entries, today()), 0);

        let entries = vec![
            entry_on(1, today() + Duration::days(1)),
            entry_on(2, days_ago(1)),
        ];
        assert_eq!(current_streak(&entries, today()), 1);
    }

    #[test]
    fn monthly_count_starts_on_first_of_month() {
        let first = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let fifteenth = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        let last_month = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let entries = vec![
            entry_on(1, first),
            entry_on(2, fifteenth),
            entry_on(3, last_month),
        ];

        for day in [1, 3, 18, 31] {
            let today = NaiveDate::from_ymd_opt(2026, 3, day).unwrap();
            assert_eq!(monthly_count(&entries, today), 2);
        }
    }

    #[test]
    fn stats_summarize_entries() {
        let entries = vec![
            entry_on(1, today()),
            entry_on(2, days_ago(1)),
            entry_on(3, days_ago(40)),
        ];
        let stats = build_stats_at(today(), &entries);
        assert_eq!(stats.today, "2026-03-18");
        assert_eq!(stats.total_entries, 3);
        assert_eq!(stats.entries_this_month, 2);
        assert_eq!(stats.current_streak, 2);
    }
}
