//! Daily mood log: at most one record per local calendar day, kept in its
//! own storage slot, plus the month grid the heatmap is drawn from.

use crate::dates;
use crate::errors::JournalError;
use crate::storage::{decode_records, read_slot, write_slot};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Great,
    Good,
    Okay,
    Down,
    Awful,
}

impl Mood {
    pub const ALL: [Mood; 5] = [Mood::Great, Mood::Good, Mood::Okay, Mood::Down, Mood::Awful];

    pub fn as_str(self) -> &'static str {
        match self {
            Mood::Great => "great",
            Mood::Good => "good",
            Mood::Okay => "okay",
            Mood::Down => "down",
            Mood::Awful => "awful",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = JournalError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        Mood::ALL
            .into_iter()
            .find(|mood| mood.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| JournalError::Validation(format!("unknown mood '{value}'")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodRecord {
    /// When the mood was last logged for its day.
    pub date: DateTime<Utc>,
    pub mood: Mood,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl MoodRecord {
    pub fn local_date(&self) -> NaiveDate {
        dates::local_date(&self.date)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MoodLogged {
    pub record: MoodRecord,
    /// An earlier record for the same day was overwritten.
    pub replaced: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthCell {
    pub date: NaiveDate,
    pub day: u32,
    pub mood: Option<Mood>,
    pub note: Option<String>,
    pub is_today: bool,
}

/// One month of heatmap cells, Sunday-first.
#[derive(Debug, Clone, Serialize)]
pub struct MonthGrid {
    pub month: String,
    /// Empty cells before the 1st so it lines up under its weekday.
    pub leading_blanks: u32,
    pub cells: Vec<MonthCell>,
}

/// Puts `record` in place of any record on the same local day, or appends it.
/// Returns whether a record was replaced.
pub fn upsert(records: &mut Vec<MoodRecord>, record: MoodRecord) -> bool {
    let day = record.local_date();
    match records.iter().position(|existing| existing.local_date() == day) {
        Some(index) => {
            records[index] = record;
            true
        }
        None => {
            records.push(record);
            false
        }
    }
}

pub fn month_cells(records: &[MoodRecord], today: NaiveDate) -> MonthGrid {
    let first = dates::month_start(today);
    let cells = first
        .iter_days()
        .take_while(|date| date.month() == first.month())
        .map(|date| {
            let record = records.iter().find(|record| record.local_date() == date);
            MonthCell {
                date,
                day: date.day(),
                mood: record.map(|record| record.mood),
                note: record.and_then(|record| record.note.clone()),
                is_today: date == today,
            }
        })
        .collect();

    MonthGrid {
        month: first.format("%Y-%m").to_string(),
        leading_blanks: first.weekday().num_days_from_sunday(),
        cells,
    }
}

fn clean_note(note: Option<String>) -> Option<String> {
    note.map(|note| note.trim().to_string())
        .filter(|note| !note.is_empty())
}

#[derive(Debug)]
pub struct MoodLog {
    path: PathBuf,
    records: Vec<MoodRecord>,
}

impl MoodLog {
    /// Loads the mood slot at `path`. Unreadable records are skipped and
    /// same-day duplicates collapse to the last one stored.
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = match read_slot(&path).await {
            Some(bytes) => decode_moods(&bytes).unwrap_or_else(|err| {
                error!("failed to parse mood file: {err}");
                Vec::new()
            }),
            None => Vec::new(),
        };

        info!(
            records = records.len(),
            path = %path.display(),
            "loaded mood log"
        );
        Self { path, records }
    }

    pub fn records(&self) -> &[MoodRecord] {
        &self.records
    }

    pub fn for_day(&self, date: NaiveDate) -> Option<&MoodRecord> {
        self.records.iter().find(|record| record.local_date() == date)
    }

    pub async fn log_mood(
        &mut self,
        mood: Mood,
        note: Option<String>,
    ) -> Result<MoodLogged, JournalError> {
        self.log_mood_at(Utc::now(), mood, note).await
    }

    /// Records `mood` for the local day of `at`, replacing that day's record.
    pub async fn log_mood_at(
        &mut self,
        at: DateTime<Utc>,
        mood: Mood,
        note: Option<String>,
    ) -> Result<MoodLogged, JournalError> {
        let record = MoodRecord {
            date: at,
            mood,
            note: clean_note(note),
        };

        let mut next = self.records.clone();
        let replaced = upsert(&mut next, record.clone());
        write_slot(&self.path, &next).await?;
        self.records = next;

        info!(mood = %mood, replaced, "logged mood");
        Ok(MoodLogged { record, replaced })
    }

    pub fn month_grid(&self, today: NaiveDate) -> MonthGrid {
        month_cells(&self.records, today)
    }
}

fn decode_moods(bytes: &[u8]) -> Result<Vec<MoodRecord>, JournalError> {
    let mut records = Vec::new();
    for (index, value) in decode_records(bytes)?.into_iter().enumerate() {
        match serde_json::from_value::<MoodRecord>(value) {
            Ok(mut record) => {
                record.note = clean_note(record.note.take());
                upsert(&mut records, record);
            }
            Err(err) => warn!(index, "dropping unreadable mood record: {err}"),
        }
    }
    Ok(records)
}
