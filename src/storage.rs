use crate::dates;
use crate::errors::JournalError;
use crate::models::{Entry, Tag};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::{error, warn};

pub fn resolve_data_path() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from("data/gratitude.json"))
}

pub fn resolve_mood_path() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("APP_MOOD_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from("data/moods.json"))
}

/// Raw bytes of the slot at `path`, or `None` when it is missing or unreadable.
pub async fn read_slot(path: &Path) -> Option<Vec<u8>> {
    match fs::read(path).await {
        Ok(bytes) => Some(bytes),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
        Err(err) => {
            error!("failed to read data file {}: {err}", path.display());
            None
        }
    }
}

pub async fn write_slot<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), JournalError> {
    let payload =
        serde_json::to_vec_pretty(value).map_err(|err| JournalError::Storage(err.to_string()))?;
    fs::write(path, payload).await?;
    Ok(())
}

/// Splits a slot into its array elements. Anything other than a JSON array
/// is a `Decode` error; bad elements are left for the caller to skip.
pub fn decode_records(bytes: &[u8]) -> Result<Vec<serde_json::Value>, JournalError> {
    serde_json::from_slice(bytes).map_err(|err| JournalError::Decode(err.to_string()))
}

/// Result of reading the storage slot.
#[derive(Debug, Default)]
pub struct Loaded {
    pub entries: Vec<Entry>,
    /// Records that were stored in an older shape and rewritten on load.
    pub migrated: usize,
}

/// Reads the slot at `path`. Missing, unreadable or corrupt data yields an
/// empty collection.
pub async fn load_entries(path: &Path) -> Loaded {
    let Some(bytes) = read_slot(path).await else {
        return Loaded::default();
    };
    match decode_entries(&bytes) {
        Ok(loaded) => loaded,
        Err(err) => {
            error!("failed to parse data file: {err}");
            Loaded::default()
        }
    }
}

pub async fn persist_entries(path: &Path, entries: &[Entry]) -> Result<(), JournalError> {
    write_slot(path, entries).await
}

/// Every shape the slot has held over time.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredEntry {
    Current {
        id: u64,
        timestamp: DateTime<Utc>,
        content: String,
        #[serde(default)]
        tags: Vec<String>,
    },
    /// `date` is an ISO-8601 timestamp.
    Dated {
        id: u64,
        date: String,
        content: String,
        #[serde(default)]
        tags: Vec<String>,
    },
    /// `date` is a bare `YYYY-MM-DD` day.
    Bare { date: String, entry: String },
}

struct Candidate {
    id: Option<u64>,
    timestamp: DateTime<Utc>,
    content: String,
    tags: BTreeSet<Tag>,
}

pub fn decode_entries(bytes: &[u8]) -> Result<Loaded, JournalError> {
    let records = decode_records(bytes)?;

    let mut migrated = 0;
    let mut candidates = Vec::with_capacity(records.len());
    for (index, value) in records.into_iter().enumerate() {
        let record = match serde_json::from_value::<StoredEntry>(value) {
            Ok(record) => record,
            Err(err) => {
                warn!(index, "dropping unreadable stored entry: {err}");
                continue;
            }
        };

        let (id, timestamp, content, tags) = match record {
            StoredEntry::Current {
                id,
                timestamp,
                content,
                tags,
            } => (Some(id), Some(timestamp), content, tags),
            StoredEntry::Dated {
                id,
                date,
                content,
                tags,
            } => {
                migrated += 1;
                (Some(id), parse_legacy_date(&date), content, tags)
            }
            StoredEntry::Bare { date, entry } => {
                migrated += 1;
                (None, parse_legacy_date(&date), entry, Vec::new())
            }
        };

        let Some(timestamp) = timestamp else {
            warn!(?id, "dropping stored entry with unreadable date");
            continue;
        };
        let content = content.trim();
        if content.is_empty() {
            warn!(?id, "dropping stored entry with empty content");
            continue;
        }

        candidates.push(Candidate {
            id,
            timestamp,
            content: content.to_string(),
            tags: known_tags(&tags),
        });
    }

    let mut entries = assign_ids(candidates);
    if migrated > 0 {
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    }

    Ok(Loaded { entries, migrated })
}

fn parse_legacy_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(dates::start_of_local_day)
}

fn known_tags(labels: &[String]) -> BTreeSet<Tag> {
    labels
        .iter()
        .filter_map(|label| match label.parse::<Tag>() {
            Ok(tag) => Some(tag),
            Err(_) => {
                warn!(label = %label, "dropping unknown stored tag");
                None
            }
        })
        .collect()
}

/// Id handed out after `max`, or `None` once the id space is used up.
pub fn id_after(max: Option<u64>) -> Option<u64> {
    match max {
        Some(max) => max.checked_add(1),
        None => Some(1),
    }
}

/// Keeps stored ids where they are unique and hands out fresh ones above the
/// current maximum otherwise. Records that cannot get a fresh id are dropped.
fn assign_ids(candidates: Vec<Candidate>) -> Vec<Entry> {
    let mut next_id = id_after(candidates.iter().filter_map(|candidate| candidate.id).max());

    let mut seen = HashSet::with_capacity(candidates.len());
    candidates
        .into_iter()
        .filter_map(|candidate| {
            let id = match candidate.id {
                Some(id) if seen.insert(id) => id,
                stored => {
                    let Some(id) = next_id else {
                        warn!(?stored, "dropping stored entry: no ids left to assign");
                        return None;
                    };
                    next_id = id.checked_add(1);
                    seen.insert(id);
                    id
                }
            };
            Some(Entry {
                id,
                timestamp: candidate.timestamp,
                content: candidate.content,
                tags: candidate.tags,
            })
        })
        .collect()
}
