use crate::dates;
use crate::errors::JournalError;
use crate::moods::{Mood, MoodLogged};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Category labels an entry can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    People,
    Experiences,
    Things,
    Personal,
    Work,
}

impl Tag {
    pub const ALL: [Tag; 5] = [
        Tag::People,
        Tag::Experiences,
        Tag::Things,
        Tag::Personal,
        Tag::Work,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Tag::People => "people",
            Tag::Experiences => "experiences",
            Tag::Things => "things",
            Tag::Personal => "personal",
            Tag::Work => "work",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tag {
    type Err = JournalError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        Tag::ALL
            .into_iter()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| JournalError::Validation(format!("unknown tag '{value}'")))
    }
}

/// Parses raw tag labels into a set, rejecting anything outside the vocabulary.
pub fn parse_tags<S: AsRef<str>>(labels: &[S]) -> Result<BTreeSet<Tag>, JournalError> {
    labels.iter().map(|label| label.as_ref().parse()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub content: String,
    #[serde(default)]
    pub tags: BTreeSet<Tag>,
}

impl Entry {
    /// Calendar date of the entry in the local timezone.
    pub fn local_date(&self) -> NaiveDate {
        dates::local_date(&self.timestamp)
    }

    pub fn has_tag(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }
}

/// Selection applied by `EntryStore::list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryFilter {
    #[default]
    All,
    Today,
    Last7Days,
    Last30Days,
    Tag(Tag),
}

impl EntryFilter {
    /// Whether `entry` passes this filter when evaluated on `today`.
    pub fn matches(&self, entry: &Entry, today: NaiveDate) -> bool {
        match self {
            EntryFilter::All => true,
            EntryFilter::Today => entry.local_date() == today,
            EntryFilter::Last7Days => dates::within_last_days(entry.local_date(), today, 7),
            EntryFilter::Last30Days => dates::within_last_days(entry.local_date(), today, 30),
            EntryFilter::Tag(tag) => entry.has_tag(*tag),
        }
    }
}

impl fmt::Display for EntryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryFilter::All => f.write_str("all"),
            EntryFilter::Today => f.write_str("today"),
            EntryFilter::Last7Days => f.write_str("last7days"),
            EntryFilter::Last30Days => f.write_str("last30days"),
            EntryFilter::Tag(tag) => write!(f, "tag:{tag}"),
        }
    }
}

impl FromStr for EntryFilter {
    type Err = JournalError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim().to_ascii_lowercase();
        match value.as_str() {
            "" | "all" => Ok(EntryFilter::All),
            "today" => Ok(EntryFilter::Today),
            "last7days" => Ok(EntryFilter::Last7Days),
            "last30days" => Ok(EntryFilter::Last30Days),
            other => match other.strip_prefix("tag:") {
                Some(tag) => Ok(EntryFilter::Tag(tag.parse()?)),
                None => Err(JournalError::Validation(format!(
                    "unknown filter '{other}'"
                ))),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub filter: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EntryRequest {
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct MoodRequest {
    pub mood: Mood,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Error,
}

/// Message for the toast surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub entry: Entry,
    pub notice: Notice,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub id: u64,
    pub notice: Notice,
}

#[derive(Debug, Serialize)]
pub struct MoodResponse {
    #[serde(flatten)]
    pub logged: MoodLogged,
    pub notice: Notice,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub today: String,
    pub total_entries: usize,
    pub entries_this_month: usize,
    pub current_streak: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_parses_every_textual_form() {
        assert_eq!("all".parse::<EntryFilter>().unwrap(), EntryFilter::All);
        assert_eq!("".parse::<EntryFilter>().unwrap(), EntryFilter::All);
        assert_eq!("Today".parse::<EntryFilter>().unwrap(), EntryFilter::Today);
        assert_eq!(
            "last7days".parse::<EntryFilter>().unwrap(),
            EntryFilter::Last7Days
        );
        assert_eq!(
            "last30days".parse::<EntryFilter>().unwrap(),
            EntryFilter::Last30Days
        );
        assert_eq!(
            "tag:work".parse::<EntryFilter>().unwrap(),
            EntryFilter::Tag(Tag::Work)
        );
    }

    #[test]
    fn filter_rejects_unknown_forms() {
        assert!(matches!(
            "yesterday".parse::<EntryFilter>(),
            Err(JournalError::Validation(_))
        ));
        assert!(matches!(
            "tag:hobbies".parse::<EntryFilter>(),
            Err(JournalError::Validation(_))
        ));
    }

    #[test]
    fn filter_display_parses_back() {
        for filter in [
            EntryFilter::All,
            EntryFilter::Today,
            EntryFilter::Last7Days,
            EntryFilter::Last30Days,
            EntryFilter::Tag(Tag::People),
        ] {
            assert_eq!(filter.to_string().parse::<EntryFilter>().unwrap(), filter);
        }
    }

    #[test]
    fn parse_tags_deduplicates_and_validates() {
        let tags = parse_tags(&["work", "WORK", " people "]).unwrap();
        assert_eq!(tags.len(), 2);
        assert!(tags.contains(&Tag::Work));
        assert!(tags.contains(&Tag::People));

        assert!(parse_tags(&["work", "gadgets"]).is_err());
    }

    #[test]
    fn tags_serialize_lowercase() {
        let json = serde_json::to_string(&Tag::Experiences).unwrap();
        assert_eq!(json, "\"experiences\"");
    }
}
