use crate::dates;
use crate::errors::JournalError;
use crate::models::{Entry, EntryFilter, Tag};
use crate::storage::{id_after, load_entries, persist_entries};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// The journal's single collection of entries, newest first.
///
/// Every mutation builds the next collection, writes it to the storage slot
/// and only then replaces the in-memory copy, so a failed write leaves the
/// store as it was.
#[derive(Debug)]
pub struct EntryStore {
    path: PathBuf,
    entries: Vec<Entry>,
    /// `None` once every `u64` id has been handed out.
    next_id: Option<u64>,
}

impl EntryStore {
    /// Loads the collection at `path`; missing or corrupt data starts empty.
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let loaded = load_entries(&path).await;
        let store = Self::from_entries(path, loaded.entries);

        if loaded.migrated > 0 {
            info!(
                migrated = loaded.migrated,
                "rewriting legacy entries in the current format"
            );
            if let Err(err) = store.persist().await {
                error!("failed to write migrated entries: {err}");
            }
        }

        info!(
            entries = store.entries.len(),
            path = %store.path.display(),
            "loaded journal"
        );
        store
    }

    fn from_entries(path: PathBuf, entries: Vec<Entry>) -> Self {
        let next_id = id_after(entries.iter().map(|entry| entry.id).max());
        Self {
            path,
            entries,
            next_id,
        }
    }

    pub async fn persist(&self) -> Result<(), JournalError> {
        persist_entries(&self.path, &self.entries).await
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn get(&self, id: u64) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub async fn insert(
        &mut self,
        content: &str,
        tags: BTreeSet<Tag>,
    ) -> Result<Entry, JournalError> {
        self.insert_at(content, tags, Utc::now()).await
    }

    pub async fn insert_at(
        &mut self,
        content: &str,
        tags: BTreeSet<Tag>,
        timestamp: DateTime<Utc>,
    ) -> Result<Entry, JournalError> {
        let content = validate_content(content)?;
        let id = self
            .next_id
            .ok_or_else(|| JournalError::Storage("no entry ids left to assign".to_string()))?;
        let entry = Entry {
            id,
            timestamp,
            content,
            tags,
        };

        let mut next = Vec::with_capacity(self.entries.len() + 1);
        next.push(entry.clone());
        next.extend(self.entries.iter().cloned());
        self.commit(next).await?;
        self.next_id = id.checked_add(1);

        info!(id = entry.id, "inserted entry");
        Ok(entry)
    }

    /// Replaces content and tags; the creation timestamp is kept.
    pub async fn update(
        &mut self,
        id: u64,
        content: &str,
        tags: BTreeSet<Tag>,
    ) -> Result<Entry, JournalError> {
        let position = self.position(id)?;
        let content = validate_content(content)?;

        let mut next = self.entries.clone();
        let entry = &mut next[position];
        entry.content = content;
        entry.tags = tags;
        let updated = entry.clone();
        self.commit(next).await?;

        info!(id, "updated entry");
        Ok(updated)
    }

    /// Unknown ids fail with `NotFound`.
    pub async fn delete(&mut self, id: u64) -> Result<(), JournalError> {
        let position = self.position(id)?;

        let mut next = self.entries.clone();
        next.remove(position);
        self.commit(next).await?;

        info!(id, "deleted entry");
        Ok(())
    }

    pub fn list(&self, filter: &EntryFilter) -> Vec<Entry> {
        self.list_at(filter, dates::today())
    }

    pub fn list_at(&self, filter: &EntryFilter, today: NaiveDate) -> Vec<Entry> {
        self.entries
            .iter()
            .filter(|entry| filter.matches(entry, today))
            .cloned()
            .collect()
    }

    fn position(&self, id: u64) -> Result<usize, JournalError> {
        self.entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or(JournalError::NotFound(id))
    }

    async fn commit(&mut self, next: Vec<Entry>) -> Result<(), JournalError> {
        persist_entries(&self.path, &next).await?;
        self.entries = next;
        Ok(())
    }
}

fn validate_content(content: &str) -> Result<String, JournalError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(JournalError::Validation(
            "content must not be empty".to_string(),
        ));
    }
    Ok(content.to_string())
}
