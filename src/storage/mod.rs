pub mod json_backend;
pub mod memory;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    core::errors::{FieldServiceError, Result},
    domain::{common::month_key, Entry, MonthlyInformation},
};

/// Persistence of logged entries.
pub trait EntryStore: Send + Sync {
    fn get_entry(&self, id: Uuid) -> Result<Entry>;
    /// Entries dated within the month containing `month`, oldest first.
    fn all_of_month(&self, month: NaiveDate) -> Result<Vec<Entry>>;
    /// Transfer entries carrying time out of the month containing `month`.
    fn transferred_from(&self, month: NaiveDate) -> Result<Vec<Entry>>;
    /// Inserts or replaces the entry, assigning an id when absent.
    fn save_entry(&self, entry: &Entry) -> Result<Uuid>;
    fn delete_entry(&self, entry: &Entry) -> Result<()>;
    fn all_entries(&self) -> Result<Vec<Entry>>;
}

/// Persistence of per-month metadata.
pub trait MonthlyInfoStore: Send + Sync {
    /// Returns the month's record, materialising a default one on first read.
    fn info_of_month(&self, month: NaiveDate) -> Result<MonthlyInformation>;
    fn save_info(&self, info: &MonthlyInformation) -> Result<()>;
}

/// Convenience bound for backends providing both stores.
pub trait Store: EntryStore + MonthlyInfoStore {}

impl<T: EntryStore + MonthlyInfoStore> Store for T {}

pub(crate) fn find_entry(entries: &[Entry], id: Uuid) -> Result<Entry> {
    entries
        .iter()
        .find(|entry| entry.id == Some(id))
        .cloned()
        .ok_or(FieldServiceError::EntryNotFound(id))
}

pub(crate) fn entries_of_month(entries: &[Entry], month: NaiveDate) -> Vec<Entry> {
    let key = month_key(month);
    let mut selected: Vec<Entry> = entries
        .iter()
        .filter(|entry| month_key(entry.date()) == key)
        .cloned()
        .collect();
    selected.sort_by_key(|entry| entry.datetime);
    selected
}

pub(crate) fn entries_transferred_from(entries: &[Entry], month: NaiveDate) -> Vec<Entry> {
    let key = month_key(month);
    let mut selected: Vec<Entry> = entries
        .iter()
        .filter(|entry| entry.is_transfer())
        .filter(|entry| entry.transferred_from.map(month_key) == Some(key))
        .cloned()
        .collect();
    selected.sort_by_key(|entry| entry.datetime);
    selected
}

/// Last write wins for an existing id.
pub(crate) fn upsert_entry(entries: &mut Vec<Entry>, entry: &Entry) -> Uuid {
    let id = entry.id.unwrap_or_else(Uuid::new_v4);
    let mut stored = entry.clone();
    stored.id = Some(id);
    match entries.iter_mut().find(|existing| existing.id == Some(id)) {
        Some(existing) => *existing = stored,
        None => entries.push(stored),
    }
    id
}

/// Removes the entry with the same id. Unsaved entries are ignored.
pub(crate) fn remove_entry(entries: &mut Vec<Entry>, entry: &Entry) -> bool {
    let Some(id) = entry.id else {
        return false;
    };
    let before = entries.len();
    entries.retain(|existing| existing.id != Some(id));
    entries.len() != before
}

pub(crate) fn upsert_info(infos: &mut Vec<MonthlyInformation>, info: &MonthlyInformation) {
    let key = month_key(info.month);
    match infos.iter_mut().find(|existing| month_key(existing.month) == key) {
        Some(existing) => *existing = info.clone(),
        None => infos.push(info.clone()),
    }
}

pub use json_backend::JsonStorage;
pub use memory::MemoryStorage;
