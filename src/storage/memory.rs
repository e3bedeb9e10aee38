use std::sync::RwLock;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    core::errors::{FieldServiceError, Result},
    domain::{common::month_key, Entry, MonthlyInformation},
};

use super::{
    entries_of_month, entries_transferred_from, find_entry, remove_entry, upsert_entry,
    upsert_info, EntryStore, MonthlyInfoStore,
};

/// In-process store with the same semantics as [`super::JsonStorage`].
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<Vec<Entry>>,
    infos: RwLock<Vec<MonthlyInformation>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<Entry>) -> Self {
        let storage = Self::default();
        if let Ok(mut guard) = storage.entries.write() {
            for entry in &entries {
                upsert_entry(&mut guard, entry);
            }
        }
        storage
    }
}

fn poisoned() -> FieldServiceError {
    FieldServiceError::StorageError("memory store lock poisoned".into())
}

impl EntryStore for MemoryStorage {
    fn get_entry(&self, id: Uuid) -> Result<Entry> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        find_entry(&entries, id)
    }

    fn all_of_month(&self, month: NaiveDate) -> Result<Vec<Entry>> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries_of_month(&entries, month))
    }

    fn transferred_from(&self, month: NaiveDate) -> Result<Vec<Entry>> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries_transferred_from(&entries, month))
    }

    fn save_entry(&self, entry: &Entry) -> Result<Uuid> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        Ok(upsert_entry(&mut entries, entry))
    }

    fn delete_entry(&self, entry: &Entry) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        remove_entry(&mut entries, entry);
        Ok(())
    }

    fn all_entries(&self) -> Result<Vec<Entry>> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.clone())
    }
}

impl MonthlyInfoStore for MemoryStorage {
    fn info_of_month(&self, month: NaiveDate) -> Result<MonthlyInformation> {
        let mut infos = self.infos.write().map_err(|_| poisoned())?;
        let key = month_key(month);
        if let Some(info) = infos.iter().find(|info| month_key(info.month) == key) {
            return Ok(info.clone());
        }
        let info = MonthlyInformation::new(month);
        upsert_info(&mut infos, &info);
        Ok(info)
    }

    fn save_info(&self, info: &MonthlyInformation) -> Result<()> {
        let mut infos = self.infos.write().map_err(|_| poisoned())?;
        upsert_info(&mut infos, info);
        Ok(())
    }
}
