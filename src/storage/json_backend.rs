use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard},
};

use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    core::errors::{FieldServiceError, Result},
    domain::{common::month_key, Entry, MonthlyInformation},
    utils::paths::{ensure_dir, write_atomic, PathResolver},
};

use super::{
    entries_of_month, entries_transferred_from, find_entry, remove_entry, upsert_entry,
    upsert_info, EntryStore, MonthlyInfoStore,
};

pub const ENTRIES_FILE: &str = "entries.json";
pub const MONTHLY_INFO_FILE: &str = "monthly_information.json";
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Table<T> {
    schema_version: u32,
    rows: Vec<T>,
}

/// File-backed store keeping entries and monthly information as JSON tables.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    data_dir: PathBuf,
    entries_file: PathBuf,
    info_file: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let base = PathResolver::resolve_base(root);
        let data_dir = PathResolver::data_dir_in(&base);
        ensure_dir(&data_dir)?;
        Ok(Self {
            entries_file: data_dir.join(ENTRIES_FILE),
            info_file: data_dir.join(MONTHLY_INFO_FILE),
            data_dir,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Files that together make up the database, as shipped in backups.
    pub fn database_files(&self) -> Vec<PathBuf> {
        vec![self.entries_file.clone(), self.info_file.clone()]
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| FieldServiceError::StorageError("storage lock poisoned".into()))
    }

    fn read_entries(&self) -> Result<Vec<Entry>> {
        read_table(&self.entries_file)
    }

    fn write_entries(&self, rows: Vec<Entry>) -> Result<()> {
        write_table(&self.entries_file, rows)
    }

    fn read_infos(&self) -> Result<Vec<MonthlyInformation>> {
        read_table(&self.info_file)
    }

    fn write_infos(&self, rows: Vec<MonthlyInformation>) -> Result<()> {
        write_table(&self.info_file, rows)
    }
}

fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let data = fs::read_to_string(path)?;
    if data.trim().is_empty() {
        return Ok(Vec::new());
    }
    let table: Table<T> = serde_json::from_str(&data)?;
    if table.schema_version > SCHEMA_VERSION {
        return Err(FieldServiceError::StorageError(format!(
            "`{}` was written by a newer schema version ({})",
            path.display(),
            table.schema_version
        )));
    }
    Ok(table.rows)
}

fn write_table<T: Serialize>(path: &Path, rows: Vec<T>) -> Result<()> {
    let table = Table {
        schema_version: SCHEMA_VERSION,
        rows,
    };
    let json = serde_json::to_string_pretty(&table)?;
    write_atomic(path, json.as_bytes())?;
    Ok(())
}

impl EntryStore for JsonStorage {
    fn get_entry(&self, id: Uuid) -> Result<Entry> {
        find_entry(&self.read_entries()?, id)
    }

    fn all_of_month(&self, month: NaiveDate) -> Result<Vec<Entry>> {
        let entries = entries_of_month(&self.read_entries()?, month);
        tracing::debug!(month = %month, count = entries.len(), "loaded entries of month");
        Ok(entries)
    }

    fn transferred_from(&self, month: NaiveDate) -> Result<Vec<Entry>> {
        Ok(entries_transferred_from(&self.read_entries()?, month))
    }

    fn save_entry(&self, entry: &Entry) -> Result<Uuid> {
        let _guard = self.lock()?;
        let mut entries = self.read_entries()?;
        let id = upsert_entry(&mut entries, entry);
        self.write_entries(entries)?;
        tracing::debug!(%id, kind = ?entry.kind, "saved entry");
        Ok(id)
    }

    fn delete_entry(&self, entry: &Entry) -> Result<()> {
        let _guard = self.lock()?;
        let mut entries = self.read_entries()?;
        if remove_entry(&mut entries, entry) {
            self.write_entries(entries)?;
            tracing::debug!(id = ?entry.id, "deleted entry");
        }
        Ok(())
    }

    fn all_entries(&self) -> Result<Vec<Entry>> {
        self.read_entries()
    }
}

impl MonthlyInfoStore for JsonStorage {
    fn info_of_month(&self, month: NaiveDate) -> Result<MonthlyInformation> {
        let key = month_key(month);
        if let Some(info) = self
            .read_infos()?
            .into_iter()
            .find(|info| month_key(info.month) == key)
        {
            return Ok(info);
        }
        let _guard = self.lock()?;
        let mut infos = self.read_infos()?;
        if let Some(info) = infos.iter().find(|info| month_key(info.month) == key) {
            return Ok(info.clone());
        }
        let info = MonthlyInformation::new(month);
        upsert_info(&mut infos, &info);
        self.write_infos(infos)?;
        Ok(info)
    }

    fn save_info(&self, info: &MonthlyInformation) -> Result<()> {
        let _guard = self.lock()?;
        let mut infos = self.read_infos()?;
        upsert_info(&mut infos, info);
        self.write_infos(infos)
    }
}
