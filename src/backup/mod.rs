//! Zip backups of the database files plus serialized settings.
//!
//! Import overwrites database files and hands the settings text back to the
//! caller; the two steps are not atomic with respect to each other.

use std::{
    collections::HashMap,
    fs::{self, File},
    io::{Read, Write},
    path::{Path, PathBuf},
};

use chrono::NaiveDateTime;
use zip::{write::SimpleFileOptions, CompressionMethod, ZipArchive, ZipWriter};

use crate::{
    core::errors::{FieldServiceError, Result},
    utils::paths::{ensure_dir, write_atomic},
};

pub const SETTINGS_ENTRY: &str = "settings.yaml";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";

/// File name for a backup taken at `now`.
pub fn default_backup_name(now: NaiveDateTime) -> String {
    format!(
        "field_service_backup_{}.zip",
        now.format(BACKUP_TIMESTAMP_FORMAT)
    )
}

pub struct BackupService {
    database_files: HashMap<String, PathBuf>,
}

impl BackupService {
    /// `database_files` are the files written to and restored from archives.
    pub fn new(database_files: Vec<PathBuf>) -> Self {
        let database_files = database_files
            .into_iter()
            .filter_map(|path| {
                let name = path.file_name()?.to_str()?.to_string();
                Some((name, path))
            })
            .collect();
        Self { database_files }
    }

    pub fn create_backup(&self, destination: &Path, settings_yaml: &str) -> Result<()> {
        if let Some(parent) = destination.parent() {
            ensure_dir(parent)?;
        }
        let file = File::create(destination)?;
        let mut zip = ZipWriter::new(file);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let mut names: Vec<&String> = self.database_files.keys().collect();
        names.sort();
        for name in names {
            let path = &self.database_files[name];
            if !path.exists() {
                tracing::debug!(file = %name, "database file missing, skipped in backup");
                continue;
            }
            zip.start_file(name.as_str(), options)?;
            zip.write_all(&fs::read(path)?)?;
        }

        zip.start_file(SETTINGS_ENTRY, options)?;
        zip.write_all(settings_yaml.as_bytes())?;
        zip.finish()?;
        tracing::info!(destination = %destination.display(), "backup created");
        Ok(())
    }

    /// Restores known database files and returns the archived settings, if any.
    pub fn import_backup(&self, source: &Path) -> Result<Option<String>> {
        let file = File::open(source)?;
        let mut archive = ZipArchive::new(file)?;
        let mut settings = None;
        let mut restored = 0usize;

        for index in 0..archive.len() {
            let mut item = archive.by_index(index)?;
            if !item.is_file() {
                continue;
            }
            let name = item.name().trim_start_matches('/').to_string();
            let mut contents = Vec::new();
            item.read_to_end(&mut contents)?;

            if name == SETTINGS_ENTRY {
                let text = String::from_utf8(contents).map_err(|err| {
                    FieldServiceError::BackupError(format!("{SETTINGS_ENTRY} is not UTF-8: {err}"))
                })?;
                settings = Some(text);
            } else if let Some(path) = self.database_files.get(&name) {
                write_atomic(path, &contents)?;
                restored += 1;
            } else {
                tracing::debug!(entry = %name, "unknown backup entry ignored");
            }
        }

        tracing::info!(
            source = %source.display(),
            restored,
            has_settings = settings.is_some(),
            "backup imported"
        );
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn backup_name_uses_timestamp() {
        let now = chrono::NaiveDate::from_ymd_opt(2024, 7, 3)
            .unwrap()
            .and_hms_opt(9, 5, 0)
            .unwrap();
        assert_eq!(default_backup_name(now), "field_service_backup_20240703_0905.zip");
    }

    #[test]
    fn roundtrip_restores_files_and_settings() {
        let temp = tempdir().unwrap();
        let db = temp.path().join("data").join("entries.json");
        write_atomic(&db, b"{\"rows\":[1,2,3]}").unwrap();
        let service = BackupService::new(vec![db.clone()]);
        let archive = temp.path().join("out").join("backup.zip");

        service.create_backup(&archive, "name: Anna\n").unwrap();
        fs::write(&db, b"changed").unwrap();

        let settings = service.import_backup(&archive).unwrap();
        assert_eq!(settings.as_deref(), Some("name: Anna\n"));
        assert_eq!(fs::read(&db).unwrap(), b"{\"rows\":[1,2,3]}");
    }

    #[test]
    fn missing_database_files_are_skipped() {
        let temp = tempdir().unwrap();
        let service = BackupService::new(vec![temp.path().join("absent.json")]);
        let archive = temp.path().join("backup.zip");
        service.create_backup(&archive, "").unwrap();
        assert_eq!(service.import_backup(&archive).unwrap().as_deref(), Some(""));
        assert!(!temp.path().join("absent.json").exists());
    }
}
