#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use chrono::{NaiveDate, NaiveDateTime};
use field_service::{
    config::{SettingsContext, SettingsManager},
    domain::{Entry, EntryType},
    storage::JsonStorage,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub struct TestEnv {
    pub base: PathBuf,
    pub storage: JsonStorage,
    pub settings: SettingsContext,
}

/// Creates isolated storage and settings backed by a unique directory for each test.
pub fn setup_test_env() -> TestEnv {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let storage = JsonStorage::new(Some(base.clone())).expect("create json storage backend");
    let settings = SettingsContext::load(SettingsManager::with_base_dir(Some(base.clone())))
        .expect("load settings for temp dir");

    TestEnv {
        base,
        storage,
        settings,
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(day: NaiveDate, hour: u32) -> NaiveDateTime {
    day.and_hms_opt(hour, 0, 0).unwrap()
}

pub fn ministry(day: NaiveDate, hours: u32, minutes: u32) -> Entry {
    Entry::new(EntryType::Ministry, at(day, 10)).with_time(hours, minutes)
}
