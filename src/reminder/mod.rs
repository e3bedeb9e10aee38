//! Monthly report reminders.
//!
//! Scheduling is best-effort: when the platform refuses to persist or arm a
//! reminder it simply never fires.

use std::{fs, path::PathBuf};

use chrono::{Datelike, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::{
    config::ReminderSettings,
    domain::common::{first_of_month, shift_month},
    utils::paths::write_atomic,
};

pub trait ReminderScheduler: Send + Sync {
    fn schedule_reminder(&self, at: NaiveDateTime);
    fn cancel_reminder(&self);
}

/// Next first-of-month at `time` strictly after `now`.
pub fn next_reminder(now: NaiveDateTime, time: NaiveTime) -> NaiveDateTime {
    let this_month = first_of_month(now.date()).and_time(time);
    if now.day() == 1 && this_month > now {
        this_month
    } else {
        shift_month(first_of_month(now.date()), 1).and_time(time)
    }
}

/// Arms or cancels the reminder to match `settings`.
pub fn sync_reminder(scheduler: &dyn ReminderScheduler, settings: &ReminderSettings, now: NaiveDateTime) {
    if settings.enabled {
        scheduler.schedule_reminder(next_reminder(now, settings.time));
    } else {
        scheduler.cancel_reminder();
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PendingReminder {
    pub at: NaiveDateTime,
}

/// Records the pending reminder in a state file for the host to pick up.
#[derive(Debug, Clone)]
pub struct FileReminderScheduler {
    path: PathBuf,
}

impl FileReminderScheduler {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn pending(&self) -> Option<PendingReminder> {
        let data = fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&data).ok()
    }
}

impl ReminderScheduler for FileReminderScheduler {
    fn schedule_reminder(&self, at: NaiveDateTime) {
        let pending = PendingReminder { at };
        let result = serde_json::to_vec_pretty(&pending)
            .map_err(std::io::Error::from)
            .and_then(|json| write_atomic(&self.path, &json));
        match result {
            Ok(()) => tracing::info!(%at, "reminder scheduled"),
            Err(err) => tracing::warn!(error = %err, "reminder could not be scheduled"),
        }
    }

    fn cancel_reminder(&self) {
        if !self.path.exists() {
            return;
        }
        match fs::remove_file(&self.path) {
            Ok(()) => tracing::info!("reminder cancelled"),
            Err(err) => tracing::warn!(error = %err, "reminder could not be cancelled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn next_reminder_is_first_of_month() {
        let time = NaiveTime::from_hms_opt(18, 0, 0).unwrap();
        assert_eq!(next_reminder(at(2024, 3, 17, 9, 0), time), at(2024, 4, 1, 18, 0));
        assert_eq!(next_reminder(at(2024, 3, 1, 9, 0), time), at(2024, 3, 1, 18, 0));
        assert_eq!(next_reminder(at(2024, 3, 1, 18, 0), time), at(2024, 4, 1, 18, 0));
        assert_eq!(next_reminder(at(2024, 12, 31, 23, 0), time), at(2025, 1, 1, 18, 0));
    }

    #[test]
    fn file_scheduler_records_and_cancels() {
        let temp = tempdir().unwrap();
        let scheduler = FileReminderScheduler::new(temp.path().join("reminder.json"));
        let settings = ReminderSettings {
            enabled: true,
            time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        };
        sync_reminder(&scheduler, &settings, at(2024, 5, 10, 12, 0));
        assert_eq!(scheduler.pending().unwrap().at, at(2024, 6, 1, 8, 0));

        let disabled = ReminderSettings {
            enabled: false,
            ..settings
        };
        sync_reminder(&scheduler, &disabled, at(2024, 5, 10, 12, 0));
        assert!(scheduler.pending().is_none());
    }

    #[test]
    fn unwritable_location_is_silently_ignored() {
        let temp = tempdir().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "file").unwrap();
        let scheduler = FileReminderScheduler::new(blocker.join("reminder.json"));
        scheduler.schedule_reminder(at(2024, 6, 1, 8, 0));
        assert!(scheduler.pending().is_none());
    }
}
