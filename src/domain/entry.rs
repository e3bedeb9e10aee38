use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::Displayable;
use super::time::Time;

/// Classification of a logged activity. An entry has exactly one type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EntryType {
    Ministry,
    TheocraticAssignment,
    TheocraticSchool,
    Transfer,
}

impl EntryType {
    /// Ministry and transfer entries both count toward ministry time.
    pub fn counts_as_ministry(&self) -> bool {
        matches!(self, EntryType::Ministry | EntryType::Transfer)
    }

    pub fn label(&self) -> &'static str {
        match self {
            EntryType::Ministry => "Ministry",
            EntryType::TheocraticAssignment => "Theocratic assignment",
            EntryType::TheocraticSchool => "Theocratic school",
            EntryType::Transfer => "Transfer",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "ministry" | "m" => Some(EntryType::Ministry),
            "assignment" | "theocratic-assignment" | "a" => Some(EntryType::TheocraticAssignment),
            "school" | "theocratic-school" | "s" => Some(EntryType::TheocraticSchool),
            "transfer" | "t" => Some(EntryType::Transfer),
            _ => None,
        }
    }
}

/// A single logged activity record for a calendar day.
///
/// `minutes` is not normalised on construction; sums go through [`Time`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub datetime: NaiveDateTime,
    #[serde(rename = "type")]
    pub kind: EntryType,
    #[serde(default)]
    pub hours: u32,
    #[serde(default)]
    pub minutes: u32,
    #[serde(default)]
    pub placements: u32,
    #[serde(default)]
    pub video_showings: u32,
    #[serde(default)]
    pub return_visits: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transferred_from: Option<NaiveDate>,
}

impl Entry {
    pub fn new(kind: EntryType, datetime: NaiveDateTime) -> Self {
        Self {
            id: None,
            datetime,
            kind,
            hours: 0,
            minutes: 0,
            placements: 0,
            video_showings: 0,
            return_visits: 0,
            transferred_from: None,
        }
    }

    /// Builds an unsaved transfer entry on `date` carrying `minutes` from `transferred_from`.
    pub fn transfer(date: NaiveDate, transferred_from: NaiveDate, minutes: u32) -> Self {
        Self {
            minutes,
            transferred_from: Some(transferred_from),
            ..Self::new(EntryType::Transfer, date.and_time(chrono::NaiveTime::MIN))
        }
    }

    pub fn with_time(mut self, hours: u32, minutes: u32) -> Self {
        self.hours = hours;
        self.minutes = minutes;
        self
    }

    pub fn with_counters(mut self, placements: u32, video_showings: u32, return_visits: u32) -> Self {
        self.placements = placements;
        self.video_showings = video_showings;
        self.return_visits = return_visits;
        self
    }

    pub fn date(&self) -> NaiveDate {
        self.datetime.date()
    }

    /// Duration of this entry, carrying unnormalised minutes into hours.
    pub fn time(&self) -> Time {
        Time::from_total_minutes(i64::from(self.hours) * 60 + i64::from(self.minutes))
    }

    pub fn is_transfer(&self) -> bool {
        self.kind == EntryType::Transfer
    }
}

impl Displayable for Entry {
    fn display_label(&self) -> String {
        let mut label = format!("{} {} {}", self.date(), self.kind.label(), self.time());
        if let Some(from) = self.transferred_from {
            label.push_str(&format!(" (from {})", from));
        }
        label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_carries_unnormalised_minutes() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let entry = Entry::new(EntryType::Ministry, date.and_hms_opt(9, 0, 0).unwrap()).with_time(1, 75);
        assert_eq!(entry.time().hours(), 2);
        assert_eq!(entry.time().minutes(), 15);
    }

    #[test]
    fn transfer_entries_start_at_midnight() {
        let to = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let from = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let entry = Entry::transfer(to, from, 25);
        assert!(entry.is_transfer());
        assert_eq!(entry.date(), to);
        assert_eq!(entry.hours, 0);
        assert_eq!(entry.minutes, 25);
        assert_eq!(entry.transferred_from, Some(from));
        assert!(entry.id.is_none());
    }

    #[test]
    fn serializes_type_field_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let entry = Entry::new(EntryType::TheocraticSchool, date.and_hms_opt(0, 0, 0).unwrap());
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"type\":\"TheocraticSchool\""));
        assert!(!json.contains("transferred_from"));
    }
}
