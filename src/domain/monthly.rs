use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::common::first_of_month;

/// Auxiliary per-month record: bible studies, goal override, and report note.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthlyInformation {
    /// Always the first day of the month.
    pub month: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bible_studies: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<u32>,
    #[serde(default)]
    pub report_comment: String,
}

impl MonthlyInformation {
    pub fn new(month: NaiveDate) -> Self {
        Self {
            month: first_of_month(month),
            bible_studies: None,
            goal: None,
            report_comment: String::new(),
        }
    }
}
