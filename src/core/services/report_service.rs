use chrono::{Datelike, Month, NaiveDate};
use serde::Serialize;

use crate::domain::{Entry, MonthlyInformation, Time};

use super::aggregation;

/// Field-service report for one month, ready to display or share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub name: String,
    pub month_title: String,
    pub placements: u32,
    pub ministry_hours: u32,
    pub return_visits: u32,
    pub video_showings: u32,
    pub bible_studies: u32,
    /// Notices for theocratic work, one per line; empty when there is none.
    pub comments: String,
    /// Free-text note the user attached to the month.
    pub note: String,
}

impl Report {
    /// Plain-text rendering used when sharing the report.
    pub fn share_text(&self) -> String {
        let mut lines = vec![
            format!("Field service report {}", self.month_title),
            format!("Name: {}", self.name),
            format!("Placements: {}", self.placements),
            format!("Video showings: {}", self.video_showings),
            format!("Hours: {}", self.ministry_hours),
            format!("Return visits: {}", self.return_visits),
            format!("Bible studies: {}", self.bible_studies),
        ];
        let remarks: Vec<&str> = [self.note.trim(), self.comments.as_str()]
            .into_iter()
            .filter(|text| !text.is_empty())
            .collect();
        if !remarks.is_empty() {
            lines.push(format!("Comments:\n{}", remarks.join("\n")));
        }
        lines.join("\n")
    }
}

pub struct ReportService;

impl ReportService {
    /// Assembles the report for `entries` of one month.
    ///
    /// `ministry_time` is the month's net ministry time (after carries); only
    /// whole hours are reported and a negative balance reports zero.
    pub fn assemble(
        name: &str,
        month: NaiveDate,
        entries: &[Entry],
        ministry_time: Time,
        info: &MonthlyInformation,
        today: NaiveDate,
    ) -> Report {
        let ministry_hours = if ministry_time.is_negative() {
            0
        } else {
            u32::try_from(ministry_time.hours()).unwrap_or(u32::MAX)
        };
        Report {
            name: name.to_string(),
            month_title: Self::month_title(month, today),
            placements: aggregation::placements(entries),
            ministry_hours,
            return_visits: aggregation::return_visits(entries),
            video_showings: aggregation::video_showings(entries),
            bible_studies: info.bible_studies.unwrap_or(0),
            comments: Self::comments(entries),
            note: info.report_comment.trim().to_string(),
        }
    }

    /// Month name, suffixed with the year when it differs from `today`'s year.
    pub fn month_title(month: NaiveDate, today: NaiveDate) -> String {
        let name = Month::try_from(month.month() as u8)
            .map(|m| m.name())
            .unwrap_or("?");
        if month.year() == today.year() {
            name.to_string()
        } else {
            format!("{} {}", name, month.year())
        }
    }

    /// Notices for theocratic assignment and school hours; zero-hour kinds are left out.
    pub fn comments(entries: &[Entry]) -> String {
        let notices = [
            (
                aggregation::theocratic_assignment_time_sum(entries),
                "theocratic assignments",
            ),
            (
                aggregation::theocratic_school_time_sum(entries),
                "theocratic schools",
            ),
        ];
        notices
            .iter()
            .filter(|(time, _)| time.hours() != 0)
            .map(|(time, label)| format!("{} spent on {}", pluralize_hours(time.hours()), label))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn pluralize_hours(hours: i64) -> String {
    if hours == 1 {
        "1 hour".to_string()
    } else {
        format!("{hours} hours")
    }
}
